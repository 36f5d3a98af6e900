//! Analysis module - baseline correction, Arias intensity, Fourier and response spectra

mod arias;
mod baseline;
mod fourier;
mod newmark;
mod rotd;

pub use arias::*;
pub use baseline::*;
pub use fourier::*;
pub use newmark::*;
pub use rotd::*;

/// Standard gravity used for all g <-> m/s^2 conversions [m/s^2].
pub const GRAVITY: f64 = 9.81;
