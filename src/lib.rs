// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! QuakeMetrics - Strong-Motion Record Processing Engine
//!
//! Converts raw triaxial ground-motion recordings into standard
//! earthquake-engineering metrics:
//! - Multi-format ingestion of strong-motion text records
//! - H1/H2/V component identification (filename conventions + RMS fallback)
//! - Polynomial baseline-drift correction via double integration
//! - Arias intensity, significant duration, destructiveness potential
//! - FFT power spectra with dominant-frequency extraction
//! - SDOF response spectra via beta-Newmark time stepping
//! - Direction-independent RotD00/50/100 rotated spectra
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    QuakeMetrics Engine                     │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌────────────┐   ┌─────────────────────┐   │
//! │  │ Ingestor │ → │ Identifier │ → │ Baseline / Arias /  │   │
//! │  │          │   │  H1 H2 V   │   │ Fourier (per chan)  │   │
//! │  └──────────┘   └────────────┘   └─────────────────────┘   │
//! │                                            ↓               │
//! │                  ┌───────────────┐   ┌───────────────┐     │
//! │                  │ Newmark SDOF  │ → │ RotD combiner │     │
//! │                  │ solver        │   │ (azimuth sweep)│    │
//! │                  └───────────────┘   └───────────────┘     │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]

pub mod analysis;
pub mod components;
pub mod config;
pub mod error;
pub mod ingest;
pub mod record;

// Re-exports for convenience
pub use analysis::{
    AriasAnalyzer, AriasResult, BaselineCorrection, CorrectedMotion, FourierAnalyzer,
    FourierSpectrum, ResponseSpectrum, ResponseSpectrumSolver, RotDAnalyzer, RotDResult,
};
pub use components::{ComponentIdentifier, ComponentRole, ComponentSet};
pub use config::Config;
pub use error::{QuakeError, Result};
pub use ingest::{IngestWarning, SignalIngestor};
pub use record::{Record, RecordSummary};

/// QuakeMetrics version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// QuakeMetrics name
pub const NAME: &str = "QuakeMetrics";
