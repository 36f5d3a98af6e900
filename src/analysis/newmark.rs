// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! SDOF response spectra via the beta-Newmark time-stepping method
//!
//! Unit contract at this boundary: ground acceleration comes in as [g] and the
//! Sa/PSa ordinates go back out in [g]; displacement and velocity quantities
//! stay in SI units throughout.

use serde::{Deserialize, Serialize};

use super::GRAVITY;
use crate::error::{QuakeError, Result};

/// Newmark integration parameter gamma.
const GAMMA: f64 = 0.5;
/// Newmark integration parameter beta.
const BETA: f64 = 0.25;

/// Longest natural period on the spectral grid [s].
const PERIOD_MAX: f64 = 5.0;
/// Spacing of the spectral period grid [s].
const PERIOD_STEP: f64 = 0.01;

/// The fixed natural-period grid shared by all spectral products.
pub fn period_grid() -> Vec<f64> {
    let count = (PERIOD_MAX / PERIOD_STEP).round() as usize;
    (0..=count).map(|j| j as f64 * PERIOD_STEP).collect()
}

/// Oscillator time histories saved for one reference period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OscillatorHistory {
    /// Natural period the history was recorded at [s]
    pub period: f64,
    /// Relative displacement [m]
    pub displacement: Vec<f64>,
    /// Relative velocity [m/s]
    pub velocity: Vec<f64>,
    /// Relative acceleration [g]
    pub relative_acceleration: Vec<f64>,
    /// Absolute acceleration, relative + ground [g]
    pub absolute_acceleration: Vec<f64>,
}

/// Response spectrum of one channel over the fixed period grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSpectrum {
    /// Natural periods [s]
    pub periods: Vec<f64>,
    /// Spectral displacement [m]
    pub sd: Vec<f64>,
    /// Spectral velocity [m/s]
    pub sv: Vec<f64>,
    /// Spectral acceleration [g]
    pub sa: Vec<f64>,
    /// Pseudo-velocity, w * Sd [m/s]
    pub psv: Vec<f64>,
    /// Pseudo-acceleration, w^2 * Sd [g]
    pub psa: Vec<f64>,
    /// Time histories at the grid period nearest 1.0 s, when that period was
    /// integrated
    pub history: Option<OscillatorHistory>,
}

/// beta-Newmark solver for damped SDOF oscillators over the period grid.
pub struct ResponseSpectrumSolver;

impl ResponseSpectrumSolver {
    /// Compute the response spectrum of a ground acceleration record.
    ///
    /// `signal` is ground acceleration in [g]; `zeta` the damping ratio.
    /// Periods at or below the stability bound `q = dt*pi*sqrt(2)*sqrt(gamma -
    /// 2*beta)` are not integrated; their ordinates degenerate to the record's
    /// PGA (Sa, PSa) and zero (Sd, Sv, PSv).
    pub fn compute(signal: &[f64], dt: f64, zeta: f64) -> Result<ResponseSpectrum> {
        let n = signal.len();
        if n < 2 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("response spectrum needs at least 2 samples, got {n}"),
            });
        }
        if dt <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("non-positive sampling interval {dt}"),
            });
        }

        // Ground acceleration in m/s^2 for the equation of motion
        let ag: Vec<f64> = signal.iter().map(|&a| a * GRAVITY).collect();
        let pga = ag.iter().fold(0.0_f64, |m, &a| m.max(a.abs()));

        let periods = period_grid();
        let q = dt * std::f64::consts::PI * 2.0_f64.sqrt() * (GAMMA - 2.0 * BETA).sqrt();

        // Reference history: the single grid period closest to 1.0 s
        let reference_idx = periods
            .iter()
            .enumerate()
            .filter(|(_, &t)| (t - 1.0).abs() <= 0.01)
            .min_by(|(_, a), (_, b)| (*a - 1.0).abs().total_cmp(&(*b - 1.0).abs()))
            .map(|(j, _)| j);

        let mut sd = Vec::with_capacity(periods.len());
        let mut sv = Vec::with_capacity(periods.len());
        let mut sa = Vec::with_capacity(periods.len());
        let mut psv = Vec::with_capacity(periods.len());
        let mut psa = Vec::with_capacity(periods.len());
        let mut history = None;

        for (j, &tj) in periods.iter().enumerate() {
            if tj <= q {
                // Explicit scheme unstable here; ordinates degenerate to PGA
                sd.push(0.0);
                sv.push(0.0);
                sa.push(pga);
                psv.push(0.0);
                psa.push(pga);
                continue;
            }

            let w = 2.0 * std::f64::consts::PI / tj;
            let m = 1.0;
            let k = m * w * w;
            let c = 2.0 * m * w * zeta;

            // Effective-stiffness coefficients of the Newmark step
            let a1 = m / (BETA * dt * dt) + c * GAMMA / (BETA * dt);
            let a2 = m / (BETA * dt) + c * (GAMMA / BETA - 1.0);
            let a3 = m * (1.0 / (2.0 * BETA) - 1.0) + c * dt * (GAMMA / (2.0 * BETA) - 1.0);
            let kp = k + a1;

            let mut u = vec![0.0; n];
            let mut v = vec![0.0; n];
            let mut a = vec![0.0; n];
            let mut at = vec![0.0; n];

            for i in 0..n - 1 {
                let p_eff = -m * ag[i] + a1 * u[i] + a2 * v[i] + a3 * a[i];
                u[i + 1] = p_eff / kp;
                a[i + 1] = (u[i + 1] - u[i]) / (BETA * dt * dt)
                    - v[i] / (BETA * dt)
                    - a[i] * (1.0 / (2.0 * BETA) - 1.0);
                at[i + 1] = a[i + 1] + ag[i];
                v[i + 1] = v[i] + dt * ((1.0 - GAMMA) * a[i] + GAMMA * a[i + 1]);
            }

            let peak = |series: &[f64]| series.iter().fold(0.0_f64, |mx, &x| mx.max(x.abs()));
            let sd_j = peak(&u);
            sd.push(sd_j);
            sv.push(peak(&v));
            sa.push(peak(&at));
            psv.push(w * sd_j);
            psa.push(w * w * sd_j);

            if reference_idx == Some(j) {
                history = Some(OscillatorHistory {
                    period: tj,
                    displacement: u,
                    velocity: v,
                    relative_acceleration: a.iter().map(|&x| x / GRAVITY).collect(),
                    absolute_acceleration: at.iter().map(|&x| x / GRAVITY).collect(),
                });
            }
        }

        // Acceleration ordinates back to [g]
        for x in sa.iter_mut() {
            *x /= GRAVITY;
        }
        for x in psa.iter_mut() {
            *x /= GRAVITY;
        }

        Ok(ResponseSpectrum {
            periods,
            sd,
            sv,
            sa,
            psv,
            psa,
            history,
        })
    }
}
