// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Arias intensity - cumulative energy curve, significant duration,
//! destructiveness potential

use serde::{Deserialize, Serialize};

use super::GRAVITY;
use crate::error::{QuakeError, Result};

/// Arias intensity metrics for one channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AriasResult {
    /// Normalized cumulative intensity curve, 0-100 [%], one value per sample
    pub curve_percent: Vec<f64>,
    /// First sample time reaching >= 5% of total intensity [s]
    pub t_start: f64,
    /// First sample time reaching >= 95% of total intensity [s]
    pub t_end: f64,
    /// Total Arias intensity [m/s]
    pub total: f64,
    /// Destructiveness potential, total intensity over squared zero-crossing
    /// frequency; zero for signals with no zero crossings
    pub destructiveness: f64,
}

/// Computes the Arias intensity curve and significant duration (5%-95%).
pub struct AriasAnalyzer;

impl AriasAnalyzer {
    /// Analyze one acceleration signal given in [m/s^2].
    pub fn compute(signal: &[f64], dt: f64) -> Result<AriasResult> {
        if signal.is_empty() {
            return Err(QuakeError::DegenerateSignal {
                reason: "empty signal in Arias analysis".to_string(),
            });
        }
        if dt <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("non-positive sampling interval {dt}"),
            });
        }

        let n = signal.len();
        let scale = std::f64::consts::PI / (2.0 * GRAVITY) * dt;

        // Cumulative energy, IA(t) = (pi/2g) * sum a^2 dt
        let mut curve = Vec::with_capacity(n);
        let mut acc = 0.0;
        for &a in signal {
            acc += a * a * scale;
            curve.push(acc);
        }
        let total = *curve.last().unwrap_or(&0.0);

        // Normalize to percent; flat zero signal keeps a zero curve
        let curve_percent: Vec<f64> = if total > 0.0 {
            curve.iter().map(|&ia| 100.0 * ia / total).collect()
        } else {
            vec![0.0; n]
        };

        let first_crossing = |threshold: f64| -> f64 {
            curve_percent
                .iter()
                .position(|&p| p >= threshold)
                .unwrap_or(0) as f64
                * dt
        };
        let t_start = first_crossing(5.0);
        let t_end = first_crossing(95.0);

        // Zero-crossing frequency over the full duration; exact zeros count
        // as their own sign state
        let sign = |x: f64| {
            if x > 0.0 {
                1i8
            } else if x < 0.0 {
                -1i8
            } else {
                0i8
            }
        };
        let crossings = signal
            .windows(2)
            .filter(|w| sign(w[0]) != sign(w[1]))
            .count();
        let duration = (n - 1) as f64 * dt;
        let freq_cross = if duration > 0.0 {
            crossings as f64 / duration
        } else {
            0.0
        };

        let destructiveness = if freq_cross > 0.0 {
            total / (freq_cross * freq_cross)
        } else {
            0.0
        };

        Ok(AriasResult {
            curve_percent,
            t_start,
            t_end,
            total,
            destructiveness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn curve_is_normalized_and_monotonic() {
        let dt = 0.01;
        let signal: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * 1.5 * i as f64 * dt).sin() * 3.0)
            .collect();
        let result = AriasAnalyzer::compute(&signal, dt).unwrap();

        assert!(result.total > 0.0);
        for pair in result.curve_percent.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        for &p in &result.curve_percent {
            assert!((0.0..=100.0 + 1e-9).contains(&p));
        }
        assert!((result.curve_percent.last().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn significant_duration_is_ordered() {
        let dt = 0.005;
        let signal: Vec<f64> = (0..2000)
            .map(|i| {
                let t = i as f64 * dt;
                // Energy concentrated mid-record
                (-((t - 5.0) / 1.5).powi(2)).exp() * (2.0 * PI * 4.0 * t).sin()
            })
            .collect();
        let result = AriasAnalyzer::compute(&signal, dt).unwrap();
        assert!(result.t_start < result.t_end);
    }

    #[test]
    fn flat_signal_has_zero_destructiveness() {
        let signal = vec![0.3; 500];
        let result = AriasAnalyzer::compute(&signal, 0.01).unwrap();
        assert_eq!(result.destructiveness, 0.0);
        assert!(result.total > 0.0);
    }

    #[test]
    fn empty_signal_is_degenerate() {
        assert!(matches!(
            AriasAnalyzer::compute(&[], 0.01),
            Err(QuakeError::DegenerateSignal { .. })
        ));
    }
}
