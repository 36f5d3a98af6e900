// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Baseline correction - polynomial drift removal via double integration
//!
//! Fits the quadratic drift polynomial whose weighted velocity moments match
//! the measured ones (closed-form solve, no iteration) and subtracts it,
//! together with its antiderivatives, from acceleration, velocity and
//! displacement.

use serde::{Deserialize, Serialize};

use super::GRAVITY;
use crate::error::{QuakeError, Result};

/// Drift-corrected motion histories for one channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectedMotion {
    /// Corrected acceleration [g]
    pub acceleration: Vec<f64>,
    /// Corrected velocity [m/s]
    pub velocity: Vec<f64>,
    /// Corrected displacement [m]
    pub displacement: Vec<f64>,
}

/// Baseline drift remover for a single acceleration channel.
pub struct BaselineCorrection;

impl BaselineCorrection {
    /// Apply baseline correction to one acceleration signal given in [g].
    ///
    /// Velocity and displacement are integrated with trapezoidal / cubic
    /// recurrences before the drift polynomial `c(t) = C0 + C1 t + C2 t^2`
    /// is removed. Needs at least two samples and a positive record duration.
    pub fn apply(signal: &[f64], dt: f64) -> Result<CorrectedMotion> {
        let n = signal.len();
        if n < 2 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("baseline correction needs at least 2 samples, got {n}"),
            });
        }
        if dt <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("non-positive sampling interval {dt}"),
            });
        }

        // Work in m/s^2
        let acc: Vec<f64> = signal.iter().map(|&a| a * GRAVITY).collect();
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();

        // Velocity: trapezoidal recurrence
        let mut vel = vec![0.0; n];
        for i in 1..n {
            vel[i] = vel[i - 1] + (acc[i - 1] + acc[i]) * dt / 2.0;
        }

        // Displacement: cubic recurrence consistent with linear acceleration
        // over each interval
        let mut disp = vec![0.0; n];
        for i in 1..n {
            disp[i] = disp[i - 1] + vel[i - 1] * dt + (2.0 * acc[i - 1] + acc[i]) * dt * dt / 6.0;
        }

        // Drift moments A1..A3: per-interval closed-form integrals of the
        // velocity against t, t^2 and t^3 weighting kernels
        let mut a1 = 0.0;
        let mut a2 = 0.0;
        let mut a3 = 0.0;
        for i in 0..n - 1 {
            let ti = time[i];
            let ti1 = time[i + 1];
            let vi = vel[i];
            let ai = acc[i];
            let ai1 = acc[i + 1];
            let dti = ti1 - ti;

            a1 += 0.5 * vi * dti * (ti + ti1)
                + dti * dti / 24.0 * (ai * (3.0 * ti + 5.0 * ti1) + ai1 * (ti + 3.0 * ti1));
            a2 += vi * dti * (ti * ti + ti * ti1 + ti1 * ti1) / 3.0
                + dti * dti / 60.0
                    * (ai * (4.0 * ti * ti + 7.0 * ti * ti1 + 9.0 * ti1 * ti1)
                        + ai1 * (ti * ti + 3.0 * ti * ti1 + 6.0 * ti1 * ti1));
            a3 += 0.25 * vi * dti * (ti.powi(3) + ti * ti * ti1 + ti * ti1 * ti1 + ti1.powi(3))
                + dti * dti / 120.0
                    * (ai * (5.0 * ti.powi(3)
                        + 9.0 * ti * ti * ti1
                        + 12.0 * ti * ti1 * ti1
                        + 14.0 * ti1.powi(3))
                        + ai1 * (ti.powi(3)
                            + 3.0 * ti * ti * ti1
                            + 6.0 * ti * ti1 * ti1
                            + 10.0 * ti1.powi(3)));
        }

        let tt = time[n - 1];
        if tt <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: "record spans zero duration".to_string(),
            });
        }

        // Closed-form solve of the 3x3 moment system for the drift polynomial
        let c0 = 300.0 * a1 / tt.powi(3) - 900.0 * a2 / tt.powi(4) + 630.0 * a3 / tt.powi(5);
        let c1 = -900.0 * a1 / tt.powi(4) + 2880.0 * a2 / tt.powi(5) - 2100.0 * a3 / tt.powi(6);
        let c2 = 630.0 * a1 / tt.powi(5) - 2100.0 * a2 / tt.powi(6) + 1575.0 * a3 / tt.powi(7);

        let mut acceleration = Vec::with_capacity(n);
        let mut velocity = Vec::with_capacity(n);
        let mut displacement = Vec::with_capacity(n);
        for i in 0..n {
            let t = time[i];
            // Acceleration correction is the derivative of the velocity
            // polynomial; back to [g] on the way out
            acceleration.push((acc[i] - (c0 + 2.0 * c1 * t + 3.0 * c2 * t * t)) / GRAVITY);
            velocity.push(vel[i] - (c0 * t + c1 * t * t + c2 * t.powi(3)));
            displacement
                .push(disp[i] - (0.5 * c0 * t * t + c1 * t.powi(3) / 3.0 + 0.25 * c2 * t.powi(4)));
        }

        Ok(CorrectedMotion {
            acceleration,
            velocity,
            displacement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn drifting_sine(n: usize, dt: f64, drift: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 * dt;
                (2.0 * PI * t).sin() + drift * t
            })
            .collect()
    }

    // Uncorrected trapezoidal velocity and displacement, for comparison
    fn raw_motion(signal: &[f64], dt: f64) -> (Vec<f64>, Vec<f64>) {
        let acc: Vec<f64> = signal.iter().map(|&a| a * GRAVITY).collect();
        let mut vel = vec![0.0; acc.len()];
        let mut disp = vec![0.0; acc.len()];
        for i in 1..acc.len() {
            vel[i] = vel[i - 1] + (acc[i - 1] + acc[i]) * dt / 2.0;
            disp[i] = disp[i - 1] + (vel[i - 1] + vel[i]) * dt / 2.0;
        }
        (vel, disp)
    }

    #[test]
    fn removes_drift_at_final_sample() {
        let dt = 0.01;
        let signal = drifting_sine(1000, dt, 0.05);
        let (raw_vel, raw_disp) = raw_motion(&signal, dt);

        let corrected = BaselineCorrection::apply(&signal, dt).unwrap();
        let final_vel = *corrected.velocity.last().unwrap();
        let final_disp = *corrected.displacement.last().unwrap();

        // The quadratic drift term integrates to a large residual without
        // correction; after correction the endpoint drift shrinks by an
        // order of magnitude
        assert!(final_vel.abs() < 0.1 * raw_vel.last().unwrap().abs());
        assert!(final_disp.abs() < 0.1 * raw_disp.last().unwrap().abs());
    }

    #[test]
    fn correction_is_idempotent() {
        let dt = 0.01;
        let signal = drifting_sine(1000, dt, 0.2);
        let once = BaselineCorrection::apply(&signal, dt).unwrap();
        let twice = BaselineCorrection::apply(&once.acceleration, dt).unwrap();

        let peak = once
            .acceleration
            .iter()
            .fold(0.0_f64, |m, &a| m.max(a.abs()));
        let max_delta = once
            .acceleration
            .iter()
            .zip(&twice.acceleration)
            .fold(0.0_f64, |m, (&a, &b)| m.max((a - b).abs()));
        assert!(max_delta < 1e-2 * peak, "second pass moved acceleration by {max_delta}");
    }

    #[test]
    fn output_lengths_match_input() {
        let signal = drifting_sine(500, 0.02, 0.0);
        let corrected = BaselineCorrection::apply(&signal, 0.02).unwrap();
        assert_eq!(corrected.acceleration.len(), 500);
        assert_eq!(corrected.velocity.len(), 500);
        assert_eq!(corrected.displacement.len(), 500);
    }

    #[test]
    fn too_short_signal_is_degenerate() {
        assert!(matches!(
            BaselineCorrection::apply(&[0.1], 0.01),
            Err(QuakeError::DegenerateSignal { .. })
        ));
    }
}
