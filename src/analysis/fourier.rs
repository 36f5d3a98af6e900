// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Fourier analysis - one-sided power spectrum and dominant-frequency extraction

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{QuakeError, Result};

/// Minimum peak prominence, relative to the spectrum's maximum power.
const PEAK_PROMINENCE_RATIO: f64 = 1e-6;

/// Minimum spacing between reported peaks, as a fraction of the half-spectrum.
const PEAK_SPACING_RATIO: f64 = 0.02;

/// One dominant spectral component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DominantFrequency {
    /// Peak frequency [Hz]
    pub frequency: f64,
    /// Corresponding period [s]
    pub period: f64,
    /// Power-spectrum amplitude at the peak
    pub amplitude: f64,
}

/// One-sided FFT power spectrum of a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FourierSpectrum {
    /// Frequency axis, k * Fs / N over the first N/2 bins [Hz]
    pub frequencies: Vec<f64>,
    /// Power spectrum |FFT|^2 / N over the same bins
    pub power: Vec<f64>,
    /// Up to `num_frequencies` dominant components, descending amplitude
    pub dominant: Vec<DominantFrequency>,
}

/// Computes the FFT power spectrum and extracts dominant frequency components.
pub struct FourierAnalyzer;

impl FourierAnalyzer {
    /// Compute the one-sided power spectrum and its `num_frequencies` most
    /// prominent, adequately separated peaks.
    ///
    /// Fewer peaks than requested is not an error - callers get what was found.
    pub fn compute(signal: &[f64], dt: f64, num_frequencies: usize) -> Result<FourierSpectrum> {
        let n = signal.len();
        if n < 2 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("Fourier analysis needs at least 2 samples, got {n}"),
            });
        }
        if dt <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("non-positive sampling interval {dt}"),
            });
        }

        let fs = 1.0 / dt;

        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        // One-sided power spectrum, |Y|^2 / N over the first N/2 bins
        let half = n / 2;
        let power: Vec<f64> = buffer[..half].iter().map(|c| c.norm_sqr() / n as f64).collect();
        let frequencies: Vec<f64> = (0..half).map(|k| fs * k as f64 / n as f64).collect();

        let peaks = find_peaks(&power);
        let dominant = peaks
            .into_iter()
            .take(num_frequencies)
            .map(|idx| {
                let frequency = frequencies[idx];
                DominantFrequency {
                    frequency,
                    period: if frequency > 0.0 { 1.0 / frequency } else { f64::INFINITY },
                    amplitude: power[idx],
                }
            })
            .collect();

        Ok(FourierSpectrum {
            frequencies,
            power,
            dominant,
        })
    }
}

/// Local-maximum indices passing the prominence and spacing gates, sorted by
/// descending amplitude.
fn find_peaks(power: &[f64]) -> Vec<usize> {
    if power.len() < 3 {
        return Vec::new();
    }

    let max_power = power.iter().fold(0.0_f64, |m, &p| m.max(p));
    let min_prominence = PEAK_PROMINENCE_RATIO * max_power;
    let min_spacing = ((power.len() as f64 * PEAK_SPACING_RATIO) as usize).max(1);

    // Interior local maxima with their prominence: peak height above the
    // higher of the two flanking minima (walked out to the nearest
    // higher-or-equal sample on each side)
    let mut candidates: Vec<(usize, f64)> = Vec::new();
    for i in 1..power.len() - 1 {
        if power[i] <= power[i - 1] || power[i] < power[i + 1] {
            continue;
        }

        let mut left_min = power[i];
        for j in (0..i).rev() {
            left_min = left_min.min(power[j]);
            if power[j] > power[i] {
                break;
            }
        }
        let mut right_min = power[i];
        for &p in &power[i + 1..] {
            right_min = right_min.min(p);
            if p > power[i] {
                break;
            }
        }

        let prominence = power[i] - left_min.max(right_min);
        if prominence >= min_prominence {
            candidates.push((i, power[i]));
        }
    }

    // Enforce spacing greedily from the tallest candidate down, so one
    // spectral lobe never yields two reported peaks
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut kept: Vec<usize> = Vec::new();
    for (idx, _) in candidates {
        if kept.iter().all(|&k| k.abs_diff(idx) >= min_spacing) {
            kept.push(idx);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, amplitude: f64, n: usize, dt: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 * dt).sin())
            .collect()
    }

    #[test]
    fn recovers_sine_frequency_within_one_bin() {
        let dt = 0.01;
        let n = 1000;
        let signal = sine(1.0, 1.0, n, dt);
        let spectrum = FourierAnalyzer::compute(&signal, dt, 4).unwrap();

        let bin_width = 1.0 / (dt * n as f64);
        let top = spectrum.dominant.first().expect("no dominant frequency found");
        assert!((top.frequency - 1.0).abs() <= bin_width);
        assert!((top.period - 1.0).abs() <= bin_width);
    }

    #[test]
    fn two_tones_yield_two_separated_peaks() {
        let dt = 0.005;
        let n = 2000;
        let mut signal = sine(2.0, 1.0, n, dt);
        for (i, s) in sine(8.0, 0.5, n, dt).into_iter().enumerate() {
            signal[i] += s;
        }
        let spectrum = FourierAnalyzer::compute(&signal, dt, 4).unwrap();

        assert!(spectrum.dominant.len() >= 2);
        // Ranked by descending amplitude: the 2 Hz tone first
        assert!((spectrum.dominant[0].frequency - 2.0).abs() < 0.2);
        assert!((spectrum.dominant[1].frequency - 8.0).abs() < 0.2);
        assert!(spectrum.dominant[0].amplitude >= spectrum.dominant[1].amplitude);
    }

    #[test]
    fn fewer_peaks_than_requested_is_not_an_error() {
        let dt = 0.01;
        let signal = sine(1.0, 1.0, 1000, dt);
        let spectrum = FourierAnalyzer::compute(&signal, dt, 10).unwrap();
        assert!(spectrum.dominant.len() < 10);
        assert!(!spectrum.dominant.is_empty());
    }

    #[test]
    fn axis_and_power_have_half_length() {
        let signal = sine(3.0, 1.0, 500, 0.02);
        let spectrum = FourierAnalyzer::compute(&signal, 0.02, 4).unwrap();
        assert_eq!(spectrum.frequencies.len(), 250);
        assert_eq!(spectrum.power.len(), 250);
    }
}
