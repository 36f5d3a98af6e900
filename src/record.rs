// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Record model - one seismic event and its derived analysis products
//!
//! A [`Record`] owns everything computed from one three-channel event. Results
//! are immutable once computed; reprocessing builds a fresh `Record` instead
//! of mutating in place.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{
    AriasAnalyzer, AriasResult, BaselineCorrection, CorrectedMotion, FourierAnalyzer,
    FourierSpectrum, ResponseSpectrum, ResponseSpectrumSolver, RotDAnalyzer, RotDResult, GRAVITY,
};
use crate::components::{ComponentIdentifier, ComponentSet};
use crate::config::Config;
use crate::error::{QuakeError, Result};
use crate::ingest::{IngestWarning, SignalIngestor};

/// One processed seismic event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Record name, taken from the input directory
    pub name: String,
    /// Sampling interval shared by all channels [s]
    pub dt: f64,
    /// Raw channels as ingested, keyed by source file name [g]
    pub raw: BTreeMap<String, Vec<f64>>,
    /// Role-keyed channels [g]
    pub signals: ComponentSet<Vec<f64>>,
    /// Source file name behind each role
    pub component_names: ComponentSet<String>,
    /// Recoverable ingestion conditions
    pub warnings: Vec<IngestWarning>,
    /// Baseline-corrected motion, when the correction pass ran
    pub corrected: Option<ComponentSet<CorrectedMotion>>,
    /// Arias intensity results per role
    pub arias: Option<ComponentSet<AriasResult>>,
    /// Fourier spectra per role
    pub fourier: Option<ComponentSet<FourierSpectrum>>,
    /// Newmark response spectra per role
    pub spectra: Option<ComponentSet<ResponseSpectrum>>,
    /// Direction-independent rotated spectra of the horizontal pair
    pub rotd: Option<RotDResult>,
}

impl Record {
    /// Ingest and analyze one record directory according to `config`.
    ///
    /// Response-spectrum and RotD stages operate on baseline-corrected
    /// acceleration, so enabling either implies the correction pass runs even
    /// when `apply_baseline_correction` is off.
    pub fn process(dir: &Path, config: &Config) -> Result<Record> {
        if config.unit_factor <= 0.0 {
            return Err(QuakeError::DegenerateSignal {
                reason: format!("unit_factor must be positive, got {}", config.unit_factor),
            });
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        info!("processing record {}", name);
        let ingested = SignalIngestor::new(&config.file_extension).read(dir)?;
        let raw: BTreeMap<String, Vec<f64>> = ingested
            .signals
            .into_iter()
            .map(|(file, samples)| {
                let scaled = samples.iter().map(|&x| x / config.unit_factor).collect();
                (file, scaled)
            })
            .collect();

        let (signals, component_names) = ComponentIdentifier::identify(&raw)?;
        info!(
            "components identified: H1={} H2={} V={}",
            component_names.h1, component_names.h2, component_names.v
        );

        let mut record = Record {
            name,
            dt: ingested.dt,
            raw,
            signals,
            component_names,
            warnings: ingested.warnings,
            ..Record::default()
        };

        let needs_correction = config.apply_baseline_correction
            || config.compute_response_spectra
            || config.compute_rotd;
        if needs_correction {
            info!("applying baseline correction");
            let corrected = record
                .signals
                .map(|_, signal| BaselineCorrection::apply(signal, record.dt));
            record.corrected = Some(collect_set(corrected)?);
        }

        if config.apply_arias_analysis {
            info!("computing Arias intensity");
            let arias = record.signals.map(|_, signal| {
                // Arias operates in absolute units
                let ms2: Vec<f64> = signal.iter().map(|&a| a * GRAVITY).collect();
                AriasAnalyzer::compute(&ms2, record.dt)
            });
            record.arias = Some(collect_set(arias)?);
        }

        if config.apply_fourier_analysis {
            info!("computing Fourier spectra");
            let fourier = record
                .signals
                .map(|_, signal| FourierAnalyzer::compute(signal, record.dt, config.num_frequencies));
            record.fourier = Some(collect_set(fourier)?);
        }

        if config.compute_response_spectra {
            info!("computing response spectra");
            let corrected = record.corrected.as_ref().expect("correction pass ran above");
            let spectra = corrected.map(|_, motion| {
                ResponseSpectrumSolver::compute(&motion.acceleration, record.dt, config.damping)
            });
            record.spectra = Some(collect_set(spectra)?);
        }

        if config.compute_rotd {
            info!("computing RotD spectra");
            let corrected = record.corrected.as_ref().expect("correction pass ran above");
            record.rotd = Some(RotDAnalyzer::compute(
                &corrected.h1.acceleration,
                &corrected.h2.acceleration,
                record.dt,
                config.damping,
            )?);
        }

        info!("record {} processed", record.name);
        Ok(record)
    }

    /// Read-only digest of the record for reporting collaborators.
    pub fn summary(&self) -> RecordSummary {
        let channels = self.signals.map(|role, signal| {
            let pga = signal.iter().fold(0.0_f64, |m, &a| m.max(a.abs()));
            let corrected = self.corrected.as_ref().map(|c| c.get(role));
            let arias = self.arias.as_ref().map(|a| a.get(role));
            ChannelSummary {
                source: self.component_names.get(role).clone(),
                pga,
                peak_velocity: corrected.map(|m| {
                    m.velocity.iter().fold(0.0_f64, |mx, &v| mx.max(v.abs()))
                }),
                peak_displacement: corrected.map(|m| {
                    m.displacement.iter().fold(0.0_f64, |mx, &d| mx.max(d.abs()))
                }),
                significant_duration: arias.map(|a| a.t_end - a.t_start),
                arias_total: arias.map(|a| a.total),
                dominant_frequency: self
                    .fourier
                    .as_ref()
                    .and_then(|f| f.get(role).dominant.first())
                    .map(|d| d.frequency),
            }
        });

        RecordSummary {
            name: self.name.clone(),
            dt: self.dt,
            samples: self.signals.h1.len(),
            channels,
        }
    }
}

/// Turn a set of per-role results into a result of a set, failing on the
/// first fatal channel error.
fn collect_set<T>(set: ComponentSet<Result<T>>) -> Result<ComponentSet<T>> {
    Ok(ComponentSet {
        h1: set.h1?,
        h2: set.h2?,
        v: set.v?,
    })
}

/// Per-channel digest used by the CLI and export collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Source file behind this role
    pub source: String,
    /// Peak ground acceleration [g]
    pub pga: f64,
    /// Peak corrected velocity, when correction ran [m/s]
    pub peak_velocity: Option<f64>,
    /// Peak corrected displacement, when correction ran [m]
    pub peak_displacement: Option<f64>,
    /// 5%-95% significant duration, when Arias ran [s]
    pub significant_duration: Option<f64>,
    /// Total Arias intensity, when Arias ran [m/s]
    pub arias_total: Option<f64>,
    /// Strongest spectral component, when Fourier ran [Hz]
    pub dominant_frequency: Option<f64>,
}

/// Serializable digest of one processed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Record name
    pub name: String,
    /// Sampling interval [s]
    pub dt: f64,
    /// Channel length after padding
    pub samples: usize,
    /// Per-role digests
    pub channels: ComponentSet<ChannelSummary>,
}
