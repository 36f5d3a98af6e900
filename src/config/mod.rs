// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Processing configuration for one record run.
///
/// Unrecognized keys in a config file are ignored; missing stage booleans
/// default to "stage skipped".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extension of the record files to ingest (case-insensitive)
    #[serde(default = "default_extension")]
    pub file_extension: String,

    /// Divisor applied to raw samples before analysis, e.g. 981.0 to bring
    /// cm/s^2 records into [g]
    #[serde(default = "default_unit_factor")]
    pub unit_factor: f64,

    /// Damping ratio for response and RotD spectra
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// Number of dominant frequencies extracted by the Fourier stage
    #[serde(default = "default_num_frequencies")]
    pub num_frequencies: usize,

    /// Run polynomial baseline correction
    #[serde(default)]
    pub apply_baseline_correction: bool,

    /// Run Arias intensity analysis
    #[serde(default)]
    pub apply_arias_analysis: bool,

    /// Run Fourier spectrum analysis
    #[serde(default)]
    pub apply_fourier_analysis: bool,

    /// Run the Newmark response-spectrum solver per channel
    #[serde(default)]
    pub compute_response_spectra: bool,

    /// Run the RotD azimuth sweep over the horizontal pair
    #[serde(default)]
    pub compute_rotd: bool,
}

fn default_extension() -> String {
    ".AT2".to_string()
}

fn default_unit_factor() -> f64 {
    1.0
}

fn default_damping() -> f64 {
    0.05
}

fn default_num_frequencies() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extension: default_extension(),
            unit_factor: default_unit_factor(),
            damping: default_damping(),
            num_frequencies: default_num_frequencies(),
            apply_baseline_correction: true,
            apply_arias_analysis: true,
            apply_fourier_analysis: true,
            compute_response_spectra: true,
            compute_rotd: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Default configuration path relative to the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from("./quakemetrics.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stage_keys_mean_skipped() {
        let config: Config = toml::from_str("file_extension = \".TXT\"").unwrap();
        assert_eq!(config.file_extension, ".TXT");
        assert!(!config.apply_baseline_correction);
        assert!(!config.compute_rotd);
        assert_eq!(config.unit_factor, 1.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: Config =
            toml::from_str("plot_signals = true\napply_arias_analysis = true").unwrap();
        assert!(config.apply_arias_analysis);
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.damping, config.damping);
        assert_eq!(back.num_frequencies, config.num_frequencies);
    }
}
