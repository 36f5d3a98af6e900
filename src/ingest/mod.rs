// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Signal ingestion - heterogeneous strong-motion text formats
//!
//! Three header conventions are supported, tried in order until one matches:
//! `DT=` headers with free-form numeric data, bare `DT` headers with
//! one-value-per-line data, and frequency (`HZ`) headers with an underscore
//! separator line before the data block. Malformed numeric lines are replaced
//! by zeros and counted; unequal channel lengths are zero-padded. Both
//! recoveries are surfaced as warnings, never silently.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{QuakeError, Result};

/// Tolerance for the sampling-interval consistency check [s].
const DT_TOLERANCE: f64 = 1e-6;

/// Recoverable ingestion conditions, reported alongside the parsed signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IngestWarning {
    /// Malformed numeric lines were replaced by all-zero lines
    ZeroFilledLines {
        /// File containing the corrupted lines
        file: String,
        /// Number of lines replaced
        count: usize,
    },
    /// A channel was right-padded with zeros to the record's maximum length
    Padded {
        /// File that was shorter than the longest channel
        file: String,
        /// Length after padding
        to_len: usize,
    },
}

/// Result of one ingestion call: shared sampling interval, per-file
/// acceleration arrays, and any recoveries that occurred.
#[derive(Debug, Clone)]
pub struct IngestedSignals {
    /// Sampling interval shared by every file [s]
    pub dt: f64,
    /// Acceleration samples keyed by source file name
    pub signals: BTreeMap<String, Vec<f64>>,
    /// Recoverable conditions encountered while parsing
    pub warnings: Vec<IngestWarning>,
}

struct ParsedFile {
    dt: f64,
    samples: Vec<f64>,
    zero_filled: usize,
}

/// Reads seismic signals from a record directory and aligns their lengths.
pub struct SignalIngestor {
    extension: String,
}

impl SignalIngestor {
    /// Create an ingestor for files carrying `extension` (case-insensitive,
    /// e.g. `.AT2`).
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_uppercase(),
        }
    }

    /// Read every matching file under `dir`.
    ///
    /// All files must agree on the sampling interval within 1e-6 s; shorter
    /// channels are zero-padded to the longest length.
    pub fn read(&self, dir: &Path) -> Result<IngestedSignals> {
        let mut files: Vec<String> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.to_uppercase().ends_with(&self.extension))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(QuakeError::NoInputFiles {
                extension: self.extension.clone(),
                path: dir.to_path_buf(),
            });
        }

        let mut dt: Option<f64> = None;
        let mut signals = BTreeMap::new();
        let mut warnings = Vec::new();

        for file in files {
            let content = fs::read_to_string(dir.join(&file))?;
            let parsed = parse_file(&file, &content)?;

            if parsed.zero_filled > 0 {
                warn!(
                    "{}: {} malformed data lines replaced with zeros",
                    file, parsed.zero_filled
                );
                warnings.push(IngestWarning::ZeroFilledLines {
                    file: file.clone(),
                    count: parsed.zero_filled,
                });
            }

            match dt {
                None => dt = Some(parsed.dt),
                Some(expected) if (parsed.dt - expected).abs() > DT_TOLERANCE => {
                    return Err(QuakeError::InconsistentSampling {
                        file,
                        expected,
                        found: parsed.dt,
                    });
                }
                Some(_) => {}
            }

            debug!("{}: {} samples, dt {:.6}", file, parsed.samples.len(), parsed.dt);
            signals.insert(file, parsed.samples);
        }

        // Right-pad shorter channels to the record's maximum length
        let max_len = signals.values().map(Vec::len).max().unwrap_or(0);
        for (file, samples) in signals.iter_mut() {
            if samples.len() < max_len {
                warn!("signal {} padded with zeros to reach {} samples", file, max_len);
                warnings.push(IngestWarning::Padded {
                    file: file.clone(),
                    to_len: max_len,
                });
                samples.resize(max_len, 0.0);
            }
        }

        Ok(IngestedSignals {
            dt: dt.expect("at least one file was parsed"),
            signals,
            warnings,
        })
    }
}

/// Ordered parser strategies, first match wins.
fn parse_file(file: &str, content: &str) -> Result<ParsedFile> {
    let lines: Vec<&str> = content.lines().collect();

    for strategy in [parse_dt_assignment, parse_dt_token, parse_frequency_header] {
        if let Some(parsed) = strategy(file, &lines)? {
            return Ok(parsed);
        }
    }
    Err(QuakeError::UnsupportedFormat {
        file: file.to_string(),
    })
}

/// Strategy (a): classic strong-motion header carrying `DT=<value>`, followed
/// by free-form whitespace-separated data.
fn parse_dt_assignment(file: &str, lines: &[&str]) -> Result<Option<ParsedFile>> {
    let Some(header_idx) = lines.iter().position(|l| l.to_uppercase().contains("DT=")) else {
        return Ok(None);
    };

    // Parse from the uppercased line so the "DT=" offset is guaranteed valid;
    // float syntax is case-insensitive anyway
    let upper = lines[header_idx].to_uppercase();
    let after = &upper[upper.find("DT=").expect("checked above") + 3..];
    let dt = after
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|tok| !tok.is_empty())
        .and_then(|tok| tok.parse::<f64>().ok())
        .ok_or_else(|| QuakeError::InvalidHeader {
            file: file.to_string(),
            reason: format!("no numeric value after DT= in {:?}", lines[header_idx]),
        })?;

    let (samples, zero_filled) = parse_data_lines(&lines[header_idx + 1..]);
    Ok(Some(ParsedFile {
        dt,
        samples,
        zero_filled,
    }))
}

/// Strategy (b): a bare `DT` token on its own header line, one value per line
/// below it.
fn parse_dt_token(file: &str, lines: &[&str]) -> Result<Option<ParsedFile>> {
    let Some(header_idx) = lines.iter().position(|l| l.to_uppercase().contains("DT")) else {
        return Ok(None);
    };

    let dt = lines[header_idx]
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok())
        .next()
        .ok_or_else(|| QuakeError::InvalidHeader {
            file: file.to_string(),
            reason: format!("no numeric value on DT line {:?}", lines[header_idx]),
        })?;

    let (samples, zero_filled) = parse_data_lines(&lines[header_idx + 1..]);
    Ok(Some(ParsedFile {
        dt,
        samples,
        zero_filled,
    }))
}

/// Strategy (c): header block naming a sampling frequency in Hz, data starting
/// after a separator line of repeated underscores.
fn parse_frequency_header(file: &str, lines: &[&str]) -> Result<Option<ParsedFile>> {
    let Some(freq_line) = lines.iter().find(|l| l.to_uppercase().contains("HZ")) else {
        return Ok(None);
    };

    let frequency = freq_line
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok())
        .next()
        .ok_or_else(|| QuakeError::InvalidHeader {
            file: file.to_string(),
            reason: format!("no numeric frequency in {freq_line:?}"),
        })?;
    if frequency <= 0.0 {
        return Err(QuakeError::InvalidHeader {
            file: file.to_string(),
            reason: format!("non-positive sampling frequency {frequency}"),
        });
    }

    let Some(separator_idx) = lines
        .iter()
        .position(|l| !l.trim().is_empty() && l.trim().chars().all(|c| c == '_'))
    else {
        return Err(QuakeError::InvalidHeader {
            file: file.to_string(),
            reason: "missing underscore separator before data block".to_string(),
        });
    };

    let (samples, zero_filled) = parse_data_lines(&lines[separator_idx + 1..]);
    Ok(Some(ParsedFile {
        dt: 1.0 / frequency,
        samples,
        zero_filled,
    }))
}

/// Parse whitespace-separated numeric data. A line with any non-numeric token
/// is replaced by a same-width all-zero line (width taken from the running
/// average of valid lines) rather than aborting the file.
fn parse_data_lines(lines: &[&str]) -> (Vec<f64>, usize) {
    let mut samples = Vec::new();
    let mut zero_filled = 0usize;
    let mut valid_lines = 0usize;
    let mut valid_tokens = 0usize;

    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let values: Option<Vec<f64>> = tokens.iter().map(|t| t.parse::<f64>().ok()).collect();
        match values {
            Some(values) => {
                valid_lines += 1;
                valid_tokens += values.len();
                samples.extend(values);
            }
            None => {
                let width = if valid_lines > 0 {
                    (valid_tokens as f64 / valid_lines as f64).round() as usize
                } else {
                    1
                };
                samples.extend(std::iter::repeat(0.0).take(width.max(1)));
                zero_filled += 1;
            }
        }
    }
    (samples, zero_filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_record(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn reads_classic_dt_assignment_format() {
        let dir = TempDir::new().unwrap();
        write_record(
            &dir,
            "EV1_NS.AT2",
            "PEER NGA STRONG MOTION DATABASE RECORD\n\
             NPTS= 6, DT= .0100 SEC\n\
             0.001 0.002 0.003\n\
             -0.001 -0.002 -0.003\n",
        );
        let ingested = SignalIngestor::new(".AT2").read(dir.path()).unwrap();
        assert!((ingested.dt - 0.01).abs() < 1e-12);
        assert_eq!(ingested.signals["EV1_NS.AT2"].len(), 6);
        assert!(ingested.warnings.is_empty());
    }

    #[test]
    fn reads_bare_dt_token_format() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "vert.txt", "DT 0.005\n0.1\n0.2\n0.3\n");
        let ingested = SignalIngestor::new(".TXT").read(dir.path()).unwrap();
        assert!((ingested.dt - 0.005).abs() < 1e-12);
        assert_eq!(ingested.signals["vert.txt"], vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn reads_frequency_header_format() {
        let dir = TempDir::new().unwrap();
        write_record(
            &dir,
            "station.dat",
            "STATION: XYZ\nSAMPLING: 200 HZ\n________\n1.0 2.0\n3.0 4.0\n",
        );
        let ingested = SignalIngestor::new(".DAT").read(dir.path()).unwrap();
        assert!((ingested.dt - 0.005).abs() < 1e-12);
        assert_eq!(ingested.signals["station.dat"], vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn unsupported_format_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "junk.at2", "no header here\n1.0 2.0\n");
        assert!(matches!(
            SignalIngestor::new(".AT2").read(dir.path()),
            Err(QuakeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn inconsistent_dt_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "a.at2", "DT= 0.01\n0.0 0.1\n");
        write_record(&dir, "b.at2", "DT= 0.02\n0.0 0.1\n");
        assert!(matches!(
            SignalIngestor::new(".AT2").read(dir.path()),
            Err(QuakeError::InconsistentSampling { .. })
        ));
    }

    #[test]
    fn malformed_lines_become_zeros_with_warning() {
        let dir = TempDir::new().unwrap();
        write_record(
            &dir,
            "noisy.at2",
            "DT= 0.01\n0.1 0.2 0.3\nGARBAGE HERE\n0.4 0.5 0.6\n",
        );
        let ingested = SignalIngestor::new(".AT2").read(dir.path()).unwrap();
        let signal = &ingested.signals["noisy.at2"];
        assert_eq!(signal.len(), 9);
        assert_eq!(&signal[3..6], &[0.0, 0.0, 0.0]);
        assert!(ingested
            .warnings
            .iter()
            .any(|w| matches!(w, IngestWarning::ZeroFilledLines { count: 1, .. })));
    }

    #[test]
    fn short_channels_are_padded_with_warning() {
        let dir = TempDir::new().unwrap();
        write_record(&dir, "long.at2", "DT= 0.01\n0.1 0.2 0.3 0.4\n");
        write_record(&dir, "short.at2", "DT= 0.01\n0.1 0.2\n");
        let ingested = SignalIngestor::new(".AT2").read(dir.path()).unwrap();

        assert_eq!(ingested.signals["short.at2"].len(), 4);
        assert_eq!(&ingested.signals["short.at2"][2..], &[0.0, 0.0]);
        assert!(ingested
            .warnings
            .iter()
            .any(|w| matches!(w, IngestWarning::Padded { to_len: 4, .. })));
    }

    #[test]
    fn missing_files_are_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            SignalIngestor::new(".AT2").read(dir.path()),
            Err(QuakeError::NoInputFiles { .. })
        ));
    }
}
