// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! Error types for quakemetrics.
//!
//! Uses `thiserror` for library-style error definitions. Fatal conditions abort
//! the record and propagate to the caller; recoverable corruption is surfaced
//! as warnings (see [`crate::ingest::IngestWarning`]), never as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the record-processing engine.
#[derive(Error, Debug)]
pub enum QuakeError {
    /// No supported header pattern recognized in an input file
    #[error("unsupported file format in {file}")]
    UnsupportedFormat {
        /// Offending file name
        file: String,
    },

    /// A recognized header carried no parseable sampling metadata
    #[error("invalid sampling metadata in {file}: {reason}")]
    InvalidHeader {
        /// Offending file name
        file: String,
        /// What could not be parsed
        reason: String,
    },

    /// Sampling interval disagrees across the files of one record
    #[error("inconsistent sampling interval in {file}: {found} != {expected}")]
    InconsistentSampling {
        /// File whose dt disagrees with the record's
        file: String,
        /// dt established by earlier files [s]
        expected: f64,
        /// dt found in this file [s]
        found: f64,
    },

    /// No files with the requested extension in the record directory
    #[error("no files with extension {extension} found in {path:?}")]
    NoInputFiles {
        /// Extension that was searched for
        extension: String,
        /// Directory that was scanned
        path: PathBuf,
    },

    /// A record must contain exactly three channels
    #[error("exactly 3 signals are required to identify components, got {count}")]
    ComponentCount {
        /// Number of channels actually present
        count: usize,
    },

    /// Two files matched the same component role by filename suffix
    #[error("duplicate component assignment for {role}: {first} and {second}")]
    DuplicateComponent {
        /// Role assigned twice
        role: String,
        /// First file claiming the role
        first: String,
        /// Second file claiming the role
        second: String,
    },

    /// Role coverage still incomplete after the RMS fallback
    #[error("could not assign all component roles")]
    IncompleteComponents,

    /// Signal too short or spanning zero duration for numerical analysis
    #[error("degenerate signal: {reason}")]
    DegenerateSignal {
        /// Why the signal cannot be analyzed
        reason: String,
    },

    /// Underlying I/O failure while reading record files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuakeError>;
