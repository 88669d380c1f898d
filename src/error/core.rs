// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core error type of the report pipeline.

use std::{io, path::PathBuf};

use derive_more::with_trait::{Display, Error, From};

use super::ConfigError;

/// Top-level error type for all report generation operations.
#[derive(Debug, Display, Error, From)]
pub enum ReportError {
    /// I/O error while reading or writing a file.
    #[display("I/O operation on `{}` failed: {source}", path.display())]
    Io {
        /// Path the operation was performed on.
        #[error(not(source))]
        path: PathBuf,

        /// Underlying [`io::Error`].
        source: io::Error,
    },

    /// Malformed JSON input or unserializable output.
    #[display("Invalid JSON in `{}`: {source}", path.display())]
    Json {
        /// Path of the JSON file.
        #[error(not(source))]
        path: PathBuf,

        /// Underlying [`serde_json::Error`].
        source: serde_json::Error,
    },

    /// Strict parsing of a `.feature` file failed.
    #[display("Failed to parse feature file: {_0}")]
    #[from]
    Parse(gherkin::ParseFileError),

    /// Walking a directory failed.
    #[display("Failed to walk directory: {_0}")]
    #[from]
    Walk(globwalk::GlobError),

    /// Rendering the HTML template failed.
    #[display("Failed to render HTML report: {_0}")]
    #[from]
    Template(liquid::Error),

    /// Required input file doesn't exist.
    #[display("Input file not found: {}", path.display())]
    MissingInput {
        /// Path of the missing file.
        #[error(not(source))]
        path: PathBuf,
    },

    /// Configuration or validation errors.
    #[display("Configuration error: {_0}")]
    #[from]
    Config(ConfigError),
}

/// Result type alias using [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Creates an I/O error for the given `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates a JSON error for the given `path`.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }

    /// Creates a missing input error.
    #[must_use]
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Returns `true` if this is a missing input error.
    #[must_use]
    pub const fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn io_error_display_mentions_path() {
        let err = ReportError::io(
            "reports/out.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(
            err.to_string(),
            "I/O operation on `reports/out.json` failed: denied",
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_input_has_no_source() {
        let err = ReportError::missing_input("reports/missing.json");

        assert!(err.is_missing_input());
        assert!(err.source().is_none());
        assert!(err.to_string().contains("reports/missing.json"));
    }

    #[test]
    fn json_error_display() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ReportError::json("results.json", source);

        assert!(err.to_string().starts_with("Invalid JSON in `results.json`"));
    }

    #[test]
    fn config_error_converts() {
        let err: ReportError = ConfigError::invalid_pattern("(", "unclosed").into();

        assert!(matches!(err, ReportError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
