// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration and validation error types.
//!
//! This module defines errors that can occur during configuration file
//! parsing and validation of user supplied failure patterns.

use derive_more::with_trait::{Display, Error};

/// Configuration and validation errors.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Configuration file isn't valid TOML or has unexpected fields.
    #[display("Malformed configuration file `{path}`: {reason}")]
    Malformed {
        /// Path of the configuration file.
        #[error(not(source))]
        path: String,

        /// Parser's explanation.
        #[error(not(source))]
        reason: String,
    },

    /// Failure pattern isn't a valid regular expression.
    #[display("Invalid failure pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The invalid pattern.
        #[error(not(source))]
        pattern: String,

        /// Reason of the pattern being invalid.
        #[error(not(source))]
        reason: String,
    },

    /// Step locator of a failure pattern isn't recognized.
    #[display(
        "Unknown step locator `{locator}`, expected one of: last, \
         after-background, first-given, first-when, first-then, mentioned, \
         index:<n>"
    )]
    UnknownLocator {
        /// The unrecognized locator.
        #[error(not(source))]
        locator: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Creates a new malformed configuration error.
    #[must_use]
    pub fn malformed(
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed { path: path.into(), reason: reason.into() }
    }

    /// Creates a new invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPattern { pattern: pattern.into(), reason: reason.into() }
    }

    /// Creates a new unknown locator error.
    #[must_use]
    pub fn unknown_locator(locator: impl Into<String>) -> Self {
        Self::UnknownLocator { locator: locator.into() }
    }
}
