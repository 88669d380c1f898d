// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of the report pipeline.
//!
//! - [`core`] - Main [`ReportError`] type
//! - [`config`] - Configuration and validation errors
//!
//! Only the top level of the pipeline propagates these errors. Nested helpers
//! (screenshot copying, optional inputs) log their failures and continue with
//! degraded output.

pub mod config;
pub mod core;

pub use self::{
    config::{ConfigError, ConfigResult},
    core::{ReportError, Result},
};

/// Extension of [`std::io::Result`] attaching the path an operation has been
/// performed on.
pub trait IoResultExt<T> {
    /// Converts the error into a [`ReportError::Io`] for the given `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| ReportError::io(path.as_ref(), e))
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io};

    use super::*;

    #[test]
    fn with_path_attaches_path() {
        let err = fs::read("definitely/not/here.json")
            .with_path("definitely/not/here.json")
            .unwrap_err();

        match err {
            ReportError::Io { path, source } => {
                assert_eq!(path.to_str(), Some("definitely/not/here.json"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            e => panic!("unexpected error: {e}"),
        }
    }
}
