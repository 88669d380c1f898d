// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outcomes reported by the external test runner.

pub mod logs;

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{IoResultExt as _, ReportError, Result};

pub use self::logs::{LogEntry, TerminalLogs};

/// Results of a whole test run.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResults {
    /// Runs of individual spec files.
    #[serde(default)]
    pub runs: Vec<SpecRun>,
}

impl RunResults {
    /// Reads [`RunResults`] from the given JSON file.
    ///
    /// # Errors
    ///
    /// If the file is missing, unreadable or isn't valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReportError::missing_input(path));
        }
        let raw = fs::read(path).with_path(path)?;
        serde_json::from_slice(&raw).map_err(|e| ReportError::json(path, e))
    }

    /// Iterates over all the [`RunRecord`]s along with the spec path they
    /// belong to.
    pub fn records(&self) -> impl Iterator<Item = (&str, &RunRecord)> {
        self.runs.iter().flat_map(|run| {
            run.tests.iter().map(|t| (run.spec.relative.as_str(), t))
        })
    }

    /// Returns the total number of [`RunRecord`]s.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.runs.iter().map(|r| r.tests.len()).sum()
    }
}

/// Run of a single spec file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRun {
    /// The spec file.
    #[serde(default)]
    pub spec: SpecFile,

    /// Tests executed from the spec file.
    #[serde(default)]
    pub tests: Vec<RunRecord>,
}

/// Spec file of a [`SpecRun`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecFile {
    /// Path of the spec file, relative to the project root.
    #[serde(default)]
    pub relative: String,

    /// Name of the spec file.
    #[serde(default)]
    pub name: String,
}

/// Test runner's record of one executed test.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Title segments: describe blocks first, test title last.
    #[serde(default)]
    pub title: Vec<String>,

    /// Terminal state of the test.
    #[serde(default)]
    pub state: RunState,

    /// Duration in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,

    /// Error displayed by the runner, if any.
    #[serde(default)]
    pub display_error: Option<String>,

    /// Individual attempts of the test, if the runner reports retries.
    #[serde(default)]
    pub attempts: Vec<Attempt>,

    /// Identifier of the scenario, for runners configured to tag tests with
    /// it.
    #[serde(default)]
    pub scenario_id: Option<String>,

    /// Index of the failed step, for runners able to report it.
    #[serde(default)]
    pub failed_step: Option<usize>,
}

impl RunRecord {
    /// Returns the test title (the last title segment).
    #[must_use]
    pub fn test_title(&self) -> &str {
        self.title.last().map_or("", String::as_str)
    }

    /// Returns the duration of the test in milliseconds.
    ///
    /// Falls back to the sum of [`RunRecord::attempts`] if the runner
    /// reported no overall duration.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration.unwrap_or_else(|| {
            self.attempts.iter().filter_map(|a| a.duration).sum()
        })
    }

    /// Returns the duration of the test in nanoseconds.
    #[must_use]
    pub fn duration_ns(&self) -> u64 {
        self.duration_ms().saturating_mul(1_000_000)
    }
}

/// Single attempt of a retried test.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Terminal state of the attempt.
    #[serde(default)]
    pub state: RunState,

    /// Duration in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Terminal state of a [`RunRecord`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Test has passed.
    Passed,

    /// Test has failed.
    Failed,

    /// Test is pending (marked to be skipped).
    Pending,

    /// Test was skipped because of an earlier failure.
    Skipped,

    /// Any other state reported by the runner. Treated as a failure.
    #[default]
    #[serde(other)]
    Other,
}

impl RunState {
    /// Indicates whether the test wasn't executed at all.
    #[must_use]
    pub const fn is_skipped(self) -> bool {
        matches!(self, Self::Pending | Self::Skipped)
    }
}
