// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Report configuration.
//!
//! [`ReportConfig`] is read from an optional TOML file and then overridden by
//! CLI options, see [`cli::Opts::apply()`].
//!
//! ```toml
//! features_dir = "cypress/e2e"
//! results = "reports/run-results.json"
//! top_n = 10
//!
//! [[failure_patterns]]
//! pattern = "session expired"
//! locate = "first-given"
//! ```
//!
//! [`cli::Opts::apply()`]: crate::cli::Opts::apply

use std::{fs, path::{Path, PathBuf}};

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::error::{ConfigError, IoResultExt as _, Result};

/// Configuration of a single report generation.
#[derive(Clone, Debug, Deserialize, PartialEq, SmartDefault)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory to look for `.feature` files in, recursively.
    #[default(PathBuf::from("cypress/e2e"))]
    pub features_dir: PathBuf,

    /// Results of the test run, as reported by the test runner.
    #[default(PathBuf::from("reports/run-results.json"))]
    pub results: PathBuf,

    /// Terminal logs captured during the test run (optional input).
    #[default(Some(PathBuf::from("reports/terminal-logs.json")))]
    pub terminal_logs: Option<PathBuf>,

    /// Directory containing failure screenshots (optional input).
    #[default(PathBuf::from("cypress/screenshots"))]
    pub screenshots_dir: PathBuf,

    /// Path of the intermediate JSON artifact.
    #[default(PathBuf::from("reports/json/cucumber-report.json"))]
    pub json_output: PathBuf,

    /// Directory of the HTML report. Deleted and recreated on every run.
    #[default(PathBuf::from("reports/html"))]
    pub html_dir: PathBuf,

    /// Title of the HTML report.
    #[default("E2E Test Report".to_owned())]
    pub title: String,

    /// Length of the "top errors" and "slowest scenarios" lists.
    #[default(5)]
    pub top_n: usize,

    /// Parser used for `.feature` files.
    pub parser: ParserKind,

    /// Inline screenshots into the HTML as `data:` URIs instead of linking
    /// the copied files.
    pub embed_screenshots: bool,

    /// Additional failure patterns, tried before the built-in ones.
    pub failure_patterns: Vec<PatternRule>,

    /// Keywords classifying scenarios as API, UI or integration ones.
    pub kinds: KindKeywords,
}

impl ReportConfig {
    /// Reads a [`ReportConfig`] from the given TOML file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or isn't a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).with_path(path)?;
        Self::from_toml(&raw, path)
    }

    /// Parses a [`ReportConfig`] out of the given TOML `raw` string.
    ///
    /// # Errors
    ///
    /// If `raw` isn't a valid configuration.
    pub fn from_toml(raw: &str, origin: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|e| {
            ConfigError::malformed(origin.display().to_string(), e.message())
                .into()
        })
    }
}

/// Parser used for `.feature` files.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Line based parser, tolerating malformed files.
    #[default]
    Lenient,

    /// Full Gherkin grammar. Malformed files are skipped.
    Gherkin,
}

/// User defined rule pointing a failure message at a step.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatternRule {
    /// Case-insensitive regular expression matched against the error text.
    pub pattern: String,

    /// Step locator, see [`StepLocator`] for the accepted values.
    ///
    /// [`StepLocator`]: crate::correlate::StepLocator
    pub locate: String,
}

/// Keywords classifying scenarios by a case-insensitive substring search
/// over the scenario name and its steps' text.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, SmartDefault)]
#[serde(default, deny_unknown_fields)]
pub struct KindKeywords {
    /// Keywords of API scenarios.
    #[default(strings(&["api", "endpoint", "request", "response", "status code"]))]
    pub api: Vec<String>,

    /// Keywords of UI scenarios.
    #[default(strings(&[
        "click", "page", "button", "visit", "form", "navigate", "display",
    ]))]
    pub ui: Vec<String>,

    /// Keywords of integration scenarios.
    #[default(strings(&["integration", "end-to-end", "e2e", "workflow"]))]
    pub integration: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|&s| s.to_owned()).collect()
}
