// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Whole report generation pipeline.

use std::{
    fs,
    io,
    time::SystemTime,
};

use tracing::{debug, info, warn};

use crate::{
    config::ReportConfig,
    correlate::{Correlation, Correlator, FailurePatterns},
    error::{IoResultExt as _, ReportError, Result},
    html::{self, Generator},
    model::Feature,
    parser,
    run::RunResults,
    stats::Statistics,
    term::{Styles, Summary},
};

/// Outcome of a [`Reporter::run()`].
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Correlated [`Feature`]s, as written to the JSON artifact.
    pub features: Vec<Feature>,

    /// Summary of the correlation.
    pub correlation: Correlation,

    /// Statistics of the report.
    pub statistics: Statistics,

    /// Rendered HTML report, if any.
    pub report: Option<html::Report>,
}

/// Runs every stage of a report generation for a single [`ReportConfig`].
#[derive(Debug)]
pub struct Reporter<'c> {
    config: &'c ReportConfig,
    patterns: FailurePatterns,
    styles: Styles,
    generated_at: Option<SystemTime>,
}

impl<'c> Reporter<'c> {
    /// Creates a new [`Reporter`] printing its summary with the given
    /// [`Styles`].
    ///
    /// # Errors
    ///
    /// If [`ReportConfig::failure_patterns`] are invalid.
    pub fn new(config: &'c ReportConfig, styles: Styles) -> Result<Self> {
        let patterns = FailurePatterns::new(&config.failure_patterns)?;
        Ok(Self { config, patterns, styles, generated_at: None })
    }

    /// Fixes the generation timestamp of the HTML report.
    #[must_use]
    pub const fn generated_at(mut self, at: SystemTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Runs the pipeline, printing the summary to stdout.
    ///
    /// # Errors
    ///
    /// See [`Reporter::run_to()`].
    pub fn run(&self) -> Result<Outcome> {
        self.run_to(&mut io::stdout().lock())
    }

    /// Runs the pipeline, printing the summary to the given `out`put.
    ///
    /// # Errors
    ///
    /// If run results are missing or malformed, or any of the artifacts
    /// cannot be written.
    pub fn run_to(&self, out: &mut dyn io::Write) -> Result<Outcome> {
        self.clean()?;

        let mut features = parser::parse_all(
            self.config.parser.parser(),
            &self.config.features_dir,
        )?;
        info!(
            dir = %self.config.features_dir.display(),
            features = features.len(),
            "parsed feature files",
        );

        let results = RunResults::from_file(&self.config.results)?;
        let correlation = Correlator::new(&self.patterns).correlate(&mut features, &results);
        debug!(
            matched = correlation.matched,
            unmatched = correlation.unmatched.len(),
            synthesized = correlation.synthesized,
            "correlated run results",
        );

        self.write_json(&features)?;

        let mut generator = Generator::new(self.config);
        if let Some(at) = self.generated_at {
            generator = generator.generated_at(at);
        }
        let report = generator.generate()?;

        let statistics = report.as_ref().map_or_else(
            || Statistics::from_features(&features, self.config.top_n, &self.config.kinds),
            |r| r.statistics.clone(),
        );

        let summary = self.styles.summary(&Summary {
            statistics: &statistics,
            unmatched: correlation.unmatched.len(),
            report: report.as_ref().map(|r| r.index.as_path()),
        });
        if let Err(e) = writeln!(out, "{summary}") {
            warn!("cannot print summary: {e}");
        }

        Ok(Outcome { features, correlation, statistics, report })
    }

    /// Removes the JSON artifact and the HTML report of a previous run.
    ///
    /// # Errors
    ///
    /// If any of the artifacts exists but cannot be removed.
    pub fn clean(&self) -> Result<()> {
        let json = &self.config.json_output;
        match fs::remove_file(json) {
            Ok(()) => debug!(path = %json.display(), "removed previous JSON report"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ReportError::io(json, e)),
        }
        let html = &self.config.html_dir;
        match fs::remove_dir_all(html) {
            Ok(()) => debug!(path = %html.display(), "removed previous HTML report"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ReportError::io(html, e)),
        }
        Ok(())
    }

    /// Writes the intermediate JSON artifact.
    ///
    /// # Errors
    ///
    /// If the artifact cannot be written.
    pub fn write_json(&self, features: &[Feature]) -> Result<()> {
        let path = &self.config.json_output;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_path(dir)?;
        }
        let mut json =
            serde_json::to_vec_pretty(features).map_err(|e| ReportError::json(path, e))?;
        json.push(b'\n');
        fs::write(path, json).with_path(path)?;
        info!(path = %path.display(), features = features.len(), "JSON report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        config::PatternRule,
        error::ConfigError,
        model::Status,
        term::Coloring,
    };

    fn config(dir: &Path) -> ReportConfig {
        ReportConfig {
            features_dir: dir.join("features"),
            results: dir.join("results.json"),
            terminal_logs: None,
            screenshots_dir: dir.join("screenshots"),
            json_output: dir.join("out/json/report.json"),
            html_dir: dir.join("out/html"),
            ..ReportConfig::default()
        }
    }

    fn reporter(config: &ReportConfig) -> Reporter<'_> {
        Reporter::new(config, Styles::new(Coloring::Never)).unwrap()
    }

    fn seed(config: &ReportConfig) {
        fs::create_dir_all(&config.features_dir).unwrap();
        fs::write(
            config.features_dir.join("cart.feature"),
            "Feature: Cart\n\
             Scenario: Add item\n\
             Given an empty cart\n\
             When they add an item\n\
             Then the cart has 1 item\n",
        )
        .unwrap();
        fs::write(
            &config.results,
            r#"{"runs": [{"spec": {"relative": "features/cart.feature"},
                "tests": [{"title": ["Cart", "Add item"], "state": "passed", "duration": 300}]}]}"#,
        )
        .unwrap();
    }

    #[test]
    fn invalid_pattern_is_rejected_upfront() {
        let config = ReportConfig {
            failure_patterns: vec![PatternRule {
                pattern: "ok".into(),
                locate: "somewhere".into(),
            }],
            ..ReportConfig::default()
        };

        let err = Reporter::new(&config, Styles::new(Coloring::Never)).unwrap_err();

        assert!(matches!(err, ReportError::Config(ConfigError::UnknownLocator { .. })));
    }

    #[test]
    fn missing_results_are_an_error() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());

        let err = reporter(&config).run_to(&mut io::sink()).unwrap_err();

        assert!(err.is_missing_input());
    }

    #[test]
    fn runs_whole_pipeline() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        seed(&config);
        let mut printed = Vec::new();

        let outcome = reporter(&config).run_to(&mut printed).unwrap();

        assert_eq!(outcome.correlation.matched, 1);
        let steps = &outcome.features[0].elements[0].steps;
        assert!(steps.iter().all(|s| s.result.status == Status::Passed));
        assert!(steps.iter().all(|s| s.result.duration == 100_000_000));
        assert_eq!(outcome.statistics.pass_rate, 100);
        assert!(config.json_output.is_file());
        assert!(config.html_dir.join("index.html").is_file());

        let printed = String::from_utf8(printed).unwrap();
        assert!(printed.starts_with("[Summary]"));
        assert!(printed.contains("1 scenario (1 passed)"));
    }

    #[test]
    fn failed_run_leaves_no_stale_report() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        seed(&config);
        _ = reporter(&config).run_to(&mut io::sink()).unwrap();
        assert!(config.html_dir.join("index.html").is_file());
        fs::remove_file(&config.results).unwrap();

        let err = reporter(&config).run_to(&mut io::sink()).unwrap_err();

        assert!(err.is_missing_input());
        assert!(!config.json_output.exists());
        assert!(!config.html_dir.join("index.html").exists());
    }

    #[test]
    fn clean_tolerates_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());

        reporter(&config).clean().unwrap();
    }
}
