// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Self-contained HTML report.
//!
//! The page is rendered out of a [`liquid`] template, with styles, script and
//! chart configuration inlined, so the resulting `index.html` needs nothing
//! but the `screenshots/` directory next to it (and not even that when
//! screenshots are embedded).

pub mod chart;
pub mod screenshots;
mod view;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::{debug, error, info};

use crate::{
    config::ReportConfig,
    error::{IoResultExt as _, ReportError, Result},
    model::{Feature, Status},
    run::TerminalLogs,
    stats::Statistics,
};

use self::{
    screenshots::Screenshots,
    view::{FeatureView, Page, ScenarioView},
};

pub use self::view::human_duration;

const TEMPLATE: &str = include_str!("report.liquid");
const STYLE: &str = include_str!("report.css");
const SCRIPT: &str = include_str!("report.js");

/// Name of the rendered page inside the report directory.
pub const INDEX: &str = "index.html";

/// Outcome of a successful HTML generation.
#[derive(Clone, Debug)]
pub struct Report {
    /// Path of the rendered page.
    pub index: PathBuf,

    /// Statistics shown on the page.
    pub statistics: Statistics,

    /// Number of screenshots attached to failed scenarios.
    pub screenshots: usize,
}

/// Renders the intermediate JSON artifact into an HTML report.
#[derive(Clone, Copy, Debug)]
pub struct Generator<'c> {
    config: &'c ReportConfig,
    generated_at: Option<SystemTime>,
}

impl<'c> Generator<'c> {
    /// Creates a new [`Generator`] for the given [`ReportConfig`].
    #[must_use]
    pub const fn new(config: &'c ReportConfig) -> Self {
        Self { config, generated_at: None }
    }

    /// Fixes the generation timestamp shown on the page, making the output
    /// reproducible.
    #[must_use]
    pub const fn generated_at(mut self, at: SystemTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Reads [`ReportConfig::json_output`], recreates
    /// [`ReportConfig::html_dir`] and renders the report into it.
    ///
    /// Returns [`None`] without touching the report directory if there is no
    /// JSON artifact to render.
    ///
    /// # Errors
    ///
    /// If the JSON artifact is malformed, the report directory cannot be
    /// recreated, or the page fails to render or to be written.
    pub fn generate(&self) -> Result<Option<Report>> {
        let Some(features) = read_features(&self.config.json_output)? else {
            return Ok(None);
        };

        let out = &self.config.html_dir;
        if out.exists() {
            fs::remove_dir_all(out).with_path(out)?;
        }
        fs::create_dir_all(out.join(screenshots::DIR)).with_path(out)?;

        let logs = self
            .config
            .terminal_logs
            .as_deref()
            .map(TerminalLogs::load)
            .unwrap_or_default();
        let mut shots = Screenshots::discover(&self.config.screenshots_dir);
        debug!(
            screenshots = shots.len(),
            logs = !logs.is_empty(),
            "collected report attachments",
        );
        let statistics =
            Statistics::from_features(&features, self.config.top_n, &self.config.kinds);

        let mut views = Vec::with_capacity(features.len());
        for feature in &features {
            let mut scenarios = Vec::with_capacity(feature.elements.len());
            for el in &feature.elements {
                // Leftover screenshots of earlier runs never match a passed
                // scenario of this one.
                let attached = if el.status() == Status::Failed && !shots.is_empty() {
                    shots.attach(&el.name, out, self.config.embed_screenshots)
                } else {
                    vec![]
                };
                scenarios.push(ScenarioView::new(
                    feature,
                    el,
                    logs.entries_for(feature, el),
                    attached,
                ));
            }
            views.push(FeatureView::new(feature, scenarios));
        }

        let json_err = |e: serde_json::Error| ReportError::json(&self.config.json_output, e);
        let generated_at = self.generated_at.unwrap_or_else(SystemTime::now);
        let page = Page {
            title: self.config.title.clone(),
            generated_at: humantime::format_rfc3339_seconds(generated_at).to_string(),
            total_duration: human_duration(statistics.duration),
            charts_json: chart::script_json(&chart::charts(&statistics)).map_err(json_err)?,
            data_json: chart::script_json(&features).map_err(json_err)?,
            stats: statistics.clone(),
            features: views,
            screenshot_count: shots.published(),
            style: STYLE,
            script: SCRIPT,
        };

        let html = render(&page)?;
        let index = out.join(INDEX);
        fs::write(&index, html).with_path(&index)?;
        info!(
            path = %index.display(),
            scenarios = statistics.scenarios.total(),
            screenshots = shots.published(),
            "HTML report written",
        );

        Ok(Some(Report { index, statistics, screenshots: shots.published() }))
    }
}

fn read_features(path: &Path) -> Result<Option<Vec<Feature>>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!(path = %path.display(), "no JSON report found, skipping HTML generation");
            return Ok(None);
        }
        Err(e) => return Err(ReportError::io(path, e)),
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|e| ReportError::json(path, e))
}

fn render(page: &Page) -> Result<String> {
    let template = liquid::ParserBuilder::with_stdlib().build()?.parse(TEMPLATE)?;
    let globals = liquid::model::to_object(page)?;
    Ok(template.render(&globals)?)
}
