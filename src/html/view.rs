// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Template-facing view of a report.

use std::time::Duration;

use serde::Serialize;

use crate::{
    model::{Element, FailedStep, Feature, Status, Step},
    run::LogEntry,
    stats::{Stats, Statistics},
};

use super::screenshots::Attachment;

/// Formats nanoseconds for humans, with millisecond precision.
#[must_use]
pub fn human_duration(nanos: u64) -> String {
    let millis = Duration::from_millis(nanos / 1_000_000);
    if millis.is_zero() {
        return if nanos == 0 { "0ms".into() } else { "<1ms".into() };
    }
    humantime::format_duration(millis).to_string()
}

/// Aggregate status of a [`Feature`].
#[must_use]
pub fn feature_status(stats: &Stats) -> Status {
    if stats.failed > 0 {
        Status::Failed
    } else if stats.skipped > 0 || stats.undefined > 0 {
        Status::Skipped
    } else {
        Status::Passed
    }
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct FeatureView {
    pub name: String,
    pub uri: String,
    pub tags: Vec<String>,
    pub status: Status,
    pub stats: Stats,
    pub pass_rate: usize,
    pub duration: String,
    pub scenarios: Vec<ScenarioView>,
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct ScenarioView {
    pub id: String,
    pub keyword: String,
    pub name: String,
    pub tags: Vec<String>,
    pub status: Status,
    pub duration: String,
    pub error: Option<String>,
    pub inference: Option<String>,
    pub search: String,
    pub steps: Vec<StepView>,
    pub logs: Vec<LogEntry>,
    pub screenshots: Vec<Attachment>,
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct StepView {
    pub keyword: String,
    pub name: String,
    pub status: Status,
    pub duration: String,
    pub error: Option<String>,
    pub background: bool,
    pub inferred: bool,
}

impl FeatureView {
    pub(super) fn new(feature: &Feature, scenarios: Vec<ScenarioView>) -> Self {
        let stats: Stats = feature.elements.iter().map(Element::status).collect();
        Self {
            name: feature.name.clone(),
            uri: feature.uri.clone().unwrap_or_default(),
            tags: feature.tags.iter().map(|t| t.name.clone()).collect(),
            status: feature_status(&stats),
            pass_rate: stats.pass_rate(),
            stats,
            duration: human_duration(feature.elements.iter().map(Element::duration).sum()),
            scenarios,
        }
    }
}

impl ScenarioView {
    pub(super) fn new(
        feature: &Feature,
        el: &Element,
        logs: &[LogEntry],
        screenshots: Vec<Attachment>,
    ) -> Self {
        let guessed_at = el.failed_step.filter(|f| f.is_guessed()).map(|f| f.index());
        let steps = el
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| StepView::new(s, i < el.background_steps, guessed_at == Some(i)))
            .collect();
        let search = format!(
            "{} {} {}",
            feature.name,
            el.name,
            el.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(" "),
        )
        .to_lowercase();
        Self {
            id: el.id.clone(),
            keyword: el.keyword.clone(),
            name: el.name.clone(),
            tags: el.tags.iter().map(|t| t.name.clone()).collect(),
            status: el.status(),
            duration: human_duration(el.duration()),
            error: el.error_message().map(str::to_owned),
            inference: el.failed_step.and_then(describe_inference),
            search,
            steps,
            logs: logs.to_vec(),
            screenshots,
        }
    }
}

impl StepView {
    fn new(step: &Step, background: bool, inferred: bool) -> Self {
        Self {
            keyword: step.keyword.clone(),
            name: step.name.clone(),
            status: step.result.status,
            duration: human_duration(step.result.duration),
            error: step.result.error_message.clone(),
            background,
            inferred,
        }
    }
}

fn describe_inference(failed: FailedStep) -> Option<String> {
    match failed {
        FailedStep::Exact { .. } => None,
        FailedStep::Guessed { step, confidence } => Some(format!(
            "Failing step #{} was inferred from the error message \
             ({confidence} confidence)",
            step + 1,
        )),
    }
}

/// Top level variables of the report template.
#[derive(Clone, Debug, Serialize)]
pub(super) struct Page {
    pub title: String,
    pub generated_at: String,
    pub stats: Statistics,
    pub total_duration: String,
    pub features: Vec<FeatureView>,
    pub screenshot_count: usize,
    pub style: &'static str,
    pub script: &'static str,
    pub charts_json: String,
    pub data_json: String,
}
