// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration of the charts drawn by the report page.

use serde::Serialize;

use crate::stats::Statistics;

const PASSED: &str = "#2e9d57";
const FAILED: &str = "#d64545";
const SKIPPED: &str = "#d9a21b";
const NEUTRAL: &str = "#4a78c2";

/// Single chart, drawn on a `<canvas>` with the same id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chart {
    /// Id of the target canvas.
    pub id: &'static str,

    /// Chart kind understood by the page script.
    pub kind: ChartKind,

    /// Caption.
    pub title: &'static str,

    /// Category labels.
    pub labels: Vec<String>,

    /// Data series, all of `labels` length.
    pub series: Vec<Series>,
}

/// Kind of a [`Chart`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Ring of a single series.
    Doughnut,

    /// Vertical stacked bars.
    Bar,

    /// Horizontal bars of a single series.
    HBar,
}

/// Named data series of a [`Chart`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    /// Legend label.
    pub label: &'static str,

    /// Colors, either one for the whole series or one per value.
    pub colors: Vec<&'static str>,

    /// Values.
    pub values: Vec<f64>,
}

impl Series {
    fn new(label: &'static str, color: &'static str, values: Vec<f64>) -> Self {
        Self { label, colors: vec![color], values }
    }
}

/// Builds all the report [`Chart`]s out of [`Statistics`].
#[expect(clippy::cast_precision_loss, reason = "counts are small")]
#[must_use]
pub fn charts(stats: &Statistics) -> Vec<Chart> {
    let count = |n: usize| n as f64;
    let ms = |ns: u64| (ns / 1_000_000) as f64;

    let status = Chart {
        id: "chart-status",
        kind: ChartKind::Doughnut,
        title: "Scenarios",
        labels: vec!["Passed".into(), "Failed".into(), "Skipped".into()],
        series: vec![Series {
            label: "Scenarios",
            colors: vec![PASSED, FAILED, SKIPPED],
            values: vec![
                count(stats.scenarios.passed),
                count(stats.scenarios.failed),
                count(stats.scenarios.skipped),
            ],
        }],
    };

    let pf = &stats.per_feature;
    let features = Chart {
        id: "chart-features",
        kind: ChartKind::Bar,
        title: "Scenarios per feature",
        labels: pf.iter().map(|f| f.name.clone()).collect(),
        series: vec![
            Series::new("Passed", PASSED, pf.iter().map(|f| count(f.scenarios.passed)).collect()),
            Series::new("Failed", FAILED, pf.iter().map(|f| count(f.scenarios.failed)).collect()),
            Series::new(
                "Skipped",
                SKIPPED,
                pf.iter().map(|f| count(f.scenarios.skipped)).collect(),
            ),
        ],
    };

    let slowest = Chart {
        id: "chart-slowest",
        kind: ChartKind::HBar,
        title: "Slowest scenarios (ms)",
        labels: stats.slowest.iter().map(|t| t.scenario.clone()).collect(),
        series: vec![Series::new(
            "Duration",
            NEUTRAL,
            stats.slowest.iter().map(|t| ms(t.duration)).collect(),
        )],
    };

    let errors = Chart {
        id: "chart-errors",
        kind: ChartKind::HBar,
        title: "Top errors",
        labels: stats.top_errors.iter().map(|e| e.category.clone()).collect(),
        series: vec![Series::new(
            "Failures",
            FAILED,
            stats.top_errors.iter().map(|e| count(e.count)).collect(),
        )],
    };

    let kinds = Chart {
        id: "chart-kinds",
        kind: ChartKind::Doughnut,
        title: "Scenario kinds",
        labels: vec!["API".into(), "UI".into(), "Integration".into()],
        series: vec![Series {
            label: "Scenarios",
            colors: vec![NEUTRAL, PASSED, SKIPPED],
            values: vec![
                count(stats.kinds.api),
                count(stats.kinds.ui),
                count(stats.kinds.integration),
            ],
        }],
    };

    vec![status, features, slowest, errors, kinds]
}

/// Serializes `value` as JSON safe to embed into a `<script>` element.
///
/// `<` only occurs inside JSON strings, so it's written as `\u003c` there.
///
/// # Errors
///
/// If `value` fails to serialize.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value).map(|json| json.replace('<', "\\u003c"))
}
