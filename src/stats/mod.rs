// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Statistics derived from correlated [`Feature`]s.
//!
//! Everything here is a pure function of its input: no I/O, no clock.

pub mod counts;

use std::{cmp::Reverse, collections::HashMap};

use itertools::Itertools as _;
use lazy_regex::regex_is_match;
use serde::Serialize;

use crate::{
    config::KindKeywords,
    model::{Element, Feature, Status},
};

pub use self::counts::Stats;

/// Longest error text kept as an error category.
const MAX_CATEGORY_LEN: usize = 80;

/// Aggregated statistics of a whole report.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of [`Feature`]s.
    pub features: usize,

    /// Scenarios by their status.
    pub scenarios: Stats,

    /// Steps by their status.
    pub steps: Stats,

    /// Total duration of all the scenarios, in nanoseconds.
    pub duration: u64,

    /// Percentage of passed scenarios.
    pub pass_rate: usize,

    /// Subtotals of every [`Feature`], in report order.
    pub per_feature: Vec<FeatureStats>,

    /// Most frequent error categories of failed scenarios.
    pub top_errors: Vec<ErrorCategory>,

    /// Slowest scenarios.
    pub slowest: Vec<ScenarioTiming>,

    /// Heuristic scenario classification.
    pub kinds: KindCounts,
}

/// Subtotals of a single [`Feature`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FeatureStats {
    /// Name of the [`Feature`].
    pub name: String,

    /// Originating file of the [`Feature`].
    pub uri: Option<String>,

    /// Scenarios by their status.
    pub scenarios: Stats,

    /// Steps by their status.
    pub steps: Stats,

    /// Total duration in nanoseconds.
    pub duration: u64,

    /// Percentage of passed scenarios.
    pub pass_rate: usize,
}

/// Error category along with the number of failed scenarios in it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ErrorCategory {
    /// Category name.
    pub category: String,

    /// Number of failed scenarios.
    pub count: usize,
}

/// Duration of a single scenario.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScenarioTiming {
    /// Name of the [`Feature`] the scenario belongs to.
    pub feature: String,

    /// Name of the scenario.
    pub scenario: String,

    /// Duration in nanoseconds.
    pub duration: u64,

    /// Aggregate status of the scenario.
    pub status: Status,
}

/// Number of scenarios per heuristic kind.
///
/// A scenario may be counted in several kinds, or in none.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct KindCounts {
    /// API scenarios.
    pub api: usize,

    /// UI scenarios.
    pub ui: usize,

    /// Integration scenarios.
    pub integration: usize,
}

impl Statistics {
    /// Derives [`Statistics`] of the given `features`, keeping `top_n`
    /// entries in the ranked lists.
    #[must_use]
    pub fn from_features(
        features: &[Feature],
        top_n: usize,
        keywords: &KindKeywords,
    ) -> Self {
        let per_feature: Vec<_> = features.iter().map(FeatureStats::of).collect();

        let mut scenarios = Stats::new();
        let mut steps = Stats::new();
        let mut duration = 0;
        for f in &per_feature {
            scenarios += f.scenarios;
            steps += f.steps;
            duration += f.duration;
        }

        let all = || features.iter().flat_map(|f| f.elements.iter().map(move |e| (f, e)));

        Self {
            features: features.len(),
            scenarios,
            steps,
            duration,
            pass_rate: scenarios.pass_rate(),
            per_feature,
            top_errors: top_errors(all().map(|(_, e)| e), top_n),
            slowest: slowest(all(), top_n),
            kinds: KindCounts::of(all().map(|(_, e)| e), keywords),
        }
    }

    /// Number of failed scenarios.
    #[must_use]
    pub const fn failed_scenarios(&self) -> usize {
        self.scenarios.failed
    }
}

impl FeatureStats {
    fn of(feature: &Feature) -> Self {
        let scenarios: Stats = feature.elements.iter().map(Element::status).collect();
        let steps: Stats = feature
            .elements
            .iter()
            .flat_map(|e| e.steps.iter().map(|s| s.result.status))
            .collect();
        Self {
            name: feature.name.clone(),
            uri: feature.uri.clone(),
            scenarios,
            steps,
            duration: feature.elements.iter().map(Element::duration).sum(),
            pass_rate: scenarios.pass_rate(),
        }
    }
}

impl KindCounts {
    fn of<'e>(
        scenarios: impl Iterator<Item = &'e Element>,
        keywords: &KindKeywords,
    ) -> Self {
        let lower = |list: &[String]| {
            list.iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>()
        };
        let (api, ui, integration) =
            (lower(&keywords.api), lower(&keywords.ui), lower(&keywords.integration));

        let mut counts = Self::default();
        for el in scenarios {
            let text = std::iter::once(el.name.as_str())
                .chain(el.steps.iter().map(|s| s.name.as_str()))
                .join("\n")
                .to_lowercase();
            let hit = |list: &[String]| list.iter().any(|k| text.contains(k.as_str()));
            counts.api += usize::from(hit(&api));
            counts.ui += usize::from(hit(&ui));
            counts.integration += usize::from(hit(&integration));
        }
        counts
    }
}

/// Classifies the given error text into a short category name.
#[must_use]
pub fn categorize(error: &str) -> String {
    let category = if regex_is_match!(
        r"(?i)\bundefined step\b|step implementation missing|step definition",
        error
    ) {
        "Undefined step"
    } else if regex_is_match!(
        r"(?i)expected to find|element not found|never found|not visible|does not exist",
        error
    ) {
        "Element not found"
    } else if regex_is_match!(r"(?i)timed? ?out", error) {
        "Timeout"
    } else if regex_is_match!(
        r"(?i)status code|network|econnrefused|cy\.request\(\)|fetch failed",
        error
    ) {
        "Network"
    } else if regex_is_match!(r"(?i)assert|expected", error) {
        "Assertion"
    } else {
        let line = error.lines().map(str::trim).find(|l| !l.is_empty());
        return match line {
            Some(l) => l.chars().take(MAX_CATEGORY_LEN).collect(),
            None => "Unknown error".into(),
        };
    };
    category.into()
}

fn top_errors<'e>(
    scenarios: impl Iterator<Item = &'e Element>,
    top_n: usize,
) -> Vec<ErrorCategory> {
    let mut counts = HashMap::<String, usize>::new();
    for el in scenarios.filter(|e| e.status() == Status::Failed) {
        *counts
            .entry(categorize(el.error_message().unwrap_or_default()))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .sorted_by(|(a, ac), (b, bc)| bc.cmp(ac).then_with(|| a.cmp(b)))
        .take(top_n)
        .map(|(category, count)| ErrorCategory { category, count })
        .collect()
}

fn slowest<'e>(
    scenarios: impl Iterator<Item = (&'e Feature, &'e Element)>,
    top_n: usize,
) -> Vec<ScenarioTiming> {
    scenarios
        .map(|(f, e)| ScenarioTiming {
            feature: f.name.clone(),
            scenario: e.name.clone(),
            duration: e.duration(),
            status: e.status(),
        })
        .sorted_by_key(|t| Reverse(t.duration))
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RunResult, Step};

    fn scenario(feature: &str, name: &str, results: &[RunResult]) -> Element {
        let mut el = Element::new(feature, "Scenario", name, 1, 0);
        el.steps = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut step = Step::new("Given", format!("step {i}"), i + 2);
                step.result = r.clone();
                step
            })
            .collect();
        el
    }

    fn feature(name: &str, elements: Vec<Element>) -> Feature {
        let mut f = Feature::new("Feature", name, None);
        f.elements = elements;
        f
    }

    fn failed(ms: u64, error: &str) -> RunResult {
        RunResult::failed(ms * 1_000_000, Some(error.into()))
    }

    fn stats(features: &[Feature]) -> Statistics {
        Statistics::from_features(features, 5, &KindKeywords::default())
    }

    #[test]
    fn empty_report_has_zero_pass_rate() {
        let s = stats(&[]);

        assert_eq!(s.pass_rate, 0);
        assert_eq!(s.scenarios.total(), 0);
        assert!(s.top_errors.is_empty());
        assert!(s.slowest.is_empty());
    }

    #[test]
    fn background_failure_scenario() {
        let f = feature(
            "Login",
            vec![scenario(
                "Login",
                "Login Test",
                &[
                    RunResult::passed(1_000_000_000),
                    failed(3000, "AssertionError: expected 1 to equal 2"),
                    RunResult::skipped(),
                ],
            )],
        );

        let s = stats(&[f]);

        assert_eq!(s.failed_scenarios(), 1);
        assert_eq!(s.pass_rate, 0);
        assert_eq!(s.steps, Stats { passed: 1, skipped: 1, failed: 1, undefined: 0 });
        assert_eq!(s.duration, 4_000_000_000);
        assert_eq!(s.top_errors, [ErrorCategory { category: "Assertion".into(), count: 1 }]);
    }

    #[test]
    fn per_feature_subtotals() {
        let features = [
            feature(
                "A",
                vec![
                    scenario("A", "one", &[RunResult::passed(5)]),
                    scenario("A", "two", &[RunResult::skipped()]),
                ],
            ),
            feature("B", vec![scenario("B", "three", &[failed(1, "boom")])]),
        ];

        let s = stats(&features);

        assert_eq!(s.features, 2);
        assert_eq!(s.scenarios, Stats { passed: 1, skipped: 1, failed: 1, undefined: 0 });
        assert_eq!(s.pass_rate, 33);
        assert_eq!(s.per_feature[0].name, "A");
        assert_eq!(s.per_feature[0].pass_rate, 50);
        assert_eq!(s.per_feature[0].duration, 5);
        assert_eq!(s.per_feature[1].scenarios.failed, 1);
    }

    #[test]
    fn error_categories() {
        assert_eq!(categorize("AssertionError: expected 1 to equal 2"), "Assertion");
        assert_eq!(
            categorize("Timed out retrying after 4000ms: Expected to find element: `#x`"),
            "Element not found",
        );
        assert_eq!(categorize("Timed out after 60000ms"), "Timeout");
        assert_eq!(categorize("cy.request() failed: status code 500"), "Network");
        assert_eq!(categorize("Step implementation missing for: foo"), "Undefined step");
        assert_eq!(categorize("Undefined step: Given a cart"), "Undefined step");
        assert_eq!(
            categorize("TypeError: Cannot read properties of undefined (reading 'id')"),
            "TypeError: Cannot read properties of undefined (reading 'id')",
        );
        assert_eq!(categorize("\n  kaboom\nstack"), "kaboom");
        assert_eq!(categorize(&"x".repeat(200)).len(), 80);
        assert_eq!(categorize(""), "Unknown error");
    }

    #[test]
    fn top_errors_are_ranked_by_count_then_name() {
        let f = feature(
            "F",
            vec![
                scenario("F", "a", &[failed(1, "Timed out")]),
                scenario("F", "b", &[failed(1, "zeta")]),
                scenario("F", "c", &[failed(1, "alpha")]),
                scenario("F", "d", &[failed(1, "timed out again")]),
            ],
        );

        let s = Statistics::from_features(&[f], 2, &KindKeywords::default());

        assert_eq!(
            s.top_errors,
            [
                ErrorCategory { category: "Timeout".into(), count: 2 },
                ErrorCategory { category: "alpha".into(), count: 1 },
            ],
        );
    }

    #[test]
    fn slowest_scenarios_first() {
        let f = feature(
            "F",
            vec![
                scenario("F", "fast", &[RunResult::passed(1)]),
                scenario("F", "slow", &[RunResult::passed(100)]),
                scenario("F", "medium", &[RunResult::passed(10)]),
            ],
        );

        let s = Statistics::from_features(&[f], 2, &KindKeywords::default());

        let names: Vec<_> = s.slowest.iter().map(|t| t.scenario.as_str()).collect();
        assert_eq!(names, ["slow", "medium"]);
        assert_eq!(s.slowest[0].feature, "F");
    }

    #[test]
    fn kinds_by_keyword() {
        let mut api = scenario("F", "API health check", &[RunResult::passed(1)]);
        api.steps[0].name = "the endpoint responds".into();
        let mut ui = scenario("F", "Dashboard", &[RunResult::passed(1)]);
        ui.steps[0].name = "they CLICK the logout button".into();
        let other = scenario("F", "Something", &[RunResult::passed(1)]);

        let s = stats(&[feature("F", vec![api, ui, other])]);

        assert_eq!(s.kinds, KindCounts { api: 1, ui: 1, integration: 0 });
    }
}
