// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Correlation of parsed [`Feature`]s with test run outcomes.
//!
//! - [`matching`]: name based scenario to record matching
//! - [`inference`]: failed step inference out of error messages
//! - [`fallback`]: synthetic features built straight from run results

pub mod fallback;
pub mod inference;
pub mod matching;

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::{
    model::{Element, Feature, RunResult},
    run::{RunRecord, RunResults, RunState},
};

pub use self::{
    inference::{FailurePattern, FailurePatterns, StepLocator},
    matching::MatchQuality,
};

/// Summary of a correlation pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Correlation {
    /// Number of scenarios matched with a [`RunRecord`].
    pub matched: usize,

    /// `feature / scenario` names of scenarios no [`RunRecord`] matched.
    pub unmatched: Vec<String>,

    /// Indicates whether [`fallback::synthesize()`] produced the features.
    pub synthesized: bool,
}

/// Joins parsed scenario structure with actual run outcomes.
#[derive(Clone, Copy, Debug)]
pub struct Correlator<'p> {
    patterns: &'p FailurePatterns,
}

impl<'p> Correlator<'p> {
    /// Creates a new [`Correlator`] inferring failed steps with the given
    /// [`FailurePatterns`].
    #[must_use]
    pub const fn new(patterns: &'p FailurePatterns) -> Self {
        Self { patterns }
    }

    /// Assigns statuses, durations and errors of matching [`RunRecord`]s to
    /// the steps of the given `features`.
    ///
    /// Unmatched scenarios keep their placeholder results. If nothing has
    /// been matched at all, `features` are replaced with
    /// [`fallback::synthesize()`]d ones.
    pub fn correlate(
        &self,
        features: &mut Vec<Feature>,
        results: &RunResults,
    ) -> Correlation {
        let records: Vec<_> = results.records().collect();
        let mut claimed = HashSet::new();
        let mut summary = Correlation::default();

        for feature in features.iter_mut() {
            for scenario in &mut feature.elements {
                let best = best_match(feature.uri.as_deref(), scenario, &records, &claimed);
                match best {
                    Some(idx) => {
                        let (spec, record) = records[idx];
                        debug!(
                            scenario = %scenario.name,
                            spec,
                            test = record.test_title(),
                            "matched scenario",
                        );
                        _ = claimed.insert(idx);
                        self.apply(scenario, record);
                        summary.matched += 1;
                    }
                    None => {
                        warn!(
                            feature = %feature.name,
                            scenario = %scenario.name,
                            "no run record matches scenario, keeping placeholder results",
                        );
                        summary
                            .unmatched
                            .push(format!("{} / {}", feature.name, scenario.name));
                    }
                }
            }
        }

        if summary.matched == 0 && results.record_count() > 0 {
            info!(
                features = features.len(),
                records = results.record_count(),
                "nothing correlated, building report straight from run results",
            );
            *features = fallback::synthesize(results);
            summary.synthesized = true;
            summary.unmatched.clear();
        }
        summary
    }

    /// Applies the given [`RunRecord`] outcome to the steps of the given
    /// `scenario`.
    pub fn apply(&self, scenario: &mut Element, record: &RunRecord) {
        let total = record.duration_ns();
        let count = scenario.steps.len();
        let share = u64::try_from(count).map_or(0, |k| total.checked_div(k).unwrap_or(0));
        scenario.failed_step = None;

        match record.state {
            RunState::Passed => {
                for step in &mut scenario.steps {
                    step.result = RunResult::passed(share);
                }
            }
            state if state.is_skipped() => {
                for step in &mut scenario.steps {
                    step.result = RunResult::skipped();
                }
            }
            _ => {
                let inferred = self.patterns.infer(
                    &scenario.steps,
                    scenario.background_steps,
                    record,
                );
                let Some(failed) = inferred else {
                    return;
                };
                let at = failed.index();
                for (i, step) in scenario.steps.iter_mut().enumerate() {
                    step.result = match i.cmp(&at) {
                        std::cmp::Ordering::Less => RunResult::passed(share),
                        std::cmp::Ordering::Equal => RunResult::failed(
                            total,
                            record.display_error.clone(),
                        ),
                        std::cmp::Ordering::Greater => RunResult::skipped(),
                    };
                }
                scenario.failed_step = Some(failed);
            }
        }
    }
}

/// Picks the best matching unclaimed-first record for the given scenario.
fn best_match(
    feature_uri: Option<&str>,
    scenario: &Element,
    records: &[(&str, &RunRecord)],
    claimed: &HashSet<usize>,
) -> Option<usize> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, (spec, record))| {
            matching::match_quality(scenario, record).map(|q| {
                let same_file = matching::same_source(feature_uri, spec);
                let unclaimed = !claimed.contains(&i);
                // Earlier records win ties, hence the reversed index.
                ((q, same_file, unclaimed, std::cmp::Reverse(i)), i)
            })
        })
        .max_by_key(|(key, _)| *key)
        .map(|(_, i)| i)
}
