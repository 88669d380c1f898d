// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Degraded correlation building [`Feature`]s straight from run results.

use std::path::Path;

use crate::{
    model::{Element, Feature, FailedStep, RunResult, Step},
    run::{RunRecord, RunResults, RunState, SpecRun},
};

/// Builds one [`Feature`] per spec run, with one single-step scenario per
/// [`RunRecord`].
///
/// Used when no `.feature` file could be parsed or matched, so step level
/// granularity is unavailable.
#[must_use]
pub fn synthesize(results: &RunResults) -> Vec<Feature> {
    results
        .runs
        .iter()
        .filter(|run| !run.tests.is_empty())
        .map(feature_of)
        .collect()
}

fn feature_of(run: &SpecRun) -> Feature {
    let path = (!run.spec.relative.is_empty()).then(|| Path::new(&run.spec.relative));
    let name = run
        .tests
        .iter()
        .find_map(|t| (t.title.len() > 1).then(|| t.title[0].clone()))
        .or_else(|| {
            path.and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| run.spec.name.clone());

    let mut feature = Feature::new("Feature", name, path);
    feature.elements = run
        .tests
        .iter()
        .enumerate()
        .map(|(i, record)| scenario_of(&feature.name, i, record))
        .collect();
    feature
}

fn scenario_of(feature: &str, index: usize, record: &RunRecord) -> Element {
    let mut el = Element::new(feature, "Scenario", record.test_title(), 0, index);
    if let Some(id) = &record.scenario_id {
        el.id.clone_from(id);
    }

    let duration = record.duration_ns();
    let mut step = Step::new("Then", record.title.join(" > "), 0);
    step.result = match record.state {
        RunState::Passed => RunResult::passed(duration),
        s if s.is_skipped() => RunResult::skipped(),
        _ => {
            el.failed_step = Some(FailedStep::Exact { step: 0 });
            RunResult::failed(duration, record.display_error.clone())
        }
    };
    el.steps.push(step);
    el
}
