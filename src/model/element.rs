// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scenario structure of the intermediate report JSON.

use inflector::Inflector as _;
use serde::{Deserialize, Serialize};

use crate::model::types::{FailedStep, Status, Step, Tag};

/// Scenario of a [`Feature`], with Background steps already prepended.
///
/// [`Feature`]: super::Feature
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Element {
    /// Keyword the scenario is written with.
    pub keyword: String,

    /// Type of this [`Element`]. Always `scenario` at the moment.
    pub r#type: String,

    /// Deterministic identifier of this [`Element`], derived from the
    /// feature name, scenario name and scenario position in its file.
    pub id: String,

    /// Scenario line number inside a `.feature` file.
    pub line: usize,

    /// Free text name of the scenario.
    pub name: String,

    /// Tags of the scenario.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// [`Step`]s of the scenario, in source order.
    pub steps: Vec<Step>,

    /// Number of leading [`Element::steps`] coming from a Background.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub background_steps: usize,

    /// Which step has failed, if the scenario failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FailedStep>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // required by `serde`
const fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Element {
    /// Creates a new [`Element`] without steps.
    ///
    /// `index` is the position of the scenario inside its feature file and
    /// makes [`Element::id`] unique for scenarios sharing the same name.
    #[must_use]
    pub fn new(
        feature_name: &str,
        keyword: impl Into<String>,
        name: impl Into<String>,
        line: usize,
        index: usize,
    ) -> Self {
        let name = name.into();
        Self {
            keyword: keyword.into(),
            r#type: "scenario".into(),
            id: format!(
                "{}/{}-{}",
                feature_name.to_kebab_case(),
                name.to_kebab_case(),
                index + 1,
            ),
            line,
            name,
            tags: vec![],
            steps: vec![],
            background_steps: 0,
            failed_step: None,
        }
    }

    /// Returns the aggregate [`Status`] of this scenario.
    ///
    /// [`Status::Failed`] dominates [`Status::Skipped`], which dominates
    /// [`Status::Passed`]. [`Status::Undefined`] steps count as skipped.
    #[must_use]
    pub fn status(&self) -> Status {
        self.steps.iter().fold(Status::Passed, |acc, step| {
            match (acc, step.result.status) {
                (Status::Failed, _) | (_, Status::Failed) => Status::Failed,
                (Status::Skipped, _)
                | (_, Status::Skipped | Status::Undefined) => Status::Skipped,
                _ => Status::Passed,
            }
        })
    }

    /// Returns the total duration of all the steps, in nanoseconds.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.steps.iter().map(|s| s.result.duration).sum()
    }

    /// Returns the error message of the first failed step, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.steps
            .iter()
            .find_map(|s| s.result.error_message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::RunResult;

    fn element_with(statuses: &[Status]) -> Element {
        let mut el = Element::new("Feature", "Scenario", "Some scenario", 4, 0);
        el.steps = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Step {
                keyword: "Given".into(),
                line: 5 + i,
                name: format!("step {i}"),
                result: RunResult {
                    status: *status,
                    duration: 10,
                    error_message: None,
                },
            })
            .collect();
        el
    }

    #[test]
    fn id_is_kebab_cased_and_positional() {
        let el = Element::new("User Login", "Scenario", "Login Test", 7, 2);

        assert_eq!(el.id, "user-login/login-test-3");
        assert_eq!(el.r#type, "scenario");
        assert_eq!(el.line, 7);
    }

    #[test]
    fn empty_scenario_is_passed() {
        assert_eq!(element_with(&[]).status(), Status::Passed);
    }

    #[test]
    fn failed_dominates_skipped() {
        let el =
            element_with(&[Status::Passed, Status::Failed, Status::Skipped]);
        assert_eq!(el.status(), Status::Failed);
    }

    #[test]
    fn skipped_dominates_passed() {
        assert_eq!(
            element_with(&[Status::Passed, Status::Skipped]).status(),
            Status::Skipped,
        );
        assert_eq!(
            element_with(&[Status::Undefined, Status::Passed]).status(),
            Status::Skipped,
        );
    }

    #[test]
    fn duration_sums_steps() {
        let el = element_with(&[Status::Passed, Status::Passed, Status::Passed]);
        assert_eq!(el.duration(), 30);
    }

    #[test]
    fn background_count_is_omitted_when_zero() {
        let json = serde_json::to_value(element_with(&[])).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("background_steps"));
        assert!(!obj.contains_key("failed_step"));
        assert_eq!(json["type"], "scenario");
    }
}
