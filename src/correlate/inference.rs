// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Inference of the failed step out of a free-text error message.
//!
//! Test runners report failures per test, so the step that actually failed
//! is reconstructed from the error text with a table of known error shapes.
//! Results are always an approximation and are marked as
//! [`FailedStep::Guessed`], unless the runner has reported the index itself.

use std::{str::FromStr, sync::LazyLock};

use derive_more::with_trait::Display;
use lazy_regex::regex;
use regex::{Regex, RegexBuilder};

use crate::{
    config::PatternRule,
    correlate::matching::normalize,
    error::{ConfigError, ConfigResult},
    model::{Confidence, FailedStep, Step, StepKind},
    run::RunRecord,
};

/// Rule pointing a matching error message at a step.
#[derive(Clone, Debug, Display)]
#[display("{pattern} => {locator}")]
pub struct FailurePattern {
    /// Pattern matched against the error message.
    pub pattern: Regex,

    /// Locator of the failed step.
    pub locator: StepLocator,
}

impl FailurePattern {
    /// Compiles a [`FailurePattern`] out of the given [`PatternRule`].
    ///
    /// # Errors
    ///
    /// If the pattern isn't a valid regex or the locator isn't recognized.
    pub fn compile(rule: &PatternRule) -> ConfigResult<Self> {
        let pattern = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::invalid_pattern(&rule.pattern, e.to_string()))?;
        Ok(Self { pattern, locator: rule.locate.parse()? })
    }
}

/// Way of finding the failed step within a scenario.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StepLocator {
    /// Step at a fixed index.
    #[display("index:{_0}")]
    Index(usize),

    /// The last step.
    #[display("last")]
    Last,

    /// The first step after the Background ones.
    #[display("after-background")]
    AfterBackground,

    /// The first step of the given kind (conjunctions resolved).
    #[display("first-{}", _0.to_string().to_lowercase())]
    First(StepKind),

    /// The last step whose text is quoted by the error message.
    #[display("mentioned")]
    Mentioned,
}

impl FromStr for StepLocator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Ok(match s.as_str() {
            "last" => Self::Last,
            "after-background" => Self::AfterBackground,
            "first-given" => Self::First(StepKind::Given),
            "first-when" => Self::First(StepKind::When),
            "first-then" => Self::First(StepKind::Then),
            "mentioned" => Self::Mentioned,
            other => other
                .strip_prefix("index:")
                .and_then(|n| n.trim().parse().ok())
                .map(Self::Index)
                .ok_or_else(|| ConfigError::unknown_locator(other))?,
        })
    }
}

impl StepLocator {
    /// Locates the failed step index within `steps`.
    ///
    /// Returns [`None`] if this locator doesn't apply to the given `steps`.
    #[must_use]
    pub fn locate(
        self,
        steps: &[Step],
        background_steps: usize,
        error: &str,
    ) -> Option<usize> {
        match self {
            Self::Index(i) => (i < steps.len()).then_some(i),
            Self::Last => steps.len().checked_sub(1),
            Self::AfterBackground => {
                (background_steps < steps.len()).then_some(background_steps)
            }
            Self::First(kind) => StepKind::resolve(steps)
                .iter()
                .enumerate()
                .skip(background_steps)
                .find_map(|(i, k)| (*k == kind).then_some(i)),
            Self::Mentioned => {
                let error = normalize(error);
                steps.iter().rposition(|s| {
                    let text = normalize(&s.name);
                    text.len() >= 8 && error.contains(&text)
                })
            }
        }
    }
}

/// Built-in table of known error shapes.
static BUILT_IN: LazyLock<Vec<FailurePattern>> = LazyLock::new(|| {
    vec![
        FailurePattern {
            pattern: Regex::clone(regex!(".")),
            locator: StepLocator::Mentioned,
        },
        FailurePattern {
            pattern: Regex::clone(regex!(r"(?i)expected .+ to (?:deep(?:ly)? )?equal ")),
            locator: StepLocator::AfterBackground,
        },
        FailurePattern {
            pattern: Regex::clone(regex!(
                r"(?i)timed out retrying.*(?:find|element|visible|exist)"
            )),
            locator: StepLocator::First(StepKind::Then),
        },
        FailurePattern {
            pattern: Regex::clone(regex!(
                r"(?i)expected .+ to (?:be|have|contain|include|exist)"
            )),
            locator: StepLocator::First(StepKind::Then),
        },
        FailurePattern {
            pattern: Regex::clone(regex!(
                r"(?i)(?:status code|cy\.request\(\)|econnrefused|network error)"
            )),
            locator: StepLocator::First(StepKind::When),
        },
    ]
});

/// Ordered table of [`FailurePattern`]s.
///
/// User supplied patterns are tried before the built-in ones.
#[derive(Clone, Debug, Default)]
pub struct FailurePatterns {
    custom: Vec<FailurePattern>,
}

impl FailurePatterns {
    /// Compiles [`FailurePatterns`] out of the given user `rules`.
    ///
    /// # Errors
    ///
    /// If any of the `rules` is invalid.
    pub fn new(rules: &[PatternRule]) -> ConfigResult<Self> {
        let custom = rules
            .iter()
            .map(FailurePattern::compile)
            .collect::<ConfigResult<_>>()?;
        Ok(Self { custom })
    }

    /// Iterates over all the patterns in the order they are tried.
    pub fn iter(&self) -> impl Iterator<Item = &FailurePattern> {
        self.custom.iter().chain(BUILT_IN.iter())
    }

    /// Infers the failed step of a failed scenario.
    ///
    /// Returns [`None`] only for scenarios without steps.
    #[must_use]
    pub fn infer(
        &self,
        steps: &[Step],
        background_steps: usize,
        record: &RunRecord,
    ) -> Option<FailedStep> {
        if let Some(step) = record.failed_step.filter(|i| *i < steps.len()) {
            return Some(FailedStep::Exact { step });
        }

        let error = record.display_error.as_deref().unwrap_or_default();
        if !error.is_empty() {
            let guess = self.iter().find_map(|p| {
                p.pattern
                    .is_match(error)
                    .then(|| p.locator.locate(steps, background_steps, error))
                    .flatten()
            });
            if let Some(step) = guess {
                return Some(FailedStep::Guessed {
                    step,
                    confidence: Confidence::Medium,
                });
            }
        }

        StepLocator::Last.locate(steps, background_steps, error).map(|step| {
            FailedStep::Guessed { step, confidence: Confidence::Low }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(spec: &[(&str, &str)]) -> Vec<Step> {
        spec.iter()
            .enumerate()
            .map(|(i, (kw, name))| Step::new(*kw, *name, i + 1))
            .collect()
    }

    fn failed(error: &str) -> RunRecord {
        RunRecord {
            title: vec!["Some test".into()],
            display_error: Some(error.into()),
            ..RunRecord::default()
        }
    }

    fn login_steps() -> Vec<Step> {
        steps(&[
            ("Given", "a registered user"),
            ("When", "they submit the login form"),
            ("And", "they wait"),
            ("Then", "they see the dashboard"),
            ("And", "a welcome banner"),
        ])
    }

    #[test]
    fn locator_parsing() {
        assert_eq!("last".parse::<StepLocator>().unwrap(), StepLocator::Last);
        assert_eq!(
            " First-Then ".parse::<StepLocator>().unwrap(),
            StepLocator::First(StepKind::Then),
        );
        assert_eq!("index:2".parse::<StepLocator>().unwrap(), StepLocator::Index(2));
        assert!("index:x".parse::<StepLocator>().is_err());
        assert!("middle".parse::<StepLocator>().is_err());
    }

    #[test]
    fn locator_display_round_trips() {
        for loc in [
            StepLocator::Last,
            StepLocator::AfterBackground,
            StepLocator::First(StepKind::When),
            StepLocator::Mentioned,
            StepLocator::Index(3),
        ] {
            assert_eq!(loc.to_string().parse::<StepLocator>().unwrap(), loc);
        }
    }

    #[test]
    fn equality_assertion_points_after_background() {
        let steps = steps(&[
            ("Given", "the app is open"),
            ("When", "they count"),
            ("Then", "the count is right"),
        ]);
        let inferred = FailurePatterns::default()
            .infer(&steps, 1, &failed("AssertionError: expected 1 to equal 2"));

        assert_eq!(
            inferred,
            Some(FailedStep::Guessed { step: 1, confidence: Confidence::Medium }),
        );
    }

    #[test]
    fn element_timeout_points_at_first_then() {
        let inferred = FailurePatterns::default().infer(
            &login_steps(),
            0,
            &failed("Timed out retrying after 4000ms: Expected to find element: `#dashboard`"),
        );

        assert_eq!(inferred.map(|f| f.index()), Some(3));
    }

    #[test]
    fn network_error_points_at_first_when() {
        let inferred = FailurePatterns::default().infer(
            &login_steps(),
            0,
            &failed("cy.request() failed: status code 500"),
        );

        assert_eq!(inferred.map(|f| f.index()), Some(1));
    }

    #[test]
    fn mentioned_step_wins() {
        let inferred = FailurePatterns::default().infer(
            &login_steps(),
            0,
            &failed("Step failed: \"they submit the login form\" expected 1 to equal 2"),
        );

        assert_eq!(inferred.map(|f| f.index()), Some(1));
    }

    #[test]
    fn unknown_error_defaults_to_last_step_with_low_confidence() {
        let inferred =
            FailurePatterns::default().infer(&login_steps(), 0, &failed("kaboom"));

        assert_eq!(
            inferred,
            Some(FailedStep::Guessed { step: 4, confidence: Confidence::Low }),
        );
    }

    #[test]
    fn runner_reported_index_is_exact() {
        let mut record = failed("kaboom");
        record.failed_step = Some(2);

        assert_eq!(
            FailurePatterns::default().infer(&login_steps(), 0, &record),
            Some(FailedStep::Exact { step: 2 }),
        );

        record.failed_step = Some(42);
        assert!(FailurePatterns::default()
            .infer(&login_steps(), 0, &record)
            .is_some_and(|f| f.is_guessed()));
    }

    #[test]
    fn custom_patterns_are_tried_first() {
        let patterns = FailurePatterns::new(&[PatternRule {
            pattern: "EXPECTED 1".into(),
            locate: "first-given".into(),
        }])
        .unwrap();

        let inferred =
            patterns.infer(&login_steps(), 0, &failed("expected 1 to equal 2"));
        assert_eq!(inferred.map(|f| f.index()), Some(0));
    }

    #[test]
    fn invalid_custom_pattern_is_rejected() {
        let err = FailurePatterns::new(&[PatternRule {
            pattern: "(".into(),
            locate: "last".into(),
        }])
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn no_steps_no_inference() {
        assert!(FailurePatterns::default().infer(&[], 0, &failed("x")).is_none());
    }
}
