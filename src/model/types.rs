// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Basic serializable types of the intermediate report JSON.

use derive_more::with_trait::Display;
use serde::{Deserialize, Serialize};

/// Placeholder duration assigned to every freshly parsed [`Step`], until a
/// run record says otherwise.
pub const PLACEHOLDER_DURATION: u64 = 1_000_000;

/// Possible statuses of an executed [`Step`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Step has been executed successfully.
    #[display("passed")]
    Passed,

    /// Step has failed.
    #[display("failed")]
    Failed,

    /// Step hasn't been executed.
    #[display("skipped")]
    Skipped,

    /// Step has no matching definition.
    #[display("undefined")]
    Undefined,
}

/// Result of running a [`Step`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RunResult {
    /// [`Status`] of this running result.
    pub status: Status,

    /// Execution time in nanoseconds.
    pub duration: u64,

    /// Error message of a [`Status::Failed`] step (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunResult {
    /// Placeholder [`RunResult`] of a step nothing is known about yet.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            status: Status::Passed,
            duration: PLACEHOLDER_DURATION,
            error_message: None,
        }
    }

    /// Creates a [`Status::Passed`] result lasting `duration` nanoseconds.
    #[must_use]
    pub const fn passed(duration: u64) -> Self {
        Self { status: Status::Passed, duration, error_message: None }
    }

    /// Creates a zero-length [`Status::Skipped`] result.
    #[must_use]
    pub const fn skipped() -> Self {
        Self { status: Status::Skipped, duration: 0, error_message: None }
    }

    /// Creates a [`Status::Failed`] result.
    #[must_use]
    pub const fn failed(duration: u64, error: Option<String>) -> Self {
        Self { status: Status::Failed, duration, error_message: error }
    }
}

impl Default for RunResult {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Tag of a [`Feature`] or an [`Element`].
///
/// [`Element`]: super::Element
/// [`Feature`]: super::Feature
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tag {
    /// Name of this [`Tag`], including the leading `@`.
    pub name: String,

    /// Line number of this [`Tag`] in a `.feature` file.
    pub line: usize,
}

/// Single step of a scenario.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Step {
    /// Keyword the step is written with (`Given`, `When`, `Then`, `And`,
    /// `But` or `*`).
    pub keyword: String,

    /// Step line number in a `.feature` file.
    pub line: usize,

    /// Free text of the step.
    pub name: String,

    /// [`RunResult`] of this [`Step`].
    pub result: RunResult,
}

impl Step {
    /// Creates a new [`Step`] with a [`RunResult::placeholder()`].
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        name: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            line,
            name: name.into(),
            result: RunResult::placeholder(),
        }
    }

    /// Returns [`StepKind`] of this [`Step`]'s own keyword.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        StepKind::from_keyword(&self.keyword)
    }
}

/// Kind of a step keyword.
///
/// Conjunctions (`And`, `But`, `*`) take the kind of the closest preceding
/// primary keyword, see [`StepKind::resolve()`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StepKind {
    /// `Given` step.
    Given,

    /// `When` step.
    When,

    /// `Then` step.
    Then,

    /// `And`, `But` or `*`.
    Conjunction,
}

impl StepKind {
    /// Parses a [`StepKind`] out of the given keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            k if k.eq_ignore_ascii_case("given") => Self::Given,
            k if k.eq_ignore_ascii_case("when") => Self::When,
            k if k.eq_ignore_ascii_case("then") => Self::Then,
            _ => Self::Conjunction,
        }
    }

    /// Resolves effective kinds of all the given `steps`.
    ///
    /// Leading conjunctions are treated as [`StepKind::Given`].
    #[must_use]
    pub fn resolve(steps: &[Step]) -> Vec<Self> {
        steps
            .iter()
            .scan(Self::Given, |last, step| {
                match step.kind() {
                    Self::Conjunction => {}
                    kind => *last = kind,
                }
                Some(*last)
            })
            .collect()
    }
}

/// How sure the correlation is about a [`FailedStep::Guessed`] index.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Some known error pattern pointed at the step.
    #[display("medium")]
    Medium,

    /// Nothing pointed at the step, the last one was picked.
    #[display("low")]
    Low,
}

/// Index of the step considered failed within a failed scenario.
///
/// Test runners report failures per test, not per step, so in most cases the
/// index is an approximation and is marked as [`FailedStep::Guessed`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FailedStep {
    /// Index reported by the runner itself.
    Exact {
        /// Index of the failed step.
        step: usize,
    },

    /// Index inferred from the error message.
    Guessed {
        /// Index of the failed step.
        step: usize,

        /// [`Confidence`] of the guess.
        confidence: Confidence,
    },
}

impl FailedStep {
    /// Index of the failed step.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Exact { step } | Self::Guessed { step, .. } => *step,
        }
    }

    /// Indicates whether this index is an approximation.
    #[must_use]
    pub const fn is_guessed(&self) -> bool {
        matches!(self, Self::Guessed { .. })
    }
}
