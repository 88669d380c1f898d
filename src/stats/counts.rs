// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-[`Status`] counters.

use std::ops::AddAssign;

use serde::Serialize;

use crate::model::Status;

/// Counts of [`Step`]s (or scenarios) by their [`Status`].
///
/// [`Step`]: crate::model::Step
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Stats {
    /// Number of passed [`Step`]s (or scenarios).
    ///
    /// [`Step`]: crate::model::Step
    pub passed: usize,

    /// Number of skipped [`Step`]s (or scenarios).
    ///
    /// [`Step`]: crate::model::Step
    pub skipped: usize,

    /// Number of failed [`Step`]s (or scenarios).
    ///
    /// [`Step`]: crate::model::Step
    pub failed: usize,

    /// Number of undefined [`Step`]s. Always zero for scenarios, as those
    /// count undefined steps as skipped.
    ///
    /// [`Step`]: crate::model::Step
    pub undefined: usize,
}

impl Stats {
    /// Creates new [`Stats`] with all counts set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { passed: 0, skipped: 0, failed: 0, undefined: 0 }
    }

    /// Returns total number of [`Step`]s (or scenarios), these [`Stats`]
    /// have been collected for.
    ///
    /// [`Step`]: crate::model::Step
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.skipped + self.failed + self.undefined
    }

    /// Counts one more item of the given [`Status`].
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Failed => self.failed += 1,
            Status::Undefined => self.undefined += 1,
        }
    }

    /// Percentage of passed items, rounded half up. Zero when empty.
    #[must_use]
    pub const fn pass_rate(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let total = self.total();
        (self.passed * 200 + total) / (total * 2)
    }

    /// Returns `true` if all counts are zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Returns `true` if there are any failed items.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
        self.undefined += rhs.undefined;
    }
}

impl FromIterator<Status> for Stats {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut stats = Self::new();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}
