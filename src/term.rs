// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal summary of a generated report.

use std::{borrow::Cow, path::Path, str::FromStr};

use console::Style;
use derive_more::with_trait::Display;
use itertools::Itertools as _;

use crate::{
    html::human_duration,
    stats::{Statistics, Stats},
};

/// Possible policies of a [`console`] output coloring.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Coloring {
    /// Letting [`console::colors_enabled()`] to decide, whether output should
    /// be colored.
    #[default]
    #[display("auto")]
    Auto,

    /// Forcing of a colored output.
    #[display("always")]
    Always,

    /// Forcing of a non-colored output.
    #[display("never")]
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

/// [`Style`]s for terminal output.
#[derive(Clone, Debug)]
pub struct Styles {
    /// [`Style`] for rendering passed counts.
    pub ok: Style,

    /// [`Style`] for rendering skipped counts.
    pub skipped: Style,

    /// [`Style`] for rendering failures.
    pub err: Style,

    /// [`Style`] for rendering header.
    pub header: Style,

    /// [`Style`] for rendering __bold__.
    pub bold: Style,

    /// Indicates whether the terminal was detected.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            ok: Style::new().green(),
            skipped: Style::new().cyan(),
            err: Style::new().red(),
            header: Style::new().blue(),
            bold: Style::new().bold(),
            is_present: console::user_attended() && console::colors_enabled(),
        }
    }
}

impl Styles {
    /// Creates new [`Styles`] following the given [`Coloring`] policy.
    #[must_use]
    pub fn new(coloring: Coloring) -> Self {
        let mut styles = Self::default();
        styles.apply_coloring(coloring);
        styles
    }

    /// Applies the given [`Coloring`] policy.
    pub fn apply_coloring(&mut self, coloring: Coloring) {
        match coloring {
            Coloring::Auto => {}
            Coloring::Always => {
                self.is_present = true;
                self.force_styling(true);
            }
            Coloring::Never => self.is_present = false,
        }
    }

    fn force_styling(&mut self, force: bool) {
        for style in [
            &mut self.ok,
            &mut self.skipped,
            &mut self.err,
            &mut self.header,
            &mut self.bold,
        ] {
            *style = style.clone().force_styling(force);
        }
    }

    /// If terminal is present colors `input` with [`Styles::ok`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn ok<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.ok, input)
    }

    /// If terminal is present colors `input` with [`Styles::skipped`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn skipped<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.skipped, input)
    }

    /// If terminal is present colors `input` with [`Styles::err`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn err<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.err, input)
    }

    /// If terminal is present colors `input` with [`Styles::header`] color or
    /// leaves "as is" otherwise.
    #[must_use]
    pub fn header<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.header, input)
    }

    /// If terminal is present makes `input` __bold__ or leaves "as is"
    /// otherwise.
    #[must_use]
    pub fn bold<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.paint(&self.bold, input)
    }

    fn paint<'a>(&self, style: &Style, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        if self.is_present {
            style.apply_to(input.into()).to_string().into()
        } else {
            input.into()
        }
    }

    /// Formats [`Stats`] as a colored `(1 passed, 2 failed)` suffix.
    ///
    /// Returns an empty string if all counts are zero.
    #[must_use]
    pub fn format_stats(&self, stats: Stats) -> Cow<'static, str> {
        let skipped = stats.skipped + stats.undefined;
        let formatted = [
            (stats.passed > 0)
                .then(|| self.bold(self.ok(format!("{} passed", stats.passed)))),
            (skipped > 0).then(|| self.bold(self.skipped(format!("{skipped} skipped")))),
            (stats.failed > 0)
                .then(|| self.bold(self.err(format!("{} failed", stats.failed)))),
        ]
        .into_iter()
        .flatten()
        .join(&self.bold(", "));

        if formatted.is_empty() {
            "".into()
        } else {
            format!(" {}{formatted}{}", self.bold("("), self.bold(")")).into()
        }
    }

    /// Adds plural suffix to a word based on the given count.
    #[must_use]
    pub fn maybe_plural(
        &self,
        singular: impl Into<Cow<'static, str>>,
        num: usize,
    ) -> Cow<'static, str> {
        self.bold(format!(
            "{num} {}{}",
            singular.into(),
            if num == 1 { "" } else { "s" },
        ))
    }

    /// Renders the [`Summary`] of a report generation.
    #[must_use]
    pub fn summary(&self, summary: &Summary<'_>) -> String {
        let stats = summary.statistics;
        let features = self.maybe_plural("feature", stats.features);
        let scenarios = self.maybe_plural("scenario", stats.scenarios.total());
        let scenarios_stats = self.format_stats(stats.scenarios);
        let steps = self.maybe_plural("step", stats.steps.total());
        let steps_stats = self.format_stats(stats.steps);

        let rate = format!("{}%", stats.pass_rate);
        let rate = if stats.scenarios.has_failures() {
            self.err(rate)
        } else {
            self.ok(rate)
        };

        let unmatched = if summary.unmatched > 0 {
            format!(
                "\n{}",
                self.skipped(format!(
                    "{} without run results",
                    self.maybe_plural("scenario", summary.unmatched),
                )),
            )
        } else {
            String::new()
        };
        let report = summary.report.map_or_else(String::new, |p| {
            format!("\n{} {}", self.bold("Report:"), p.display())
        });

        format!(
            "{header}\n{features}\n{scenarios}{scenarios_stats}\n\
             {steps}{steps_stats}\n{pass} {rate}\n{duration} {elapsed}\
             {unmatched}{report}",
            header = self.bold(self.header("[Summary]")),
            pass = self.bold("Pass rate:"),
            duration = self.bold("Duration:"),
            elapsed = human_duration(stats.duration),
        )
    }
}

/// Everything the terminal summary shows.
#[derive(Clone, Copy, Debug)]
pub struct Summary<'a> {
    /// Statistics of the report.
    pub statistics: &'a Statistics,

    /// Number of scenarios no run result has been found for.
    pub unmatched: usize,

    /// Location of the rendered report, if any.
    pub report: Option<&'a Path>,
}
