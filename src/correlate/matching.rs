// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Name based matching of scenarios against run records.

use std::path::Path;

use itertools::Itertools as _;

use crate::{model::Element, run::RunRecord};

/// Lowercases `text`, turns every non-alphanumeric character into a space
/// and collapses whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

/// Indicates whether a feature file and a spec file of a test run are the
/// same file, by comparing their file stems.
#[must_use]
pub fn same_source(feature_uri: Option<&str>, spec: &str) -> bool {
    let stem = |p: &str| {
        Path::new(p)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
    };
    match (feature_uri.and_then(stem), stem(spec)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Quality of a scenario to [`RunRecord`] match. Greater is better.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum MatchQuality {
    /// Scenario name and test title contain one another.
    Contains,

    /// Scenario name equals the test title, ignoring case and punctuation.
    Exact,

    /// [`RunRecord::scenario_id`] equals [`Element::id`].
    Id,
}

/// Scores how well the given [`RunRecord`] matches the given scenario.
///
/// Returns [`None`] if they don't match at all.
#[must_use]
pub fn match_quality(scenario: &Element, record: &RunRecord) -> Option<MatchQuality> {
    if record.scenario_id.as_deref() == Some(scenario.id.as_str()) {
        return Some(MatchQuality::Id);
    }

    let name = normalize(&scenario.name);
    if name.is_empty() {
        return None;
    }
    let title = normalize(record.test_title());
    if title == name {
        return Some(MatchQuality::Exact);
    }
    let contained = (!title.is_empty() && (title.contains(&name) || name.contains(&title)))
        || normalize(&record.title.join(" ")).contains(&name);
    contained.then_some(MatchQuality::Contains)
}
