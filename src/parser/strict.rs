// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strict [`Parser`] backed by the [`gherkin`] crate.

use std::path::Path;

use crate::{
    error::Result,
    model::{Element, Feature, Step, Tag},
    Parser,
};

/// Strict [`Parser`] implementing the full [Gherkin] grammar.
///
/// Unlike [`Basic`], fails on malformed files. [`gherkin::Rule`]s are
/// flattened into the [`Feature`], with the rule's own Background steps
/// following the feature's ones.
///
/// [`Basic`]: super::Basic
/// [Gherkin]: https://cucumber.io/docs/gherkin/reference
#[derive(Clone, Copy, Debug, Default)]
pub struct Gherkin;

impl Parser for Gherkin {
    fn parse_file(&self, path: &Path) -> Result<Option<Feature>> {
        let parsed =
            gherkin::Feature::parse_path(path, gherkin::GherkinEnv::default())?;
        Ok(Some(convert(&parsed, path)))
    }
}

fn convert(parsed: &gherkin::Feature, path: &Path) -> Feature {
    let mut feature = Feature::new(
        parsed.keyword.trim(),
        parsed.name.trim(),
        Some(parsed.path.as_deref().unwrap_or(path)),
    );
    feature.tags = tags(&parsed.tags, parsed.position.line);

    let background = parsed
        .background
        .as_ref()
        .map(|bg| steps(&bg.steps))
        .unwrap_or_default();

    let rules = parsed.rules.iter().flat_map(|rule| {
        let mut bg = background.clone();
        if let Some(own) = &rule.background {
            bg.extend(steps(&own.steps));
        }
        rule.scenarios.iter().map(move |sc| (sc, bg.clone()))
    });
    let scenarios = parsed
        .scenarios
        .iter()
        .map(|sc| (sc, background.clone()))
        .chain(rules);

    feature.elements = scenarios
        .enumerate()
        .map(|(index, (sc, bg))| {
            let mut el = Element::new(
                &feature.name,
                sc.keyword.trim(),
                sc.name.trim(),
                sc.position.line,
                index,
            );
            el.tags = tags(&sc.tags, sc.position.line);
            el.background_steps = bg.len();
            el.steps = bg;
            el.steps.extend(steps(&sc.steps));
            el
        })
        .collect();
    feature
}

fn steps(steps: &[gherkin::Step]) -> Vec<Step> {
    steps
        .iter()
        .map(|s| Step::new(s.keyword.trim(), s.value.trim(), s.position.line))
        .collect()
}

/// [`gherkin`] omits tag positions, so the line of the tagged item is used.
fn tags(tags: &[String], line: usize) -> Vec<Tag> {
    tags.iter()
        .map(|t| Tag {
            name: if t.starts_with('@') { t.clone() } else { format!("@{t}") },
            line,
        })
        .collect()
}
