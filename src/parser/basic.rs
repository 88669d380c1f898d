// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default line based [`Parser`].

use std::{fs, mem, path::Path};

use crate::{
    error::{IoResultExt as _, Result},
    model::{Element, Feature, Step, Tag},
    Parser,
};

/// Keywords opening a scenario.
const SCENARIO_KEYWORDS: &[&str] =
    &["Scenario Outline", "Scenario Template", "Scenario", "Example"];

/// Keywords opening a step. Matched together with the following space.
const STEP_KEYWORDS: &[&str] = &["Given", "When", "Then", "And", "But", "*"];

/// Default [`Parser`].
///
/// Reads a file line by line and recognizes only `Feature:`, `Background:`,
/// scenario headings, step keywords and tag lines. Everything else is
/// ignored, so malformed files produce partial [`Feature`]s instead of
/// errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Basic;

impl Parser for Basic {
    fn parse_file(&self, path: &Path) -> Result<Option<Feature>> {
        let contents = fs::read_to_string(path).with_path(path)?;
        Ok(self.parse_str(&contents, Some(path)))
    }
}

impl Basic {
    /// Parses the given `.feature` file `contents`.
    ///
    /// Returns [`None`] if no `Feature:` line was found.
    #[must_use]
    pub fn parse_str(
        &self,
        contents: &str,
        path: Option<&Path>,
    ) -> Option<Feature> {
        let mut state = State::default();
        for (n, line) in contents.lines().enumerate() {
            state.line(n + 1, line.trim(), path);
        }
        state.finish()
    }
}

/// What the following step lines belong to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Section {
    /// Nothing yet, step lines are ignored.
    #[default]
    None,

    /// `Background:` block.
    Background,

    /// Scenario block.
    Scenario,
}

/// Parsing state of a single file.
#[derive(Debug, Default)]
struct State {
    feature: Option<Feature>,
    section: Section,
    background: Vec<Step>,
    pending_tags: Vec<Tag>,
    docstring: Option<&'static str>,
    scenarios: usize,
}

impl State {
    fn line(&mut self, n: usize, line: &str, path: Option<&Path>) {
        if let Some(fence) = self.docstring {
            if line.starts_with(fence) {
                self.docstring = None;
            }
            return;
        }
        if let Some(fence) = ["\"\"\"", "```"].into_iter().find(|f| line.starts_with(f)) {
            self.docstring = Some(fence);
            return;
        }
        if line.is_empty() || line.starts_with('#') || line.starts_with('|') {
            return;
        }

        if line.starts_with('@') {
            self.pending_tags.extend(
                line.split_whitespace()
                    .take_while(|t| !t.starts_with('#'))
                    .filter(|t| t.starts_with('@'))
                    .map(|t| Tag { name: t.to_owned(), line: n }),
            );
        } else if let Some(name) = heading(line, "Feature") {
            let mut feature = Feature::new("Feature", name, path);
            feature.tags = mem::take(&mut self.pending_tags);
            self.feature = Some(feature);
            self.section = Section::None;
        } else if heading(line, "Background").is_some() {
            self.background.clear();
            self.section = Section::Background;
        } else if let Some((keyword, name)) = SCENARIO_KEYWORDS
            .iter()
            .find_map(|kw| heading(line, kw).map(|name| (*kw, name)))
        {
            self.scenario(keyword, name, n);
        } else if let Some((keyword, text)) = step(line) {
            let step = Step::new(keyword, text, n);
            match self.section {
                Section::Background => self.background.push(step),
                Section::Scenario => {
                    if let Some(el) = self.current_scenario() {
                        el.steps.push(step);
                    }
                }
                Section::None => {}
            }
        }
    }

    fn scenario(&mut self, keyword: &str, name: &str, n: usize) {
        let tags = mem::take(&mut self.pending_tags);
        let Some(feature) = self.feature.as_mut() else {
            return;
        };

        let mut el = Element::new(&feature.name, keyword, name, n, self.scenarios);
        el.tags = tags;
        el.steps.clone_from(&self.background);
        el.background_steps = self.background.len();
        feature.elements.push(el);

        self.scenarios += 1;
        self.section = Section::Scenario;
    }

    fn current_scenario(&mut self) -> Option<&mut Element> {
        self.feature.as_mut().and_then(|f| f.elements.last_mut())
    }

    fn finish(self) -> Option<Feature> {
        self.feature
    }
}

/// Strips a `keyword:` heading prefix, returning the trimmed rest.
fn heading<'l>(line: &'l str, keyword: &str) -> Option<&'l str> {
    line.strip_prefix(keyword)
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
        .map(str::trim)
}

/// Splits a step line into its keyword and text.
fn step(line: &str) -> Option<(&'static str, &str)> {
    STEP_KEYWORDS.iter().find_map(|&kw| {
        line.strip_prefix(kw)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map(|rest| (kw, rest.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, PLACEHOLDER_DURATION};

    fn parse(src: &str) -> Option<Feature> {
        Basic.parse_str(src, Some(Path::new("features/login.feature")))
    }

    #[test]
    fn steps_are_kept_in_source_order() {
        let feature = parse(
            "Feature: Login\n\
             \n\
             Scenario: Valid credentials\n\
             \x20 Given a registered user\n\
             \x20 When they log in\n\
             \x20 And they wait\n\
             \x20 But nothing breaks\n\
             \x20 Then they see the dashboard\n",
        )
        .unwrap();

        assert_eq!(feature.name, "Login");
        assert_eq!(feature.uri.as_deref(), Some("features/login.feature"));
        let sc = &feature.elements[0];
        assert_eq!(sc.name, "Valid credentials");
        let names: Vec<_> = sc.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "a registered user",
                "they log in",
                "they wait",
                "nothing breaks",
                "they see the dashboard",
            ],
        );
        assert_eq!(sc.steps[1].keyword, "When");
        assert_eq!(sc.steps[1].line, 5);
    }

    #[test]
    fn steps_default_to_passed_placeholder() {
        let feature =
            parse("Feature: F\nScenario: S\nGiven one\nThen two\n").unwrap();

        for step in &feature.elements[0].steps {
            assert_eq!(step.result.status, Status::Passed);
            assert_eq!(step.result.duration, PLACEHOLDER_DURATION);
            assert!(step.result.error_message.is_none());
        }
    }

    #[test]
    fn background_is_prepended_to_following_scenarios() {
        let feature = parse(
            "Feature: Cart\n\
             Scenario: Before background\n\
             Given nothing\n\
             Background:\n\
             Given a logged in user\n\
             Scenario: First\n\
             When they add an item\n\
             Scenario: Second\n\
             When they remove an item\n\
             Then the cart is empty\n",
        )
        .unwrap();

        let [before, first, second] = feature.elements.as_slice() else {
            panic!("expected 3 scenarios");
        };
        assert_eq!(before.steps.len(), 1);
        assert_eq!(before.background_steps, 0);

        assert_eq!(first.steps.len(), 2);
        assert_eq!(first.steps[0].name, "a logged in user");
        assert_eq!(first.background_steps, 1);

        assert_eq!(second.steps.len(), 3);
        assert_eq!(second.steps[0].name, "a logged in user");
        assert_eq!(second.steps[2].name, "the cart is empty");
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let feature = parse(
            "# comment\n\
             Feature: Search\n\
             \x20 As a user I want to search\n\
             Scenario Outline: Searching <term>\n\
             Given the term \"<term>\"\n\
             \"\"\"\n\
             Given not a step\n\
             \"\"\"\n\
             Examples:\n\
             | term |\n\
             | rust |\n\
             Whatever this is\n",
        )
        .unwrap();

        let sc = &feature.elements[0];
        assert_eq!(sc.keyword, "Scenario Outline");
        assert_eq!(sc.steps.len(), 1);
    }

    #[test]
    fn no_feature_line_gives_none() {
        assert!(parse("Scenario: orphan\nGiven something\n").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn tags_are_attached() {
        let feature = parse(
            "@web @smoke\n\
             Feature: Tagged\n\
             @slow # trailing comment\n\
             Scenario: Tagged scenario\n\
             Given a step\n",
        )
        .unwrap();

        let tags: Vec<_> = feature.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, ["@web", "@smoke"]);
        assert_eq!(feature.elements[0].tags[0].name, "@slow");
        assert_eq!(feature.elements[0].tags[0].line, 3);
    }

    #[test]
    fn scenario_ids_are_unique_per_position() {
        let feature = parse(
            "Feature: Dupes\nScenario: Same\nGiven a\nScenario: Same\nGiven b\n",
        )
        .unwrap();

        assert_eq!(feature.elements[0].id, "dupes/same-1");
        assert_eq!(feature.elements[1].id, "dupes/same-2");
    }

    #[test]
    fn steps_before_any_scenario_are_ignored() {
        let feature = parse("Feature: F\nGiven stray\nScenario: S\n").unwrap();
        assert!(feature.elements[0].steps.is_empty());
    }
}
