// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for parsing [Gherkin] files.
//!
//! [Gherkin]: https://cucumber.io/docs/gherkin/reference

pub mod basic;
pub mod strict;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{config::ParserKind, error::Result, model::Feature};

#[doc(inline)]
pub use self::{basic::Basic, strict::Gherkin};

/// Source of parsed [`Feature`]s.
pub trait Parser {
    /// Parses a single `.feature` file.
    ///
    /// Returns [`None`] if the file doesn't describe a [`Feature`] at all.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, or (for strict parsers) is malformed.
    fn parse_file(&self, path: &Path) -> Result<Option<Feature>>;
}

impl ParserKind {
    /// Returns the [`Parser`] of this kind.
    #[must_use]
    pub fn parser(self) -> &'static dyn Parser {
        match self {
            Self::Lenient => &Basic,
            Self::Gherkin => &Gherkin,
        }
    }
}

/// Finds all the `.feature` files under the given `path`, in sorted order.
///
/// If `path` is a file, it's returned as is. A missing `path` gives no files.
///
/// # Errors
///
/// If the directory cannot be walked.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_owned()]);
    }
    if !path.is_dir() {
        warn!(path = %path.display(), "features directory doesn't exist");
        return Ok(vec![]);
    }

    let walker = globwalk::GlobWalkerBuilder::new(path, "*.feature")
        .case_insensitive(true)
        .build()?;
    let mut files: Vec<_> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Parses all the `.feature` files under the given `path` with the given
/// [`Parser`].
///
/// Files failing to parse are logged and skipped.
///
/// # Errors
///
/// If the directory cannot be walked.
pub fn parse_all(parser: &dyn Parser, path: &Path) -> Result<Vec<Feature>> {
    let features = discover(path)?
        .into_iter()
        .filter_map(|file| match parser.parse_file(&file) {
            Ok(Some(feature)) => {
                debug!(
                    file = %file.display(),
                    scenarios = feature.elements.len(),
                    "parsed feature",
                );
                Some(feature)
            }
            Ok(None) => {
                warn!(file = %file.display(), "no `Feature:` line found");
                None
            }
            Err(e) => {
                warn!(file = %file.display(), "skipping feature file: {e}");
                None
            }
        })
        .collect();
    Ok(features)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn discovers_nested_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/z.feature"), "").unwrap();
        fs::write(dir.path().join("a.FEATURE"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            [PathBuf::from("a.FEATURE"), PathBuf::from("b/nested/z.feature")],
        );
    }

    #[test]
    fn missing_directory_gives_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn parse_all_skips_files_without_feature() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ok.feature"),
            "Feature: Ok\nScenario: S\nGiven x\n",
        )
        .unwrap();
        fs::write(dir.path().join("empty.feature"), "# nothing\n").unwrap();

        let features = parse_all(&Basic, dir.path()).unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Ok");
    }

    #[test]
    fn strict_parser_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.feature"), "Given orphan step\n").unwrap();
        fs::write(
            dir.path().join("good.feature"),
            "Feature: Good\n  Scenario: S\n    Given x\n",
        )
        .unwrap();

        let features = parse_all(ParserKind::Gherkin.parser(), dir.path()).unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "Good");
    }
}
