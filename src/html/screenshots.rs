// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Failure screenshots discovery, matching and publishing.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use base64::Engine as _;
use lazy_regex::regex_replace_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::correlate::matching::normalize;

/// Directory inside the HTML report screenshots are copied to.
pub const DIR: &str = "screenshots";

/// Screenshot found on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Screenshot {
    /// Original location of the file.
    pub source: PathBuf,

    /// Cleaned file stem the scenario names are matched against.
    pub key: String,
}

impl Screenshot {
    /// Creates a new [`Screenshot`] of the given file.
    #[must_use]
    pub fn new(source: PathBuf) -> Self {
        let key = source
            .file_stem()
            .and_then(|s| s.to_str())
            .map(clean_stem)
            .unwrap_or_default();
        Self { source, key }
    }

    /// Indicates whether this [`Screenshot`] belongs to the scenario with the
    /// given name.
    #[must_use]
    ///
    /// The cleaned file stem has to contain the whole scenario name. Runners
    /// cut long file names short, so a key of at least
    /// [`MIN_TRUNCATED_KEY`] chars may also be a prefix of the name.
    #[must_use]
    pub fn matches(&self, scenario_name: &str) -> bool {
        let name = normalize(scenario_name);
        if name.is_empty() || self.key.is_empty() {
            return false;
        }
        contains_words(&self.key, &name)
            || (self.key.len() >= MIN_TRUNCATED_KEY && name.starts_with(&self.key))
    }
}

/// Shortest cleaned file stem considered a truncated scenario name.
pub const MIN_TRUNCATED_KEY: usize = 24;

/// Indicates whether `words` occur in `text` as whole words.
fn contains_words(text: &str, words: &str) -> bool {
    format!(" {text} ").contains(&format!(" {words} "))
}

/// Screenshot attached to a scenario in the rendered report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attachment {
    /// Display name.
    pub name: String,

    /// Link relative to the report, or a `data:` URI.
    pub src: String,
}

/// All the screenshots of a run, publishing each of them at most once.
#[derive(Debug, Default)]
pub struct Screenshots {
    found: Vec<Screenshot>,
    used_names: HashSet<String>,
    published: Vec<(usize, Attachment)>,
}

impl Screenshots {
    /// Discovers `*.png` files under `dir`, recursively.
    ///
    /// A missing directory gives no screenshots.
    #[must_use]
    pub fn discover(dir: &Path) -> Self {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no screenshots directory");
            return Self::default();
        }
        let walker = match globwalk::GlobWalkerBuilder::new(dir, "*.png")
            .case_insensitive(true)
            .build()
        {
            Ok(w) => w,
            Err(e) => {
                warn!(dir = %dir.display(), "cannot walk screenshots: {e}");
                return Self::default();
            }
        };
        let mut found: Vec<_> = walker
            .filter_map(|entry| {
                entry
                    .map_err(|e| warn!("skipping screenshot entry: {e}"))
                    .ok()
            })
            .map(|e| e.into_path())
            .collect();
        found.sort();
        Self::from_paths(found)
    }

    /// Creates [`Screenshots`] out of already known files.
    #[must_use]
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            found: paths.into_iter().map(Screenshot::new).collect(),
            ..Self::default()
        }
    }

    /// Number of discovered screenshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.found.len()
    }

    /// Indicates whether no screenshots were discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Number of screenshots attached to the report so far.
    #[must_use]
    pub fn published(&self) -> usize {
        self.published.len()
    }

    /// Publishes screenshots of the failed scenario with the given name into
    /// the `out` report directory and returns them as [`Attachment`]s.
    ///
    /// Screenshots failing to copy are logged and skipped.
    pub fn attach(
        &mut self,
        scenario_name: &str,
        out: &Path,
        embed: bool,
    ) -> Vec<Attachment> {
        let matching: Vec<_> = self
            .found
            .iter()
            .enumerate()
            .filter(|(_, s)| s.matches(scenario_name))
            .map(|(i, _)| i)
            .collect();

        matching
            .into_iter()
            .filter_map(|i| {
                if let Some((_, a)) = self.published.iter().find(|(j, _)| *j == i) {
                    return Some(a.clone());
                }
                let attachment = self.publish(i, out, embed)?;
                self.published.push((i, attachment.clone()));
                Some(attachment)
            })
            .collect()
    }

    fn publish(&mut self, i: usize, out: &Path, embed: bool) -> Option<Attachment> {
        let source = &self.found[i].source;
        let original = source.file_name()?.to_string_lossy().into_owned();

        if embed {
            return data_uri(source).map(|src| Attachment { name: original, src });
        }

        let mut name = sanitize(&original);
        if !self.used_names.insert(name.clone()) {
            name = format!("{i}-{name}");
            _ = self.used_names.insert(name.clone());
        }
        let target = out.join(DIR).join(&name);
        if let Err(e) = fs::copy(source, &target) {
            warn!(
                from = %source.display(),
                to = %target.display(),
                "cannot copy screenshot: {e}",
            );
            return None;
        }
        Some(Attachment { name: original, src: format!("{DIR}/{name}") })
    }
}

/// Lowercases `stem`, replaces punctuation with spaces and removes the
/// `failed` and `attempt N` markers added by test runners.
#[must_use]
pub fn clean_stem(stem: &str) -> String {
    let stem = normalize(stem);
    let stem = regex_replace_all!(r"\battempt \d+\b", &stem, "");
    let stem = regex_replace_all!(r"\bfailed\b", &stem, "");
    stem.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Makes the given file name safe for file systems and URLs: lowercase,
/// only `[a-z0-9._-]`, with runs of `_` collapsed.
#[must_use]
pub fn sanitize(file_name: &str) -> String {
    let name: String = file_name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '-' => c,
            _ => '_',
        })
        .collect();
    let name = regex_replace_all!(r"_+", &name, "_");
    name.trim_matches('_').to_owned()
}

/// Reads the given image into a `data:` URI.
///
/// Unreadable files are logged and give [`None`].
#[must_use]
pub fn data_uri(path: &Path) -> Option<String> {
    let bytes = fs::read(path)
        .map_err(|e| warn!(path = %path.display(), "cannot read screenshot: {e}"))
        .ok()?;
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            mime::IMAGE_JPEG
        }
        _ => mime::IMAGE_PNG,
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:{mime};base64,{encoded}"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn cleans_runner_markers() {
        assert_eq!(clean_stem("login_test_failed"), "login test");
        assert_eq!(
            clean_stem("Login -- Login Test (failed) (attempt 2)"),
            "login login test",
        );
        assert_eq!(clean_stem("failed"), "");
    }

    #[test]
    fn sanitizes_file_names() {
        assert_eq!(
            sanitize("Login -- Login Test (failed).png"),
            "login_--_login_test_failed_.png",
        );
        assert_eq!(sanitize("a__b  c.PNG"), "a_b_c.png");
    }

    #[test]
    fn matches_scenario_name_loosely() {
        let shot = Screenshot::new("shots/login_test_failed.png".into());

        assert!(shot.matches("Login Test"));
        assert!(shot.matches("  login   TEST "));
        assert!(!shot.matches("Checkout"));
        assert!(!shot.matches(""));
    }

    #[test]
    fn short_leftovers_do_not_match_longer_names() {
        let shot = Screenshot::new("shots/Login (failed).png".into());

        assert!(shot.matches("Login"));
        assert!(!shot.matches("Login Test"));
        assert!(!Screenshot::new("relogin test.png".into()).matches("Login Test"));
    }

    #[test]
    fn truncated_file_names_match_as_prefix() {
        let shot = Screenshot::new(
            "shots/Checkout -- pays with a saved credit ca (failed).png".into(),
        );

        assert!(shot.key.len() >= MIN_TRUNCATED_KEY);
        assert!(shot.matches("Checkout pays with a saved credit card"));
        assert!(!shot.matches("pays with a saved credit card"));
    }

    #[test]
    fn missing_directory_gives_no_screenshots() {
        let dir = TempDir::new().unwrap();

        assert!(Screenshots::discover(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn discovers_and_copies_matching_screenshots() {
        let dir = TempDir::new().unwrap();
        let shots = dir.path().join("shots/login.feature");
        fs::create_dir_all(&shots).unwrap();
        fs::write(shots.join("Login Test (failed).png"), b"png").unwrap();
        fs::write(shots.join("Checkout (failed).png"), b"png").unwrap();
        fs::write(shots.join("notes.txt"), b"txt").unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join(DIR)).unwrap();

        let mut found = Screenshots::discover(&dir.path().join("shots"));
        assert_eq!(found.len(), 2);

        let attached = found.attach("Login Test", &out, false);
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].name, "Login Test (failed).png");
        assert_eq!(attached[0].src, "screenshots/login_test_failed_.png");
        assert!(out.join("screenshots/login_test_failed_.png").exists());
        assert_eq!(found.published(), 1);

        // Attaching the same scenario again reuses the copy.
        assert_eq!(found.attach("Login Test", &out, false), attached);
        assert_eq!(found.published(), 1);
    }

    #[test]
    fn embeds_screenshots_as_data_uris() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("login_test_failed.png");
        fs::write(&path, b"png").unwrap();

        let mut found = Screenshots::from_paths([path]);
        let attached = found.attach("Login Test", dir.path(), true);

        assert_eq!(attached[0].src, "data:image/png;base64,cG5n");
    }
}
