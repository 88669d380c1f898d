// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal logs captured during a test run.

use std::{fs, path::Path};

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    correlate::matching::{normalize, same_source},
    model::{Element, Feature},
};

/// Single captured terminal log entry.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogEntry {
    /// Kind of the entry (`cons:log`, `cy:request`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Severity of the entry (`success`, `warning`, `error`).
    #[serde(default)]
    pub severity: String,

    /// Logged message.
    #[serde(default)]
    pub message: String,
}

/// Terminal logs keyed by spec path, then by test title.
///
/// Keys keep the order they appear in the file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct TerminalLogs(LinkedHashMap<String, LinkedHashMap<String, Vec<LogEntry>>>);

impl TerminalLogs {
    /// Reads [`TerminalLogs`] from the given JSON file.
    ///
    /// Terminal logs are an optional input, so a missing or malformed file
    /// gives empty [`TerminalLogs`].
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), "no terminal logs: {e}");
                return Self::default();
            }
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring malformed terminal logs: {e}");
            Self::default()
        })
    }

    /// Returns log entries of the given scenario.
    ///
    /// The spec key has to point to the same file as [`Feature::uri`] (when
    /// the feature has one), and the test title has to contain the scenario
    /// name.
    #[must_use]
    pub fn entries_for(&self, feature: &Feature, scenario: &Element) -> &[LogEntry] {
        let name = normalize(&scenario.name);
        if name.is_empty() {
            return &[];
        }
        self.0
            .iter()
            .filter(|(spec, _)| {
                feature.uri.is_none() || same_source(feature.uri.as_deref(), spec)
            })
            .flat_map(|(_, tests)| tests.iter())
            .find(|(title, _)| normalize(title).contains(&name))
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or_default()
    }

    /// Indicates whether no logs were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const LOGS: &str = r#"{
        "cypress/e2e/login.feature": {
            "Login -- Login Test": [
                {"type": "cons:log", "severity": "success", "message": "visiting /login"},
                {"type": "cy:request", "severity": "error", "message": "POST /api/login 500"}
            ]
        },
        "cypress/e2e/cart.feature": {
            "Cart -- Login Test": [
                {"type": "cons:log", "severity": "success", "message": "wrong spec"}
            ]
        }
    }"#;

    fn logs() -> TerminalLogs {
        serde_json::from_str(LOGS).unwrap()
    }

    fn login_feature() -> (Feature, Element) {
        let feature = Feature::new(
            "Feature",
            "Login",
            Some(Path::new("cypress/e2e/login.feature")),
        );
        let el = Element::new("Login", "Scenario", "Login test", 3, 0);
        (feature, el)
    }

    #[test]
    fn finds_entries_by_spec_and_title() {
        let logs = logs();
        let (feature, el) = login_feature();

        let entries = logs.entries_for(&feature, &el);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].kind, "cy:request");
        assert_eq!(entries[1].severity, "error");
    }

    #[test]
    fn other_specs_are_not_considered() {
        let logs = logs();
        let feature = Feature::new(
            "Feature",
            "Profile",
            Some(Path::new("cypress/e2e/profile.feature")),
        );
        let el = Element::new("Profile", "Scenario", "Login Test", 3, 0);

        assert!(logs.entries_for(&feature, &el).is_empty());
    }

    #[test]
    fn missing_or_malformed_file_gives_empty_logs() {
        let dir = TempDir::new().unwrap();
        assert!(TerminalLogs::load(&dir.path().join("absent.json")).is_empty());

        let path = dir.path().join("broken.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(TerminalLogs::load(&path).is_empty());
    }
}
