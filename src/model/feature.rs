// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature structure of the intermediate report JSON.

use std::{
    env,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};

use crate::model::{element::Element, types::Tag};

/// Group of scenarios parsed from a single `.feature` file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Feature {
    /// Path of the originating `.feature` file.
    #[serde(default)]
    pub uri: Option<String>,

    /// Keyword the feature is written with.
    pub keyword: String,

    /// Free text name of the feature.
    pub name: String,

    /// Tags of the feature.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Scenarios of the feature.
    pub elements: Vec<Element>,
}

impl Feature {
    /// Creates a new [`Feature`] without scenarios.
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        name: impl Into<String>,
        path: Option<&Path>,
    ) -> Self {
        Self {
            uri: path.map(|p| trim_path(&p.display().to_string()).to_owned()),
            keyword: keyword.into(),
            name: name.into(),
            tags: vec![],
            elements: vec![],
        }
    }

    /// Returns the file stem of [`Feature::uri`], used to pair the feature
    /// with spec files of a test run.
    #[must_use]
    pub fn file_stem(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .and_then(|uri| Path::new(uri).file_stem())
            .and_then(|s| s.to_str())
    }
}

/// Trims the current working directory (or `CARGO_MANIFEST_DIR`, if set)
/// from the start of the given `path`.
#[must_use]
pub fn trim_path(path: &str) -> &str {
    /// Path of the current project directory.
    static CURRENT_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
        env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|_| env::current_dir())
            .ok()
    });

    CURRENT_DIR
        .as_deref()
        .map_or(path, |dir| relative_to(path, dir))
}

/// Strips whole leading components of `dir` from `path`, if `path` lies
/// under it.
fn relative_to<'p>(path: &'p str, dir: &Path) -> &'p str {
    Path::new(path)
        .strip_prefix(dir)
        .ok()
        .and_then(Path::to_str)
        .filter(|rel| !rel.is_empty())
        .unwrap_or(path)
}
