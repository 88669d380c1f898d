// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI (command line interface) of the report generator.
//!
//! Every option left unset keeps the value of the configuration file (or its
//! default), see [`Opts::apply()`].

use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{ParserKind, ReportConfig},
    term::Coloring,
};

/// Root CLI of the `scenario-report` binary.
#[derive(Clone, Debug, Default, Parser)]
#[command(
    name = "scenario-report",
    about = "Builds an HTML report out of .feature files and test run results",
    version
)]
pub struct Opts {
    /// TOML configuration file.
    #[arg(long, short = 'c', value_name = "file")]
    pub config: Option<PathBuf>,

    /// Directory to look for `.feature` files in, recursively.
    #[arg(long, value_name = "dir")]
    pub features: Option<PathBuf>,

    /// Run results reported by the test runner.
    #[arg(long, value_name = "file")]
    pub results: Option<PathBuf>,

    /// Terminal logs captured during the run.
    #[arg(long, value_name = "file")]
    pub logs: Option<PathBuf>,

    /// Directory of failure screenshots.
    #[arg(long, value_name = "dir")]
    pub screenshots: Option<PathBuf>,

    /// Path to write the intermediate JSON report to.
    #[arg(long, value_name = "file")]
    pub json: Option<PathBuf>,

    /// Directory to render the HTML report into. Recreated on every run.
    #[arg(long, short = 'o', value_name = "dir")]
    pub out: Option<PathBuf>,

    /// Title of the HTML report.
    #[arg(long)]
    pub title: Option<String>,

    /// Length of the "top errors" and "slowest scenarios" lists.
    #[arg(long, value_name = "n")]
    pub top: Option<usize>,

    /// Parser of `.feature` files.
    #[arg(long, value_enum, value_name = "lenient|gherkin")]
    pub parser: Option<ParserKind>,

    /// Inline screenshots into the HTML report.
    #[arg(long)]
    pub embed_screenshots: bool,

    /// Coloring policy for a console output.
    #[arg(long, value_name = "auto|always|never", default_value = "auto")]
    pub color: Coloring,

    /// Verbosity of logging: `-v` for debug, `-vv` for trace.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Fail with a non-zero exit code if the report cannot be generated.
    #[arg(long)]
    pub strict: bool,
}

impl Opts {
    /// Shortcut for [`clap::Parser::parse()`], which doesn't require the trait
    /// being imported.
    #[must_use]
    pub fn parsed() -> Self {
        <Self as Parser>::parse()
    }

    /// Overrides the given [`ReportConfig`] with the options set.
    pub fn apply(&self, config: &mut ReportConfig) {
        let set = |target: &mut PathBuf, value: &Option<PathBuf>| {
            if let Some(v) = value {
                target.clone_from(v);
            }
        };
        set(&mut config.features_dir, &self.features);
        set(&mut config.results, &self.results);
        set(&mut config.screenshots_dir, &self.screenshots);
        set(&mut config.json_output, &self.json);
        set(&mut config.html_dir, &self.out);

        if let Some(logs) = &self.logs {
            config.terminal_logs = Some(logs.clone());
        }
        if let Some(title) = &self.title {
            config.title.clone_from(title);
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if let Some(parser) = self.parser {
            config.parser = parser;
        }
        config.embed_screenshots |= self.embed_screenshots;
    }

    /// Default `tracing` filter directive for the given verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("scenario-report").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_options_keep_config() {
        let mut config = ReportConfig::default();

        parse(&[]).apply(&mut config);

        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn options_override_config() {
        let opts = parse(&[
            "--features",
            "e2e",
            "--out",
            "public/report",
            "--top",
            "10",
            "--parser",
            "gherkin",
            "--embed-screenshots",
            "--logs",
            "logs.json",
            "--title",
            "Nightly",
            "--color",
            "never",
            "-vv",
            "--strict",
        ]);
        let mut config = ReportConfig::default();

        opts.apply(&mut config);

        assert_eq!(config.features_dir, PathBuf::from("e2e"));
        assert_eq!(config.html_dir, PathBuf::from("public/report"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.parser, ParserKind::Gherkin);
        assert!(config.embed_screenshots);
        assert_eq!(config.terminal_logs, Some(PathBuf::from("logs.json")));
        assert_eq!(config.title, "Nightly");
        assert_eq!(opts.color, Coloring::Never);
        assert_eq!(opts.log_level(), "trace");
        assert!(opts.strict);
    }

    #[test]
    fn rejects_unknown_coloring() {
        let res = Opts::try_parse_from(["scenario-report", "--color", "sometimes"]);

        assert!(res.is_err());
    }
}
