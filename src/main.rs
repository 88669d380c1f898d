// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `scenario-report` binary.

use std::process::ExitCode;

use anyhow::Context as _;
use scenario_report::{cli::Opts, ReportConfig, Reporter, Styles};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let opts = Opts::parsed();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(opts.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("report generation failed: {e:#}");
            // A broken report shouldn't fail the CI job, unless asked to.
            if opts.strict {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn run(opts: &Opts) -> anyhow::Result<()> {
    let mut config = match &opts.config {
        Some(path) => ReportConfig::from_file(path)
            .with_context(|| format!("cannot load `{}`", path.display()))?,
        None => ReportConfig::default(),
    };
    opts.apply(&mut config);

    let _outcome = Reporter::new(&config, Styles::new(opts.color))?.run()?;
    Ok(())
}
