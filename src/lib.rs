// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTML reports for BDD browser end-to-end suites.
//!
//! A browser test runner reports which tests ran and whether they passed, but
//! knows nothing about the [Gherkin] steps those tests were written as. This
//! crate puts the two together:
//!
//! 1. [`parser`] reads `.feature` files into [Cucumber JSON]-shaped
//!    [`Feature`]s;
//! 2. [`run`] loads the runner's results and optional terminal logs;
//! 3. [`correlate`] matches results to scenarios, reconstructing per-step
//!    outcomes and inferring the failing step out of the error message;
//! 4. [`stats`] aggregates the outcome;
//! 5. [`html`] renders a self-contained report page, with screenshots
//!    attached to failed scenarios;
//! 6. [`term`] prints a colored summary.
//!
//! [`Reporter`] runs all of the above for a [`ReportConfig`].
//!
//! [Cucumber JSON]: https://github.com/cucumber/cucumber-json-schema
//! [Gherkin]: https://cucumber.io/docs/gherkin/reference

#![deny(nonstandard_style, rustdoc::all, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::missing_const_for_fn,
    clippy::unwrap_used,
    missing_docs
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod config;
pub mod correlate;
pub mod error;
pub mod html;
pub mod model;
pub mod parser;
pub mod reporter;
pub mod run;
pub mod stats;
pub mod term;

pub use gherkin;

#[doc(inline)]
pub use self::{
    config::{ParserKind, ReportConfig},
    correlate::{Correlation, Correlator},
    error::{ReportError, Result},
    html::Generator,
    model::{Element, Feature, Status, Step},
    parser::Parser,
    reporter::{Outcome, Reporter},
    stats::Statistics,
    term::{Coloring, Styles},
};
