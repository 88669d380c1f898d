// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Intermediate report model.
//!
//! The shape follows the [Cucumber JSON format][1], so the intermediate
//! artifact can be consumed by other Cucumber JSON tooling as well:
//!
//! - [`types`]: statuses, results, steps and tags
//! - [`element`]: scenarios
//! - [`feature`]: features
//!
//! [1]: https://github.com/cucumber/cucumber-json-schema

pub mod element;
pub mod feature;
pub mod types;

pub use self::{
    element::Element,
    feature::{trim_path, Feature},
    types::{
        Confidence, FailedStep, RunResult, Status, Step, StepKind, Tag,
        PLACEHOLDER_DURATION,
    },
};
