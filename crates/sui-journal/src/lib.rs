// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod base_types;
pub mod cli;
pub mod config;
pub mod effects;
pub mod errors;
pub mod execution;
pub mod form;
pub mod journal;
pub mod metrics;
pub mod outcome;
pub mod rpc;
pub mod transaction;

#[cfg(test)]
#[path = "unit_tests/fakes.rs"]
mod fakes;

pub use errors::{ExecutionError, JournalError, JournalResult};
pub use journal::{AttemptReport, CreateState, JournalCreator};
pub use metrics::JournalMetrics;
pub use outcome::OperationResult;
