// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-engine: Failure-state reconciliation and the run orchestrator

pub mod config;
mod error;
pub mod reconcile;
mod runner;

pub use config::{parse_duration, ConfigError, MonitorConfig, DEFAULT_REMINDER_INTERVAL};
pub use error::RunError;
pub use reconcile::{reconcile, Classification, Reconciliation};
pub use runner::{RunOutcome, RunReport, Runner};
