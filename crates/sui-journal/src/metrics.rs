// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Histogram,
    IntCounter, IntCounterVec, IntGauge, Registry,
};

/// Prometheus metrics for journal creation attempts.
#[derive(Clone, Debug)]
pub struct JournalMetrics {
    pub(crate) total_attempts: IntCounter,
    pub(crate) total_submissions: IntCounter,
    pub(crate) total_succeeded: IntCounter,
    pub(crate) total_failed: IntCounterVec,
    pub(crate) current_attempts_in_flight: IntGauge,
    pub(crate) confirmation_latency: Histogram,
}

const LATENCY_SEC_BUCKETS: &[f64] = &[
    0.1, 0.25, 0.5, 1., 2.5, 5., 10., 20., 30., 60., 90., 120.,
];

impl JournalMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            total_attempts: register_int_counter_with_registry!(
                "journal_total_attempts",
                "Total number of create-journal attempts started",
                registry,
            )
            .unwrap(),
            total_submissions: register_int_counter_with_registry!(
                "journal_total_submissions",
                "Total number of transactions handed to the executor",
                registry,
            )
            .unwrap(),
            total_succeeded: register_int_counter_with_registry!(
                "journal_total_succeeded",
                "Total number of attempts that produced a journal object",
                registry,
            )
            .unwrap(),
            total_failed: register_int_counter_vec_with_registry!(
                "journal_total_failed",
                "Total number of failed attempts, by error kind",
                &["kind"],
                registry,
            )
            .unwrap(),
            current_attempts_in_flight: register_int_gauge_with_registry!(
                "journal_current_attempts_in_flight",
                "Attempts currently between building and a terminal state",
                registry,
            )
            .unwrap(),
            confirmation_latency: register_histogram_with_registry!(
                "journal_confirmation_latency",
                "Seconds spent waiting for a submitted transaction to be confirmed",
                LATENCY_SEC_BUCKETS.to_vec(),
                registry,
            )
            .unwrap(),
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(&Registry::new())
    }
}
