// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! One create-journal attempt, from building the request to the created object id.

use crate::base_types::{ObjectID, SuiAddress, TransactionDigest};
use crate::config::NetworkVariables;
use crate::effects::{extract_created_object, CreatedObjectSelector};
use crate::errors::{JournalError, JournalResult};
use crate::execution::{confirm_transaction, submit_transaction, LedgerReader, TransactionExecutor};
use crate::metrics::JournalMetrics;
use crate::outcome::OperationResult;
use crate::transaction::{build_create_journal, MoveCallTarget};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreateState {
    Idle,
    Building,
    Submitted,
    Confirming,
    Succeeded,
    Failed,
}

impl CreateState {
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            CreateState::Building | CreateState::Submitted | CreateState::Confirming
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CreateState::Succeeded | CreateState::Failed)
    }
}

/// What happened during a single call to [`JournalCreator::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub id: Uuid,
    /// States entered, in order. Empty when the attempt was refused outright.
    pub transitions: Vec<CreateState>,
    pub digest: Option<TransactionDigest>,
    pub result: OperationResult,
}

impl AttemptReport {
    pub fn final_state(&self) -> Option<CreateState> {
        self.transitions.last().copied()
    }
}

struct Attempt<'a> {
    id: Uuid,
    transitions: Vec<CreateState>,
    digest: Option<TransactionDigest>,
    state: &'a watch::Sender<CreateState>,
}

impl<'a> Attempt<'a> {
    fn enter(&mut self, next: CreateState) {
        debug!(attempt = ?self.id, state = ?next, "Create journal state change");
        self.transitions.push(next);
        self.state.send_replace(next);
    }
}

/// Drives journal creation against a wallet and a fullnode.
///
/// At most one attempt is in flight at a time; concurrent calls are refused
/// with [`JournalError::SubmissionInProgress`].
pub struct JournalCreator<E, L> {
    executor: E,
    ledger: L,
    network: NetworkVariables,
    selector: CreatedObjectSelector,
    confirmation_timeout: Duration,
    metrics: JournalMetrics,
    in_flight: AtomicBool,
    state: watch::Sender<CreateState>,
}

impl<E: TransactionExecutor, L: LedgerReader> JournalCreator<E, L> {
    pub fn new(
        executor: E,
        ledger: L,
        network: NetworkVariables,
        confirmation_timeout: Duration,
        metrics: JournalMetrics,
    ) -> Self {
        let (state, _) = watch::channel(CreateState::Idle);
        Self {
            executor,
            ledger,
            network,
            selector: CreatedObjectSelector::default(),
            confirmation_timeout,
            metrics,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    pub fn with_selector(mut self, selector: CreatedObjectSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn network(&self) -> &NetworkVariables {
        &self.network
    }

    pub fn state(&self) -> CreateState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CreateState> {
        self.state.subscribe()
    }

    /// Build, submit and confirm a `new_journal` call whose result is sent to `account`.
    pub async fn create(&self, title: &str, account: Option<&SuiAddress>) -> AttemptReport {
        let id = Uuid::new_v4();
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(attempt = ?id, "Refusing create while another attempt is in flight");
            self.metrics
                .total_failed
                .with_label_values(&[JournalError::SubmissionInProgress.kind()])
                .inc();
            return AttemptReport {
                id,
                transitions: vec![],
                digest: None,
                result: OperationResult::Failure(JournalError::SubmissionInProgress),
            };
        }
        let _in_flight_guard = scopeguard::guard(&self.in_flight, |flag| {
            flag.store(false, Ordering::Release);
        });

        self.metrics.total_attempts.inc();
        self.metrics.current_attempts_in_flight.inc();
        let _metrics_guard = scopeguard::guard(&self.metrics, |metrics| {
            metrics.current_attempts_in_flight.dec();
        });
        // A caller dropping this future mid-flight must not leave subscribers pending.
        let _state_guard = scopeguard::guard(&self.state, move |state| {
            state.send_if_modified(|current| {
                if !current.is_pending() {
                    return false;
                }
                warn!(attempt = ?id, state = ?current, "Create journal attempt abandoned");
                *current = CreateState::Failed;
                true
            });
        });

        let mut attempt = Attempt {
            id,
            transitions: vec![],
            digest: None,
            state: &self.state,
        };
        attempt.enter(CreateState::Idle);
        info!(attempt = ?id, %title, ?account, "Creating journal");

        let result = self.run(&mut attempt, title, account).await;
        match &result {
            Ok(object_id) => {
                attempt.enter(CreateState::Succeeded);
                self.metrics.total_succeeded.inc();
                info!(attempt = ?id, digest = ?attempt.digest, ?object_id, "Journal created");
            }
            Err(err) => {
                attempt.enter(CreateState::Failed);
                self.metrics
                    .total_failed
                    .with_label_values(&[err.kind()])
                    .inc();
                if err.is_post_submission() {
                    let digest = &attempt.digest;
                    error!(
                        attempt = ?id,
                        ?digest,
                        "Journal creation failed after submission: {err}"
                    );
                } else {
                    warn!(attempt = ?id, "Journal creation failed: {err}");
                }
            }
        }

        AttemptReport {
            id,
            transitions: attempt.transitions,
            digest: attempt.digest,
            result: result.into(),
        }
    }

    async fn run(
        &self,
        attempt: &mut Attempt<'_>,
        title: &str,
        account: Option<&SuiAddress>,
    ) -> JournalResult<ObjectID> {
        attempt.enter(CreateState::Building);
        let sender = account.ok_or(JournalError::NoSigner)?;
        let package = self.network.journal_package()?;
        let tx = build_create_journal(MoveCallTarget::new_journal(package), title, sender.clone())?;
        debug!(attempt = ?attempt.id, %tx, "Built create journal transaction");

        attempt.enter(CreateState::Submitted);
        self.metrics.total_submissions.inc();
        let digest = submit_transaction(&self.executor, &tx, sender).await?;
        attempt.digest = Some(digest.clone());

        attempt.enter(CreateState::Confirming);
        let timer = self.metrics.confirmation_latency.start_timer();
        let effects = confirm_transaction(&self.ledger, &digest, self.confirmation_timeout).await;
        timer.observe_duration();
        let effects = effects?;

        effects.ensure_success()?;
        extract_created_object(&effects, self.selector)
    }
}

#[cfg(test)]
#[path = "unit_tests/journal_tests.rs"]
mod journal_tests;
