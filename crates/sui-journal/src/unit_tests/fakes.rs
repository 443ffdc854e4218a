// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory wallet and fullnode used by the unit tests.

use crate::base_types::{ObjectID, SuiAddress, TransactionDigest};
use crate::effects::{
    ExecutionStatus, OwnedObjectRef, TransactionEffects, TransactionResponse,
    TransactionResponseOptions,
};
use crate::errors::ExecutionError;
use crate::execution::{LedgerReader, TransactionExecutor};
use crate::transaction::TransactionRequest;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Hands out scripted digests (or errors) in order and records every submission.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<TransactionDigest, ExecutionError>>>,
    pub submitted: Mutex<Vec<(TransactionRequest, SuiAddress)>>,
}

impl ScriptedExecutor {
    pub fn new(responses: Vec<Result<TransactionDigest, ExecutionError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            submitted: Mutex::new(vec![]),
        }
    }

    pub fn with_digests(digests: &[&str]) -> Self {
        Self::new(
            digests
                .iter()
                .map(|d| Ok(TransactionDigest::new(*d)))
                .collect(),
        )
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionExecutor for ScriptedExecutor {
    async fn sign_and_execute(
        &self,
        tx: &TransactionRequest,
        sender: &SuiAddress,
    ) -> Result<TransactionDigest, ExecutionError> {
        self.submitted
            .lock()
            .unwrap()
            .push((tx.clone(), sender.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExecutionError::Network("no scripted response".into())))
    }
}

/// Answers waits per digest, optionally after a delay.
#[derive(Default)]
pub struct ScriptedLedger {
    responses: Mutex<HashMap<TransactionDigest, Result<TransactionResponse, ExecutionError>>>,
    delay: Option<Duration>,
    pub waited: Mutex<Vec<(TransactionDigest, TransactionResponseOptions)>>,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(
        self,
        digest: &str,
        response: Result<TransactionResponse, ExecutionError>,
    ) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(TransactionDigest::new(digest), response);
        self
    }

    pub fn created(self, digest: &str, objects: &[&str]) -> Self {
        let effects = effects(digest, ExecutionStatus::Success, objects);
        self.respond(digest, Ok(response(digest, Some(effects))))
    }

    pub fn waited_digests(&self) -> Vec<TransactionDigest> {
        self.waited
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect()
    }
}

#[async_trait]
impl LedgerReader for ScriptedLedger {
    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: TransactionResponseOptions,
    ) -> Result<TransactionResponse, ExecutionError> {
        self.waited
            .lock()
            .unwrap()
            .push((digest.clone(), options));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(digest)
            .cloned()
            .unwrap_or_else(|| Err(ExecutionError::DataError(format!("unknown digest {digest}"))))
    }
}

pub fn effects(digest: &str, status: ExecutionStatus, objects: &[&str]) -> TransactionEffects {
    TransactionEffects::new(TransactionDigest::new(digest), status).with_created(
        objects
            .iter()
            .map(|id| OwnedObjectRef::new(ObjectID::new(*id)))
            .collect(),
    )
}

pub fn response(digest: &str, effects: Option<TransactionEffects>) -> TransactionResponse {
    TransactionResponse {
        digest: TransactionDigest::new(digest),
        effects,
        confirmed_local_execution: Some(true),
        errors: vec![],
    }
}
