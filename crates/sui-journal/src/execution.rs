// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seams to the wallet and the fullnode, plus the submission and
//! confirmation steps built on them.

use crate::base_types::{SuiAddress, TransactionDigest};
use crate::effects::{TransactionEffects, TransactionResponse, TransactionResponseOptions};
use crate::errors::{ExecutionError, JournalError, JournalResult};
use crate::transaction::TransactionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tap::TapFallible;
use tokio::time::timeout;
use tracing::{error, info};

/// Signs and submits a transaction on behalf of an account.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Returns the digest of the submitted transaction. Must not retry on its own.
    async fn sign_and_execute(
        &self,
        tx: &TransactionRequest,
        sender: &SuiAddress,
    ) -> Result<TransactionDigest, ExecutionError>;
}

/// Transaction bytes and signatures in the encoding the fullnode accepts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    /// Base64 BCS `TransactionData`.
    pub tx_bytes: String,
    /// Base64 serialized signatures.
    pub signatures: Vec<String>,
}

/// Wallet-side signing. A user declining the request is `ExecutionError::Rejected`.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_transaction(
        &self,
        tx: &TransactionRequest,
        sender: &SuiAddress,
    ) -> Result<SignedTransaction, ExecutionError>;
}

/// Read access to finalized transactions.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Suspends until the ledger knows `digest`, retrying "not found" internally.
    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: TransactionResponseOptions,
    ) -> Result<TransactionResponse, ExecutionError>;
}

#[async_trait]
impl<T: TransactionExecutor + ?Sized> TransactionExecutor for Arc<T> {
    async fn sign_and_execute(
        &self,
        tx: &TransactionRequest,
        sender: &SuiAddress,
    ) -> Result<TransactionDigest, ExecutionError> {
        (**self).sign_and_execute(tx, sender).await
    }
}

#[async_trait]
impl<T: LedgerReader + ?Sized> LedgerReader for Arc<T> {
    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: TransactionResponseOptions,
    ) -> Result<TransactionResponse, ExecutionError> {
        (**self).wait_for_transaction(digest, options).await
    }
}

/// Hand `tx` to the executor exactly once.
pub async fn submit_transaction<E: TransactionExecutor + ?Sized>(
    executor: &E,
    tx: &TransactionRequest,
    sender: &SuiAddress,
) -> JournalResult<TransactionDigest> {
    executor
        .sign_and_execute(tx, sender)
        .await
        .tap_ok(|digest| info!(?digest, ?sender, "Transaction submitted"))
        .tap_err(|e| error!(?sender, "Transaction submission failed: {e}"))
        .map_err(JournalError::from_submission)
}

/// Wait for `digest` to be finalized, for at most `wait_timeout`.
///
/// The returned effects may carry a failure status; wait failures and
/// missing effects are `JournalError::Confirmation`.
pub async fn confirm_transaction<L: LedgerReader + ?Sized>(
    ledger: &L,
    digest: &TransactionDigest,
    wait_timeout: Duration,
) -> JournalResult<TransactionEffects> {
    let options = TransactionResponseOptions::new().with_effects();
    let response = match timeout(wait_timeout, ledger.wait_for_transaction(digest, options)).await
    {
        Err(_elapsed) => Err(ExecutionError::ConfirmationTimeout(digest.clone(), wait_timeout)),
        Ok(result) => result,
    }
    .tap_err(|e| error!(?digest, "Error waiting for transaction: {e}"))
    .map_err(|e| JournalError::from_confirmation(digest.clone(), e))?;

    response.effects.ok_or_else(|| {
        error!(?digest, "Effects field missing from confirmed transaction");
        JournalError::Confirmation {
            digest: digest.clone(),
            reason: format!("effects field missing for txn {digest}"),
        }
    })
}

#[cfg(test)]
#[path = "unit_tests/execution_tests.rs"]
mod execution_tests;
