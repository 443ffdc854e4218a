// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fullnode JSON-RPC implementations of the execution seams.

use crate::base_types::{SuiAddress, TransactionDigest};
use crate::effects::{TransactionResponse, TransactionResponseOptions};
use crate::errors::ExecutionError;
use crate::execution::{LedgerReader, TransactionExecutor, TransactionSigner};
use crate::transaction::TransactionRequest;
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

pub const TRANSACTION_NOT_FOUND_MSG_PREFIX: &str = "Could not find the referenced transaction";
const TRANSACTION_NOT_FOUND_CODE: &str = "transactionNotFound";
const WAIT_FOR_EFFECTS_CERT: &str = "WaitForEffectsCert";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn http_client(url: &str) -> Result<HttpClient, ExecutionError> {
    HttpClientBuilder::default()
        .request_timeout(DEFAULT_REQUEST_TIMEOUT)
        .build(url)
        .map_err(|e| ExecutionError::Network(format!("cannot create client for {url}: {e}")))
}

/// Polls `sui_getTransactionBlock` until the fullnode knows the digest.
#[derive(Clone, Debug)]
pub struct RpcLedgerReader {
    client: HttpClient,
    poll_interval: Duration,
}

impl RpcLedgerReader {
    pub fn new(client: HttpClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    pub fn from_url(url: &str, poll_interval: Duration) -> Result<Self, ExecutionError> {
        Ok(Self::new(http_client(url)?, poll_interval))
    }

    async fn get_transaction_block(
        &self,
        digest: &TransactionDigest,
        options: &TransactionResponseOptions,
    ) -> Result<Option<TransactionResponse>, ExecutionError> {
        let result: Result<Value, ClientError> = self
            .client
            .request("sui_getTransactionBlock", rpc_params![digest, options])
            .await;
        match result {
            Ok(value) if is_not_found_value(&value) => Ok(None),
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(ClientError::Call(obj))
                if obj.message().contains(TRANSACTION_NOT_FOUND_MSG_PREFIX) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_not_found_value(value: &Value) -> bool {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        == Some(TRANSACTION_NOT_FOUND_CODE)
}

#[async_trait]
impl LedgerReader for RpcLedgerReader {
    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: TransactionResponseOptions,
    ) -> Result<TransactionResponse, ExecutionError> {
        let mut attempts = 0u64;
        loop {
            attempts += 1;
            if let Some(response) = self.get_transaction_block(digest, &options).await? {
                info!(?digest, attempts, "Fullnode returned transaction");
                return Ok(response);
            }
            debug!(?digest, attempts, "Transaction not yet known to fullnode");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Signs with a wallet and submits through `sui_executeTransactionBlock`.
#[derive(Clone, Debug)]
pub struct RpcTransactionExecutor<S> {
    client: HttpClient,
    signer: S,
}

impl<S: TransactionSigner> RpcTransactionExecutor<S> {
    pub fn new(client: HttpClient, signer: S) -> Self {
        Self { client, signer }
    }
}

#[async_trait]
impl<S: TransactionSigner> TransactionExecutor for RpcTransactionExecutor<S> {
    async fn sign_and_execute(
        &self,
        tx: &TransactionRequest,
        sender: &SuiAddress,
    ) -> Result<TransactionDigest, ExecutionError> {
        let signed = self.signer.sign_transaction(tx, sender).await?;
        let response: TransactionResponse = self
            .client
            .request(
                "sui_executeTransactionBlock",
                rpc_params![
                    signed.tx_bytes,
                    signed.signatures,
                    TransactionResponseOptions::new(),
                    WAIT_FOR_EFFECTS_CERT
                ],
            )
            .await?;
        if !response.errors.is_empty() {
            return Err(ExecutionError::InvalidRequest(response.errors.join("; ")));
        }
        Ok(response.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_marker_is_recognized() {
        assert!(is_not_found_value(
            &serde_json::json!({ "error": { "code": "transactionNotFound" } })
        ));
        assert!(!is_not_found_value(&serde_json::json!({ "digest": "d1" })));
    }
}
