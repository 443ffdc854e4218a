// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sui_journal::base_types::{ObjectID, SuiAddress, TransactionDigest};
use sui_journal::cli::JournalCommand;
use sui_journal::config::{JournalConfig, NetworkConfig, NetworkVariables};
use sui_journal::effects::{extract_created_object, CreatedObjectSelector};
use sui_journal::execution::{confirm_transaction, SignedTransaction, TransactionSigner};
use sui_journal::rpc::{
    http_client, RpcLedgerReader, RpcTransactionExecutor, TRANSACTION_NOT_FOUND_MSG_PREFIX,
};
use sui_journal::transaction::TransactionRequest;
use sui_journal::{ExecutionError, JournalCreator, JournalError, JournalMetrics, OperationResult};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy)]
enum NotFoundStyle {
    /// `{"error": {"code": "transactionNotFound"}}` as the result
    Marker,
    /// A JSON-RPC error whose message names the missing transaction
    CallError,
}

/// Minimal fullnode answering the two methods the journal client calls.
struct FakeFullnode {
    style: NotFoundStyle,
    /// Not-found replies still owed per digest before the transaction is visible.
    pending: HashMap<String, usize>,
    found: HashMap<String, Value>,
    failing: HashMap<String, String>,
    lookups: Vec<(String, Value)>,
    executed: Vec<(String, Vec<String>, String)>,
    execute_error: Option<ErrorObjectOwned>,
    next_digest: String,
}

impl FakeFullnode {
    fn new(style: NotFoundStyle) -> Self {
        Self {
            style,
            pending: HashMap::new(),
            found: HashMap::new(),
            failing: HashMap::new(),
            lookups: vec![],
            executed: vec![],
            execute_error: None,
            next_digest: "d7".to_owned(),
        }
    }

    fn finalize(
        &mut self,
        digest: &str,
        not_found_replies: usize,
        status: Value,
        created: &[&str],
    ) {
        let created: Vec<Value> = created
            .iter()
            .map(|id| {
                json!({
                    "owner": { "AddressOwner": "0xuser1" },
                    "reference": { "objectId": id, "version": "3", "digest": "Ddig" }
                })
            })
            .collect();
        self.pending.insert(digest.to_owned(), not_found_replies);
        self.found.insert(
            digest.to_owned(),
            json!({
                "digest": digest,
                "effects": {
                    "status": status,
                    "transactionDigest": digest,
                    "created": created,
                },
                "confirmedLocalExecution": true,
            }),
        );
    }

    fn get_transaction_block(
        &mut self,
        digest: String,
        options: Value,
    ) -> Result<Value, ErrorObjectOwned> {
        self.lookups.push((digest.clone(), options));
        let owed = self.pending.get_mut(&digest).filter(|left| **left > 0);
        if let Some(left) = owed {
            *left -= 1;
            return self.not_found(&digest);
        }
        if let Some(message) = self.failing.get(&digest) {
            return Err(internal_error(message));
        }
        match self.found.get(&digest) {
            Some(response) => Ok(response.clone()),
            None => self.not_found(&digest),
        }
    }

    fn not_found(&self, digest: &str) -> Result<Value, ErrorObjectOwned> {
        match self.style {
            NotFoundStyle::Marker => Ok(json!({ "error": { "code": "transactionNotFound" } })),
            NotFoundStyle::CallError => Err(ErrorObjectOwned::owned(
                -32602,
                format!("{TRANSACTION_NOT_FOUND_MSG_PREFIX} TransactionDigest({digest})"),
                None::<()>,
            )),
        }
    }

    fn lookup_count(&self, digest: &str) -> usize {
        self.lookups.iter().filter(|(d, _)| d == digest).count()
    }
}

fn internal_error(msg: impl std::fmt::Display) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(-32603, format!("{msg}"), None::<()>)
}

async fn serve(node: Arc<Mutex<FakeFullnode>>) -> (String, ServerHandle) {
    let server = Server::builder().build("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let mut module = RpcModule::new(());

    {
        let node = node.clone();
        module
            .register_async_method("sui_getTransactionBlock", move |params, _, _| {
                let node = node.clone();
                async move {
                    let mut p = params.sequence();
                    let digest: String = p.next().map_err(internal_error)?;
                    let options: Value = p.next().map_err(internal_error)?;
                    let mut n = node.lock().unwrap();
                    n.get_transaction_block(digest, options)
                }
            })
            .unwrap();
    }

    {
        let node = node.clone();
        module
            .register_async_method("sui_executeTransactionBlock", move |params, _, _| {
                let node = node.clone();
                async move {
                    let mut p = params.sequence();
                    let tx_bytes: String = p.next().map_err(internal_error)?;
                    let signatures: Vec<String> = p.next().map_err(internal_error)?;
                    let _options: Value = p.next().map_err(internal_error)?;
                    let request_type: String = p.next().map_err(internal_error)?;
                    let mut n = node.lock().unwrap();
                    if let Some(err) = n.execute_error.clone() {
                        return Err(err);
                    }
                    n.executed.push((tx_bytes, signatures, request_type));
                    Ok::<Value, ErrorObjectOwned>(json!({
                        "digest": n.next_digest,
                        "confirmedLocalExecution": true,
                    }))
                }
            })
            .unwrap();
    }

    let handle = server.start(module);
    (format!("http://{addr}"), handle)
}

struct FakeWallet {
    reject: bool,
}

#[async_trait]
impl TransactionSigner for FakeWallet {
    async fn sign_transaction(
        &self,
        tx: &TransactionRequest,
        _sender: &SuiAddress,
    ) -> Result<SignedTransaction, ExecutionError> {
        if self.reject {
            return Err(ExecutionError::Rejected("User rejected the request".into()));
        }
        let bytes = serde_json::to_vec(tx)?;
        Ok(SignedTransaction {
            tx_bytes: BASE64_STANDARD.encode(bytes),
            signatures: vec![BASE64_STANDARD.encode(b"signature")],
        })
    }
}

#[tokio::test]
async fn test_ledger_polls_until_transaction_is_known() {
    for style in [NotFoundStyle::Marker, NotFoundStyle::CallError] {
        let node = Arc::new(Mutex::new(FakeFullnode::new(style)));
        node.lock()
            .unwrap()
            .finalize("d1", 3, json!({ "status": "success" }), &["0xobj1"]);
        let (url, _handle) = serve(node.clone()).await;

        let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
        let effects = confirm_transaction(
            &ledger,
            &TransactionDigest::new("d1"),
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(
            extract_created_object(&effects, CreatedObjectSelector::First).unwrap(),
            ObjectID::new("0xobj1")
        );
        assert_eq!(
            effects.created()[0].address_owner(),
            Some(SuiAddress::new("0xuser1"))
        );
        assert_eq!(effects.created()[0].reference.version, 3);

        let node = node.lock().unwrap();
        assert_eq!(node.lookup_count("d1"), 4);
        assert_eq!(node.lookups[0].1["showEffects"], json!(true));
    }
}

#[tokio::test]
async fn test_ledger_reports_reverted_effects() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    node.lock().unwrap().finalize(
        "d3",
        0,
        json!({ "status": "failure", "error": "InsufficientGas" }),
        &[],
    );
    let (url, _handle) = serve(node.clone()).await;

    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let effects = confirm_transaction(
        &ledger,
        &TransactionDigest::new("d3"),
        Duration::from_secs(10),
    )
    .await
    .unwrap();

    assert_eq!(
        effects.ensure_success(),
        Err(JournalError::ExecutionFailure {
            digest: TransactionDigest::new("d3"),
            error: "InsufficientGas".into(),
        })
    );
}

#[tokio::test]
async fn test_ledger_surfaces_other_errors() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    node.lock()
        .unwrap()
        .failing
        .insert("d2".to_owned(), "database unavailable".to_owned());
    let (url, _handle) = serve(node.clone()).await;

    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let err = confirm_transaction(&ledger, &TransactionDigest::new("d2"), Duration::from_secs(10))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        JournalError::Confirmation {
            digest: TransactionDigest::new("d2"),
            reason: "RPC error -32603: database unavailable".into(),
        }
    );
    assert_eq!(node.lock().unwrap().lookup_count("d2"), 1);
}

#[tokio::test]
async fn test_ledger_wait_times_out() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    let (url, _handle) = serve(node.clone()).await;

    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let err = confirm_transaction(&ledger, &TransactionDigest::new("d4"), Duration::from_secs(1))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        JournalError::Confirmation {
            digest: TransactionDigest::new("d4"),
            reason: "Failed to confirm tx status for d4 within 1s.".into(),
        }
    );
    assert!(node.lock().unwrap().lookup_count("d4") > 1);
}

#[tokio::test]
async fn test_create_journal_against_fullnode() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::CallError)));
    node.lock()
        .unwrap()
        .finalize("d7", 2, json!({ "status": "success" }), &["0xjournal"]);
    let (url, _handle) = serve(node.clone()).await;

    let executor =
        RpcTransactionExecutor::new(http_client(&url).unwrap(), FakeWallet { reject: false });
    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let creator = JournalCreator::new(
        executor,
        ledger,
        NetworkVariables::new(url.clone()).with_journal_package_id("0xpkg"),
        Duration::from_secs(10),
        JournalMetrics::new_for_tests(),
    );

    let report = creator
        .create("My Diary", Some(&SuiAddress::new("0xuser1")))
        .await;

    assert_eq!(
        report.result,
        OperationResult::Success(ObjectID::new("0xjournal"))
    );
    assert_eq!(report.digest, Some(TransactionDigest::new("d7")));

    let node = node.lock().unwrap();
    assert_eq!(node.executed.len(), 1);
    let (tx_bytes, signatures, request_type) = &node.executed[0];
    assert!(!tx_bytes.is_empty());
    assert_eq!(signatures.len(), 1);
    assert_eq!(request_type, "WaitForEffectsCert");
    assert_eq!(node.lookup_count("d7"), 3);
}

#[tokio::test]
async fn test_rejected_signature_is_never_executed() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    let (url, _handle) = serve(node.clone()).await;

    let executor =
        RpcTransactionExecutor::new(http_client(&url).unwrap(), FakeWallet { reject: true });
    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let creator = JournalCreator::new(
        executor,
        ledger,
        NetworkVariables::new(url.clone()).with_journal_package_id("0xpkg"),
        Duration::from_secs(10),
        JournalMetrics::new_for_tests(),
    );

    let report = creator
        .create("My Diary", Some(&SuiAddress::new("0xuser1")))
        .await;

    assert_eq!(
        report.result,
        OperationResult::Failure(JournalError::UserRejected(
            "User rejected the request".into()
        ))
    );
    let node = node.lock().unwrap();
    assert!(node.executed.is_empty());
    assert!(node.lookups.is_empty());
}

#[tokio::test]
async fn test_fullnode_fault_on_submit_is_not_blamed_on_transaction() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    node.lock().unwrap().execute_error = Some(internal_error("node overloaded"));
    let (url, _handle) = serve(node.clone()).await;

    let executor =
        RpcTransactionExecutor::new(http_client(&url).unwrap(), FakeWallet { reject: false });
    let ledger = RpcLedgerReader::from_url(&url, POLL_INTERVAL).unwrap();
    let creator = JournalCreator::new(
        executor,
        ledger,
        NetworkVariables::new(url.clone()).with_journal_package_id("0xpkg"),
        Duration::from_secs(10),
        JournalMetrics::new_for_tests(),
    );

    let report = creator
        .create("My Diary", Some(&SuiAddress::new("0xuser1")))
        .await;

    assert_eq!(
        report.result,
        OperationResult::Failure(JournalError::Submission(
            "RPC error -32603: node overloaded".into()
        ))
    );
    assert!(node.lock().unwrap().lookups.is_empty());
}

#[tokio::test]
async fn test_confirm_command_prints_created_object() {
    let node = Arc::new(Mutex::new(FakeFullnode::new(NotFoundStyle::Marker)));
    node.lock()
        .unwrap()
        .finalize("d5", 1, json!({ "status": "success" }), &["0xjournal5"]);
    let (url, _handle) = serve(node.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("networks.yaml");
    let mut networks = NetworkConfig::default();
    networks
        .networks
        .insert("localnet".to_owned(), NetworkVariables::new(url));
    networks.save(&path).unwrap();

    let config = JournalConfig {
        network: "localnet".to_owned(),
        config: Some(path),
        poll_interval_ms: 10,
        ..Default::default()
    };
    let mut out = Vec::new();
    JournalCommand::Confirm {
        digest: TransactionDigest::new("d5"),
    }
    .execute(&config, &mut out)
    .await
    .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "0xjournal5\n");
    assert_eq!(node.lock().unwrap().lookup_count("d5"), 2);
}
