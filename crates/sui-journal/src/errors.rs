// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::TransactionDigest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub type JournalResult<T = ()> = Result<T, JournalError>;

/// Terminal failure of one create-journal attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalError {
    #[error("Journal package is not configured: {0}")]
    Configuration(String),

    #[error("No account is connected to sign the transaction")]
    NoSigner,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction was rejected by the signer: {0}")]
    UserRejected(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Could not confirm transaction {digest}: {reason}")]
    Confirmation {
        digest: TransactionDigest,
        reason: String,
    },

    #[error("Transaction {digest} reverted: {error}")]
    ExecutionFailure {
        digest: TransactionDigest,
        error: String,
    },

    #[error("Transaction {digest} did not create the expected object")]
    ObjectNotFound { digest: TransactionDigest },

    #[error("A journal creation is already in progress")]
    SubmissionInProgress,
}

impl JournalError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JournalError::Configuration(_) => "configuration",
            JournalError::NoSigner => "no_signer",
            JournalError::InvalidInput(_) => "invalid_input",
            JournalError::UserRejected(_) => "user_rejected",
            JournalError::Submission(_) => "submission",
            JournalError::Confirmation { .. } => "confirmation",
            JournalError::ExecutionFailure { .. } => "execution_failure",
            JournalError::ObjectNotFound { .. } => "object_not_found",
            JournalError::SubmissionInProgress => "in_progress",
        }
    }

    /// Whether the failure happened after the transaction left the client.
    pub fn is_post_submission(&self) -> bool {
        matches!(
            self,
            JournalError::Confirmation { .. }
                | JournalError::ExecutionFailure { .. }
                | JournalError::ObjectNotFound { .. }
        )
    }

    /// Map a submission-side collaborator error onto the attempt's taxonomy.
    pub fn from_submission(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Rejected(reason) => JournalError::UserRejected(reason),
            other => JournalError::Submission(other.to_string()),
        }
    }

    /// Map a ledger wait error for `digest` onto the attempt's taxonomy.
    pub fn from_confirmation(digest: TransactionDigest, err: ExecutionError) -> Self {
        JournalError::Confirmation {
            digest,
            reason: err.to_string(),
        }
    }
}

/// Errors raised by the signer, executor and ledger collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid transaction: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to confirm tx status for {0} within {1:?}.")]
    ConfirmationTimeout(TransactionDigest, Duration),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Data error: {0}")]
    DataError(String),
}

impl From<jsonrpsee::core::ClientError> for ExecutionError {
    fn from(err: jsonrpsee::core::ClientError) -> Self {
        use jsonrpsee::core::ClientError;
        use jsonrpsee::types::error::{INVALID_PARAMS_CODE, INVALID_REQUEST_CODE};
        match err {
            ClientError::Call(obj)
                if obj.code() == INVALID_PARAMS_CODE || obj.code() == INVALID_REQUEST_CODE =>
            {
                ExecutionError::InvalidRequest(obj.message().to_owned())
            }
            ClientError::Call(obj) => ExecutionError::Rpc {
                code: obj.code(),
                message: obj.message().to_owned(),
            },
            ClientError::ParseError(e) => ExecutionError::DataError(e.to_string()),
            other => ExecutionError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ExecutionError {
    fn from(err: serde_json::Error) -> Self {
        ExecutionError::DataError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown network `{0}`")]
    UnknownNetwork(String),

    #[error("Cannot access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
