// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::ObjectID;
use crate::errors::JournalError;
use serde::{Deserialize, Serialize};

/// Terminal outcome of one create-journal attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    Success(ObjectID),
    Failure(JournalError),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    /// Runs `on_created` on success; on failure returns the message to show the user.
    pub fn report<F: FnOnce(ObjectID)>(self, on_created: F) -> Option<String> {
        match self {
            OperationResult::Success(id) => {
                on_created(id);
                None
            }
            OperationResult::Failure(err) => Some(failure_message(&err)),
        }
    }
}

impl From<Result<ObjectID, JournalError>> for OperationResult {
    fn from(result: Result<ObjectID, JournalError>) -> Self {
        match result {
            Ok(id) => OperationResult::Success(id),
            Err(e) => OperationResult::Failure(e),
        }
    }
}

/// Human-readable message for a failed attempt.
pub fn failure_message(err: &JournalError) -> String {
    match err {
        JournalError::Configuration(_) => "Journal contract not deployed yet. Please deploy the \
             journal contract first and update the package ID in the network config"
            .to_owned(),
        JournalError::NoSigner => "Connect a wallet to create a journal".to_owned(),
        JournalError::InvalidInput(reason) => format!("Cannot create journal: {reason}"),
        JournalError::UserRejected(reason) => format!("Transaction rejected: {reason}"),
        JournalError::Submission(reason) if reason.is_empty() => {
            "Transaction failed: Unknown error".to_owned()
        }
        JournalError::Submission(reason) => format!("Transaction failed: {reason}"),
        JournalError::Confirmation { .. } => {
            "Transaction completed but failed to get journal ID".to_owned()
        }
        JournalError::ExecutionFailure { error, .. } => {
            format!("Transaction was executed but reverted: {error}")
        }
        JournalError::ObjectNotFound { .. } => {
            "Failed to get journal ID from transaction".to_owned()
        }
        JournalError::SubmissionInProgress => {
            "A journal is already being created, please wait".to_owned()
        }
    }
}
