// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transaction effects as reported by the fullnode, and extraction of the
//! object a transaction created.

use crate::base_types::{ObjectID, SuiAddress, TransactionDigest};
use crate::errors::{JournalError, JournalResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::warn;

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

impl ExecutionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectID,
    #[serde(default, deserialize_with = "number_or_string")]
    pub version: u64,
    #[serde(default)]
    pub digest: String,
}

impl ObjectRef {
    pub fn new(object_id: impl Into<ObjectID>) -> Self {
        Self {
            object_id: object_id.into(),
            version: 0,
            digest: String::new(),
        }
    }
}

/// Fullnodes disagree on whether versions are JSON numbers or strings.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct OwnedObjectRef {
    /// Owner exactly as the fullnode reported it.
    #[serde(default)]
    pub owner: serde_json::Value,
    pub reference: ObjectRef,
}

impl OwnedObjectRef {
    pub fn new(object_id: impl Into<ObjectID>) -> Self {
        Self {
            owner: serde_json::Value::Null,
            reference: ObjectRef::new(object_id),
        }
    }

    pub fn object_id(&self) -> &ObjectID {
        &self.reference.object_id
    }

    pub fn address_owner(&self) -> Option<SuiAddress> {
        self.owner
            .get("AddressOwner")
            .and_then(|v| v.as_str())
            .map(SuiAddress::from)
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    pub transaction_digest: TransactionDigest,
    /// New objects, in the order the fullnode returned them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<OwnedObjectRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutated: Vec<OwnedObjectRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<ObjectRef>,
}

impl TransactionEffects {
    pub fn new(digest: TransactionDigest, status: ExecutionStatus) -> Self {
        Self {
            status,
            transaction_digest: digest,
            created: vec![],
            mutated: vec![],
            deleted: vec![],
        }
    }

    pub fn with_created(mut self, created: Vec<OwnedObjectRef>) -> Self {
        self.created = created;
        self
    }

    pub fn created(&self) -> &[OwnedObjectRef] {
        &self.created
    }

    /// Reverted transactions are reported as `ExecutionFailure`.
    pub fn ensure_success(&self) -> JournalResult<()> {
        match &self.status {
            ExecutionStatus::Success => Ok(()),
            ExecutionStatus::Failure { error } => Err(JournalError::ExecutionFailure {
                digest: self.transaction_digest.clone(),
                error: error.clone(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: TransactionDigest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_local_execution: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionResponseOptions {
    pub show_input: bool,
    pub show_effects: bool,
    pub show_events: bool,
    pub show_object_changes: bool,
    pub show_balance_changes: bool,
}

impl TransactionResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effects(mut self) -> Self {
        self.show_effects = true;
        self
    }
}

/// Which created object is taken as the result of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedObjectSelector {
    /// Element zero in the order the fullnode reports. Transactions that create
    /// several objects are not disambiguated.
    #[default]
    First,
    Nth(usize),
    /// Exactly one object must have been created.
    Unique,
}

impl Display for CreatedObjectSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Nth(n) => write!(f, "{n}"),
            Self::Unique => write!(f, "unique"),
        }
    }
}

impl FromStr for CreatedObjectSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first" => Ok(Self::First),
            "unique" => Ok(Self::Unique),
            other => other
                .parse::<usize>()
                .map(Self::Nth)
                .map_err(|_| format!("expected `first`, `unique` or an index, got `{other}`")),
        }
    }
}

/// Pick the id of the created object according to `selector`.
pub fn extract_created_object(
    effects: &TransactionEffects,
    selector: CreatedObjectSelector,
) -> JournalResult<ObjectID> {
    let created = effects.created();
    let not_found = || JournalError::ObjectNotFound {
        digest: effects.transaction_digest.clone(),
    };
    let picked = match selector {
        CreatedObjectSelector::First => created.first(),
        CreatedObjectSelector::Nth(n) => created.get(n),
        CreatedObjectSelector::Unique => {
            if created.len() > 1 {
                warn!(
                    digest = %effects.transaction_digest,
                    count = created.len(),
                    "Expected exactly one created object"
                );
                return Err(not_found());
            }
            created.first()
        }
    };
    picked.map(|obj| obj.object_id().clone()).ok_or_else(not_found)
}
