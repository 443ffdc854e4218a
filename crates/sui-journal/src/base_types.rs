// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identifiers exchanged with the ledger. The journal client never interprets
//! their contents: they are carried verbatim between the wallet, the fullnode
//! and the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(IdParseError(stringify!($name)));
                }
                Ok(Self(s.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Id of an on-chain object, e.g. a published package or a created journal.
    ObjectID
);

opaque_id!(
    /// Account address owning objects and signing transactions.
    SuiAddress
);

opaque_id!(
    /// Digest returned by the executor for a submitted transaction.
    TransactionDigest
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} must not be empty")]
pub struct IdParseError(&'static str);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        let id: ObjectID = "  0xabc ".parse().unwrap();
        assert_eq!(id.as_str(), "0xabc");
        assert!("   ".parse::<SuiAddress>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let digest = TransactionDigest::new("d1");
        assert_eq!(serde_json::to_string(&digest).unwrap(), "\"d1\"");
        let back: TransactionDigest = serde_json::from_str("\"d1\"").unwrap();
        assert_eq!(back, digest);
    }
}
