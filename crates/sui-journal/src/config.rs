// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::ObjectID;
use crate::effects::CreatedObjectSelector;
use crate::errors::{ConfigError, JournalError, JournalResult};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Package id placeholder shipped before the journal package is published.
pub const UNCONFIGURED_PACKAGE_ID: &str = "0xTODO";

pub const DEFAULT_NETWORK: &str = "testnet";
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;

/// Per-network values the journal client needs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkVariables {
    /// JSON-RPC endpoint of a fullnode.
    pub url: String,
    /// Id of the published package containing the `journal` module.
    #[serde(default = "unconfigured_package_id")]
    pub journal_package_id: String,
}

fn unconfigured_package_id() -> String {
    UNCONFIGURED_PACKAGE_ID.to_owned()
}

impl NetworkVariables {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            journal_package_id: unconfigured_package_id(),
        }
    }

    pub fn with_journal_package_id(mut self, id: impl Into<String>) -> Self {
        self.journal_package_id = id.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        is_configured_package_id(&self.journal_package_id)
    }

    /// The journal package id, or a configuration error if it is still the placeholder.
    pub fn journal_package(&self) -> JournalResult<ObjectID> {
        if !self.is_configured() {
            return Err(JournalError::Configuration(format!(
                "journal package id is `{}`; publish the journal package and set \
                 `journal_package_id` for this network",
                self.journal_package_id
            )));
        }
        Ok(ObjectID::new(self.journal_package_id.trim()))
    }
}

pub fn is_configured_package_id(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty() && id != UNCONFIGURED_PACKAGE_ID
}

/// Logical network name to network variables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub networks: BTreeMap<String, NetworkVariables>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let networks = [
            ("devnet", "https://fullnode.devnet.sui.io:443"),
            ("testnet", "https://fullnode.testnet.sui.io:443"),
            ("mainnet", "https://fullnode.mainnet.sui.io:443"),
            ("localnet", "http://127.0.0.1:9000"),
        ]
        .into_iter()
        .map(|(name, url)| (name.to_owned(), NetworkVariables::new(url)))
        .collect();
        Self { networks }
    }
}

impl NetworkConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Reading network config from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        info!("Writing network config to {:?}", path);
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `path` if given, otherwise fall back to the built-in networks.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn network(&self, name: &str) -> Result<&NetworkVariables, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_owned()))
    }

    pub fn set_journal_package_id(
        &mut self,
        network: &str,
        id: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let vars = self
            .networks
            .get_mut(network)
            .ok_or_else(|| ConfigError::UnknownNetwork(network.to_owned()))?;
        vars.journal_package_id = id.into();
        Ok(())
    }
}

#[derive(Parser, Clone, Debug)]
#[clap(rename_all = "kebab-case")]
pub struct JournalConfig {
    /// Network whose variables are used
    #[clap(long, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Path to the network config YAML; the built-in networks are used when absent
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(long, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT_SECS)]
    pub confirmation_timeout_secs: u64,

    #[clap(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Which created object is the journal: `first`, `unique` or an index
    #[clap(long, default_value = "first")]
    pub created_object_selector: CreatedObjectSelector,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_owned(),
            config: None,
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            created_object_selector: CreatedObjectSelector::First,
        }
    }
}

impl JournalConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn network_config(&self) -> Result<NetworkConfig, ConfigError> {
        NetworkConfig::load_or_default(self.config.as_deref())
    }
}
