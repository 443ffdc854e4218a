// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::{SuiAddress, TransactionDigest};
use crate::config::{JournalConfig, NetworkConfig};
use crate::effects::extract_created_object;
use crate::execution::confirm_transaction;
use crate::rpc::RpcLedgerReader;
use crate::transaction::{build_create_journal, MoveCallTarget};
use anyhow::anyhow;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use clap::Subcommand;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "kebab-case")]
pub enum JournalCommand {
    /// Print the create-journal transaction for the selected network without submitting it
    Build {
        #[clap(long)]
        title: String,
        #[clap(long)]
        recipient: SuiAddress,
    },
    /// Wait for a submitted transaction and print the journal it created
    Confirm {
        #[clap(long)]
        digest: TransactionDigest,
    },
    /// Write the built-in network config to a YAML file
    InitConfig {
        #[clap(long, default_value = "journal.yaml")]
        path: PathBuf,
        /// Package id to record for the selected network
        #[clap(long)]
        journal_package_id: Option<String>,
    },
}

impl JournalCommand {
    pub async fn execute<W: Write>(
        self,
        config: &JournalConfig,
        out: &mut W,
    ) -> Result<(), anyhow::Error> {
        match self {
            JournalCommand::Build { title, recipient } => {
                let networks = config.network_config()?;
                let vars = networks.network(&config.network)?;
                let target = MoveCallTarget::new_journal(vars.journal_package()?);
                let tx = build_create_journal(target, &title, recipient)?;
                info!(network = %config.network, %tx, "Built create journal transaction");

                let inputs: Vec<String> = tx
                    .input_bytes()?
                    .iter()
                    .map(|bytes| BASE64_STANDARD.encode(bytes))
                    .collect();
                let output = serde_json::json!({
                    "transaction": tx,
                    "inputBytes": inputs,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            }
            JournalCommand::Confirm { digest } => {
                let networks = config.network_config()?;
                let vars = networks.network(&config.network)?;
                let ledger = RpcLedgerReader::from_url(&vars.url, config.poll_interval())?;
                let effects =
                    confirm_transaction(&ledger, &digest, config.confirmation_timeout()).await?;
                effects.ensure_success()?;
                let object_id = extract_created_object(&effects, config.created_object_selector)?;
                writeln!(out, "{object_id}")?;
            }
            JournalCommand::InitConfig {
                path,
                journal_package_id,
            } => {
                if path.exists() {
                    return Err(anyhow!("{} already exists", path.display()));
                }
                let mut networks = NetworkConfig::default();
                if let Some(id) = journal_package_id {
                    networks.set_journal_package_id(&config.network, id)?;
                }
                networks.save(&path)?;
                writeln!(out, "Network config written to {}", path.display())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "unit_tests/cli_tests.rs"]
mod cli_tests;
