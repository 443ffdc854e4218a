// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::config::UNCONFIGURED_PACKAGE_ID;
use crate::errors::JournalError;
use serde_json::Value;
use std::path::Path;

fn config_for(network: &str, path: &Path) -> JournalConfig {
    JournalConfig {
        network: network.to_owned(),
        config: Some(path.to_owned()),
        ..Default::default()
    }
}

async fn run(command: JournalCommand, config: &JournalConfig) -> Result<String, anyhow::Error> {
    let mut out = Vec::new();
    command.execute(config, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_build_prints_transaction_and_input_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("networks.yaml");
    let mut networks = NetworkConfig::default();
    networks.set_journal_package_id("localnet", "0x2").unwrap();
    networks.save(&path).unwrap();

    let output = run(
        JournalCommand::Build {
            title: "My Diary".into(),
            recipient: SuiAddress::new("0x1"),
        },
        &config_for("localnet", &path),
    )
    .await
    .unwrap();
    let output: Value = serde_json::from_str(&output).unwrap();

    let tx = &output["transaction"];
    assert_eq!(tx["inputs"][0]["pure"]["value"], "My Diary");
    assert_eq!(tx["inputs"][1]["pure"]["value"], "0x1");
    assert_eq!(tx["commands"].as_array().unwrap().len(), 2);
    assert_eq!(tx["commands"][0]["MoveCall"]["target"]["package"], "0x2");
    assert_eq!(tx["commands"][0]["MoveCall"]["target"]["function"], "new_journal");

    let mut address = [0u8; 32];
    address[31] = 1;
    assert_eq!(
        output["inputBytes"],
        serde_json::json!([
            BASE64_STANDARD.encode(bcs::to_bytes("My Diary").unwrap()),
            BASE64_STANDARD.encode(address),
        ])
    );
}

#[tokio::test]
async fn test_build_refuses_unconfigured_network() {
    let err = run(
        JournalCommand::Build {
            title: "My Diary".into(),
            recipient: SuiAddress::new("0x1"),
        },
        &JournalConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<JournalError>(),
        Some(JournalError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_init_config_records_package_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.yaml");

    let output = run(
        JournalCommand::InitConfig {
            path: path.clone(),
            journal_package_id: Some("0xpkg".into()),
        },
        &config_for("devnet", &path),
    )
    .await
    .unwrap();
    assert!(output.contains("journal.yaml"));

    let written = NetworkConfig::load(&path).unwrap();
    assert_eq!(written.network("devnet").unwrap().journal_package_id, "0xpkg");
    assert_eq!(
        written.network("testnet").unwrap().journal_package_id,
        UNCONFIGURED_PACKAGE_ID
    );
}

#[tokio::test]
async fn test_init_config_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.yaml");
    std::fs::write(&path, "networks: {}\n").unwrap();

    let err = run(
        JournalCommand::InitConfig {
            path: path.clone(),
            journal_package_id: None,
        },
        &JournalConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "networks: {}\n");
}
