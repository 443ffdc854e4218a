// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::Parser;
use sui_journal::cli::JournalCommand;
use sui_journal::config::JournalConfig;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "sui-journal", rename_all = "kebab-case")]
struct JournalOpt {
    #[clap(flatten)]
    config: JournalConfig,

    #[clap(subcommand)]
    command: JournalCommand,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    set_global_default(subscriber).context("Failed to set subscriber")?;

    let JournalOpt { config, command } = JournalOpt::parse();
    command.execute(&config, &mut std::io::stdout()).await
}
