// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gip: list git commits across grouped repositories within a given time period
//!
//! This binary crate parses the command line, sets up logging, and hands
//! the command to the library's handlers.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::debug;

use gip::config::Config;
use gip::handlers;
use gip::render::terminal_width;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only tables and JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate().context("Invalid configuration")?;

    if config.command.is_none() {
        Config::command().print_help()?;
        return Ok(());
    }

    let registry = config.registry_path();
    debug!(registry = %registry.display(), "Using registry");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    handlers::run(&config, &mut out, terminal_width())
        .await
        .with_context(|| format!("gip failed (registry: {})", registry.display()))?;

    Ok(())
}
