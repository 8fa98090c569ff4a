//! cms-console - terminal admin console for a headless CMS.
//!
//! # Examples
//!
//! ```bash
//! # Log in (password from CMS_PASSWORD or an interactive prompt)
//! cms-console login --identifier admin
//!
//! # List published videos, newest first
//! cms-console videos list --filter status=published --sort createdAt:desc --pretty
//!
//! # Approve a pending comment
//! cms-console comments moderate <id> approve
//! ```

mod cli;
mod commands;
mod logging;
mod navigator;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cms_console_core::config::CredentialBackend;
use cms_console_core::{ApiClient, Config, SessionManager};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::navigator::TerminalNavigator;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logging::init_tracing(cli.log_dir.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    if cli.keyring {
        config.credential_backend = CredentialBackend::Keyring;
    }

    let api_url = cli.api_url.clone().unwrap_or_else(|| config.api_url());
    debug!(%api_url, backend = ?config.credential_backend, "Config loaded");

    let api = ApiClient::with_timeout(
        &api_url,
        config.request_timeout(),
        config.credential_store()?,
        Arc::new(TerminalNavigator),
    )?;
    let session = SessionManager::new(api);

    if commands::needs_restored_session(&cli.command) {
        let state = session.restore_session().await?;
        info!(?state, "Session restore finished");
    }

    let value = commands::execute(cli.command, &session, &mut config).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", output);
    Ok(())
}
