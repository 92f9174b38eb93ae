//! ePrompt API server.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eprompt_config::{LogFormat, Settings};
use eprompt_server::{AppState, resolve_addr, serve, shutdown_signal};
use eprompt_telemetry::{DEFAULT_LOG_DIRECTIVE, init_tracing};
use tracing::info;

/// Serve the ePrompt API.
///
/// Settings come from the environment; flags override them.
#[derive(Debug, Parser)]
#[command(name = "eprompt-server", version, about)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log line format: `pretty` or `json`.
    #[arg(long, env = "LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env().context("failed to load settings")?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(format) = cli.log_format {
        settings.log_format = format;
    }

    init_tracing(settings.log_format, DEFAULT_LOG_DIRECTIVE)
        .context("failed to initialise logging")?;

    let addr = resolve_addr(&settings.host, settings.port).await?;
    info!(
        project = %settings.project_name,
        api_prefix = %settings.api_prefix,
        openai_host = %settings.openai_api_host,
        "starting"
    );

    let state = Arc::new(AppState::from_settings(settings).context("failed to build application state")?);
    serve(state, addr, shutdown_signal())
        .await
        .context("server failed")?;

    info!("server shut down cleanly");
    Ok(())
}
