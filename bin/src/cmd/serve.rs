//! The `serve` subcommand.

use anyhow::Result;
use intrinsic_server::{AppState, ServiceConfig};

/// Replace environment settings with any flags given on the command line.
pub(crate) fn apply_overrides(
    config: &mut ServiceConfig,
    host: Option<String>,
    port: Option<u16>,
    cors_origin: Option<String>,
) {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(origin) = cors_origin {
        config.cors_origin = origin;
    }
}

/// Serve the HTTP API over the live providers until Ctrl-C.
pub(crate) async fn run(config: &ServiceConfig) -> Result<()> {
    tracing::debug!(?config, "starting service");
    let state = AppState::live(config)?;
    intrinsic_server::serve(state, config).await?;
    Ok(())
}
