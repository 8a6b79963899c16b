//! Shared helpers for the CLI subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftnote_agent::GatewayConfig;
use liftnote_parser::WorkoutParser;
use liftnote_web::DEFAULT_PORT;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`.  Logs go to stderr so that command
/// output on stdout stays machine-readable.
pub fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Resolve the gateway configuration: defaults, the optional file, then
/// the environment (including a `.env` file in the working directory).
pub fn load_gateway_config(path: Option<&Path>) -> Result<GatewayConfig> {
    if let Ok(env_path) = dotenvy::dotenv() {
        info!(path = %env_path.display(), "loaded .env");
    }
    GatewayConfig::load(path).context("failed to load gateway configuration")
}

/// Build the parser backed by the configured model.
pub fn build_parser(config: GatewayConfig) -> Result<WorkoutParser> {
    let model = config.model.clone();
    let provider = config.provider.as_str();
    let parser = WorkoutParser::from_config(config).context("failed to create LLM client")?;
    info!(model = %model, provider, "LLM client ready");
    Ok(parser)
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Pick the port: the flag, else `PORT`, else the default.
pub fn resolve_port(flag: Option<u16>, env_port: Option<&str>) -> u16 {
    flag.or_else(|| env_port.and_then(|p| p.trim().parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_precedence() {
        assert_eq!(resolve_port(Some(8080), Some("9000")), 8080);
        assert_eq!(resolve_port(None, Some("9000")), 9000);
        assert_eq!(resolve_port(None, Some(" 9001 ")), 9001);
        assert_eq!(resolve_port(None, Some("not-a-port")), DEFAULT_PORT);
        assert_eq!(resolve_port(None, None), DEFAULT_PORT);
    }
}
