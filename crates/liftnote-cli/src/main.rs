//! CLI entry point for liftnote.
//!
//! This binary provides the `liftnote` command with subcommands for one-shot
//! parsing, interactive note editing, and serving the HTTP API.

mod cli;
mod helpers;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use liftnote_parser::format_records;
use liftnote_web::{WebConfig, WebServer};

use crate::cli::{Cli, Commands};
use crate::helpers::{build_parser, init_tracing, load_gateway_config, resolve_port};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        Commands::Parse { .. } | Commands::Edit { .. } => "warn",
    };
    init_tracing(cli.log_level.as_deref().unwrap_or(default_level), cli.json_logs);

    let config = load_gateway_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { text, summary } => cmd_parse(config, &text.join(" "), summary).await,
        Commands::Edit { title } => repl::cmd_edit(build_parser(config)?, title).await,
        Commands::Serve { bind, port } => cmd_serve(config, bind, port).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: parse
// ---------------------------------------------------------------------------

async fn cmd_parse(config: liftnote_agent::GatewayConfig, text: &str, summary: bool) -> Result<()> {
    let parser = build_parser(config)?;
    let records = parser.parse(text).await.context("failed to parse workout")?;

    if summary {
        if records.is_empty() {
            println!("no exercises found");
        } else {
            println!("{}", format_records(&records));
        }
    } else {
        let json = serde_json::to_string_pretty(&records).context("failed to encode records")?;
        println!("{json}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config: liftnote_agent::GatewayConfig,
    bind: String,
    port: Option<u16>,
) -> Result<()> {
    let model = config.model.clone();
    let parser = build_parser(config)?;

    let port = resolve_port(port, std::env::var("PORT").ok().as_deref());
    let server = WebServer::new(
        WebConfig {
            bind_addr: bind,
            port,
        },
        parser,
        model,
    );

    info!(addr = %server.addr(), "liftnote API listening");
    server.start().await.context("web server failed")
}
