use anyhow::{Context, Result};
use clap::Parser;
use prompt_share_bridge::config;
use prompt_share_bridge::mcp::PromptBridge;
use prompt_share_bridge::upstream::{PromptApi, UpstreamClient};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span};

#[derive(Parser, Debug)]
#[command(name = "prompt-share-bridge")]
#[command(about = "MCP stdio bridge to the Prompt Share API", long_about = None)]
#[command(version)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "PROMPT_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Check the upstream health endpoint and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // Logging is not up yet when configuration fails
            if tracing::dispatcher::has_been_set() {
                error!("Failed to start bridge: {:#}", e);
            } else {
                eprintln!("Failed to start bridge: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config =
        config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.logging.format = log_format;
    }
    config::validate_config(&config)?;

    init_logging(&config.logging)?;

    let client = UpstreamClient::new(&config.upstream)?;

    if cli.check {
        return Ok(if client.health_check().await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    print_banner(&client);

    let bridge =
        PromptBridge::new(Arc::new(client)).with_span(info_span!("mcp", transport = "stdio"));

    let ct = CancellationToken::new();
    let service = bridge
        .clone()
        .serve_with_ct(stdio(), ct.clone())
        .await
        .context("Failed to connect MCP stdio transport")?;

    info!("Ready for MCP client connections");

    // The handshake must not wait on the upstream
    tokio::spawn(async move { bridge.check_upstream().await });

    tokio::spawn(shutdown_signal(ct));

    let quit_reason = service.waiting().await?;
    info!("MCP server stopped: {:?}", quit_reason);

    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal(ct: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal, shutting down..."),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
    }
    ct.cancel();
}

fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // stdout carries the MCP protocol, so logs go to stderr
    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

fn print_banner(client: &UpstreamClient) {
    let version = env!("CARGO_PKG_VERSION");
    let width = 59usize;
    let border = "═".repeat(width + 2);
    let line = |content: &str| {
        info!("║ {:width$} ║", content, width = width);
    };

    info!("╔{}╗", border);
    line("PROMPT-SHARE-BRIDGE");
    line(&format!("MCP stdio bridge v{}", version));
    info!("╚{}╝", border);
    info!("  → API address: {}", client.base_url());
    info!("  → Request timeout: {:?}", client.timeout());
}
