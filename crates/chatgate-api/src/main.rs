//! chatgate CLI and HTTP proxy entry point.
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! requested command or starts the proxy server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use tracing::{info, warn};

use chatgate_infra::config::load_proxy_config;
use chatgate_observe::tracing_setup::{init_tracing, shutdown_tracing};
use chatgate_types::config::ProxyConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatgate", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.log_filter(), cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    let config = load_proxy_config(cli.config.as_deref()).await;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(config, &host, port, cli.quiet).await,
        Commands::Health => match AppState::init(config) {
            Ok(state) => cli::health::check_health(&state, cli.json).await,
            Err(e) => Err(e),
        },
        Commands::Config => cli::config::show_config(&config, cli.json),
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

async fn serve(config: ProxyConfig, host: &str, port: u16, quiet: bool) -> anyhow::Result<()> {
    let state = AppState::init(config)?;
    state.scheduler.start();

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        backend = %state.config.redacted_backend_url(),
        environment = %state.config.environment,
        "chatgate listening"
    );
    if !quiet {
        println!(
            "  {} chatgate listening on {} -> {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan(),
            console::style(state.config.redacted_backend_url()).dim()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state.clone());

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.scheduler.shutdown().await;
    info!("server stopped");
    served.context("server error")
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
