//! VascularGPT CLI and web entry point.
//!
//! Binary name: `vasculargpt`
//!
//! Loads `.env`, parses CLI arguments, initializes tracing and the
//! configuration, binds the retriever and chat provider, then dispatches to
//! the requested command or starts the web server.

mod cli;
mod http;
mod state;

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use vasculargpt_infra::config::load_app_config;
use vasculargpt_observe::{init_tracing, shutdown_tracing, verbosity_filter};
use vasculargpt_types::config::AppConfig;

use cli::{Cli, Commands};
use state::AppState;

/// How often idle sessions are swept.
const EVICTION_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` must be loaded before clap reads `VASCULARGPT_CONFIG`.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Ok(path) = &dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = load_app_config(&cli.config).await;
    let result = run(cli, config).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::init(config).await?;
            let sweeper = state.sessions.spawn_eviction(EVICTION_INTERVAL);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} VascularGPT listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            sweeper.abort();
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Ask { question } => {
            let state = AppState::init(config).await?;
            cli::ask::ask(&state, &question, cli.json, cli.quiet).await?;
        }

        Commands::Chat => {
            let state = AppState::init(config).await?;
            cli::chat::run_chat_loop(&state).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
