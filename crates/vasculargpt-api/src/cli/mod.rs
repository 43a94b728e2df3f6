//! CLI command definitions for the `vasculargpt` binary.

pub mod ask;
pub mod chat;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vasculargpt_infra::config::DEFAULT_CONFIG_FILE;

/// Retrieval-augmented question answering over vascular medicine documents.
#[derive(Parser)]
#[command(name = "vasculargpt", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file.
    #[arg(long, global = true, env = "VASCULARGPT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask a single question and print the answer with its top source.
    Ask {
        /// The question to ask.
        question: String,
    },

    /// Interactive multi-turn chat in the terminal.
    Chat,
}
