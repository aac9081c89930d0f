//! Command-line interface definition for the AutoStream chat client
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat command and session maintenance.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AutoStream - chat with the AutoStream assistant service
///
/// Maintains a single-session transcript against the remote assistant,
/// with a durable session token persisted between runs.
#[derive(Parser, Debug, Clone)]
#[command(name = "autostream")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the assistant endpoint URL
    #[arg(long, env = "AUTOSTREAM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override the session database path
    #[arg(long, env = "AUTOSTREAM_SESSION_DB")]
    pub session_db: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Inspect or reset the persisted session token
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session maintenance subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// Print the current session token
    Show,

    /// Discard the persisted token and generate a fresh one
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
