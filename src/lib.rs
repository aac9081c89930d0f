//! AutoStream - chat client library for the AutoStream assistant service
//!
//! This library provides the core functionality for the AutoStream chat
//! client, including the turn orchestrator, transcript management, markdown
//! emphasis rendering, session identity, and the HTTP backend.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `controller`: Turn lifecycle orchestration over transcript and backend
//! - `transcript`: Append-only chat transcript with pending placeholders
//! - `composer`: Draft buffer and submission guards
//! - `markdown`: Line-oriented bold emphasis rendering
//! - `session`: Durable session token acquisition and storage
//! - `backend`: Assistant service trait and HTTP implementation
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use autostream::cli::Cli;
//! use autostream::config::Config;
//! use clap::Parser;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cli = Cli::parse_from(["autostream", "chat"]);
//! let config = Config::load("config/config.yaml", &cli)?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
pub mod markdown;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use backend::{AssistantBackend, ChatReply, HttpBackend};
pub use composer::{Composer, ComposerAction};
pub use config::Config;
pub use controller::{ChatController, TurnOutcome};
pub use error::{ChatClientError, Result};
pub use markdown::{render_blocks, render_line, Segment};
pub use session::SessionStore;
pub use transcript::{ChatMessage, MessageKind, Transcript};
