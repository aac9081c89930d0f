//! AutoStream - assistant chat client CLI
//!
#![doc = "AutoStream - assistant chat client CLI"]
#![doc = "Main entry point for the AutoStream chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autostream::cli::{Cli, Commands, SessionCommand};
use autostream::commands;
use autostream::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Session { command } => match command {
            SessionCommand::Show => {
                commands::session::show(&config)?;
                Ok(())
            }
            SessionCommand::Reset => {
                commands::session::reset(&config)?;
                Ok(())
            }
        },
    }
}

/// Initialize the tracing subscriber with env-filter support
///
/// Respects `RUST_LOG` when set; otherwise defaults to info-level output
/// for this crate only, or debug-level with `--verbose`.
fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Default filter directive when `RUST_LOG` is unset
fn default_log_directive(verbose: bool) -> &'static str {
    if verbose {
        "autostream=debug"
    } else {
        "autostream=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directive_levels() {
        assert_eq!(default_log_directive(false), "autostream=info");
        assert_eq!(default_log_directive(true), "autostream=debug");
    }

    #[test]
    fn test_default_log_directives_parse_as_filters() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_log_directive(verbose)).is_ok());
        }
    }
}
