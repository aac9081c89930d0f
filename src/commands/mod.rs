/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`    - Interactive chat session
- `session` - Session token maintenance

These handlers are intentionally small and use the library components:
the controller, backend, and session store.
*/

use crate::error::Result;

/// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Instantiates the HTTP backend and session store, creates a
    //! `ChatController`, and runs a readline-based loop that feeds user
    //! input through the composer and renders transcript deltas after each
    //! resolved turn.

    use super::*;
    use crate::backend::HttpBackend;
    use crate::config::Config;
    use crate::controller::ChatController;
    use crate::markdown::{render_blocks, Segment};
    use crate::session::SessionStore;
    use crate::transcript::{ChatMessage, MessageKind, PENDING_STATUS_TEXT};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error only on backend construction or readline setup
    /// failure; failed turns surface in the transcript, never here.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let backend = HttpBackend::new(&config.backend)?;
        let session = SessionStore::open(config.session.resolved_storage_path());
        let mut controller = ChatController::new(Box::new(backend), session);

        if config.chat.show_welcome {
            controller.seed_welcome(&config.chat.welcome_message);
        }

        let mut rl = DefaultEditor::new()?;
        let mut rendered = 0;
        rendered = render_new_entries(&controller, rendered);

        println!(
            "{}",
            "Type '/help' for available commands, 'exit' to quit\n".dimmed()
        );

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match trimmed {
                        "exit" | "quit" => break,
                        "/help" => {
                            print_help();
                            continue;
                        }
                        "/session" => {
                            println!("Session: {}\n", controller.session_token());
                            continue;
                        }
                        _ => {}
                    }

                    rl.add_history_entry(trimmed)?;

                    controller.composer_mut().set_text(line.as_str());
                    println!("{}", PENDING_STATUS_TEXT.italic().dimmed());
                    controller.submit().await;
                    rendered = render_new_entries(&controller, rendered);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Print transcript entries appended since the last render
    ///
    /// Returns the new high-water mark. Pending placeholders are skipped:
    /// by the time the loop renders, the turn has resolved and the
    /// placeholder is gone from the snapshot anyway.
    fn render_new_entries(controller: &ChatController, rendered: usize) -> usize {
        let snapshot = controller.transcript().snapshot();
        for message in &snapshot[rendered.min(snapshot.len())..] {
            print_message(message);
        }
        snapshot.len()
    }

    /// Print one transcript entry
    ///
    /// Assistant-originated text (system/agent/error) goes through the
    /// markdown renderer with emphasis shown bold; user text is echoed
    /// raw; emphasis parsing is scoped to the assistant channel.
    fn print_message(message: &ChatMessage) {
        match message.kind {
            MessageKind::User => {
                println!("{} {}", "you:".cyan().bold(), message.text);
            }
            MessageKind::System | MessageKind::Agent | MessageKind::Error => {
                let label = match message.kind {
                    MessageKind::Error => "assistant:".red().bold(),
                    _ => "assistant:".green().bold(),
                };
                print!("{} ", label);
                let blocks = render_blocks(&message.text);
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    for segment in block {
                        match segment {
                            Segment::Plain(text) => print!("{}", text),
                            Segment::Emphasis(text) => print!("{}", text.bold()),
                        }
                    }
                }
                println!();
            }
            MessageKind::Pending => {
                println!("{}", message.text.italic().dimmed());
            }
        }
        if let Some(timestamp) = &message.timestamp {
            println!("{}\n", timestamp.dimmed());
        } else {
            println!();
        }
    }

    /// Print available special commands
    fn print_help() {
        println!("Available commands:");
        println!("  /help     Show this help");
        println!("  /session  Show the current session token");
        println!("  exit      Quit the chat\n");
    }
}

/// Session maintenance command handlers
pub mod session {
    //! Handlers for `session show` and `session reset`.

    use super::*;
    use crate::config::Config;
    use crate::session::SessionStore;

    /// Print the current session token, creating one if none is persisted
    pub fn show(config: &Config) -> Result<()> {
        let mut store = SessionStore::open(config.session.resolved_storage_path());
        println!("{}", store.acquire());
        Ok(())
    }

    /// Discard the persisted token and print the fresh replacement
    pub fn reset(config: &Config) -> Result<()> {
        let mut store = SessionStore::open(config.session.resolved_storage_path());
        let token = store.reset();
        tracing::info!("Session token reset");
        println!("{}", token);
        Ok(())
    }
}
