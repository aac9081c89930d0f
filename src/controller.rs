//! Chat session controller and per-turn request lifecycle
//!
//! The controller drives one round-trip per user turn against the
//! transcript: optimistic append of the user entry, a pending placeholder
//! while the request is in flight, and resolution into either an assistant
//! entry or the generic failure entry. It owns the transcript, the session
//! store, and the composer; the backend is a trait object so the transport
//! can be swapped in tests.
//!
//! All state transitions run on one logical task; the only suspension point
//! is awaiting the backend response. A second submission while a turn is in
//! flight is silently ignored, which keeps the transcript's single-pending
//! invariant without locking. Because every transition borrows the
//! controller mutably, a response can never resolve into a controller that
//! has been dropped.

use crate::backend::{AssistantBackend, ChatReply};
use crate::composer::Composer;
use crate::session::SessionStore;
use crate::transcript::{ChatMessage, Transcript};

/// Fixed reply shown for any failed turn
///
/// The underlying failure detail is a diagnostic concern and goes to the
/// log only.
pub const GENERIC_FAILURE_REPLY: &str =
    "Sorry, I encountered an error. Please make sure the backend server is running and try again.";

/// Result of one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The guard rejected the submission (empty draft or a turn in flight)
    Ignored,
    /// The turn resolved with an assistant reply
    Success,
    /// The turn resolved with the generic failure entry
    Failure,
}

/// Single-session chat controller
///
/// # Examples
///
/// ```no_run
/// use autostream::backend::HttpBackend;
/// use autostream::config::Config;
/// use autostream::controller::ChatController;
/// use autostream::session::SessionStore;
///
/// # async fn example() -> autostream::error::Result<()> {
/// let config = Config::default();
/// let backend = HttpBackend::new(&config.backend)?;
/// let session = SessionStore::in_memory();
/// let mut controller = ChatController::new(Box::new(backend), session);
///
/// controller.composer_mut().set_text("What plans do you offer?");
/// controller.submit().await;
/// # Ok(())
/// # }
/// ```
pub struct ChatController {
    transcript: Transcript,
    session: SessionStore,
    composer: Composer,
    backend: Box<dyn AssistantBackend>,
}

impl ChatController {
    /// Creates a controller with an empty transcript and draft
    pub fn new(backend: Box<dyn AssistantBackend>, session: SessionStore) -> Self {
        Self {
            transcript: Transcript::new(),
            session,
            composer: Composer::new(),
            backend,
        }
    }

    /// Seeds the transcript with a system welcome entry
    pub fn seed_welcome(&mut self, text: &str) {
        self.transcript.append(ChatMessage::system(text));
    }

    /// The transcript, for rendering via [`Transcript::snapshot`]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The input composer
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Mutable access to the input composer
    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// The current session token
    pub fn session_token(&mut self) -> String {
        self.session.acquire()
    }

    /// Whether a turn is currently awaiting its response
    pub fn is_awaiting_response(&self) -> bool {
        self.transcript.has_pending()
    }

    /// Begins a turn: appends the user entry and the pending placeholder
    ///
    /// Returns the submitted text, or `None` when the guard rejects the
    /// submission: the draft is empty/whitespace-only, or a turn is
    /// already in flight. A rejected submission leaves transcript and draft
    /// untouched; it is a no-op, not an error. On acceptance the draft is
    /// cleared regardless of the eventual request outcome.
    pub fn begin_turn(&mut self) -> Option<String> {
        if self.transcript.has_pending() {
            tracing::debug!("Ignoring submission: a turn is already in flight");
            return None;
        }
        let text = self.composer.take_submission()?;
        self.transcript.append(ChatMessage::user(text.clone()));
        self.transcript.append(ChatMessage::pending());
        Some(text)
    }

    /// Submits the current draft and awaits resolution
    ///
    /// Composes the full turn lifecycle: guard, optimistic appends, the
    /// backend round-trip carrying the literal text plus session token, and
    /// pending resolution. Never returns an error; a failed round-trip
    /// resolves into the generic failure entry and the controller returns
    /// to idle, accepting further input.
    pub async fn submit(&mut self) -> TurnOutcome {
        let Some(text) = self.begin_turn() else {
            return TurnOutcome::Ignored;
        };

        let session_id = self.session.acquire();
        match self.backend.send_message(&text, &session_id).await {
            Ok(reply) => {
                self.resolve_success(reply);
                TurnOutcome::Success
            }
            Err(e) => {
                tracing::warn!("Turn failed: {}", e);
                self.resolve_failure();
                TurnOutcome::Failure
            }
        }
    }

    /// Resolution for a well-formed response.
    fn resolve_success(&mut self, reply: ChatReply) {
        if let Some(token) = &reply.session_id {
            self.session.adopt(token);
        }
        self.transcript
            .resolve_pending(ChatMessage::agent(reply.reply));
    }

    /// Resolution for a failed round-trip; detail stays in the log.
    fn resolve_failure(&mut self) {
        self.transcript
            .resolve_pending(ChatMessage::error(GENERIC_FAILURE_REPLY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChatClientError, Result};
    use crate::markdown::{render_line, Segment};
    use crate::transcript::MessageKind;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Backend returning scripted results in order.
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<ChatReply>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<ChatReply>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }

        fn reply(text: &str, session_id: Option<&str>) -> Result<ChatReply> {
            Ok(ChatReply {
                reply: text.to_string(),
                session_id: session_id.map(str::to_string),
            })
        }

        fn failure() -> Result<ChatReply> {
            Err(ChatClientError::Backend("connection refused".to_string()).into())
        }
    }

    #[async_trait]
    impl AssistantBackend for ScriptedBackend {
        async fn send_message(&self, _message: &str, _session_id: &str) -> Result<ChatReply> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(ScriptedBackend::failure)
        }
    }

    fn controller_with(script: Vec<Result<ChatReply>>) -> ChatController {
        ChatController::new(
            Box::new(ScriptedBackend::new(script)),
            SessionStore::in_memory(),
        )
    }

    #[tokio::test]
    async fn test_successful_turn_lifecycle() {
        let mut controller = controller_with(vec![ScriptedBackend::reply("**Hello!**", None)]);
        controller.composer_mut().set_text("Hi **there**");

        let outcome = controller.submit().await;

        assert_eq!(outcome, TurnOutcome::Success);
        assert_eq!(controller.composer().text(), "");
        assert!(!controller.is_awaiting_response());

        let snapshot = controller.transcript().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].kind, MessageKind::User);
        assert_eq!(snapshot[0].text, "Hi **there**");
        assert_eq!(snapshot[1].kind, MessageKind::Agent);
        assert_eq!(snapshot[1].text, "**Hello!**");
        assert!(snapshot[1].timestamp.is_some());

        // The reply renders as a single emphasized segment.
        assert_eq!(
            render_line(&snapshot[1].text),
            vec![Segment::Emphasis("Hello!".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_draft_is_ignored() {
        let mut controller = controller_with(vec![]);
        let outcome = controller.submit().await;
        assert_eq!(outcome, TurnOutcome::Ignored);
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_draft_is_ignored_and_preserved() {
        let mut controller = controller_with(vec![]);
        controller.composer_mut().set_text("   ");
        let outcome = controller.submit().await;
        assert_eq!(outcome, TurnOutcome::Ignored);
        assert!(controller.transcript().is_empty());
        assert_eq!(controller.composer().text(), "   ");
    }

    #[tokio::test]
    async fn test_failed_turn_resolves_to_generic_error() {
        let mut controller = controller_with(vec![ScriptedBackend::failure()]);
        let token_before = controller.session_token();
        controller.composer_mut().set_text("hello?");

        let outcome = controller.submit().await;

        assert_eq!(outcome, TurnOutcome::Failure);
        let snapshot = controller.transcript().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].kind, MessageKind::Error);
        assert_eq!(snapshot[1].text, GENERIC_FAILURE_REPLY);
        assert!(!controller.is_awaiting_response());
        // Failure never touches the session token.
        assert_eq!(controller.session_token(), token_before);
    }

    #[tokio::test]
    async fn test_controller_returns_to_idle_after_failure() {
        let mut controller = controller_with(vec![
            ScriptedBackend::failure(),
            ScriptedBackend::reply("recovered", None),
        ]);

        controller.composer_mut().set_text("first");
        assert_eq!(controller.submit().await, TurnOutcome::Failure);

        controller.composer_mut().set_text("second");
        assert_eq!(controller.submit().await, TurnOutcome::Success);

        let snapshot = controller.transcript().snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[3].text, "recovered");
    }

    #[tokio::test]
    async fn test_server_issued_token_is_adopted() {
        let mut controller =
            controller_with(vec![ScriptedBackend::reply("hi", Some("session_srv_1"))]);
        controller.session_token();
        controller.composer_mut().set_text("hello");

        controller.submit().await;

        assert_eq!(controller.session_token(), "session_srv_1");
    }

    #[tokio::test]
    async fn test_submission_while_in_flight_is_ignored() {
        let mut controller = controller_with(vec![]);
        controller.composer_mut().set_text("first");
        let accepted = controller.begin_turn();
        assert_eq!(accepted, Some("first".to_string()));
        assert!(controller.is_awaiting_response());
        let len_before = controller.transcript().len();

        // A second submission while awaiting the response must not append
        // a duplicate user entry.
        controller.composer_mut().set_text("second");
        assert!(controller.begin_turn().is_none());
        assert_eq!(controller.transcript().len(), len_before);
        assert_eq!(controller.composer().text(), "second");
    }

    #[tokio::test]
    async fn test_pending_entry_present_between_begin_and_resolve() {
        let mut controller = controller_with(vec![]);
        controller.composer_mut().set_text("question");
        controller.begin_turn();

        let snapshot = controller.transcript().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].kind, MessageKind::User);
        assert_eq!(snapshot[1].kind, MessageKind::Pending);
        assert!(snapshot[1].timestamp.is_none());
    }

    #[tokio::test]
    async fn test_welcome_seeding() {
        let mut controller = controller_with(vec![]);
        controller.seed_welcome("Welcome!");

        let snapshot = controller.transcript().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].kind, MessageKind::System);
        assert_eq!(snapshot[0].text, "Welcome!");
    }

    #[tokio::test]
    async fn test_literal_draft_text_is_sent() {
        // Backend that records what it was asked to send.
        struct RecordingBackend {
            seen: Arc<Mutex<Vec<(String, String)>>>,
        }

        #[async_trait]
        impl AssistantBackend for RecordingBackend {
            async fn send_message(&self, message: &str, session_id: &str) -> Result<ChatReply> {
                self.seen
                    .lock()
                    .unwrap()
                    .push((message.to_string(), session_id.to_string()));
                Ok(ChatReply {
                    reply: "ok".to_string(),
                    session_id: None,
                })
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let backend = Box::new(RecordingBackend { seen: seen.clone() });
        let mut controller = ChatController::new(backend, SessionStore::in_memory());
        let token = controller.session_token();

        controller.composer_mut().set_text("  padded **text**  ");
        controller.submit().await;

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "  padded **text**  ");
        assert_eq!(calls[0].1, token);
    }
}
