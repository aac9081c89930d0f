//! Chat transcript state and message types
//!
//! The transcript is the ordered, append-only log of messages for one chat
//! session. The single permitted mutation besides appending is
//! [`Transcript::resolve_pending`], which removes the in-flight placeholder
//! and appends its resolution in one observable step, so a renderer never
//! sees a transcript where the placeholder is gone but no resolution exists.

use chrono::Local;

/// Status phrase shown while a turn is in flight
pub const PENDING_STATUS_TEXT: &str = "Agent is processing your request...";

/// The originator/flavor of a transcript entry
///
/// `Pending` is a transient placeholder for the in-flight turn and is always
/// eventually replaced. `Error` carries the generic failure reply and is
/// presented like assistant text by render surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Seeded by the client itself (e.g. the welcome message)
    System,
    /// Submitted by the user
    User,
    /// Returned by the remote assistant
    Agent,
    /// Placeholder for a turn awaiting its response
    Pending,
    /// Resolution of a failed turn, rendered like assistant text
    Error,
}

/// One entry in the chat transcript
///
/// Immutable once appended. The `id` is a sequence position assigned by the
/// transcript; ids are unique and increasing within a session but are a
/// rendering aid only and are renumbered on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sequence position within the transcript (assigned on append)
    pub id: u64,
    /// Entry flavor, used by render surfaces to choose presentation
    pub kind: MessageKind,
    /// Display text; a fixed status phrase for `Pending` entries
    pub text: String,
    /// Locale-formatted clock label; absent for `Pending` entries
    pub timestamp: Option<String>,
}

impl ChatMessage {
    fn new(kind: MessageKind, text: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            id: 0,
            kind,
            text: text.into(),
            timestamp,
        }
    }

    /// Creates a system entry stamped with the current clock time
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageKind::System, text, Some(clock_label()))
    }

    /// Creates a user entry stamped with the current clock time
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageKind::User, text, Some(clock_label()))
    }

    /// Creates an assistant entry stamped with the current clock time
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Agent, text, Some(clock_label()))
    }

    /// Creates the in-flight placeholder entry
    ///
    /// The text is the fixed status phrase, not user content, and pending
    /// entries carry no timestamp.
    pub fn pending() -> Self {
        Self::new(MessageKind::Pending, PENDING_STATUS_TEXT, None)
    }

    /// Creates a failed-turn entry stamped with the current clock time
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text, Some(clock_label()))
    }
}

/// Current local time as a short clock label (e.g. "09:41 AM")
pub fn clock_label() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// Ordered, append-only log of chat messages
///
/// The transcript exclusively owns its entries. Entries are never reordered
/// or deleted, with one exception: resolving a turn removes the pending
/// placeholder as part of appending the resolution. At most one pending
/// entry exists at a time; the orchestrator's submission guard enforces
/// this rather than the transcript itself.
///
/// # Examples
///
/// ```
/// use autostream::transcript::{ChatMessage, Transcript};
///
/// let mut transcript = Transcript::new();
/// transcript.append(ChatMessage::user("Hello"));
/// transcript.append(ChatMessage::pending());
/// transcript.resolve_pending(ChatMessage::agent("Hi!"));
/// assert_eq!(transcript.snapshot().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, assigning the next sequence id
    ///
    /// Returns the assigned id. Append order reflects the chronological
    /// order of events; no reordering ever occurs.
    pub fn append(&mut self, mut message: ChatMessage) -> u64 {
        self.next_id += 1;
        message.id = self.next_id;
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Removes the pending placeholder and appends `replacement` in one step
    ///
    /// If no pending entry exists this degenerates to a plain append; it
    /// never panics. Prior entries keep their positions.
    pub fn resolve_pending(&mut self, replacement: ChatMessage) -> u64 {
        self.messages.retain(|m| m.kind != MessageKind::Pending);
        self.append(replacement)
    }

    /// Whether a turn is currently represented by a pending placeholder
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.kind == MessageKind::Pending)
    }

    /// The ordered sequence of current messages, for rendering
    ///
    /// Callers must not assume ids are stable across sessions.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of entries currently in the transcript
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the transcript has no entries
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
