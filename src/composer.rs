//! Input composer: the draft text and emoji-picker state
//!
//! The composer holds the not-yet-submitted draft, accepts programmatic
//! insertions from the emoji picker, and maps the confirm keystroke to
//! either submission or a literal line break.

/// Outcome of the confirm keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerAction {
    /// Plain confirm: the draft should be submitted
    Submit,
    /// Modified confirm: a literal line break was inserted into the draft
    InsertedLineBreak,
}

/// Draft text plus the emoji-picker open/closed flag
///
/// Picker fragments are accepted verbatim via [`Composer::insert`]; the
/// composer never validates or rewrites fragment content.
///
/// # Examples
///
/// ```
/// use autostream::composer::Composer;
///
/// let mut composer = Composer::new();
/// composer.set_text("Hello");
/// composer.insert(" 👋");
/// assert_eq!(composer.text(), "Hello 👋");
/// ```
#[derive(Debug, Default)]
pub struct Composer {
    text: String,
    picker_open: bool,
}

impl Composer {
    /// Creates an empty composer with the picker closed
    pub fn new() -> Self {
        Self::default()
    }

    /// The current draft text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the draft text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Appends a fragment to the draft
    ///
    /// Used for emoji insertion; the fragment is appended as-is, never
    /// replacing existing text and never validated.
    pub fn insert(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Takes the draft for submission, if it qualifies
    ///
    /// Returns `None` and leaves the draft untouched when the text is empty
    /// or whitespace-only. Otherwise returns the literal draft text
    /// (untrimmed) and clears the draft. The draft is cleared exactly when
    /// a turn is accepted for sending, regardless of the request outcome.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.text.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.text))
    }

    /// Handles the confirm keystroke
    ///
    /// A plain confirm requests submission (the caller suppresses the
    /// gesture's default effect); confirm with the line-break modifier
    /// inserts a literal `\n` into the draft instead.
    pub fn confirm_key(&mut self, line_break_modifier: bool) -> ComposerAction {
        if line_break_modifier {
            self.text.push('\n');
            ComposerAction::InsertedLineBreak
        } else {
            ComposerAction::Submit
        }
    }

    /// Whether the emoji picker is currently open
    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Toggles the emoji picker
    pub fn toggle_picker(&mut self) {
        self.picker_open = !self.picker_open;
    }

    /// Closes the emoji picker (e.g. on an outside click)
    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }
}
