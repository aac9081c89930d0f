//! Minimal markdown rendering for assistant-originated text
//!
//! The assistant replies with a constrained markdown subset: the only
//! markup recognized is bold emphasis (`**text**`). One line of input is
//! rendered into an ordered sequence of plain and emphasized segments;
//! multi-line text is split on line breaks and each line rendered
//! independently, preserving line boundaries as distinct blocks.
//!
//! Rendering is a pure function with no failure mode: unmatched or
//! malformed delimiters are emitted verbatim as plain text.

use regex::Regex;
use std::sync::OnceLock;

/// A rendered span of one transcript line
///
/// Segments are either plain text or emphasized (bold) text. Delimiters
/// never appear in segment content; they are consumed by the scan or, when
/// unmatched, carried through inside a `Plain` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim text, including any markup that failed to parse
    Plain(String),
    /// Text that appeared strictly inside a `**…**` pair
    Emphasis(String),
}

impl Segment {
    /// The segment's text content, without any markup applied
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Emphasis(s) => s,
        }
    }
}

/// Non-overlapping, non-nested `**…**` pairs whose interior contains no `*`.
fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap())
}

/// Render a single line of text into plain and emphasized segments
///
/// Scans left to right for non-overlapping `**…**` pairs. Content strictly
/// inside a pair becomes an [`Segment::Emphasis`]; everything else,
/// including unmatched or odd delimiters, is emitted verbatim as
/// [`Segment::Plain`]. An empty line yields no segments.
///
/// The input must not contain line breaks; use [`render_blocks`] for
/// multi-line text.
///
/// # Examples
///
/// ```
/// use autostream::markdown::{render_line, Segment};
///
/// let segments = render_line("Hi **there**");
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Plain("Hi ".to_string()),
///         Segment::Emphasis("there".to_string()),
///     ]
/// );
/// ```
pub fn render_line(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for captures in emphasis_pattern().captures_iter(line) {
        let matched = captures.get(0).expect("capture group 0 always present");
        if matched.start() > last_end {
            segments.push(Segment::Plain(line[last_end..matched.start()].to_string()));
        }
        let inner = captures.get(1).expect("capture group 1 always present");
        segments.push(Segment::Emphasis(inner.as_str().to_string()));
        last_end = matched.end();
    }

    if last_end < line.len() {
        segments.push(Segment::Plain(line[last_end..].to_string()));
    }

    segments
}

/// Render multi-line text into per-line segment sequences
///
/// The text is split on `\n` and each line is rendered independently via
/// [`render_line`]; line boundaries are preserved as distinct blocks. No
/// paragraph structure is inferred beyond the literal newline split. Empty
/// input yields no blocks.
///
/// # Examples
///
/// ```
/// use autostream::markdown::render_blocks;
///
/// let blocks = render_blocks("first\n**second**");
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn render_blocks(text: &str) -> Vec<Vec<Segment>> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(render_line).collect()
}
