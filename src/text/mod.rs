//! Text snapshots, selection ranges and the buffer contract.
//!
//! Everything here is expressed in character offsets (Unicode scalar
//! values), never bytes:
//! - [`query`]: word boundaries, blank-line padding, substring extraction
//! - [`lines`]: per-line prefix insertion for list-like transforms

pub mod lines;
pub mod query;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A span of the text addressed by character offsets, `start <= end`.
///
/// `start == end` is a caret.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width selection at `position`.
    pub const fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of characters covered.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parses `"N"` (caret), `"S:E"` or `"S..E"`.
impl FromStr for SelectionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| Error::InvalidArgument(format!("not a character offset: {part:?}")))
        };
        let (start, end) = if let Some((start, end)) = s.split_once("..") {
            (parse(start)?, parse(end)?)
        } else if let Some((start, end)) = s.split_once(':') {
            (parse(start)?, parse(end)?)
        } else {
            let position = parse(s)?;
            (position, position)
        };
        if end < start {
            return Err(Error::InvalidArgument(format!(
                "selection end {end} precedes start {start}"
            )));
        }
        Ok(Self::new(start, end))
    }
}

/// An immutable snapshot of a buffer's text and selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextState {
    pub text: String,
    pub selection: SelectionRange,
}

impl TextState {
    /// Build a snapshot, clamping `selection` into the text.
    pub fn new(text: impl Into<String>, selection: SelectionRange) -> Self {
        let text = text.into();
        let len = text.chars().count();
        let end = selection.end.min(len);
        let start = selection.start.min(end);
        Self {
            text,
            selection: SelectionRange::new(start, end),
        }
    }
}

/// The narrow contract a live text surface implements.
///
/// Every operation returns a fresh snapshot of the surface after it ran.
/// Adapters are handles onto a mutable surface, so the operations take
/// `&self`; an adapter that is not attached to its surface fails with
/// [`Error::BufferUnavailable`].
pub trait TextBuffer {
    /// Current text and selection.
    fn state(&self) -> Result<TextState>;

    /// Move the selection to `range`, clamped by the adapter.
    fn set_selection_range(&self, range: SelectionRange) -> Result<TextState>;

    /// Replace the selected text with `text` and collapse the selection to
    /// the end of the insertion.
    fn replace_selection(&self, text: &str) -> Result<TextState>;
}
