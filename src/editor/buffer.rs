use ropey::Rope;

use crate::text::{SelectionRange, TextState};

/// A text buffer backed by a rope data structure.
///
/// Holds the text and a selection in character offsets, with the same
/// selection rules as an HTML textarea: offsets are clamped to the text and
/// an end before the start pulls the start onto the end.
pub struct EditorBuffer {
    rope: Rope,
    selection: SelectionRange,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string with the caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: SelectionRange::caret(0),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current selection.
    pub const fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The currently selected text.
    pub fn selected_text(&self) -> String {
        self.rope
            .slice(self.selection.start..self.selection.end)
            .to_string()
    }

    /// Snapshot of the text and selection.
    pub fn snapshot(&self) -> TextState {
        TextState {
            text: self.text(),
            selection: self.selection,
        }
    }

    /// Move the selection, clamping it into the buffer.
    pub fn select(&mut self, range: SelectionRange) {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.selection = SelectionRange::new(start, end);
    }

    /// Replace the selected text and put the caret after the insertion.
    pub fn replace_selection(&mut self, text: &str) {
        let SelectionRange { start, end } = self.selection;
        if start == end && text.is_empty() {
            return;
        }
        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, text);

        let caret = start + text.chars().count();
        self.selection = SelectionRange::caret(caret);
        self.dirty = true;
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}
