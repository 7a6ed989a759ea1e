//! Inline markup: markers wrapped around the word under the caret or the
//! selected span.
//!
//! Every command here follows the same three steps against the buffer:
//! expand a caret to its word, replace the selection with the marked-up
//! text, then select the payload without its markers.

use super::Command;
use crate::error::Result;
use crate::text::query::{
    char_len, chars_after_selection, chars_before_selection, select_word, selected_text,
};
use crate::text::{SelectionRange, TextBuffer, TextState};

/// URL inserted by [`image`] when nothing is selected.
pub const DEFAULT_IMAGE_PLACEHOLDER: &str = "https://example.com/your-image.png";

/// Wrap the (word-expanded) selection in `before`/`after` and select what
/// was wrapped.
fn wrap_selection(
    state: &TextState,
    buffer: &dyn TextBuffer,
    before: &str,
    after: &str,
) -> Result<()> {
    let expanded = buffer.set_selection_range(select_word(state))?;
    let payload = selected_text(&expanded);
    let inserted = buffer.replace_selection(&format!("{before}{payload}{after}"))?;

    let end = inserted.selection.end.saturating_sub(char_len(after));
    let start = end.saturating_sub(char_len(payload));
    buffer.set_selection_range(SelectionRange::new(start, end))?;
    Ok(())
}

/// True when `marker` sits on both sides of the selection.
fn is_wrapped_in(state: &TextState, marker: &str) -> bool {
    let width = char_len(marker);
    chars_before_selection(state, width) == marker && chars_after_selection(state, width) == marker
}

/// Strip `width` marker characters from each side of the selection and keep
/// the unmarked text selected.
///
/// Assumes the markers are present; see [`is_wrapped_in`].
fn unwrap_selection(state: &TextState, buffer: &dyn TextBuffer, width: usize) -> Result<()> {
    let SelectionRange { start, end } = state.selection;
    let payload = selected_text(state);
    buffer.set_selection_range(SelectionRange::new(
        start.saturating_sub(width),
        end.saturating_add(width),
    ))?;
    buffer.replace_selection(payload)?;
    buffer.set_selection_range(SelectionRange::new(
        start.saturating_sub(width),
        end.saturating_sub(width),
    ))?;
    Ok(())
}

/// Toggleable symmetric marker such as `**`.
fn toggle(marker: &'static str) -> Command {
    let width = char_len(marker);
    Command::new(move |state, buffer| wrap_selection(state, buffer, marker, marker))
        .with_should_undo(move |state| is_wrapped_in(state, marker))
        .with_undo(move |state, buffer| unwrap_selection(state, buffer, width))
}

/// `**bold**`, undone when the selection is already wrapped in `**`.
pub fn bold() -> Command {
    toggle("**")
}

/// `*italic*`, undone when the selection is already wrapped in `*`.
pub fn italic() -> Command {
    toggle("*")
}

/// `` `code` ``, undone when the selection is already wrapped in backticks.
pub fn code() -> Command {
    toggle("`")
}

/// `~~strikethrough~~`. Not undoable.
pub fn strikethrough() -> Command {
    Command::new(|state, buffer| wrap_selection(state, buffer, "~~", "~~"))
}

/// `[text](url)` with `text` selected afterwards. Not undoable.
pub fn link() -> Command {
    Command::new(|state, buffer| wrap_selection(state, buffer, "[", "](url)"))
}

/// `![](url)` using the selected text as the URL.
pub fn image() -> Command {
    image_with_placeholder(DEFAULT_IMAGE_PLACEHOLDER)
}

/// Like [`image`], inserting `placeholder` when the selection is empty.
pub fn image_with_placeholder(placeholder: impl Into<String>) -> Command {
    let placeholder = placeholder.into();
    Command::new(move |state, buffer| {
        let expanded = buffer.set_selection_range(select_word(state))?;
        let url = match selected_text(&expanded) {
            "" => placeholder.as_str(),
            selected => selected,
        };
        buffer.replace_selection(&format!("![]({url})"))?;

        let start = expanded.selection.start + 4;
        buffer.set_selection_range(SelectionRange::new(start, start + char_len(url)))?;
        Ok(())
    })
}
