//! Block-level markup: headings, lists, quotes and fenced code.
//!
//! Lists, quotes and multi-line code blocks pad the inserted block with
//! line feeds so it is separated from surrounding text by a blank line.

use super::Command;
use crate::error::{Error, Result};
use crate::text::lines::{LineInsertion, LinePrefix, insert_before_each_line};
use crate::text::query::{
    breaks_needed_after, breaks_needed_before, char_len, select_word, selected_text,
};
use crate::text::{SelectionRange, TextBuffer, TextState};

/// Line feeds needed around the selection of `state`.
fn padding(state: &TextState) -> (usize, usize) {
    (
        breaks_needed_before(&state.text, state.selection.start),
        breaks_needed_after(&state.text, state.selection.end),
    )
}

/// Prefix the (word-expanded) selection with `prefix` and select what
/// followed the prefix.
///
/// Only the selection as a whole is prefixed, not each of its lines.
///
/// # Errors
/// Propagates buffer failures.
pub fn set_header(state: &TextState, buffer: &dyn TextBuffer, prefix: &str) -> Result<()> {
    let expanded = buffer.set_selection_range(select_word(state))?;
    let payload = selected_text(&expanded);
    let inserted = buffer.replace_selection(&format!("{prefix}{payload}"))?;

    let end = inserted.selection.end;
    buffer.set_selection_range(SelectionRange::new(
        end.saturating_sub(char_len(payload)),
        end,
    ))?;
    Ok(())
}

/// Heading command for a level already known to be in `1..=6`.
fn heading_command(level: u8) -> Command {
    let prefix = format!("{} ", "#".repeat(usize::from(level)));
    Command::new(move |state, buffer| set_header(state, buffer, &prefix))
}

/// `# ` to `###### ` heading for levels 1 to 6.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] for any other level.
pub fn heading(level: u8) -> Result<Command> {
    if !(1..=6).contains(&level) {
        return Err(Error::InvalidArgument(format!(
            "heading level must be between 1 and 6, got {level}"
        )));
    }
    Ok(heading_command(level))
}

/// `heading-1` to `heading-6`, as registered in the standard catalog.
pub(crate) fn standard_headings() -> impl Iterator<Item = (String, Command)> {
    (1..=6u8).map(|level| (format!("heading-{level}"), heading_command(level)))
}

/// Turn the (word-expanded) selection into a list, one item per line.
///
/// A single-line selection ends up selecting the item text without its
/// marker; a multi-line selection selects the whole list.
///
/// # Errors
/// Propagates buffer failures.
pub fn make_list(state: &TextState, buffer: &dyn TextBuffer, prefix: LinePrefix<'_>) -> Result<()> {
    let expanded = buffer.set_selection_range(select_word(state))?;
    let (before, after) = padding(&expanded);
    let payload = selected_text(&expanded);
    let LineInsertion {
        modified_text,
        insertion_length,
    } = insert_before_each_line(payload, prefix);

    buffer.replace_selection(&format!(
        "{}{modified_text}{}",
        "\n".repeat(before),
        "\n".repeat(after)
    ))?;

    let one_liner_offset = if payload.contains('\n') {
        0
    } else {
        insertion_length
    };
    let start = expanded.selection.start + before + one_liner_offset;
    let end = start + char_len(&modified_text) - one_liner_offset;
    buffer.set_selection_range(SelectionRange::new(start, end))?;
    Ok(())
}

/// `- item` on every selected line.
pub fn unordered_list() -> Command {
    Command::new(|state, buffer| make_list(state, buffer, LinePrefix::Literal("- ")))
}

/// `1. item`, `2. item`, ... numbered from the start of the selection.
pub fn ordered_list() -> Command {
    Command::new(|state, buffer| {
        let number = |_: &str, index: usize| format!("{}. ", index + 1);
        make_list(state, buffer, LinePrefix::PerLine(&number))
    })
}

/// `- [ ] item` on every selected line.
pub fn checked_list() -> Command {
    Command::new(|state, buffer| make_list(state, buffer, LinePrefix::Literal("- [ ] ")))
}

/// `> quote` with blank-line padding, selecting the quoted text.
pub fn quote() -> Command {
    Command::new(|state, buffer| {
        let expanded = buffer.set_selection_range(select_word(state))?;
        let (before, after) = padding(&expanded);
        let payload = selected_text(&expanded);
        buffer.replace_selection(&format!(
            "{}> {payload}{}",
            "\n".repeat(before),
            "\n".repeat(after)
        ))?;

        let start = expanded.selection.start + before + 2;
        buffer.set_selection_range(SelectionRange::new(start, start + char_len(payload)))?;
        Ok(())
    })
}

/// Inline code for a single line, a padded fenced block otherwise.
pub fn code_block() -> Command {
    Command::new(|state, buffer| {
        let expanded = buffer.set_selection_range(select_word(state))?;
        let payload = selected_text(&expanded);

        if !payload.contains('\n') {
            buffer.replace_selection(&format!("`{payload}`"))?;
            let start = expanded.selection.start + 1;
            buffer.set_selection_range(SelectionRange::new(start, start + char_len(payload)))?;
            return Ok(());
        }

        let (before, after) = padding(&expanded);
        buffer.replace_selection(&format!(
            "{}```\n{payload}\n```{}",
            "\n".repeat(before),
            "\n".repeat(after)
        ))?;
        let start = expanded.selection.start + before + 4;
        buffer.set_selection_range(SelectionRange::new(start, start + char_len(payload)))?;
        Ok(())
    })
}
