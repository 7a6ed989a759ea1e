//! Pure queries over text snapshots.
//!
//! These helpers never touch a live buffer. Offsets are character offsets.

use super::{SelectionRange, TextState};
use crate::error::{Error, Result};

/// Word delimiters are exactly a space or a line feed. Tabs and punctuation
/// belong to the word.
const fn is_word_delimiter(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Byte offset of the character at `char_idx`, or `text.len()` past the end.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Substring between two character offsets, clamped to the text.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end).max(start_byte);
    &text[start_byte..end_byte]
}

fn word_bounds(chars: &[char], position: usize) -> SelectionRange {
    let position = position.min(chars.len());
    let start = chars[..position]
        .iter()
        .rposition(|&c| is_word_delimiter(c))
        .map_or(0, |i| i + 1);
    let end = chars[position..]
        .iter()
        .position(|&c| is_word_delimiter(c))
        .map_or(chars.len(), |i| position + i);
    SelectionRange::new(start, end)
}

/// Boundaries of the word around `position`.
///
/// Scans left and right from `position` until a delimiter (exclusive) or the
/// text boundary.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `text` is empty.
pub fn surrounding_word(text: &str, position: usize) -> Result<SelectionRange> {
    if text.is_empty() {
        return Err(Error::InvalidArgument(
            "word lookup needs non-empty text".to_string(),
        ));
    }
    let chars: Vec<char> = text.chars().collect();
    Ok(word_bounds(&chars, position))
}

/// Expand a caret to the word it sits in; any other selection is returned
/// unchanged.
pub fn select_word(state: &TextState) -> SelectionRange {
    if state.text.is_empty() || !state.selection.is_caret() {
        return state.selection;
    }
    let chars: Vec<char> = state.text.chars().collect();
    word_bounds(&chars, state.selection.start)
}

/// How many line feeds must be inserted before `pos` so that the preceding
/// content ends with a blank line.
///
/// Spaces are skipped while walking backwards and any other character ends
/// the walk. Reaching the start of the text without crossing a line feed
/// needs no padding; once a line feed has been crossed, whatever is still
/// missing is returned.
pub fn breaks_needed_before(text: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let chars: Vec<char> = text.chars().collect();
    let pos = pos.min(chars.len());
    let mut needed = 2;
    let mut in_first_line = true;
    for &c in chars[..pos].iter().rev() {
        match c {
            ' ' => {}
            '\n' => {
                in_first_line = false;
                if needed == 0 {
                    break;
                }
                needed -= 1;
            }
            _ => return needed,
        }
    }
    if in_first_line { 0 } else { needed }
}

/// Mirror of [`breaks_needed_before`], walking forward from `pos`.
///
/// `pos` on the last character always needs no padding.
pub fn breaks_needed_after(text: &str, pos: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    if chars.len().checked_sub(1) == Some(pos) {
        return 0;
    }
    let pos = pos.min(chars.len());
    let mut needed = 2;
    let mut in_last_line = true;
    for &c in &chars[pos..] {
        match c {
            ' ' => {}
            '\n' => {
                in_last_line = false;
                if needed == 0 {
                    break;
                }
                needed -= 1;
            }
            _ => return needed,
        }
    }
    if in_last_line { 0 } else { needed }
}

/// The selected substring.
pub fn selected_text(state: &TextState) -> &str {
    char_slice(&state.text, state.selection.start, state.selection.end)
}

/// Up to `n` characters immediately before the selection.
pub fn chars_before_selection(state: &TextState, n: usize) -> &str {
    let start = state.selection.start;
    char_slice(&state.text, start.saturating_sub(n), start)
}

/// Up to `n` characters immediately after the selection.
pub fn chars_after_selection(state: &TextState, n: usize) -> &str {
    let end = state.selection.end;
    char_slice(&state.text, end, end.saturating_add(n))
}

/// Number of characters in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(text: &str, start: usize, end: usize) -> TextState {
        TextState::new(text, SelectionRange::new(start, end))
    }

    // --- surrounding_word ---

    #[test]
    fn test_surrounding_word_in_middle() {
        let range = surrounding_word("hello world", 2).unwrap();
        assert_eq!(range, SelectionRange::new(0, 5));
    }

    #[test]
    fn test_surrounding_word_second_word() {
        let range = surrounding_word("hello world", 8).unwrap();
        assert_eq!(range, SelectionRange::new(6, 11));
    }

    #[test]
    fn test_surrounding_word_at_text_end() {
        let range = surrounding_word("hello world", 11).unwrap();
        assert_eq!(range, SelectionRange::new(6, 11));
    }

    #[test]
    fn test_surrounding_word_on_delimiter_takes_left_word() {
        // The caret right before the space still touches "hello".
        let range = surrounding_word("hello world", 5).unwrap();
        assert_eq!(range, SelectionRange::new(0, 5));
    }

    #[test]
    fn test_surrounding_word_between_two_spaces_is_empty() {
        let range = surrounding_word("a  b", 2).unwrap();
        assert_eq!(range, SelectionRange::caret(2));
    }

    #[test]
    fn test_surrounding_word_stops_at_newline() {
        let range = surrounding_word("one\ntwo three", 5).unwrap();
        assert_eq!(range, SelectionRange::new(4, 7));
    }

    #[test]
    fn test_surrounding_word_tabs_and_punctuation_are_not_delimiters() {
        let range = surrounding_word("a\tb,c d", 1).unwrap();
        assert_eq!(range, SelectionRange::new(0, 5));
    }

    #[test]
    fn test_surrounding_word_counts_characters_not_bytes() {
        let range = surrounding_word("café olé", 6).unwrap();
        assert_eq!(range, SelectionRange::new(5, 8));
    }

    #[test]
    fn test_surrounding_word_empty_text_is_invalid() {
        assert!(matches!(
            surrounding_word("", 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    // --- select_word ---

    #[test]
    fn test_select_word_expands_caret() {
        assert_eq!(
            select_word(&state("hello world", 2, 2)),
            SelectionRange::new(0, 5)
        );
    }

    #[test]
    fn test_select_word_keeps_span() {
        assert_eq!(
            select_word(&state("hello world", 1, 8)),
            SelectionRange::new(1, 8)
        );
    }

    #[test]
    fn test_select_word_empty_text_keeps_caret() {
        assert_eq!(select_word(&state("", 0, 0)), SelectionRange::caret(0));
    }

    // --- breaks_needed_before ---

    #[test]
    fn test_breaks_before_at_start_is_zero() {
        assert_eq!(breaks_needed_before("hello", 0), 0);
    }

    #[test]
    fn test_breaks_before_after_text_on_same_line() {
        assert_eq!(breaks_needed_before("hello world", 6), 2);
        assert_eq!(breaks_needed_before("a\nhello world", 8), 2);
    }

    #[test]
    fn test_breaks_before_after_one_newline() {
        assert_eq!(breaks_needed_before("a\nb", 2), 1);
    }

    #[test]
    fn test_breaks_before_after_blank_line() {
        assert_eq!(breaks_needed_before("a\n\nb", 3), 0);
    }

    #[test]
    fn test_breaks_before_skips_spaces() {
        assert_eq!(breaks_needed_before("a \n  b", 5), 1);
    }

    #[test]
    fn test_breaks_before_never_goes_negative() {
        assert_eq!(breaks_needed_before("a\n\n\nb", 4), 0);
    }

    #[test]
    fn test_breaks_before_only_spaces_is_first_line() {
        assert_eq!(breaks_needed_before("   b", 3), 0);
    }

    #[test]
    fn test_breaks_before_leading_newline_reports_partial_count() {
        // A newline with nothing but spaces before it still counts as a
        // crossed line, so the walk reports what is missing rather than 0.
        assert_eq!(breaks_needed_before("\nb", 1), 1);
        assert_eq!(breaks_needed_before(" \n  b", 4), 1);
        assert_eq!(breaks_needed_before("\n\nb", 2), 0);
    }

    // --- breaks_needed_after ---

    #[test]
    fn test_breaks_after_on_last_char_is_zero() {
        assert_eq!(breaks_needed_after("hello", 4), 0);
    }

    #[test]
    fn test_breaks_after_at_text_end_is_zero() {
        assert_eq!(breaks_needed_after("hello", 5), 0);
    }

    #[test]
    fn test_breaks_after_text_on_same_line() {
        assert_eq!(breaks_needed_after("hello world", 5), 2);
    }

    #[test]
    fn test_breaks_after_before_one_newline() {
        assert_eq!(breaks_needed_after("a\nb", 1), 1);
    }

    #[test]
    fn test_breaks_after_before_blank_line() {
        assert_eq!(breaks_needed_after("a\n\nb", 1), 0);
    }

    #[test]
    fn test_breaks_after_trailing_newline_reports_partial_count() {
        assert_eq!(breaks_needed_after("a\n ", 1), 1);
    }

    #[test]
    fn test_breaks_after_only_spaces_is_last_line() {
        assert_eq!(breaks_needed_after("a   ", 1), 0);
    }

    // --- substrings ---

    #[test]
    fn test_selected_text() {
        assert_eq!(selected_text(&state("hello world", 6, 11)), "world");
        assert_eq!(selected_text(&state("hello", 2, 2)), "");
    }

    #[test]
    fn test_selected_text_multibyte() {
        assert_eq!(selected_text(&state("naïve café", 6, 10)), "café");
    }

    #[test]
    fn test_chars_around_selection() {
        let s = state("**bold**", 2, 6);
        assert_eq!(chars_before_selection(&s, 2), "**");
        assert_eq!(chars_after_selection(&s, 2), "**");
        assert_eq!(chars_before_selection(&s, 1), "*");
    }

    #[test]
    fn test_chars_around_selection_clamp_at_boundaries() {
        let s = state("*ab", 1, 3);
        assert_eq!(chars_before_selection(&s, 2), "*");
        assert_eq!(chars_after_selection(&s, 2), "");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn surrounding_word_is_bounded_by_delimiters(
                text in "[ab \n]{1,40}",
                seed in 0..1000usize,
            ) {
                let chars: Vec<char> = text.chars().collect();
                let position = seed % (chars.len() + 1);
                let range = surrounding_word(&text, position).unwrap();

                prop_assert!(range.start <= position);
                prop_assert!(position <= range.end);
                prop_assert!(range.end <= chars.len());
                prop_assert!(chars[range.start..range.end].iter().all(|&c| !is_word_delimiter(c)));
                if range.start > 0 {
                    prop_assert!(is_word_delimiter(chars[range.start - 1]));
                }
                if range.end < chars.len() {
                    prop_assert!(is_word_delimiter(chars[range.end]));
                }
            }

            #[test]
            fn select_word_is_identity_on_spans(
                text in "[a-z \n]{1,40}",
                a in 0..40usize,
                b in 0..40usize,
            ) {
                let len = text.chars().count();
                let (start, end) = (a.min(b).min(len), a.max(b).min(len));
                prop_assume!(start != end);
                let selection = SelectionRange::new(start, end);
                let snapshot = TextState::new(text, selection);
                prop_assert_eq!(select_word(&snapshot), selection);
            }

            #[test]
            fn breaks_are_zero_at_text_edges(text in "[a \n]{1,40}") {
                let len = text.chars().count();
                prop_assert_eq!(breaks_needed_before(&text, 0), 0);
                prop_assert_eq!(breaks_needed_after(&text, len - 1), 0);
            }

            #[test]
            fn breaks_stay_in_range(text in "[a \n]{0,40}", seed in 0..1000usize) {
                let pos = seed % (text.chars().count() + 1);
                prop_assert!(breaks_needed_before(&text, pos) <= 2);
                prop_assert!(breaks_needed_after(&text, pos) <= 2);
            }
        }
    }
}
