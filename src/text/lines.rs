//! Per-line prefix insertion.

use super::query::char_len;

/// What to put in front of each line.
#[derive(Clone, Copy)]
pub enum LinePrefix<'a> {
    /// The same literal on every line.
    Literal(&'a str),
    /// Computed from the line and its zero-based index within the text.
    PerLine(&'a dyn Fn(&str, usize) -> String),
}

impl std::fmt::Debug for LinePrefix<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(prefix) => f.debug_tuple("Literal").field(prefix).finish(),
            Self::PerLine(_) => f.write_str("PerLine(..)"),
        }
    }
}

impl<'a> From<&'a str> for LinePrefix<'a> {
    fn from(prefix: &'a str) -> Self {
        Self::Literal(prefix)
    }
}

/// Result of [`insert_before_each_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInsertion {
    pub modified_text: String,
    /// Characters added across all lines.
    pub insertion_length: usize,
}

/// Prefix every line of `text`, including empty ones.
pub fn insert_before_each_line(text: &str, prefix: LinePrefix<'_>) -> LineInsertion {
    let mut insertion_length = 0;
    let modified_text = text
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let line_prefix = match prefix {
                LinePrefix::Literal(literal) => literal.to_string(),
                LinePrefix::PerLine(compute) => compute(line, index),
            };
            insertion_length += char_len(&line_prefix);
            line_prefix + line
        })
        .collect::<Vec<_>>()
        .join("\n");
    LineInsertion {
        modified_text,
        insertion_length,
    }
}
