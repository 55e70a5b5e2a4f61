//! Diagnostics produced by the lexer, the parser and the reparse analyzer.
//!
//! A [`SyntaxError`] never aborts processing: the tree stays complete and the error is recorded next to it in
//! [`crate::Parse::errors`]. Errors render through [`miette`] when the caller supplies the source text.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};
use rowan::{TextRange, TextSize};
use thiserror::Error;

/// Category of a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// A quote, heredoc or block still open at end of input.
    Unterminated,
    /// The token stream does not match the grammar.
    Syntax,
    /// Non-chainable operators used in sequence without grouping.
    Chained,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::Unterminated => write!(f, "unterminated construct"),
            SyntaxErrorKind::Syntax => write!(f, "syntax error"),
            SyntaxErrorKind::Chained => write!(f, "chained comparison"),
        }
    }
}

/// A recoverable error tied to a source range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    pub kind: SyntaxErrorKind,
    pub hints: Vec<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
            kind: SyntaxErrorKind::Syntax,
            hints: Vec::new(),
        }
    }

    pub fn unterminated(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind: SyntaxErrorKind::Unterminated,
            ..Self::new(message, range)
        }
    }

    pub fn chained(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind: SyntaxErrorKind::Chained,
            ..Self::new(message, range)
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Move the error by `delta` bytes.
    pub(crate) fn shifted(mut self, delta: i64) -> Self {
        self.range = shift_range(self.range, delta);
        self
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.kind {
            SyntaxErrorKind::Unterminated => "camel::unterminated",
            SyntaxErrorKind::Syntax => "camel::syntax",
            SyntaxErrorKind::Chained => "camel::chained",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let start = usize::from(self.range.start());
        let len = usize::from(self.range.len());
        let label = LabeledSpan::new_with_span(Some(self.kind.to_string()), (start, len));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Failure of a parse entry point. Malformed input is never an error; only cancellation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseError {
    #[error("parse cancelled")]
    Cancelled,
}

pub(crate) fn shift_range(range: TextRange, delta: i64) -> TextRange {
    let shift = |offset: TextSize| -> TextSize {
        let moved = i64::from(u32::from(offset)) + delta;
        TextSize::from(u32::try_from(moved.max(0)).unwrap_or(u32::MAX))
    };
    TextRange::new(shift(range.start()), shift(range.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn test_display_uses_message() {
        let err = SyntaxError::new("expected `;`", range(3, 3));
        assert_eq!(err.to_string(), "expected `;`");
        assert_eq!(err.kind, SyntaxErrorKind::Syntax);
    }

    #[test]
    fn test_hints_become_help() {
        let err = SyntaxError::chained("`<=>` cannot be chained", range(0, 10)).with_hint("add parentheses");
        let help = err.help().map(|h| h.to_string());
        assert_eq!(help.as_deref(), Some("add parentheses"));
    }

    #[test]
    fn test_label_covers_range() {
        let err = SyntaxError::unterminated("unterminated string", range(4, 9));
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 5);
    }

    #[test]
    fn test_shift_both_directions() {
        assert_eq!(shift_range(range(10, 12), 5), range(15, 17));
        assert_eq!(shift_range(range(10, 12), -4), range(6, 8));
    }
}
