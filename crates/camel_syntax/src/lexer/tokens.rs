//! Token type shared by the lexer, the merger and the parser.
//!
//! ## Notes
//! - Kinds come from `camel_core::lang::kinds::SyntaxKind`; a token never stores its text, only its range.
//! - A composite token (quote literal, heredoc body, ...) keeps the primitive tokens it was merged from in `parts`.

use camel_core::lang::kinds::SyntaxKind;
use rowan::{TextRange, TextSize};

/// A token with its kind and source range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    /// Primitive tokens of a composite token; empty for primitive tokens.
    pub parts: Vec<Token>,
}

impl Token {
    /// Construct a primitive token.
    pub fn new(kind: SyntaxKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            parts: Vec::new(),
        }
    }

    /// Construct a composite token spanning `parts`, which must be contiguous and non-empty.
    pub fn composite(kind: SyntaxKind, parts: Vec<Token>) -> Self {
        let start = parts.first().map_or(TextSize::from(0), |t| t.range.start());
        let end = parts.last().map_or(start, |t| t.range.end());
        Self {
            kind,
            range: TextRange::new(start, end),
            parts,
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Source text of the token.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.range]
    }

    /// The primitive tokens this token covers: itself, or its parts.
    pub fn primitives(&self) -> impl Iterator<Item = &Token> {
        let own = if self.parts.is_empty() { Some(self) } else { None };
        own.into_iter().chain(self.parts.iter())
    }
}

/// Build a range from byte offsets.
pub(crate) fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(text_size(start), text_size(end))
}

pub(crate) fn text_size(offset: usize) -> TextSize {
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_spans_parts() {
        let parts = vec![
            Token::new(SyntaxKind::QuoteDoubleOpen, text_range(2, 3)),
            Token::new(SyntaxKind::StringContentQq, text_range(3, 6)),
            Token::new(SyntaxKind::QuoteClose, text_range(6, 7)),
        ];
        let token = Token::composite(SyntaxKind::StringDq, parts);
        assert_eq!(token.range, text_range(2, 7));
        assert!(token.is_composite());
        assert_eq!(token.primitives().count(), 3);
        assert_eq!(token.text("x=\"abc\";"), "\"abc\"");
    }

    #[test]
    fn test_primitive_yields_itself() {
        let token = Token::new(SyntaxKind::Semicolon, text_range(0, 1));
        let kinds: Vec<_> = token.primitives().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![SyntaxKind::Semicolon]);
    }
}
