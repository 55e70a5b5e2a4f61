//! Quote-like constructs: `'...'`, `"..."`, backticks, `/.../`, `q qq qx qw qr m s tr y` and string escapes.
//!
//! ## Notes
//! - Bracket delimiters (`()[]{}<>`) nest: `q{a{b}c}` is one string.
//! - Two-section operators with bracket delimiters may put whitespace and comments between the sections:
//!   `s{a} # c` + newline + `{b}`.
//! - Escapes only become tokens in interpolating sections; elsewhere a backslash just protects the next character.

use super::Lexer;
use super::state::{Expect, LexerState, QuoteFrame, QuoteOp, closing_delimiter};
use camel_core::lang::kinds::SyntaxKind;

impl<'a> Lexer<'a> {
    /// Emit a punctuation quote opener and enter the quote.
    pub(super) fn open_quote(&mut self, start: usize, op: QuoteOp, delimiter: char, kind: SyntaxKind) -> SyntaxKind {
        self.stack.set_expect(Expect::Operator);
        self.stack.push(LexerState::Quote(QuoteFrame::delimited(op, delimiter)));
        self.last_open = start;
        kind
    }

    /// Between a quote keyword (or a closed bracketed section) and the next opening delimiter.
    pub(super) fn scan_quote_delimiter(&mut self, frame: QuoteFrame) -> SyntaxKind {
        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return SyntaxKind::Eof;
        };
        if c.is_whitespace() {
            self.advance_while(char::is_whitespace);
            return SyntaxKind::Whitespace;
        }
        if c == '#' && self.prev_char(start).is_some_and(char::is_whitespace) {
            self.advance_while(|c| c != '\n');
            return SyntaxKind::CommentLine;
        }
        self.stack.replace_top(LexerState::Quote(QuoteFrame {
            open: c,
            close: closing_delimiter(c),
            depth: 0,
            ..frame
        }));
        SyntaxKind::QuoteOpen
    }

    /// Inside a quote section: content, escapes, or the delimiter ending the section.
    pub(super) fn scan_quote(&mut self, frame: QuoteFrame) -> Option<SyntaxKind> {
        let start = self.current_pos;
        let interpolates = frame.op.interpolates(frame.section);
        let mut depth = frame.depth;

        while let Some(c) = self.peek() {
            if c == '\\' {
                if interpolates {
                    if self.current_pos > start {
                        break;
                    }
                    return Some(self.scan_string_special());
                }
                self.advance();
                self.advance();
                continue;
            }
            if frame.is_bracketed() && c == frame.open {
                depth += 1;
            } else if c == frame.close {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            self.advance();
        }

        if self.current_pos > start {
            self.stack.replace_top(LexerState::Quote(QuoteFrame { depth, ..frame }));
            return Some(frame.op.content_kind(frame.section));
        }
        if self.is_at_end() {
            return None;
        }

        // Closing delimiter of the current section.
        self.advance();
        if frame.section + 1 < frame.op.sections() {
            let next = QuoteFrame {
                section: frame.section + 1,
                depth: 0,
                ..frame
            };
            if frame.is_bracketed() {
                self.stack.replace_top(LexerState::QuoteDelimiter(next));
                return Some(SyntaxKind::QuoteClose);
            }
            self.stack.replace_top(LexerState::Quote(next));
            return Some(SyntaxKind::QuoteMiddle);
        }
        if frame.op.takes_modifiers() {
            self.stack.replace_top(LexerState::Modifiers);
        } else {
            self.stack.pop();
        }
        Some(SyntaxKind::QuoteClose)
    }

    /// Letters after a closed pattern.
    pub(super) fn scan_modifiers(&mut self) -> Option<SyntaxKind> {
        let start = self.current_pos;
        self.advance_while(|c| c.is_ascii_alphabetic());
        self.stack.pop();
        (self.current_pos > start).then_some(SyntaxKind::RegexModifiers)
    }

    /// A backslash escape inside interpolated text. The backslash is at the current position.
    pub(super) fn scan_string_special(&mut self) -> SyntaxKind {
        self.advance();
        let Some(c) = self.advance() else {
            return SyntaxKind::StringEscapedChar;
        };
        match c {
            'n' => SyntaxKind::StringSpecialLf,
            't' => SyntaxKind::StringSpecialTab,
            'r' => SyntaxKind::StringSpecialCr,
            'f' => SyntaxKind::StringSpecialFormFeed,
            'b' => SyntaxKind::StringSpecialBackspace,
            'a' => SyntaxKind::StringSpecialAlarm,
            'e' => SyntaxKind::StringSpecialEscape,
            'x' => {
                if !self.scan_braced_escape() {
                    self.advance_up_to(2, |c| c.is_ascii_hexdigit());
                }
                SyntaxKind::StringSpecialHex
            }
            '0'..='7' => {
                self.advance_up_to(2, |c| ('0'..='7').contains(&c));
                SyntaxKind::StringSpecialOct
            }
            'o' if self.peek() == Some('{') => {
                self.scan_braced_escape();
                SyntaxKind::StringSpecialOct
            }
            'N' if self.peek() == Some('{') => {
                self.scan_braced_escape();
                SyntaxKind::StringSpecialCharName
            }
            'c' => {
                self.advance();
                SyntaxKind::StringSpecialControl
            }
            'U' => SyntaxKind::StringSpecialUpper,
            'L' => SyntaxKind::StringSpecialLower,
            'u' => SyntaxKind::StringSpecialUpperFirst,
            'l' => SyntaxKind::StringSpecialLowerFirst,
            'Q' => SyntaxKind::StringSpecialQuote,
            'F' => SyntaxKind::StringSpecialFoldCase,
            'E' => SyntaxKind::StringSpecialEnd,
            _ => SyntaxKind::StringEscapedChar,
        }
    }

    /// `{...}` of `\x{263A}`, `\N{U+263A}`, `\o{17}`. Stops at a newline.
    fn scan_braced_escape(&mut self) -> bool {
        if !self.match_char('{') {
            return false;
        }
        self.advance_while(|c| c != '}' && c != '\n');
        self.match_char('}');
        true
    }

    fn advance_up_to(&mut self, max: usize, pred: impl Fn(char) -> bool) {
        for _ in 0..max {
            if !self.peek().is_some_and(&pred) {
                break;
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use camel_core::lang::dialect::Dialect;
    use camel_core::lang::kinds::SyntaxKind::{self, *};

    use crate::lexer::lex;

    fn parts(source: &str) -> Vec<(SyntaxKind, &str)> {
        lex(source, &Dialect::new())
            .tokens
            .iter()
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn test_word_list_is_plain_content() {
        assert_eq!(
            parts("qw(a b c)"),
            vec![(KwQw, "qw"), (QuoteOpen, "("), (StringContent, "a b c"), (QuoteClose, ")")]
        );
    }

    #[test]
    fn test_delimiter_after_space() {
        assert_eq!(
            parts("q {x}"),
            vec![(KwQ, "q"), (Whitespace, " "), (QuoteOpen, "{"), (StringContent, "x"), (QuoteClose, "}")]
        );
    }

    #[test]
    fn test_escaped_delimiter_stays_inside() {
        assert_eq!(
            parts(r"'it\'s'"),
            vec![(QuoteSingleOpen, "'"), (StringContent, r"it\'s"), (QuoteClose, "'")]
        );
    }

    #[test]
    fn test_transliteration_sections_are_plain() {
        assert_eq!(
            parts("tr/a-z/A-Z/"),
            vec![
                (KwTr, "tr"),
                (QuoteOpen, "/"),
                (StringContent, "a-z"),
                (QuoteMiddle, "/"),
                (StringContent, "A-Z"),
                (QuoteClose, "/"),
            ]
        );
    }

    #[test]
    fn test_comment_between_bracketed_sections() {
        let kinds: Vec<_> = parts("s{a} # why\n{b}e").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                KwS, QuoteOpen, RegexContent, QuoteClose, Whitespace, CommentLine, Whitespace, QuoteOpen,
                StringContentQq, QuoteClose, RegexModifiers
            ]
        );
    }

    #[test]
    fn test_hash_delimiter_without_space() {
        assert_eq!(
            parts("q#a#"),
            vec![(KwQ, "q"), (QuoteOpen, "#"), (StringContent, "a"), (QuoteClose, "#")]
        );
    }

    #[test]
    fn test_specials_in_command_string() {
        assert_eq!(
            parts(r"`ls\t\cA\N{SPACE}`"),
            vec![
                (QuoteTickOpen, "`"),
                (StringContentXq, "ls"),
                (StringSpecialTab, r"\t"),
                (StringSpecialControl, r"\cA"),
                (StringSpecialCharName, r"\N{SPACE}"),
                (QuoteClose, "`"),
            ]
        );
    }

    #[test]
    fn test_case_modifiers() {
        let kinds: Vec<_> = parts(r#""\Uup\E \Q.\E""#).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                QuoteDoubleOpen,
                StringSpecialUpper,
                StringContentQq,
                StringSpecialEnd,
                StringContentQq,
                StringSpecialQuote,
                StringContentQq,
                StringSpecialEnd,
                QuoteClose
            ]
        );
    }
}
