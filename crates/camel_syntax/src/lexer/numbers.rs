//! Numeric literal scanning.

use super::Lexer;
use camel_core::lang::kinds::SyntaxKind;

impl<'a> Lexer<'a> {
    /// Scan a number whose first character (`first`) was already consumed.
    ///
    /// Handles `0x1F`, `0b101`, `0o17`/`017`, `1_000`, `1.5e-3`, `.5` and version literals like `1.2.3`.
    /// `1..5` is a range, not a float.
    pub(super) fn scan_number(&mut self, first: char) -> SyntaxKind {
        if first == '.' {
            self.advance_while(is_digit_or_sep);
            self.scan_exponent();
            return SyntaxKind::Number;
        }

        if first == '0' {
            let next = self.peek_next();
            match self.peek() {
                Some('x' | 'X') if next.is_some_and(|c| c.is_ascii_hexdigit()) => {
                    self.advance();
                    self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
                    return SyntaxKind::NumberHex;
                }
                Some('b' | 'B') if next.is_some_and(|c| c == '0' || c == '1') => {
                    self.advance();
                    self.advance_while(|c| c == '0' || c == '1' || c == '_');
                    return SyntaxKind::NumberBin;
                }
                Some('o' | 'O') if next.is_some_and(is_octal) => {
                    self.advance();
                    self.advance_while(|c| is_octal(c) || c == '_');
                    return SyntaxKind::NumberOct;
                }
                Some(c) if is_octal(c) => {
                    self.advance_while(|c| is_octal(c) || c == '_');
                    if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        return SyntaxKind::NumberOct;
                    }
                }
                _ => {}
            }
        }

        self.advance_while(is_digit_or_sep);

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(is_digit_or_sep);
            if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                self.scan_version_tail();
                return SyntaxKind::NumberVersion;
            }
        }

        self.scan_exponent();
        SyntaxKind::Number
    }

    fn scan_exponent(&mut self) {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return;
        }
        let digit_at = match self.peek_next() {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
            for _ in 0..digit_at {
                self.advance();
            }
            self.advance_while(is_digit_or_sep);
        }
    }
}

fn is_digit_or_sep(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn is_octal(c: char) -> bool {
    ('0'..='7').contains(&c)
}
