//! Heredoc openers, markers and bodies.
//!
//! `<<EOM` declares a heredoc; its body starts on the line after the declaration and runs to a line holding only the
//! terminator. Several heredocs may be declared on one line; their bodies follow in declaration order.
//!
//! ## Notes
//! - In operator position `<<` is a shift unless an uppercase marker or a quoted marker follows directly.
//! - `<<~` allows the terminator line to be indented.
//! - A trailing `\r` on the terminator line is ignored.

use super::state::{HeredocMode, HeredocSpec};
use super::{Lexer, is_word_continue, is_word_start};
use camel_core::lang::kinds::SyntaxKind;

impl<'a> Lexer<'a> {
    /// Whether `<<` at the current position (the first `<` consumed) declares a heredoc.
    pub(super) fn heredoc_follows(&self, term: bool) -> bool {
        let Some(after) = self.rest().strip_prefix('<') else {
            return false;
        };
        let marker = after.strip_prefix('~').unwrap_or(after);
        match marker.chars().next() {
            Some('"' | '\'' | '`') => true,
            Some(c) if is_word_start(c) => term || is_uppercase_marker(marker),
            _ => false,
        }
    }

    /// Scan the marker after `<<` and queue its body.
    pub(super) fn scan_heredoc_marker(&mut self, indentable: bool) -> Option<SyntaxKind> {
        let start = self.current_pos;
        let c = self.peek()?;
        match c {
            '"' | '\'' | '`' => {
                self.advance();
                self.advance_while(|ch| ch != c && ch != '\n');
                self.match_char(c);
            }
            c if is_word_start(c) => self.advance_while(is_word_continue),
            _ => return None,
        }
        let marker = &self.source[start..self.current_pos];
        self.stack.queue_heredoc(HeredocSpec::from_marker(marker, indentable));
        Some(SyntaxKind::HeredocMarker)
    }

    /// Inside a heredoc body.
    pub(super) fn scan_heredoc_body(&mut self, spec: &HeredocSpec) -> Option<SyntaxKind> {
        let start = self.current_pos;
        if let Some(len) = self.terminator_len(spec) {
            self.current_pos += len;
            self.stack.pop();
            return Some(SyntaxKind::HeredocEnd);
        }

        let interpolates = spec.mode != HeredocMode::Verbatim;
        while let Some(c) = self.peek() {
            if self.current_pos > start && self.terminator_len(spec).is_some() {
                break;
            }
            if c == '\\' && interpolates {
                if self.current_pos > start {
                    break;
                }
                return Some(self.scan_string_special());
            }
            self.advance();
        }
        (self.current_pos > start).then(|| spec.content_kind())
    }

    /// Length of the terminator line at the current position, excluding its newline.
    ///
    /// An empty terminator line takes its newline so that the token is never empty.
    fn terminator_len(&self, spec: &HeredocSpec) -> Option<usize> {
        if !self.at_line_start(self.current_pos) {
            return None;
        }
        let rest = self.rest();
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];
        let content = line.strip_suffix('\r').unwrap_or(line);
        let content = if spec.indentable {
            content.trim_start_matches([' ', '\t'])
        } else {
            content
        };
        if content != spec.terminator {
            return None;
        }
        match line_len {
            0 if line_len < rest.len() => Some(1),
            0 => None,
            len => Some(len),
        }
    }
}

/// `EOM`, `END_SQL`: an identifier without lowercase letters, starting with a capital.
fn is_uppercase_marker(text: &str) -> bool {
    let word: &str = text.split(|c: char| !is_word_continue(c)).next().unwrap_or("");
    word.starts_with(|c: char| c.is_ascii_uppercase())
        && word.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
