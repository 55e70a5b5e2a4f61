//! Whitespace, comments, POD blocks and `#@` annotations.

use super::state::{Expect, LexerState, after_trivia};
use super::{Lexer, is_word_continue};
use camel_core::lang::kinds::SyntaxKind;

/// Keys recognized after `#@`. Any other `#@word` is an ordinary comment.
const ANNOTATION_KEYS: &[&str] = &[
    "deprecated",
    "returns",
    "override",
    "method",
    "abstract",
    "inject",
    "noinspection",
    "type",
];

impl<'a> Lexer<'a> {
    /// A whitespace run; the first character was already consumed.
    ///
    /// A newline with heredocs pending ends the run and enters the first heredoc body.
    pub(super) fn scan_whitespace(&mut self, first: char, expect: Expect) -> SyntaxKind {
        if first == '\n' && self.begin_pending_heredoc(expect) {
            return SyntaxKind::Whitespace;
        }
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\x0c' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    if self.begin_pending_heredoc(expect) {
                        break;
                    }
                }
                _ => break,
            }
        }
        SyntaxKind::Whitespace
    }

    fn begin_pending_heredoc(&mut self, expect: Expect) -> bool {
        let Some(spec) = self.stack.next_heredoc() else {
            return false;
        };
        self.stack.set_expect(after_trivia(expect));
        self.stack.push(LexerState::Heredoc(spec));
        self.last_open = self.current_pos;
        true
    }

    /// `# ...` to end of line, or `#@key` opening an annotation.
    pub(super) fn scan_comment(&mut self, expect: Expect) -> SyntaxKind {
        if let Some(rest) = self.rest().strip_prefix('@') {
            let key_len = rest.find(|c: char| !is_word_continue(c)).unwrap_or(rest.len());
            if ANNOTATION_KEYS.contains(&&rest[..key_len]) {
                self.current_pos += 1 + key_len;
                self.stack.set_expect(after_trivia(expect));
                self.stack.push(LexerState::Annotation);
                return SyntaxKind::AnnotationKey;
            }
        }
        self.advance_while(|c| c != '\n');
        SyntaxKind::CommentLine
    }

    /// The rest of an annotation line.
    pub(super) fn scan_annotation(&mut self) -> Option<SyntaxKind> {
        match self.peek() {
            None | Some('\n') => {
                self.stack.pop();
                None
            }
            Some(c) if c.is_whitespace() => {
                self.advance_while(|c| c != '\n' && c.is_whitespace());
                Some(SyntaxKind::Whitespace)
            }
            Some(_) => {
                self.advance_while(|c| !c.is_whitespace());
                Some(SyntaxKind::AnnotationValue)
            }
        }
    }

    /// A POD block from `=word` at line start through the `=cut` line (or end of input).
    pub(super) fn scan_pod(&mut self) -> SyntaxKind {
        let mut line_start = self.current_pos - 1;
        loop {
            let rest = &self.source[line_start..];
            let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            self.current_pos = line_start + line_len;
            if is_cut_line(&rest[..line_len]) || self.is_at_end() {
                break;
            }
            line_start = self.current_pos;
        }
        SyntaxKind::Pod
    }
}

fn is_cut_line(line: &str) -> bool {
    line.strip_prefix("=cut")
        .is_some_and(|rest| !rest.starts_with(is_word_continue))
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
    fn test_pod_includes_cut_line() {
        assert_eq!(
            parts("=pod\n\nx\n=cut\n1"),
            vec![(Pod, "=pod\n\nx\n=cut\n"), (Number, "1")]
        );
    }

    #[test]
    fn test_cut_needs_word_boundary() {
        assert_eq!(parts("=pod\n=cutting\n"), vec![(Pod, "=pod\n=cutting\n")]);
    }

    #[test]
    fn test_equals_mid_line_is_operator() {
        let kinds: Vec<_> = parts("$a =cut").into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ScalarSigil, VariableName, Whitespace, Assign, Identifier]);
    }

    #[test]
    fn test_annotation_values() {
        assert_eq!(
            parts("#@type $x Foo\n"),
            vec![
                (AnnotationKey, "#@type"),
                (Whitespace, " "),
                (AnnotationValue, "$x"),
                (Whitespace, " "),
                (AnnotationValue, "Foo"),
                (Whitespace, "\n"),
            ]
        );
    }

    #[test]
    fn test_unknown_annotation_is_comment() {
        assert_eq!(parts("#@todo later"), vec![(CommentLine, "#@todo later")]);
    }

    #[test]
    fn test_annotation_at_end_of_input() {
        let lexed = lex("#@deprecated", &Dialect::new());
        assert!(lexed.errors.is_empty());
        assert_eq!(lexed.tokens.len(), 1);
    }
}
