//! Template text around `<? ... ?>` code regions, and the data section after `__END__`.

use super::Lexer;
use super::state::{Expect, LexerState};
use camel_core::lang::kinds::SyntaxKind;

impl<'a> Lexer<'a> {
    /// Template text up to the next `<?`, or the `<?` itself.
    pub(super) fn scan_template(&mut self) -> SyntaxKind {
        if self.match_str("<?") {
            self.stack.push(LexerState::Code(Expect::Term));
            return SyntaxKind::TemplateCodeOpen;
        }
        let rest = self.rest();
        self.current_pos += rest.find("<?").unwrap_or(rest.len());
        SyntaxKind::TemplateText
    }

    /// Everything after a data marker.
    pub(super) fn scan_data(&mut self) -> SyntaxKind {
        self.current_pos = self.source.len();
        SyntaxKind::DataContent
    }
}

#[cfg(test)]
mod tests {
    use camel_core::lang::dialect::Dialect;
    use camel_core::lang::kinds::SyntaxKind::*;

    use crate::lexer::{LexerState, lex};

    #[test]
    fn test_text_only_document() {
        let lexed = lex("<html>\n</html>\n", &Dialect::template());
        let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TemplateText]);
    }

    #[test]
    fn test_unclosed_code_region_is_not_an_error() {
        let lexed = lex("<p><? my $x = 1;", &Dialect::template());
        assert!(lexed.errors.is_empty());
    }

    #[test]
    fn test_string_inside_code_hides_close() {
        let source = "<? print \"?>\" ?>tail";
        let lexed = lex(source, &Dialect::template());
        let closes = lexed.tokens.iter().filter(|t| t.kind == TemplateCodeClose).count();
        assert_eq!(closes, 1);
        assert_eq!(lexed.tokens.last().map(|t| t.text(source)), Some("tail"));
    }

    #[test]
    fn test_code_region_returns_to_text() {
        let mut lexer = crate::lexer::Lexer::new("<?1?>x", &Dialect::template());
        let kinds: Vec<_> = lexer.by_ref().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TemplateCodeOpen, Number, TemplateCodeClose, TemplateText]);
        assert_eq!(lexer.state().top(), &LexerState::Template);
    }
}
