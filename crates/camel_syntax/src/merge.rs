//! Token merging: coalesce primitive scan units into the composite tokens the grammar consumes.
//!
//! A quote keyword with its delimiters, content and modifiers becomes one `StringDq`/`RegexReplace`/... token; a
//! heredoc opener and marker become a `HeredocDeclaration`; a heredoc body and its terminator become a `Heredoc*`
//! token. The parser sees each of those as a single unit, the tree later decomposes them again through
//! [`Token::parts`].
//!
//! ## Notes
//! - Merging is coverage-preserving: the output tokens cover exactly the input range.
//! - Composite tokens pass through untouched, so merging an already merged stream is a no-op.
//! - Every rule is a local pattern over a short lookahead window; nothing here depends on lexer state.
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_core::lang::kinds::SyntaxKind;
//! use camel_syntax::{lexer, merge};
//!
//! let source = "qq(a (nested) b)";
//! let merged = merge::merge(lexer::lex(source, &Dialect::new()).tokens);
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].kind, SyntaxKind::StringDq);
//! ```

use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::token_sets::{COMPLEX_QUOTE_OPENERS, HEREDOC_BODY_PARTS, QUOTE_CONTENT, QUOTE_OPENERS};

use crate::lexer::Token;

/// Merge a primitive token stream into composite tokens.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn merge(tokens: Vec<Token>) -> Vec<Token> {
    let mut merger = Merger {
        tokens,
        pos: 0,
        out: Vec::new(),
    };
    merger.run();
    merger.out
}

struct Merger {
    tokens: Vec<Token>,
    pos: usize,
    out: Vec<Token>,
}

impl Merger {
    fn run(&mut self) {
        self.out.reserve(self.tokens.len());
        while self.pos < self.tokens.len() {
            let start = self.pos;
            let kind = self.tokens[start].kind;
            let len = if self.tokens[start].is_composite() {
                None
            } else {
                match kind {
                    k if QUOTE_OPENERS.contains(k) => self.quote(keyword_literal(k), k),
                    SyntaxKind::QuoteSingleOpen => self.quote(SyntaxKind::StringSq, kind),
                    SyntaxKind::QuoteDoubleOpen => self.quote(SyntaxKind::StringDq, kind),
                    SyntaxKind::QuoteTickOpen => self.quote(SyntaxKind::StringXq, kind),
                    SyntaxKind::RegexQuoteOpen => self.quote(SyntaxKind::RegexMatch, kind),
                    SyntaxKind::HeredocOpener => self.heredoc_declaration(),
                    k if HEREDOC_BODY_PARTS.contains(k) => self.heredoc_body(),
                    SyntaxKind::AnnotationKey => self.annotation(),
                    SyntaxKind::TemplateCodeClose | SyntaxKind::TemplateText | SyntaxKind::TemplateCodeOpen => {
                        self.template_region()
                    }
                    SyntaxKind::DataMarker => self.data_section(),
                    _ => None,
                }
            };
            match len {
                Some((kind, len)) => {
                    let parts = self.tokens[start..start + len].to_vec();
                    self.out.push(Token::composite(kind, parts));
                    self.pos += len;
                }
                None => {
                    self.out.push(self.tokens[start].clone());
                    self.pos += 1;
                }
            }
        }
    }

    fn kind_at(&self, index: usize) -> Option<SyntaxKind> {
        self.tokens
            .get(index)
            .filter(|t| !t.is_composite())
            .map(|t| t.kind)
    }

    /// Index of the first token at or after `index` that is not whitespace or a line comment.
    fn skip_quote_trivia(&self, mut index: usize) -> usize {
        while matches!(
            self.kind_at(index),
            Some(SyntaxKind::Whitespace | SyntaxKind::CommentLine)
        ) {
            index += 1;
        }
        index
    }

    fn skip_content(&self, mut index: usize) -> usize {
        while self.kind_at(index).is_some_and(|k| QUOTE_CONTENT.contains(k)) {
            index += 1;
        }
        index
    }

    // ========================================================================
    // Rules. Each returns the composite kind and the number of tokens it covers.
    // ========================================================================

    /// `KEYWORD [trivia] OPEN content (MIDDLE content | CLOSE [trivia OPEN content CLOSE]) [MODIFIERS]`, or a
    /// punctuation opener followed by content and close.
    ///
    /// Unterminated quotes still form a composite covering whatever was scanned.
    fn quote(&self, literal: SyntaxKind, opener: SyntaxKind) -> Option<(SyntaxKind, usize)> {
        let sections = if COMPLEX_QUOTE_OPENERS.contains(opener) { 2 } else { 1 };
        let mut index = self.pos + 1;
        let mut needs_open = QUOTE_OPENERS.contains(opener);
        let mut closed = false;

        for section in 0..sections {
            if needs_open {
                let open = self.skip_quote_trivia(index);
                if self.kind_at(open) != Some(SyntaxKind::QuoteOpen) {
                    break;
                }
                index = open + 1;
            }
            index = self.skip_content(index);
            match self.kind_at(index) {
                Some(SyntaxKind::QuoteMiddle) if section + 1 < sections => {
                    index += 1;
                    needs_open = false;
                }
                Some(SyntaxKind::QuoteClose) => {
                    index += 1;
                    needs_open = true;
                    closed = section + 1 == sections;
                }
                _ => break,
            }
        }

        if closed && self.kind_at(index) == Some(SyntaxKind::RegexModifiers) {
            index += 1;
        }
        Some((literal, index - self.pos))
    }

    /// `<<` + marker.
    fn heredoc_declaration(&self) -> Option<(SyntaxKind, usize)> {
        (self.kind_at(self.pos + 1) == Some(SyntaxKind::HeredocMarker)).then_some((SyntaxKind::HeredocDeclaration, 2))
    }

    /// Body content and escapes, plus the terminator line when present.
    fn heredoc_body(&self) -> Option<(SyntaxKind, usize)> {
        let mut index = self.pos;
        let mut kind = SyntaxKind::Heredoc;
        while let Some(part) = self.kind_at(index).filter(|k| HEREDOC_BODY_PARTS.contains(*k)) {
            kind = match (kind, part) {
                (_, SyntaxKind::StringContentXq) => SyntaxKind::HeredocQx,
                (SyntaxKind::Heredoc, SyntaxKind::StringContent) => SyntaxKind::Heredoc,
                (SyntaxKind::HeredocQx, _) => SyntaxKind::HeredocQx,
                _ => SyntaxKind::HeredocQq,
            };
            index += 1;
        }
        if self.kind_at(index) == Some(SyntaxKind::HeredocEnd) {
            index += 1;
        }
        Some((kind, index - self.pos))
    }

    /// `#@key` + (whitespace + value)*.
    fn annotation(&self) -> Option<(SyntaxKind, usize)> {
        let mut index = self.pos + 1;
        loop {
            match self.kind_at(index) {
                Some(SyntaxKind::AnnotationValue) => index += 1,
                Some(SyntaxKind::Whitespace) if self.kind_at(index + 1) == Some(SyntaxKind::AnnotationValue) => {
                    index += 2;
                }
                _ => break,
            }
        }
        Some((SyntaxKind::Annotation, index - self.pos))
    }

    /// `?>` text `<?`, with either side optional; leading text at the start of a document.
    fn template_region(&self) -> Option<(SyntaxKind, usize)> {
        let mut index = self.pos;
        if self.kind_at(index) == Some(SyntaxKind::TemplateCodeClose) {
            index += 1;
        }
        if self.kind_at(index) == Some(SyntaxKind::TemplateText) {
            index += 1;
        }
        if self.kind_at(index) == Some(SyntaxKind::TemplateCodeOpen) {
            index += 1;
        }
        Some((SyntaxKind::TemplateRegion, index - self.pos))
    }

    /// `__END__` + everything after it.
    fn data_section(&self) -> Option<(SyntaxKind, usize)> {
        let len = if self.kind_at(self.pos + 1) == Some(SyntaxKind::DataContent) { 2 } else { 1 };
        Some((SyntaxKind::DataSection, len))
    }
}

/// Composite kind produced by a quote keyword.
fn keyword_literal(keyword: SyntaxKind) -> SyntaxKind {
    match keyword {
        SyntaxKind::KwQ => SyntaxKind::StringSq,
        SyntaxKind::KwQq => SyntaxKind::StringDq,
        SyntaxKind::KwQx => SyntaxKind::StringXq,
        SyntaxKind::KwQw => SyntaxKind::StringList,
        SyntaxKind::KwQr => SyntaxKind::RegexCompile,
        SyntaxKind::KwS => SyntaxKind::RegexReplace,
        SyntaxKind::KwTr | SyntaxKind::KwY => SyntaxKind::Transliteration,
        _ => SyntaxKind::RegexMatch,
    }
}
