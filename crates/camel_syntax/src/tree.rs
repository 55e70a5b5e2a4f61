//! Lossless syntax trees: the rowan language binding and the [`Parse`] result.
//!
//! Trees are rowan green/red trees over [`SyntaxKind`]. Green nodes store token text, so every node's text is
//! exactly the concatenation of its children and the root's text is the parsed source.
//!
//! ## Notes
//! - A [`Parse`] is immutable. [`Parse::expand`] and the reparse entry points build a new root and leave the old one
//!   untouched for callers still holding it.
//! - Composite tokens appear as nodes of their composite kind whose children are the primitive tokens.

use std::fmt::Write as _;

use camel_core::lang::dialect::Dialect;
use camel_core::lang::kinds::SyntaxKind;
use rowan::{GreenNode, Language, NodeOrToken, TextRange, TextSize, WalkEvent};

use crate::diagnostics::SyntaxError;
use crate::lexer::Token;

/// Marker type binding [`SyntaxKind`] to rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PerlLanguage {}

impl Language for PerlLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0).unwrap_or(SyntaxKind::ErrorElement)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<PerlLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PerlLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PerlLanguage>;

/// Result of parsing one file: the tree plus every diagnostic found so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<SyntaxError>,
    dialect: Dialect,
}

impl Parse {
    pub(crate) fn new(green: GreenNode, mut errors: Vec<SyntaxError>, dialect: Dialect) -> Self {
        errors.sort_by_key(|e| (e.range.start(), e.range.end()));
        Self { green, errors, dialect }
    }

    /// Root of the red tree.
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Diagnostics ordered by position. Code inside unexpanded lazy blocks has not been checked yet.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The full source text.
    pub fn text(&self) -> String {
        self.syntax_node().text().to_string()
    }

    /// Indented `Kind@start..end` dump of the whole tree, tokens with their text.
    pub fn debug_dump(&self) -> String {
        debug_dump(&self.syntax_node())
    }

    /// Parse the statements of one [`SyntaxKind::LazyBlock`] and return the resulting tree.
    ///
    /// `node` must belong to this parse's tree. Nested blocks stay lazy. Any other node kind yields an unchanged copy.
    #[tracing::instrument(skip_all, fields(range = ?node.text_range()))]
    pub fn expand(&self, node: &SyntaxNode) -> Parse {
        if node.kind() != SyntaxKind::LazyBlock {
            return self.clone();
        }
        let base = node.text_range().start();
        let text = node.text().to_string();
        let tokens = tokens_of(node, base);
        let (block, block_errors) = crate::parser::parse_block(&text, &tokens, &self.dialect);
        let green = graft(node, block);

        let delta = i64::from(u32::from(base));
        let mut errors = self.errors.clone();
        errors.extend(block_errors.into_iter().map(|e| e.shifted(delta)));
        Parse::new(green, errors, self.dialect)
    }

    /// Expand lazy blocks until none are left.
    pub fn expand_all(&self) -> Parse {
        let mut parse = self.clone();
        while let Some(block) = parse.first_lazy_block() {
            parse = parse.expand(&block);
        }
        parse
    }

    fn first_lazy_block(&self) -> Option<SyntaxNode> {
        self.syntax_node()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::LazyBlock)
    }
}

/// Swap `node` for `replacement`, which may have a different kind, and return the new root.
///
/// The swap happens in the parent's green node so every node handed to `replace_with` keeps its kind.
pub(crate) fn graft(node: &SyntaxNode, replacement: GreenNode) -> GreenNode {
    match node.parent() {
        Some(parent) => {
            let green = parent.green().replace_child(node.index(), NodeOrToken::Node(replacement));
            parent.replace_with(green)
        }
        None => replacement,
    }
}

/// Rebuild the flat token list held by `node`, with ranges relative to `base`.
///
/// Child nodes are composite tokens; their children become the composite's parts.
pub(crate) fn tokens_of(node: &SyntaxNode, base: TextSize) -> Vec<Token> {
    let relative = |range: TextRange| range.checked_sub(base).unwrap_or(range);
    node.children_with_tokens()
        .map(|child| match child {
            NodeOrToken::Token(token) => Token::new(token.kind(), relative(token.text_range())),
            NodeOrToken::Node(composite) => {
                let parts = composite
                    .children_with_tokens()
                    .filter_map(|part| part.into_token())
                    .map(|part| Token::new(part.kind(), relative(part.text_range())))
                    .collect();
                Token::composite(composite.kind(), parts)
            }
        })
        .collect()
}

/// Indented dump of a subtree.
pub fn debug_dump(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut indent = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(element) => {
                let _ = write!(out, "{:indent$}{:?}@{:?}", "", element.kind(), element.text_range());
                if let NodeOrToken::Token(token) = &element {
                    let _ = write!(out, " {:?}", token.text());
                }
                out.push('\n');
                indent += 2;
            }
            WalkEvent::Leave(_) => indent -= 2,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_kind_round_trip_through_rowan() {
        let raw = PerlLanguage::kind_to_raw(SyntaxKind::HeredocQq);
        assert_eq!(PerlLanguage::kind_from_raw(raw), SyntaxKind::HeredocQq);
    }

    #[test]
    fn test_root_text_is_source() {
        let source = "sub f { 1 }\nprint <<E;\nx\nE\n";
        let parse = parse(source, &Dialect::new());
        assert_eq!(parse.text(), source);
        assert_eq!(parse.syntax_node().kind(), SyntaxKind::File);
    }

    #[test]
    fn test_dump_lists_tokens_with_text() {
        let parse = parse("1;", &Dialect::new());
        let dump = parse.debug_dump();
        assert!(dump.starts_with("File@0..2\n"), "{dump}");
        assert!(dump.contains("Number@0..1 \"1\""), "{dump}");
        assert!(dump.contains("Semicolon@1..2 \";\""), "{dump}");
    }

    #[test]
    fn test_expand_keeps_text_and_old_tree() {
        let source = "sub f { if ($x) { g() } }";
        let parse = parse(source, &Dialect::new());
        let lazy = parse.first_lazy_block().map(|n| n.text().to_string());
        assert_eq!(lazy.as_deref(), Some("{ if ($x) { g() } }"));

        let once = parse.first_lazy_block().map(|n| parse.expand(&n));
        let once = once.unwrap_or_else(|| parse.clone());
        assert_eq!(once.text(), source);
        // The inner block is still lazy.
        assert_eq!(once.first_lazy_block().map(|n| n.text().to_string()).as_deref(), Some("{ g() }"));
        // The original tree is untouched.
        assert_eq!(parse.first_lazy_block().map(|n| n.text().to_string()).as_deref(), Some("{ if ($x) { g() } }"));
    }

    #[test]
    fn test_expand_turns_the_lazy_block_into_a_block() {
        let parse = parse("sub f { 1 }\n", &Dialect::new());
        let lazy = parse.first_lazy_block();
        let expanded = lazy.map(|n| parse.expand(&n)).unwrap_or_else(|| parse.clone());
        let root = expanded.syntax_node();
        assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Block));
        assert!(expanded.first_lazy_block().is_none());
        assert_eq!(expanded.text(), "sub f { 1 }\n");
        assert_eq!(root.kind(), SyntaxKind::File);
    }

    #[test]
    fn test_expand_all_leaves_no_lazy_blocks() {
        let source = "sub f { for my $i (1..2) { eval { g($i) }; } }";
        let parse = parse(source, &Dialect::new()).expand_all();
        assert!(parse.first_lazy_block().is_none());
        assert_eq!(parse.text(), source);
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    }

    #[test]
    fn test_expanded_errors_are_absolute() {
        let source = "sub f {\n  1 +* 2;\n}";
        let parse = parse(source, &Dialect::new());
        assert!(parse.errors().is_empty());
        let expanded = parse.expand_all();
        assert_eq!(expanded.errors().len(), 1, "{:?}", expanded.errors());
        let start = usize::from(expanded.errors()[0].range.start());
        assert!(start > "sub f {".len(), "{start}");
    }

    #[test]
    fn test_tokens_of_rebuilds_composites() {
        let source = "sub f { \"a\\n\" }";
        let parse = parse(source, &Dialect::new());
        let block = parse.first_lazy_block();
        let tokens = block.map(|b| tokens_of(&b, b.text_range().start())).unwrap_or_default();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![SyntaxKind::LBrace, SyntaxKind::Whitespace, SyntaxKind::StringDq, SyntaxKind::Whitespace, SyntaxKind::RBrace]
        );
        assert_eq!(tokens[2].parts.len(), 4);
        assert_eq!(tokens[0].range, TextRange::new(0.into(), 1.into()));
    }
}
