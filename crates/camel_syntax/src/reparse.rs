//! Incremental reparsing of a single edited element.
//!
//! Given the previous [`Parse`] and a [`TextEdit`], [`analyze`] looks for the innermost element that strictly contains
//! the edit and can be lexed on its own (a quote or regex literal, a heredoc body, a name, POD, an annotation value, a
//! template region or a lazy block). It relexes that element from the state the lexer would be in at its start and
//! grafts the result into a new tree when the element keeps its shape. Otherwise it climbs to the next such ancestor,
//! and finally asks for a full parse.
//!
//! ## Notes
//! - The start state comes from [`state_for`] and the significant token before the element. Relexing the *old* text
//!   from that state must reproduce the old tokens exactly, so a wrong guess is rejected rather than trusted.
//! - Relexing runs over the whole edited source and stops at the element's new end, so lookahead past the element
//!   sees the real text.
//! - The lexer state after the element must be the same before and after the edit, with no heredoc left pending.
//!   Together with the parser deciding on kinds only, that keeps everything outside the element unchanged.
//! - Elements that reach the end of input are never reparsed incrementally: end-of-input diagnostics depend on them.
//!
//! ## Examples
//!
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_syntax::parser;
//! use camel_syntax::reparse::{self, TextEdit};
//!
//! let dialect = Dialect::new();
//! let old = parser::parse("my $s = \"hello\";\n", &dialect);
//! let edit = TextEdit::insert(14, " world");
//! let new = reparse::reparse(&old, &edit, &dialect);
//! assert_eq!(new.text(), "my $s = \"hello world\";\n");
//! assert_eq!(new, parser::parse("my $s = \"hello world\";\n", &dialect));
//! ```

use std::collections::VecDeque;

use camel_core::lang::dialect::Dialect;
use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::token_sets::{HEREDOC_BODIES, REPARSABLE_LEAVES, TRIVIA};
use rowan::{GreenNode, GreenToken, Language, NodeOrToken, TextRange, TextSize, WalkEvent};
use thiserror::Error;

use crate::cancel::Cancellation;
use crate::diagnostics::{ParseError, SyntaxError};
use crate::lexer::state::HeredocSpec;
use crate::lexer::{Lexer, StateStack, Token, state_for};
use crate::merge::merge;
use crate::parser::{self, lazy_block_green};
use crate::tree::{Parse, PerlLanguage, SyntaxElement, SyntaxNode, SyntaxToken};

// ============================================================================
// Edits and outcomes
// ============================================================================

/// Replace `delete` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEdit {
    pub delete: TextRange,
    pub insert: String,
}

impl TextEdit {
    pub fn new(delete: TextRange, insert: impl Into<String>) -> Self {
        Self {
            delete,
            insert: insert.into(),
        }
    }

    /// Insert `text` at byte `offset`.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset.into()), text)
    }

    /// Delete `range`.
    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    /// Apply to `text`. `None` when the range is out of bounds or splits a character.
    pub fn apply(&self, text: &str) -> Option<String> {
        let start = usize::from(self.delete.start());
        let end = usize::from(self.delete.end());
        let before = text.get(..start)?;
        let after = text.get(end..)?;
        Some(format!("{before}{}{after}", self.insert))
    }

    /// Change in length.
    pub fn delta(&self) -> i64 {
        i64::try_from(self.insert.len()).unwrap_or(i64::MAX) - i64::from(u32::from(self.delete.len()))
    }
}

/// An element relexed and grafted into a new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub kind: SyntaxKind,
    /// Range of the replaced element in the old text.
    pub old_range: TextRange,
    /// Range of the replacement in the new text.
    pub new_range: TextRange,
    pub parse: Parse,
}

/// Why the incremental path was not taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullReparseReason {
    #[error("the edit does not fit the text")]
    InvalidEdit,
    #[error("the dialect differs from the one the tree was parsed with")]
    DialectChanged,
    #[error("no independently reparsable element contains the edit")]
    NoReparsableElement,
    #[error("{tried} candidate element(s) changed shape")]
    ShapeChanged { tried: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReparseOutcome {
    Patch(Patch),
    FullReparseRequired(FullReparseReason),
}

/// Why a single candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    EndOfInput,
    UnknownHeredoc,
    OldTokensDiffer,
    NoBoundary,
    StateLeak,
    PendingHeredoc,
    ShapeChanged,
}

// ============================================================================
// Entry points
// ============================================================================

/// Decide whether `edit` can be applied by relexing one element of `old`, and build the patched tree if so.
#[tracing::instrument(skip_all, fields(delete = ?edit.delete, insert_len = edit.insert.len()))]
pub fn analyze(old: &Parse, edit: &TextEdit, dialect: &Dialect) -> ReparseOutcome {
    if old.dialect() != dialect {
        return ReparseOutcome::FullReparseRequired(FullReparseReason::DialectChanged);
    }
    let old_text = old.text();
    let Some(new_text) = edit.apply(&old_text) else {
        return ReparseOutcome::FullReparseRequired(FullReparseReason::InvalidEdit);
    };
    let root = old.syntax_node();
    let candidates = candidates(&root, edit.delete);
    if candidates.is_empty() {
        tracing::debug!("no reparsable element");
        return ReparseOutcome::FullReparseRequired(FullReparseReason::NoReparsableElement);
    }

    let relexer = Relexer {
        old_text: &old_text,
        new_text: &new_text,
        delta: edit.delta(),
        dialect,
    };
    for element in &candidates {
        match relexer.try_element(element) {
            Ok((green, new_range)) => {
                let old_range = element.text_range();
                tracing::debug!(kind = ?element.kind(), ?old_range, "incremental reparse");
                let errors = remap_errors(old.errors(), old_range, edit.delta());
                return ReparseOutcome::Patch(Patch {
                    kind: element.kind(),
                    old_range,
                    new_range,
                    parse: Parse::new(green, errors, *dialect),
                });
            }
            Err(rejection) => tracing::debug!(kind = ?element.kind(), ?rejection, "candidate rejected"),
        }
    }
    ReparseOutcome::FullReparseRequired(FullReparseReason::ShapeChanged {
        tried: candidates.len(),
    })
}

/// Apply `edit` to `old`, incrementally when possible. Always returns a complete tree.
///
/// An edit that does not fit the old text leaves the parse unchanged.
#[tracing::instrument(skip_all)]
pub fn reparse(old: &Parse, edit: &TextEdit, dialect: &Dialect) -> Parse {
    match analyze(old, edit, dialect) {
        ReparseOutcome::Patch(patch) => patch.parse,
        ReparseOutcome::FullReparseRequired(reason) => {
            tracing::debug!(%reason, "full reparse");
            match edit.apply(&old.text()) {
                Some(text) => parser::parse(&text, dialect),
                None => old.clone(),
            }
        }
    }
}

/// Like [`reparse`], giving up with [`ParseError::Cancelled`] once `cancel` fires.
pub fn reparse_with_cancellation(
    old: &Parse,
    edit: &TextEdit,
    dialect: &Dialect,
    cancel: &dyn Cancellation,
) -> Result<Parse, ParseError> {
    if cancel.is_cancelled() {
        return Err(ParseError::Cancelled);
    }
    match analyze(old, edit, dialect) {
        ReparseOutcome::Patch(patch) => Ok(patch.parse),
        ReparseOutcome::FullReparseRequired(reason) => {
            tracing::debug!(%reason, "full reparse");
            match edit.apply(&old.text()) {
                Some(text) => parser::parse_with_cancellation(&text, dialect, cancel),
                None => Ok(old.clone()),
            }
        }
    }
}

/// Relex `element` of `parse` in place, starting from the state derived for it from kinds alone.
///
/// Returns the primitive tokens with absolute ranges, or `None` when no start state can be derived or lexing does not
/// stop exactly at the element's end.
pub fn relex_element(parse: &Parse, element: &SyntaxElement) -> Option<Vec<Token>> {
    let text = parse.text();
    let relexer = Relexer {
        old_text: &text,
        new_text: &text,
        delta: 0,
        dialect: parse.dialect(),
    };
    let range = element.text_range();
    let stack = relexer.start_stack(element).ok()?;
    let (tokens, _) = relexer.relex(&text, range.start(), range.end(), stack).ok()?;
    Some(tokens)
}

// ============================================================================
// Candidates
// ============================================================================

/// Reparsable elements strictly containing `range`, innermost first.
fn candidates(root: &SyntaxNode, range: TextRange) -> Vec<SyntaxElement> {
    if range.end() > root.text_range().end() {
        return Vec::new();
    }
    let start = if range.is_empty() {
        match root.token_at_offset(range.start()).right_biased() {
            Some(token) => NodeOrToken::Token(token),
            None => return Vec::new(),
        }
    } else {
        root.covering_element(range)
    };
    let (own, parent) = match start {
        NodeOrToken::Token(token) => (Some(NodeOrToken::Token(token.clone())), token.parent()),
        NodeOrToken::Node(node) => (None, Some(node)),
    };
    let parents = parent.into_iter().flat_map(|node| node.ancestors());
    own.into_iter()
        .chain(parents.map(NodeOrToken::Node))
        .filter(|element| REPARSABLE_LEAVES.contains(element.kind()))
        .filter(|element| {
            let outer = element.text_range();
            outer.start() < range.start() && range.end() < outer.end()
        })
        .collect()
}

// ============================================================================
// Relexing
// ============================================================================

struct Relexer<'a> {
    old_text: &'a str,
    new_text: &'a str,
    delta: i64,
    dialect: &'a Dialect,
}

impl Relexer<'_> {
    /// The new root and the element's new range, or why the element cannot be reparsed alone.
    fn try_element(&self, element: &SyntaxElement) -> Result<(GreenNode, TextRange), Rejection> {
        let range = element.text_range();
        let new_end = shift(range.end(), self.delta);
        if usize::from(range.end()) >= self.old_text.len() || usize::from(new_end) >= self.new_text.len() {
            return Err(Rejection::EndOfInput);
        }
        let start = self.start_stack(element)?;

        let (old_tokens, old_state) = self.relex(self.old_text, range.start(), range.end(), start.clone())?;
        let expected: Vec<(SyntaxKind, TextRange)> = primitive_tokens(element);
        let actual: Vec<(SyntaxKind, TextRange)> = old_tokens.iter().map(|t| (t.kind, t.range)).collect();
        if expected != actual {
            return Err(Rejection::OldTokensDiffer);
        }

        let (new_tokens, new_state) = self.relex(self.new_text, range.start(), new_end, start)?;
        if new_state != old_state {
            return Err(Rejection::StateLeak);
        }
        if new_state.has_pending_heredocs() {
            return Err(Rejection::PendingHeredoc);
        }

        let new_range = TextRange::new(range.start(), new_end);
        let text = &self.new_text[new_range];
        let tokens: Vec<Token> = new_tokens.iter().map(|t| relative(t, range.start())).collect();
        let green = match element {
            NodeOrToken::Token(token) => {
                if tokens.len() != 1 || tokens[0].kind != token.kind() {
                    return Err(Rejection::ShapeChanged);
                }
                token.replace_with(GreenToken::new(raw(token.kind()), text))
            }
            NodeOrToken::Node(node) if node.kind() == SyntaxKind::LazyBlock => {
                let merged = merge(tokens);
                let block = lazy_block_green(text, &merged, self.dialect).ok_or(Rejection::ShapeChanged)?;
                node.replace_with(block)
            }
            NodeOrToken::Node(node) => {
                let merged = merge(tokens);
                match merged.as_slice() {
                    [single] if single.kind == node.kind() => node.replace_with(composite_green(text, single)),
                    _ => return Err(Rejection::ShapeChanged),
                }
            }
        };
        Ok((green, new_range))
    }

    /// Lex `source` from `start` until exactly `end`.
    fn relex(
        &self,
        source: &str,
        start: TextSize,
        end: TextSize,
        stack: StateStack,
    ) -> Result<(Vec<Token>, StateStack), Rejection> {
        let end = usize::from(end);
        let mut lexer = Lexer::starting_at(source, usize::from(start), stack, self.dialect);
        let mut tokens = Vec::new();
        while lexer.position() < end {
            match lexer.next() {
                Some(token) => tokens.push(token),
                None => break,
            }
        }
        if lexer.position() != end {
            return Err(Rejection::NoBoundary);
        }
        Ok((tokens, lexer.state().clone()))
    }

    /// The lexer stack at the start of `element`.
    fn start_stack(&self, element: &SyntaxElement) -> Result<StateStack, Rejection> {
        let (boundary, trivia_between) = previous_significant(element);
        let mut resume = state_for(element.kind(), boundary);
        if trivia_between {
            resume = resume.after_trivia();
        }
        let spec = match element {
            NodeOrToken::Node(node) if HEREDOC_BODIES.contains(node.kind()) => {
                Some(heredoc_spec(node).ok_or(Rejection::UnknownHeredoc)?)
            }
            _ => None,
        };
        resume.stack(self.dialect, spec).ok_or(Rejection::UnknownHeredoc)
    }
}

/// Kind of the last significant primitive token before `element`, and whether trivia separates them.
fn previous_significant(element: &SyntaxElement) -> (Option<SyntaxKind>, bool) {
    let first = match element {
        NodeOrToken::Token(token) => Some(token.clone()),
        NodeOrToken::Node(node) => node.first_token(),
    };
    let mut trivia_between = false;
    let mut cursor = first.and_then(|t| t.prev_token());
    while let Some(token) = cursor {
        if !is_trivia(&token) {
            return (Some(token.kind()), trivia_between);
        }
        trivia_between = true;
        cursor = token.prev_token();
    }
    (None, trivia_between)
}

/// Trivia at the primitive level: trivia kinds and the parts of trivia composites.
fn is_trivia(token: &SyntaxToken) -> bool {
    TRIVIA.contains(token.kind()) || token.parent().is_some_and(|p| TRIVIA.contains(p.kind()))
}

/// Replay heredoc declarations and bodies in order to find the spec that `body` was lexed with.
fn heredoc_spec(body: &SyntaxNode) -> Option<HeredocSpec> {
    let root = body.ancestors().last()?;
    let mut queue: VecDeque<HeredocSpec> = VecDeque::new();
    for event in root.preorder_with_tokens() {
        let WalkEvent::Enter(element) = event else {
            continue;
        };
        match element {
            NodeOrToken::Node(node) if node.kind() == SyntaxKind::HeredocDeclaration => {
                let opener = child_text(&node, SyntaxKind::HeredocOpener)?;
                let marker = child_text(&node, SyntaxKind::HeredocMarker)?;
                queue.push_back(HeredocSpec::from_marker(&marker, opener.ends_with('~')));
            }
            NodeOrToken::Node(node) if HEREDOC_BODIES.contains(node.kind()) => {
                let spec = queue.pop_front()?;
                if &node == body {
                    return Some(spec);
                }
            }
            // Empty bodies are a bare terminator.
            NodeOrToken::Token(token)
                if token.kind() == SyntaxKind::HeredocEnd
                    && !token.parent().is_some_and(|p| HEREDOC_BODIES.contains(p.kind())) =>
            {
                queue.pop_front();
            }
            _ => {}
        }
    }
    None
}

fn child_text(node: &SyntaxNode, kind: SyntaxKind) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|c| c.into_token())
        .find(|t| t.kind() == kind)
        .map(|t| t.text().to_string())
}

/// Primitive tokens of an element with absolute ranges.
fn primitive_tokens(element: &SyntaxElement) -> Vec<(SyntaxKind, TextRange)> {
    match element {
        NodeOrToken::Token(token) => vec![(token.kind(), token.text_range())],
        NodeOrToken::Node(node) => node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| (t.kind(), t.text_range()))
            .collect(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn raw(kind: SyntaxKind) -> rowan::SyntaxKind {
    PerlLanguage::kind_to_raw(kind)
}

fn shift(offset: TextSize, delta: i64) -> TextSize {
    let moved = i64::from(u32::from(offset)) + delta;
    TextSize::from(u32::try_from(moved.max(0)).unwrap_or(u32::MAX))
}

fn relative(token: &Token, base: TextSize) -> Token {
    let range = token.range.checked_sub(base).unwrap_or(token.range);
    if token.is_composite() {
        Token::composite(token.kind, token.parts.iter().map(|p| relative(p, base)).collect())
    } else {
        Token::new(token.kind, range)
    }
}

fn composite_green(text: &str, token: &Token) -> GreenNode {
    let parts: Vec<NodeOrToken<GreenNode, GreenToken>> = token
        .parts
        .iter()
        .map(|part| NodeOrToken::Token(GreenToken::new(raw(part.kind), &text[part.range])))
        .collect();
    GreenNode::new(raw(token.kind), parts)
}

/// Offsets at or after the element's end move by `delta`; errors inside the element are dropped.
fn remap_errors(errors: &[SyntaxError], element: TextRange, delta: i64) -> Vec<SyntaxError> {
    let moved = |offset: TextSize| if offset >= element.end() { shift(offset, delta) } else { offset };
    errors
        .iter()
        .filter(|e| !(e.range.start() > element.start() && e.range.end() < element.end()))
        .map(|e| {
            let mut error = e.clone();
            error.range = TextRange::new(moved(e.range.start()), moved(e.range.end()));
            error
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn patched(source: &str, edit: TextEdit, dialect: &Dialect) -> Option<Patch> {
        let old = parse(source, dialect);
        match analyze(&old, &edit, dialect) {
            ReparseOutcome::Patch(patch) => Some(patch),
            ReparseOutcome::FullReparseRequired(_) => None,
        }
    }

    fn assert_equivalent(source: &str, edit: TextEdit, dialect: &Dialect) {
        let old = parse(source, dialect);
        let new_text = edit.apply(source).unwrap_or_default();
        let incremental = reparse(&old, &edit, dialect);
        let full = parse(&new_text, dialect);
        assert_eq!(incremental.text(), new_text);
        assert_eq!(incremental.green(), full.green(), "\n{}\n{}", incremental.debug_dump(), full.debug_dump());
        assert_eq!(incremental.errors(), full.errors());
    }

    #[test]
    fn test_edit_apply_and_delta() {
        let edit = TextEdit::new(TextRange::new(1.into(), 3.into()), "xyz");
        assert_eq!(edit.apply("abcd").as_deref(), Some("axyzd"));
        assert_eq!(edit.delta(), 1);
        assert_eq!(TextEdit::insert(9, "x").apply("abc"), None);
        assert_eq!(TextEdit::insert(1, "x").apply("é"), None);
    }

    #[test]
    fn test_string_content_edit_is_incremental() {
        let source = "my $s = \"hello\";\nprint $s;\n";
        let patch = patched(source, TextEdit::insert(11, "XX"), &Dialect::new());
        assert_eq!(patch.as_ref().map(|p| p.kind), Some(SyntaxKind::StringDq));
        assert_eq!(patch.map(|p| p.new_range), Some(TextRange::new(8.into(), 17.into())));
        assert_equivalent(source, TextEdit::insert(11, "XX"), &Dialect::new());
    }

    #[test]
    fn test_closing_the_quote_early_falls_back() {
        let source = "my $s = \"hello\";\nprint $s;\n";
        let edit = TextEdit::insert(11, "\"");
        assert_eq!(patched(source, edit.clone(), &Dialect::new()).map(|p| p.kind), None);
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_variable_rename() {
        let source = "my $count = 1;\n$count++;\n";
        let edit = TextEdit::insert(6, "un");
        assert_eq!(patched(source, edit.clone(), &Dialect::new()).map(|p| p.kind), Some(SyntaxKind::VariableName));
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_sub_body_edit_reuses_lazy_block() {
        let source = "sub f {\n  return 1;\n}\nf();\n";
        let edit = TextEdit::insert(18, " + 2");
        assert_eq!(patched(source, edit.clone(), &Dialect::new()).map(|p| p.kind), Some(SyntaxKind::LazyBlock));
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_unbalancing_a_block_falls_back() {
        let source = "sub f {\n  return 1;\n}\nf();\n";
        let edit = TextEdit::insert(18, " {");
        assert_eq!(patched(source, edit.clone(), &Dialect::new()).map(|p| p.kind), None);
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_heredoc_body_edit() {
        let source = "print <<EOM;\nhello\nEOM\nprint 1;\n";
        let edit = TextEdit::insert(15, "y");
        assert_eq!(patched(source, edit.clone(), &Dialect::new()).map(|p| p.kind), Some(SyntaxKind::HeredocQq));
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_second_heredoc_body_uses_its_own_terminator() {
        let source = "print <<A, <<'B';\nfirst\nA\nsecond\nB\n1;\n";
        // Inside "second".
        let edit = TextEdit::insert(29, "A\n");
        let patch = patched(source, edit.clone(), &Dialect::new());
        assert_eq!(patch.map(|p| p.kind), Some(SyntaxKind::Heredoc));
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_typing_the_terminator_falls_back() {
        let source = "print <<EOM;\nhello\nEOM\nprint 1;\n";
        let edit = TextEdit::insert(15, "\nEOM\n");
        assert_equivalent(source, edit, &Dialect::new());
    }

    #[test]
    fn test_edit_at_end_of_input_falls_back() {
        let source = "my $s = \"abc\"";
        let old = parse(source, &Dialect::new());
        let outcome = analyze(&old, &TextEdit::insert(10, "x"), &Dialect::new());
        assert!(matches!(outcome, ReparseOutcome::FullReparseRequired(_)));
    }

    #[test]
    fn test_edit_outside_elements_needs_full_parse() {
        let source = "my $a = 1;\nmy $b = 2;\n";
        let old = parse(source, &Dialect::new());
        let outcome = analyze(&old, &TextEdit::insert(10, "\n"), &Dialect::new());
        assert_eq!(
            outcome,
            ReparseOutcome::FullReparseRequired(FullReparseReason::NoReparsableElement)
        );
    }

    #[test]
    fn test_errors_after_the_element_shift() {
        let source = "my $s = 'abc';\n1 +;\n";
        let old = parse(source, &Dialect::new());
        assert_eq!(old.errors().len(), 1);
        let edit = TextEdit::insert(10, "1234");
        let new = reparse(&old, &edit, &Dialect::new());
        let full = parse(&edit.apply(source).unwrap_or_default(), &Dialect::new());
        assert_eq!(new.errors(), full.errors());
        assert_eq!(new.errors()[0].range.start(), old.errors()[0].range.start() + TextSize::from(4));
    }

    #[test]
    fn test_dialect_change_needs_full_parse() {
        let old = parse("my $s = 'abc';\n", &Dialect::new());
        let outcome = analyze(&old, &TextEdit::insert(10, "x"), &Dialect::modern());
        assert_eq!(outcome, ReparseOutcome::FullReparseRequired(FullReparseReason::DialectChanged));
    }

    #[test]
    fn test_template_text_edit() {
        let dialect = Dialect::template();
        let source = "<p><? print 1 ?>hello<? print 2 ?></p>\n";
        let edit = TextEdit::insert(18, "XYZ");
        assert_eq!(patched(source, edit.clone(), &dialect).map(|p| p.kind), Some(SyntaxKind::TemplateRegion));
        assert_equivalent(source, edit, &dialect);
    }

    #[test]
    fn test_typing_a_code_opener_in_template_text() {
        let dialect = Dialect::template();
        let source = "<p><? print 1 ?>hello<? print 2 ?></p>\n";
        assert_equivalent(source, TextEdit::insert(18, "<? "), &dialect);
    }

    #[test]
    fn test_cancelled_reparse() {
        let flag = crate::cancel::CancellationFlag::new();
        flag.cancel();
        let old = parse("1;\n", &Dialect::new());
        let result = reparse_with_cancellation(&old, &TextEdit::insert(0, "2"), &Dialect::new(), &flag);
        assert!(matches!(result, Err(ParseError::Cancelled)));
    }
}
