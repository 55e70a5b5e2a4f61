//! Property-based tests for the syntax front end.
//!
//! Sources are either Perl-flavoured fragment soup or small realistic files; edits are random insertions and deletions
//! at character boundaries.

use camel_core::Dialect;
use camel_core::lang::token_sets::REPARSABLE_LEAVES;
use camel_syntax::lexer::{self, Token};
use camel_syntax::merge::merge;
use camel_syntax::reparse::{self, TextEdit, relex_element};
use camel_syntax::{Parse, SyntaxNode, parse};
use proptest::prelude::*;
use rowan::{NodeOrToken, TextRange, TextSize};

// =============================================================================
// Inputs
// =============================================================================

const FRAGMENTS: &[&str] = &[
    "my ", "$x", "@list", "%h", " = ", "1", "0x1f", "3.14", ";", "\n", " ", "{", "}", "(", ")", "[", "]", "->", "=>",
    ", ", "'str'", "\"dq $x\"", "q(", "qq{", "qw/a b/", "s/a/b/g", "m{x}i", "/", "<<EOM", "<<'T'", "EOM\n", "T\n",
    "=pod\n", "=cut\n", "# note\n", "#@returns Foo\n", "sub f ", "if ", "else ", "print ", "return ", "\\", "$$",
    "<=>", "__END__\n", "é", "?", ":", "<", ">",
];

const CORPUS: &[&str] = &[
    "package Shop::Cart;\nuse strict;\n\n=pod\n\nCart helpers.\n\n=cut\n\nsub total {\n    my ($self, %args) = @_;\n    \
     my $sum = 0;\n    $sum += $_->{price} for @{ $self->{items} };\n    return sprintf(\"%.2f\", $sum);\n}\n\n\
     print <<EOM;\nTotal: @{[ total() ]}\nEOM\n1;\n",
    "my @sorted = sort { $a <=> $b } grep { /\\d+/ } map { $_ * 2 } @input;\n\
     my %seen = (one => 1, 'two' => [2, 3]);\nwhile (my ($k, $v) = each %seen) {\n    next unless $v;\n    \
     print STDERR \"$k\\n\" if $verbose;\n}\n",
    "print <<A, <<'B';\nfirst $x\nA\nsecond\nB\nmy $re = qr{^(\\w+)\\s*=}x;\n\
     $line =~ s/\\s+$//;\n$count = () = $str =~ /x/g;\n1;\n",
];

fn fragment_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.concat())
}

fn source() -> impl Strategy<Value = String> {
    prop_oneof![
        fragment_soup(),
        prop::sample::select(CORPUS).prop_map(str::to_string),
        "[ -~\n]{0,60}",
    ]
}

/// A random insertion or deletion inside `text`, at character boundaries.
fn edit_for(text: &str, at: prop::sample::Index, deleted: usize, insert: &str) -> TextEdit {
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).chain([text.len()]).collect();
    let start = at.index(boundaries.len());
    let end = (start + deleted).min(boundaries.len() - 1);
    let range = TextRange::new(size(boundaries[start]), size(boundaries[end]));
    TextEdit::new(range, insert)
}

fn size(offset: usize) -> TextSize {
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

fn assert_same(actual: &Parse, expected: &Parse) {
    assert_eq!(actual.text(), expected.text());
    assert_eq!(actual.debug_dump(), expected.debug_dump());
    assert_eq!(actual.errors(), expected.errors());
}

/// Every node's text is exactly the concatenation of its children's.
fn assert_nodes_cover(node: &SyntaxNode) {
    let mut joined = String::new();
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => {
                assert_nodes_cover(&n);
                joined.push_str(&n.text().to_string());
            }
            NodeOrToken::Token(t) => joined.push_str(t.text()),
        }
    }
    assert_eq!(joined, node.text().to_string());
}

fn concat(source: &str, tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text(source)).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn tokens_cover_the_source(src in source()) {
        let lexed = lexer::lex(&src, &Dialect::new());
        prop_assert_eq!(concat(&src, &lexed.tokens), src.clone());
        prop_assert!(lexed.tokens.iter().all(|t| !t.range.is_empty()));

        let merged = merge(lexed.tokens);
        prop_assert_eq!(concat(&src, &merged), src.clone());
    }

    #[test]
    fn template_tokens_cover_the_source(src in "[<?> a-z$;{}\n]{0,40}") {
        let lexed = lexer::lex(&src, &Dialect::template());
        prop_assert_eq!(concat(&src, &lexed.tokens), src.clone());
    }

    #[test]
    fn merge_is_idempotent(src in source()) {
        let once = merge(lexer::lex(&src, &Dialect::new()).tokens);
        let twice = merge(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn trees_are_lossless(src in source()) {
        let parse = parse(&src, &Dialect::new());
        prop_assert_eq!(parse.text(), src.clone());
        assert_nodes_cover(&parse.syntax_node());

        let expanded = parse.expand_all();
        prop_assert_eq!(expanded.text(), src);
        assert_nodes_cover(&expanded.syntax_node());
    }

    #[test]
    fn reparse_matches_a_full_parse(
        src in source(),
        at in any::<prop::sample::Index>(),
        deleted in 0usize..4,
        insert in prop::sample::select(FRAGMENTS),
    ) {
        let dialect = Dialect::new();
        let old = parse(&src, &dialect);
        let edit = edit_for(&src, at, deleted, insert);
        let new_text = edit.apply(&src).unwrap_or_default();
        assert_same(&reparse::reparse(&old, &edit, &dialect), &parse(&new_text, &dialect));
    }

    #[test]
    fn repeated_small_edits_match_a_full_parse(
        index in 0..CORPUS.len(),
        edits in prop::collection::vec((any::<prop::sample::Index>(), prop::sample::select(FRAGMENTS)), 1..6),
    ) {
        let dialect = Dialect::new();
        let mut text = CORPUS[index].to_string();
        let mut tree = parse(&text, &dialect);
        for (at, insert) in edits {
            let edit = edit_for(&text, at, 0, insert);
            text = edit.apply(&text).unwrap_or_default();
            tree = reparse::reparse(&tree, &edit, &dialect);
            assert_same(&tree, &parse(&text, &dialect));
        }
    }
}

// =============================================================================
// State determinism
// =============================================================================

/// Relexing any reparsable element from the state derived for it reproduces its tokens.
#[test]
fn relexing_an_element_reproduces_it() {
    for source in CORPUS {
        let parse = parse(source, &Dialect::new());
        let root = parse.syntax_node();
        let mut checked = 0;
        for element in root.descendants_with_tokens() {
            if !REPARSABLE_LEAVES.contains(element.kind()) {
                continue;
            }
            let expected: Vec<_> = match &element {
                NodeOrToken::Token(t) => vec![(t.kind(), t.text_range())],
                NodeOrToken::Node(n) => n
                    .descendants_with_tokens()
                    .filter_map(|e| e.into_token())
                    .map(|t| (t.kind(), t.text_range()))
                    .collect(),
            };
            let actual: Option<Vec<_>> =
                relex_element(&parse, &element).map(|tokens| tokens.iter().map(|t| (t.kind, t.range)).collect());
            assert_eq!(actual.as_ref(), Some(&expected), "{:?} in {source:?}", element);
            checked += 1;
        }
        assert!(checked > 0);
    }
}
