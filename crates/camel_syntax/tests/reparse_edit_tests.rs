//! Typing into a previously parsed file: the result always equals a fresh parse of the edited text.

use camel_core::Dialect;
use camel_core::lang::kinds::SyntaxKind;
use camel_syntax::reparse::{self, ReparseOutcome, TextEdit};
use camel_syntax::{Parse, parse};

/// Apply `edit` both ways and compare; return the kind of the patched element, if any.
fn check(source: &str, edit: TextEdit, dialect: &Dialect) -> Option<SyntaxKind> {
    let old = parse(source, dialect);
    let new_text = edit.apply(source).unwrap_or_else(|| panic!("edit {edit:?} does not fit {source:?}"));
    let full = parse(&new_text, dialect);
    let incremental = reparse::reparse(&old, &edit, dialect);
    assert_same(&incremental, &full);
    match reparse::analyze(&old, &edit, dialect) {
        ReparseOutcome::Patch(patch) => {
            assert_same(&patch.parse, &full);
            Some(patch.kind)
        }
        ReparseOutcome::FullReparseRequired(_) => None,
    }
}

fn assert_same(actual: &Parse, expected: &Parse) {
    assert_eq!(actual.text(), expected.text());
    assert_eq!(actual.debug_dump(), expected.debug_dump());
    assert_eq!(actual.errors(), expected.errors());
}

/// Type `word` one character at a time at `offset`, checking after every keystroke.
fn type_word(source: &str, offset: u32, word: &str, dialect: &Dialect) {
    let mut text = source.to_string();
    let mut at = offset;
    for c in word.chars() {
        let edit = TextEdit::insert(at, c.to_string());
        check(&text, edit.clone(), dialect);
        text = edit.apply(&text).unwrap_or_default();
        at += u32::try_from(c.len_utf8()).unwrap_or(1);
    }
}

const SAMPLE: &str = "package Shop::Cart;\n\
use strict;\n\
\n\
=pod\n\
\n\
Cart helpers.\n\
\n\
=cut\n\
\n\
sub total {\n\
    my ($self, %args) = @_;\n\
    my $sum = 0;\n\
    $sum += $_->{price} for @{ $self->{items} };\n\
    return sprintf(\"%.2f\", $sum);\n\
}\n\
\n\
print <<EOM;\n\
Total: @{[ total() ]}\n\
EOM\n\
1;\n";

fn offset_of(source: &str, needle: &str) -> u32 {
    let index = source.find(needle).unwrap_or_else(|| panic!("{needle:?} not in sample"));
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[test]
fn typing_inside_a_string() {
    let at = offset_of(SAMPLE, "%.2f") + 1;
    type_word(SAMPLE, at, "edit", &Dialect::new());
    let kind = check(SAMPLE, TextEdit::insert(at, "x"), &Dialect::new());
    assert_eq!(kind, Some(SyntaxKind::StringDq));
}

#[test]
fn typing_inside_a_variable_name() {
    let at = offset_of(SAMPLE, "$sum = 0") + 2;
    type_word(SAMPLE, at, "edit", &Dialect::new());
    let kind = check(SAMPLE, TextEdit::insert(at, "x"), &Dialect::new());
    assert_eq!(kind, Some(SyntaxKind::VariableName));
}

#[test]
fn typing_inside_a_sub_body() {
    let at = offset_of(SAMPLE, "my $sum");
    type_word(SAMPLE, at, "edit;", &Dialect::new());
    let kind = check(SAMPLE, TextEdit::insert(at, "x;"), &Dialect::new());
    assert_eq!(kind, Some(SyntaxKind::LazyBlock));
}

#[test]
fn typing_inside_pod() {
    let at = offset_of(SAMPLE, "helpers");
    type_word(SAMPLE, at, "edit ", &Dialect::new());
    let kind = check(SAMPLE, TextEdit::insert(at, "x"), &Dialect::new());
    assert_eq!(kind, Some(SyntaxKind::Pod));
}

#[test]
fn typing_inside_a_heredoc_body() {
    let at = offset_of(SAMPLE, "Total") + 2;
    type_word(SAMPLE, at, "edit", &Dialect::new());
    let kind = check(SAMPLE, TextEdit::insert(at, "x"), &Dialect::new());
    assert_eq!(kind, Some(SyntaxKind::HeredocQq));
}

#[test]
fn typing_a_quote_that_swallows_the_rest() {
    let at = offset_of(SAMPLE, "my $sum");
    type_word(SAMPLE, at, "'", &Dialect::new());
    type_word(SAMPLE, at, "q{", &Dialect::new());
}

#[test]
fn deleting_across_elements() {
    let start = offset_of(SAMPLE, "use strict");
    let end = offset_of(SAMPLE, "sub total");
    let edit = TextEdit::delete(rowan::TextRange::new(start.into(), end.into()));
    assert_eq!(check(SAMPLE, edit, &Dialect::new()), None);
}

#[test]
fn replacing_the_heredoc_terminator() {
    let at = offset_of(SAMPLE, "EOM\n1;");
    let edit = TextEdit::new(rowan::TextRange::new(at.into(), (at + 1).into()), "X");
    check(SAMPLE, edit, &Dialect::new());
}

const TEMPLATE: &str = "<ul>\n<? for my $item (@items) { ?>\n  <li><? print $item ?></li>\n<? } ?>\n</ul>\n";

#[test]
fn typing_inside_template_text() {
    let at = offset_of(TEMPLATE, "<li>") + 1;
    type_word(TEMPLATE, at, "edit", &Dialect::template());
    let kind = check(TEMPLATE, TextEdit::insert(at, "x"), &Dialect::template());
    assert_eq!(kind, Some(SyntaxKind::TemplateRegion));
}

#[test]
fn typing_a_code_opener_at_the_top_of_a_region() {
    let at = offset_of(TEMPLATE, "\n  <li>") + 1;
    type_word(TEMPLATE, at, "<? ", &Dialect::template());
}

#[test]
fn typing_a_code_opener_in_the_middle_of_a_region() {
    let at = offset_of(TEMPLATE, "li>") + 1;
    type_word(TEMPLATE, at, "<? ", &Dialect::template());
}

#[test]
fn typing_a_code_opener_at_the_bottom_of_a_region() {
    let at = offset_of(TEMPLATE, "</li>");
    type_word(TEMPLATE, at, "<? ", &Dialect::template());
}

#[test]
fn typing_a_close_tag_in_code() {
    let at = offset_of(TEMPLATE, "$item ?>") + 5;
    type_word(TEMPLATE, at, " ?>", &Dialect::template());
}
