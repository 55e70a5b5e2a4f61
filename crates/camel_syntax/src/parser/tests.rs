#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationFlag;
    use crate::diagnostics::SyntaxErrorKind;
    use crate::tree::SyntaxNode;

    fn parse_plain(source: &str) -> Parse {
        parse(source, &Dialect::new())
    }

    fn count(node: &SyntaxNode, kind: SyntaxKind) -> usize {
        node.descendants().filter(|n| n.kind() == kind).count()
    }

    fn first(parse: &Parse, kind: SyntaxKind) -> Option<SyntaxNode> {
        parse.syntax_node().descendants().find(|n| n.kind() == kind)
    }

    #[test]
    fn test_declaration_with_arithmetic() {
        let parse = parse_plain("my $x = 1 + 2;\n");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::Statement), 1);
        assert_eq!(count(&root, SyntaxKind::AssignExpr), 1);
        assert_eq!(count(&root, SyntaxKind::VariableDeclarationLexical), 1);
        assert_eq!(count(&root, SyntaxKind::AddExpr), 1);
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let parse = parse_plain("1 + 2 * 3;");
        let add = first(&parse, SyntaxKind::AddExpr);
        let child_kinds: Vec<_> = add.iter().flat_map(|n| n.children()).map(|n| n.kind()).collect();
        assert_eq!(child_kinds, vec![SyntaxKind::NumberConstant, SyntaxKind::MulExpr]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let parse = parse_plain("$a = $b = 1;");
        let outer = first(&parse, SyntaxKind::AssignExpr);
        let child_kinds: Vec<_> = outer.iter().flat_map(|n| n.children()).map(|n| n.kind()).collect();
        assert_eq!(child_kinds, vec![SyntaxKind::ScalarVariable, SyntaxKind::AssignExpr]);
    }

    #[test]
    fn test_unchainable_comparison_is_one_error() {
        let parse = parse_plain("$a <=> $b <=> $c;");
        assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
        let error = &parse.errors()[0];
        assert_eq!(error.kind, SyntaxErrorKind::Chained);
        assert_eq!(error.range, TextRange::new(0.into(), 16.into()));
        assert!(first(&parse, SyntaxKind::ErrorElement).is_some());
        assert_eq!(parse.text(), "$a <=> $b <=> $c;");
    }

    #[test]
    fn test_chainable_comparisons_are_fine() {
        let parse = parse_plain("$a < $b <= $c;");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        assert_eq!(count(&parse.syntax_node(), SyntaxKind::RelationalExpr), 2);
    }

    #[test]
    fn test_sub_body_is_lazy() {
        let parse = parse_plain("sub foo {\n  my $x = shift;\n  return $x * 2;\n}\n");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let sub = first(&parse, SyntaxKind::SubDefinition);
        assert!(sub.is_some());
        let block = first(&parse, SyntaxKind::LazyBlock).map(|n| n.text().to_string());
        assert_eq!(block.as_deref(), Some("{\n  my $x = shift;\n  return $x * 2;\n}"));
        assert_eq!(count(&parse.syntax_node(), SyntaxKind::ReturnExpr), 0);
    }

    #[test]
    fn test_unterminated_block() {
        let parse = parse_plain("sub foo { 1;");
        assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
        assert_eq!(parse.errors()[0].kind, SyntaxErrorKind::Unterminated);
        assert_eq!(parse.errors()[0].range, TextRange::new(8.into(), 12.into()));
        assert_eq!(parse.text(), "sub foo { 1;");
    }

    #[test]
    fn test_missing_semicolon_resumes_at_next_statement() {
        let parse = parse_plain("my $x = 1\nmy $y = 2;\n");
        assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
        assert!(parse.errors()[0].message.starts_with("expected `;`"), "{}", parse.errors()[0].message);
        assert_eq!(count(&parse.syntax_node(), SyntaxKind::Statement), 2);
    }

    #[test]
    fn test_stray_close_brace() {
        let source = "1; } 2;";
        let parse = parse_plain(source);
        assert_eq!(parse.errors().len(), 1, "{:?}", parse.errors());
        assert_eq!(parse.errors()[0].range, TextRange::new(3.into(), 4.into()));
        assert_eq!(parse.text(), source);
        assert_eq!(count(&parse.syntax_node(), SyntaxKind::Statement), 2);
    }

    #[test]
    fn test_garbage_keeps_every_byte() {
        let source = "my $x = ) ] } ;; sub { \n";
        let parse = parse_plain(source);
        assert_eq!(parse.text(), source);
        assert!(!parse.errors().is_empty());
    }

    #[test]
    fn test_c_style_and_foreach_loops() {
        let parse = parse_plain("for (my $i = 0; $i < 3; $i++) { }\nforeach my $x (@list) { }\nfor (@list) { }\n");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::ForStatement), 1);
        assert_eq!(count(&root, SyntaxKind::ForeachStatement), 2);
        assert_eq!(count(&root, SyntaxKind::SuffixIncDec), 1);
    }

    #[test]
    fn test_if_elsif_else() {
        let parse = parse_plain("if ($a) { 1 } elsif ($b) { 2 } else { 3 }\n");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::IfStatement), 1);
        assert_eq!(count(&root, SyntaxKind::ElsifClause), 1);
        assert_eq!(count(&root, SyntaxKind::ElseClause), 1);
        assert_eq!(count(&root, SyntaxKind::LazyBlock), 3);
    }

    #[test]
    fn test_method_chain_and_subscripts() {
        let parse = parse_plain("$obj->method(1)->{key}[0];");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::MethodCall), 1);
        assert_eq!(count(&root, SyntaxKind::HashIndex), 1);
        assert_eq!(count(&root, SyntaxKind::ArrayIndex), 1);
        assert_eq!(count(&root, SyntaxKind::CallArgs), 1);
    }

    #[test]
    fn test_print_to_filehandle_with_modifier() {
        let parse = parse_plain("print STDERR \"oops\" if $verbose;");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::FileHandle), 1);
        assert_eq!(count(&root, SyntaxKind::StatementModifier), 1);
        assert_eq!(count(&root, SyntaxKind::StringDq), 1);
    }

    #[test]
    fn test_hash_literal_with_fat_commas() {
        let parse = parse_plain("my %h = (a => 1, b => [1, 2],);");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::BarewordString), 2);
        assert_eq!(count(&root, SyntaxKind::AnonArray), 1);
        assert_eq!(count(&root, SyntaxKind::HashVariable), 1);
    }

    #[test]
    fn test_package_and_use() {
        let parse = parse_plain("package Foo::Bar;\nuse strict;\nuse List::Util qw(max);\n");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::PackageStatement), 1);
        assert_eq!(count(&root, SyntaxKind::UseStatement), 2);
        assert_eq!(count(&root, SyntaxKind::StringList), 1);
    }

    #[test]
    fn test_heredoc_body_stays_inside_statement() {
        let source = "my $x = <<EOM;\nhello\nEOM\nprint $x;\n";
        let parse = parse_plain(source);
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::HeredocDeclaration), 1);
        assert_eq!(count(&root, SyntaxKind::HeredocQq), 1);
        assert_eq!(count(&root, SyntaxKind::Statement), 2);
        assert_eq!(parse.text(), source);
    }

    #[test]
    fn test_native_try_catch() {
        let parse = parse("try { risky() } catch ($e) { warn $e }\n", &Dialect::modern());
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let root = parse.syntax_node();
        assert_eq!(count(&root, SyntaxKind::TryCatch), 1);
        assert_eq!(count(&root, SyntaxKind::CatchClause), 1);
    }

    #[test]
    fn test_signature_only_parsed_when_enabled() {
        let source = "sub add ($x, $y) { $x + $y }\n";
        let plain = parse_plain(source);
        let modern = parse(source, &Dialect::modern());
        assert!(plain.errors().is_empty() && modern.errors().is_empty());
        let plain_sig = first(&plain, SyntaxKind::Signature);
        let modern_sig = first(&modern, SyntaxKind::Signature);
        assert_eq!(plain_sig.map(|n| count(&n, SyntaxKind::CommaExpr)), Some(0));
        assert_eq!(modern_sig.map(|n| count(&n, SyntaxKind::CommaExpr)), Some(1));
    }

    #[test]
    fn test_cancelled_parse() {
        let flag = CancellationFlag::new();
        flag.cancel();
        let result = parse_with_cancellation("1;\n2;\n", &Dialect::new(), &flag);
        assert!(matches!(result, Err(ParseError::Cancelled)));
    }

    #[test]
    fn test_uncancelled_parse_matches_parse() {
        let flag = CancellationFlag::new();
        let source = "my @x = map { $_ * 2 } @y;\n";
        let result = parse_with_cancellation(source, &Dialect::new(), &flag);
        assert_eq!(result.ok(), Some(parse_plain(source)));
    }

    #[test]
    fn test_lazy_block_green_requires_one_closed_block() {
        let dialect = Dialect::new();
        let good = merge(lexer::lex("{ a { b } }", &dialect).tokens);
        assert!(lazy_block_green("{ a { b } }", &good, &dialect).is_some());
        let open = merge(lexer::lex("{ a { b }", &dialect).tokens);
        assert!(lazy_block_green("{ a { b }", &open, &dialect).is_none());
        let extra = merge(lexer::lex("{ a } }", &dialect).tokens);
        assert!(lazy_block_green("{ a } }", &extra, &dialect).is_none());
    }
}
