/// Expression parsing.
///
/// Precedence climbing over the operator table in `camel_core::lang::operators`, plus the term forms: variables,
/// literals, calls, subscripts, anonymous constructors and the keyword-led expressions.
///
/// ## Notes
/// - Binding powers are `precedence * 2`; a left-associative operator parses its right operand one step tighter.
/// - Comparison operators share a level and may chain (`$a < $b <= $c`) unless one of them is `<=>`, `cmp` or `~~`,
///   in which case the whole chain becomes an error node.
impl<'t> Parser<'t> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// A full expression, down to the low-precedence `or`/`and`/`not`.
    fn expr(&mut self) -> bool {
        self.expr_bp(0)
    }

    /// Arguments of a list operator: a comma list that stops before `or`/`and`/`not`.
    fn list_expr(&mut self) -> bool {
        self.expr_bp(left_bp(precedence::COMMA))
    }

    fn expr_bp(&mut self, min: u16) -> bool {
        let mark = self.mark();
        if !self.unary() {
            return false;
        }
        self.infix(mark, min);
        true
    }

    fn at_expr_start(&self) -> bool {
        self.at_set(EXPR_STARTS)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Prefix operators, then a term.
    fn unary(&mut self) -> bool {
        let op = self.current();
        let Some(info) = operators::prefix_info(op) else {
            return self.term();
        };
        self.start_node(info.node);
        self.bump();
        if op == SyntaxKind::FileTest {
            // `-e` alone tests `$_`.
            if self.at_expr_start() {
                self.expr_bp(left_bp(precedence::NAMED_UNARY) + 1);
            }
        } else if !self.expr_bp(left_bp(info.precedence)) {
            self.error("expected expression".to_string());
        }
        self.finish_node();
        true
    }

    /// Infix and postfix operators binding at least as tight as `min`, wrapped around what starts at `mark`.
    fn infix(&mut self, mark: Mark, min: u16) {
        // Previous operator at the comparison level, for chain checks.
        let mut chained: Option<SyntaxKind> = None;
        loop {
            let op = self.current();
            match op {
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    if left_bp(precedence::INC_DEC) < min {
                        return;
                    }
                    self.start_node_at(mark, SyntaxKind::SuffixIncDec);
                    self.bump();
                    self.finish_node();
                    continue;
                }
                SyntaxKind::Comma | SyntaxKind::FatComma => {
                    if left_bp(precedence::COMMA) < min {
                        return;
                    }
                    self.comma_list(mark);
                    chained = None;
                    continue;
                }
                _ => {}
            }

            let Some(info) = operators::infix_info(op) else {
                return;
            };
            let lbp = left_bp(info.precedence);
            if lbp < min {
                return;
            }
            if op == SyntaxKind::Question {
                self.ternary(mark, lbp);
                chained = None;
                continue;
            }

            match info.associativity {
                Associativity::Chain | Associativity::NonAssoc => {
                    let previous = chained.filter(|prev| {
                        operators::infix_info(*prev).is_some_and(|p| p.precedence == info.precedence)
                    });
                    match previous {
                        Some(prev)
                            if info.associativity == Associativity::NonAssoc
                                || UNCHAINABLE_OPERATORS.contains(prev)
                                || UNCHAINABLE_OPERATORS.contains(op) =>
                        {
                            let culprit = if UNCHAINABLE_OPERATORS.contains(prev) { prev } else { op };
                            self.binary(mark, SyntaxKind::ErrorElement, lbp + 1);
                            let spelling = operators::as_str(culprit).unwrap_or("operator");
                            self.errors.push(
                                SyntaxError::chained(
                                    format!("`{spelling}` cannot be chained"),
                                    TextRange::new(mark.start, self.last_end),
                                )
                                .with_hint("add parentheses to make the grouping explicit"),
                            );
                        }
                        _ => self.binary(mark, info.node, lbp + 1),
                    }
                    chained = Some(op);
                }
                Associativity::Right => {
                    self.binary(mark, info.node, lbp);
                    chained = None;
                }
                Associativity::Left => {
                    self.binary(mark, info.node, lbp + 1);
                    chained = None;
                }
            }
        }
    }

    /// Wrap `mark..` in `node`, consume the operator and parse the right operand at `rbp`.
    fn binary(&mut self, mark: Mark, node: SyntaxKind, rbp: u16) {
        self.start_node_at(mark, node);
        self.bump();
        if !self.expr_bp(rbp) {
            self.error("expected expression".to_string());
        }
        self.finish_node();
    }

    /// `COND ? THEN : ELSE`, right associative.
    fn ternary(&mut self, mark: Mark, lbp: u16) {
        self.start_node_at(mark, SyntaxKind::TernaryExpr);
        self.bump();
        if !self.expr_bp(left_bp(precedence::ASSIGN)) {
            self.error("expected expression".to_string());
        }
        if self.expect(SyntaxKind::Colon, "`:`") && !self.expr_bp(lbp) {
            self.error("expected expression".to_string());
        }
        self.finish_node();
    }

    /// One comma list for all the commas at this level; a trailing comma is allowed.
    fn comma_list(&mut self, mark: Mark) {
        self.start_node_at(mark, SyntaxKind::CommaExpr);
        while self.at(SyntaxKind::Comma) || self.at(SyntaxKind::FatComma) {
            self.bump();
            if self.at_expr_start() {
                self.expr_bp(left_bp(precedence::COMMA) + 1);
            }
        }
        self.finish_node();
    }

    // ========================================================================
    // Terms
    // ========================================================================

    fn term(&mut self) -> bool {
        use SyntaxKind::*;

        let mark = self.mark();
        match self.current() {
            k if SIGILS.contains(k) => self.variable(),
            k if NUMBERS.contains(k) => self.single(NumberConstant),
            k if QUOTE_LITERALS.contains(k) || k == HeredocDeclaration => self.bump(),
            Identifier => self.bareword(Bareword),
            PackageName => self.bareword(PackageExpr),
            TagConstant => self.single(TagExpr),
            Readline => self.single(ReadlineExpr),
            LParen => self.paren_expr(),
            LBracket => self.delimited(AnonArray, RBracket, "`]`"),
            LBrace => self.delimited(AnonHash, RBrace, "`}`"),
            KwSub | KwMethod | KwFunc | KwAsync => self.anon_sub(),
            KwDo => self.do_expr(),
            KwEval => self.eval_expr(),
            k if VARIABLE_DECLARATORS.contains(k) => self.variable_declaration(),
            KwReturn => {
                self.start_node(ReturnExpr);
                self.bump();
                if self.at_expr_start() {
                    self.list_expr();
                }
                self.finish_node();
            }
            k if LOOP_CONTROL_KEYWORDS.contains(k) => self.loop_control(),
            k if NAMED_UNARY_KEYWORDS.contains(k) || k == KwWantarray => self.named_unary(NamedUnaryExpr),
            KwAwait => self.named_unary(AwaitExpr),
            k if LIST_OPERATOR_KEYWORDS.contains(k) => self.list_operator(),
            k if BLOCK_LIST_KEYWORDS.contains(k) => self.sort_map_grep(),
            k if MOOSE_KEYWORDS.contains(k) => self.object_system_call(),
            _ => return false,
        }
        self.postfix(mark);
        true
    }

    /// A node holding exactly the current token.
    fn single(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `$name`, `@name`, `%name`, `*name`, `&name`, `$#name` and the dereference forms `${...}`, `$$ref`.
    fn variable(&mut self) {
        let sigil = self.current();
        match self.nth(1) {
            SyntaxKind::VariableName => {
                self.start_node(variable_kind(sigil));
                self.bump();
                self.bump();
                self.finish_node();
            }
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::DerefExpr);
                self.bump();
                self.bump();
                if !self.expr() {
                    self.error("expected expression".to_string());
                }
                self.expect(SyntaxKind::RBrace, "`}`");
                self.finish_node();
            }
            k if SIGILS.contains(k) => {
                self.start_node(SyntaxKind::DerefExpr);
                self.bump();
                self.variable();
                self.finish_node();
            }
            _ => {
                self.start_node(variable_kind(sigil));
                self.bump();
                let found = describe(self.current());
                self.error(format!("expected a variable name, found {found}"));
                self.finish_node();
            }
        }
    }

    /// Subscripts, method calls, code calls and postfix dereference after a term.
    fn postfix(&mut self, mark: Mark) {
        use SyntaxKind::*;

        loop {
            match (self.current(), self.nth(1)) {
                (LBracketArray, _) => self.subscript(mark, ArrayIndex, false),
                (LBraceHash, _) => self.subscript(mark, HashIndex, false),
                (LParen, _) if self.starts_with_code_sigil(mark) => {
                    self.start_node_at(mark, CallExpr);
                    self.call_args();
                    self.finish_node();
                }
                (Arrow, LBracketArray) => self.subscript(mark, ArrayIndex, true),
                (Arrow, LBraceHash) => self.subscript(mark, HashIndex, true),
                (Arrow, LParen) => {
                    self.start_node_at(mark, CallExpr);
                    self.bump();
                    self.call_args();
                    self.finish_node();
                }
                (Arrow, PostfixDeref) => {
                    self.start_node_at(mark, DerefExpr);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                (Arrow, _) => {
                    self.start_node_at(mark, MethodCall);
                    self.bump();
                    match self.current() {
                        Identifier | PackageName => self.bump(),
                        k if SIGILS.contains(k) => self.variable(),
                        k => {
                            let found = describe(k);
                            self.error(format!("expected a method name or subscript, found {found}"));
                        }
                    }
                    if self.at(LParen) {
                        self.call_args();
                    }
                    self.finish_node();
                }
                _ => return,
            }
        }
    }

    /// `&name(...)` and `&$code(...)` call directly; other terms need `->(`.
    fn starts_with_code_sigil(&self, mark: Mark) -> bool {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| t.range.start() == mark.start)
            .is_some_and(|t| t.kind == SyntaxKind::CodeSigil)
    }

    fn subscript(&mut self, mark: Mark, kind: SyntaxKind, arrow: bool) {
        let close = if kind == SyntaxKind::ArrayIndex {
            SyntaxKind::RBracketArray
        } else {
            SyntaxKind::RBraceHash
        };
        self.start_node_at(mark, kind);
        if arrow {
            self.bump();
        }
        self.bump();
        if !self.expr() {
            self.error("expected a subscript".to_string());
        }
        let what = if close == SyntaxKind::RBracketArray { "`]`" } else { "`}`" };
        self.expect(close, what);
        self.finish_node();
    }

    /// `( ARGS )` as [`SyntaxKind::CallArgs`].
    fn call_args(&mut self) {
        self.start_node(SyntaxKind::CallArgs);
        self.bump();
        if !self.at(SyntaxKind::RParen) {
            self.expr();
        }
        self.expect(SyntaxKind::RParen, "`)`");
        self.finish_node();
    }

    /// A bare word: hash key string, function call (with or without parens) or plain bareword.
    fn bareword(&mut self, plain: SyntaxKind) {
        match self.nth(1) {
            SyntaxKind::FatComma => self.single(SyntaxKind::BarewordString),
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::CallExpr);
                self.bump();
                self.call_args();
                self.finish_node();
            }
            SyntaxKind::Arrow => self.single(plain),
            k if EXPR_STARTS.contains(k) && !LIST_CALL_EXCLUDED.contains(k) => {
                self.start_node(SyntaxKind::CallExpr);
                self.bump();
                self.start_node(SyntaxKind::CallArgs);
                self.list_expr();
                self.finish_node();
                self.finish_node();
            }
            _ => self.single(plain),
        }
    }

    /// `( LIST )`, with an optional list slice `( LIST )[ ... ]`.
    fn paren_expr(&mut self) {
        let mark = self.mark();
        self.delimited(SyntaxKind::ParenExpr, SyntaxKind::RParen, "`)`");
        if self.at(SyntaxKind::LBracket) {
            self.start_node_at(mark, SyntaxKind::ArrayIndex);
            self.bump();
            if !self.expr() {
                self.error("expected a subscript".to_string());
            }
            self.expect(SyntaxKind::RBracket, "`]`");
            self.finish_node();
        }
    }

    /// `OPEN [EXPR] CLOSE` as one node.
    fn delimited(&mut self, kind: SyntaxKind, close: SyntaxKind, what: &str) {
        self.start_node(kind);
        self.bump();
        if !self.at(close) {
            self.expr();
        }
        self.expect(close, what);
        self.finish_node();
    }

    /// `[async] sub [SIGNATURE] BLOCK`.
    fn anon_sub(&mut self) {
        self.start_node(SyntaxKind::AnonSub);
        self.eat(SyntaxKind::KwAsync);
        if self.at_set(SUB_LIKE_KEYWORDS) {
            self.bump();
        } else {
            let found = describe(self.current());
            self.error(format!("expected `sub`, found {found}"));
        }
        if self.at(SyntaxKind::LParen) {
            self.signature();
        }
        while self.at(SyntaxKind::Colon) {
            self.sub_attribute();
        }
        self.lazy_block();
        self.finish_node();
    }

    /// `do BLOCK` or `do FILE`.
    fn do_expr(&mut self) {
        if self.nth(1) == SyntaxKind::LBrace {
            self.start_node(SyntaxKind::DoBlockExpr);
            self.bump();
            self.lazy_block();
            self.finish_node();
        } else {
            self.named_unary(SyntaxKind::NamedUnaryExpr);
        }
    }

    /// `eval BLOCK` or `eval EXPR`.
    fn eval_expr(&mut self) {
        self.start_node(SyntaxKind::EvalExpr);
        self.bump();
        if self.at(SyntaxKind::LBrace) {
            self.lazy_block();
        } else if self.at(SyntaxKind::LParen) {
            self.call_args();
        } else if self.at_expr_start() {
            self.expr_bp(left_bp(precedence::NAMED_UNARY) + 1);
        }
        self.finish_node();
    }

    /// `my`/`our`/`state`/`local` with a variable, a typed variable or a parenthesised list.
    fn variable_declaration(&mut self) {
        let keyword = self.current();
        self.start_node(declaration_kind(keyword));
        self.bump();
        if keyword == SyntaxKind::KwLocal {
            if !self.term() {
                self.error("expected expression".to_string());
            }
        } else {
            // `my Dog $spot`
            if self.at(SyntaxKind::PackageName) || self.at(SyntaxKind::Identifier) {
                self.bump();
            }
            match self.current() {
                SyntaxKind::LParen => self.delimited(SyntaxKind::ParenExpr, SyntaxKind::RParen, "`)`"),
                k if SIGILS.contains(k) => self.variable(),
                k => {
                    let found = describe(k);
                    self.error(format!("expected a variable, found {found}"));
                }
            }
        }
        self.finish_node();
    }

    /// `last`/`next`/`redo` with an optional label, `goto` with a target.
    fn loop_control(&mut self) {
        let keyword = self.current();
        self.start_node(SyntaxKind::LoopControl);
        self.bump();
        if self.at(SyntaxKind::Identifier) {
            self.start_node(SyntaxKind::Label);
            self.bump();
            self.finish_node();
        } else if keyword == SyntaxKind::KwGoto && self.at_expr_start() {
            self.expr_bp(left_bp(precedence::NAMED_UNARY) + 1);
        }
        self.finish_node();
    }

    /// A keyword taking at most one operand, parenthesised or binding tighter than comparisons.
    fn named_unary(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.call_args();
        } else if self.at_expr_start() {
            self.expr_bp(left_bp(precedence::NAMED_UNARY) + 1);
        }
        self.finish_node();
    }

    /// `print`, `push`, `die`, ...: a keyword followed by a list, with a filehandle for the print family.
    fn list_operator(&mut self) {
        let keyword = self.current();
        self.start_node(SyntaxKind::NamedListExpr);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.call_args();
        } else {
            if PRINT_KEYWORDS.contains(keyword) {
                self.filehandle();
            }
            if self.at_expr_start() {
                self.list_expr();
            }
        }
        self.finish_node();
    }

    /// `{$fh}`, `STDERR` or `$fh` directly followed by the printed list.
    fn filehandle(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => {
                self.start_node(SyntaxKind::FileHandle);
                self.bump();
                if !self.expr() {
                    self.error("expected a filehandle".to_string());
                }
                self.expect(SyntaxKind::RBrace, "`}`");
                self.finish_node();
            }
            SyntaxKind::Identifier | SyntaxKind::PackageName if FILEHANDLE_FOLLOWERS.contains(self.nth(1)) => {
                self.single(SyntaxKind::FileHandle);
            }
            SyntaxKind::ScalarSigil
                if self.nth(1) == SyntaxKind::VariableName && FILEHANDLE_FOLLOWERS.contains(self.nth(2)) =>
            {
                self.start_node(SyntaxKind::FileHandle);
                self.variable();
                self.finish_node();
            }
            _ => {}
        }
    }

    /// `sort`/`map`/`grep` with an optional leading block or comparator.
    fn sort_map_grep(&mut self) {
        let keyword = self.current();
        self.start_node(SyntaxKind::SortMapGrep);
        self.bump();
        let parens = self.eat(SyntaxKind::LParen);
        if self.at(SyntaxKind::LBrace) {
            self.lazy_block();
            self.eat(SyntaxKind::Comma);
        } else if keyword == SyntaxKind::KwSort
            && self.at(SyntaxKind::Identifier)
            && EXPR_STARTS.contains(self.nth(1))
        {
            self.bump();
        } else if keyword == SyntaxKind::KwSort
            && self.at(SyntaxKind::ScalarSigil)
            && self.nth(1) == SyntaxKind::VariableName
            && SIGILS.contains(self.nth(2))
        {
            self.variable();
        }
        if parens {
            if !self.at(SyntaxKind::RParen) {
                self.expr();
            }
            self.expect(SyntaxKind::RParen, "`)`");
        } else if self.at_expr_start() {
            self.list_expr();
        }
        self.finish_node();
    }

    /// Moose declarations (`has`, `extends`, ...) and `super`/`inner`.
    fn object_system_call(&mut self) {
        let keyword = self.current();
        self.start_node(SyntaxKind::ObjectSystemCall);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.call_args();
        } else if MOOSE_LIST_KEYWORDS.contains(keyword) && self.at_expr_start() {
            self.list_expr();
        }
        self.finish_node();
    }
}
