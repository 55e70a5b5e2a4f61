/// Statement parsing.
///
/// This chunk contains statement dispatch plus the declaration and compound-statement parsers:
/// `package`, `use`/`no`, sub definitions, special blocks, `if`/`unless`, loops, `given`/`when`, `try`/`catch`,
/// labels, bare blocks and expression statements.
impl<'t> Parser<'t> {
    fn statement(&mut self) {
        use SyntaxKind::*;

        match self.current() {
            Semicolon => {
                self.start_node(Statement);
                self.bump();
                self.finish_node();
            }
            TemplateRegion => self.bump(),
            KwPackage => self.package_statement(),
            KwUse | KwNo => self.use_statement(),
            k if SUB_LIKE_KEYWORDS.contains(k) && self.nth(1) == SubName => self.sub_definition(),
            KwAsync if SUB_LIKE_KEYWORDS.contains(self.nth(1)) && self.nth(2) == SubName => self.sub_definition(),
            SpecialBlockName if self.nth(1) == LBrace => self.special_block(),
            KwIf | KwUnless => self.if_statement(),
            KwWhile | KwUntil => self.while_statement(),
            KwFor | KwForeach => self.for_statement(),
            KwGiven | KwWhen if self.nth(1) == LParen => self.given_when_statement(),
            KwDefault if self.nth(1) == LBrace => {
                self.start_node(DefaultStatement);
                self.bump();
                self.lazy_block();
                self.finish_node();
            }
            KwTry if self.dialect.try_catch != TryCatchDialect::None => self.try_catch(),
            LBrace => {
                self.start_node(Statement);
                self.lazy_block();
                self.eat(Semicolon);
                self.finish_node();
            }
            Identifier if self.nth(1) == Colon => self.labeled_statement(),
            RBrace => self.error_token("unmatched `}`"),
            _ => self.expression_statement(),
        }
    }

    /// `package NAME [VERSION] ;` or `package NAME [VERSION] BLOCK`.
    fn package_statement(&mut self) {
        self.start_node(SyntaxKind::PackageStatement);
        self.bump();
        self.expect(SyntaxKind::PackageName, "a package name");
        if self.at_set(NUMBERS) {
            self.start_node(SyntaxKind::NumberConstant);
            self.bump();
            self.finish_node();
        }
        if self.at(SyntaxKind::LBrace) {
            self.lazy_block();
        } else {
            self.expect_semicolon();
        }
        self.finish_node();
    }

    /// `use MODULE [VERSION] [LIST];`, `use VERSION;` and the `no` forms.
    fn use_statement(&mut self) {
        let kind = if self.at(SyntaxKind::KwUse) {
            SyntaxKind::UseStatement
        } else {
            SyntaxKind::NoStatement
        };
        self.start_node(kind);
        self.bump();
        if self.at_set(NUMBERS) {
            self.start_node(SyntaxKind::NumberConstant);
            self.bump();
            self.finish_node();
        } else if self.expect(SyntaxKind::PackageName, "a module name") {
            // `use Foo 1.2 qw(...)`: a version directly followed by the import list.
            if self.at_set(NUMBERS) && self.nth(1) != SyntaxKind::Comma && self.nth(1) != SyntaxKind::FatComma {
                self.start_node(SyntaxKind::NumberConstant);
                self.bump();
                self.finish_node();
            }
            if self.at_expr_start() {
                self.expr();
            }
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// `[async] sub NAME [SIGNATURE] [ATTRIBUTES] BLOCK` and the `method`/`func` variants.
    fn sub_definition(&mut self) {
        let keyword = if self.at(SyntaxKind::KwAsync) { self.nth(1) } else { self.current() };
        let kind = match keyword {
            SyntaxKind::KwMethod => SyntaxKind::MethodDefinition,
            SyntaxKind::KwFunc => SyntaxKind::FuncDefinition,
            _ => SyntaxKind::SubDefinition,
        };
        self.start_node(kind);
        self.eat(SyntaxKind::KwAsync);
        self.bump();
        self.bump();
        self.sub_tail();
        self.finish_node();
    }

    /// Signature, attributes and body shared by named and anonymous subs.
    fn sub_tail(&mut self) {
        if self.at(SyntaxKind::LParen) {
            self.signature();
        }
        while self.at(SyntaxKind::Colon) {
            self.sub_attribute();
        }
        if self.at(SyntaxKind::LParen) {
            self.signature();
        }
        if self.at(SyntaxKind::LBrace) {
            self.lazy_block();
        } else {
            self.expect_semicolon();
        }
    }

    /// A prototype or signature. Parsed as an expression list only when signatures are enabled.
    fn signature(&mut self) {
        self.start_node(SyntaxKind::Signature);
        if self.dialect.signatures {
            self.bump();
            if !self.at(SyntaxKind::RParen) {
                self.expr();
            }
            self.expect(SyntaxKind::RParen, "`)`");
        } else {
            self.balanced_parens();
        }
        self.finish_node();
    }

    /// `:NAME` or `:NAME(...)`.
    fn sub_attribute(&mut self) {
        self.start_node(SyntaxKind::SubAttribute);
        self.bump();
        if self.expect(SyntaxKind::Identifier, "an attribute name") && self.at(SyntaxKind::LParen) {
            self.balanced_parens();
        }
        self.finish_node();
    }

    /// Consume `( ... )` without structure. Stops early at `{` or `;` outside nested parens.
    fn balanced_parens(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::Semicolon => {
                    let found = describe(self.current());
                    self.error(format!("expected `)`, found {found}"));
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// `BEGIN { ... }` and friends.
    fn special_block(&mut self) {
        self.start_node(SyntaxKind::SpecialBlock);
        self.bump();
        self.lazy_block();
        self.finish_node();
    }

    fn if_statement(&mut self) {
        let kind = if self.at(SyntaxKind::KwIf) {
            SyntaxKind::IfStatement
        } else {
            SyntaxKind::UnlessStatement
        };
        self.start_node(kind);
        self.bump();
        self.condition();
        self.lazy_block();
        while self.at(SyntaxKind::KwElsif) {
            self.start_node(SyntaxKind::ElsifClause);
            self.bump();
            self.condition();
            self.lazy_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::KwElse) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.lazy_block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn while_statement(&mut self) {
        let kind = if self.at(SyntaxKind::KwWhile) {
            SyntaxKind::WhileStatement
        } else {
            SyntaxKind::UntilStatement
        };
        self.start_node(kind);
        self.bump();
        self.condition();
        self.lazy_block();
        self.continue_clause();
        self.finish_node();
    }

    fn continue_clause(&mut self) {
        if self.at(SyntaxKind::KwContinue) {
            self.start_node(SyntaxKind::ContinueClause);
            self.bump();
            self.lazy_block();
            self.finish_node();
        }
    }

    /// C-style `for (INIT; COND; STEP)` or `foreach [my $x] (LIST)`, whichever keyword is used.
    fn for_statement(&mut self) {
        let c_style = self.nth(1) == SyntaxKind::LParen && self.paren_has_semicolon(1);
        if c_style {
            self.start_node(SyntaxKind::ForStatement);
            self.bump();
            self.bump();
            for _ in 0..2 {
                if !self.at(SyntaxKind::Semicolon) {
                    self.expr();
                }
                self.expect(SyntaxKind::Semicolon, "`;`");
            }
            if !self.at(SyntaxKind::RParen) {
                self.expr();
            }
            self.expect(SyntaxKind::RParen, "`)`");
            self.lazy_block();
            self.finish_node();
            return;
        }

        self.start_node(SyntaxKind::ForeachStatement);
        self.bump();
        if self.at_set(VARIABLE_DECLARATORS) {
            let kind = declaration_kind(self.current());
            self.start_node(kind);
            self.bump();
            self.loop_variable();
            self.finish_node();
        } else if self.at_set(SIGILS) {
            self.loop_variable();
        }
        self.condition();
        self.lazy_block();
        self.continue_clause();
        self.finish_node();
    }

    fn loop_variable(&mut self) {
        if self.at_set(SIGILS) {
            self.variable();
        } else {
            let found = describe(self.current());
            self.error(format!("expected a loop variable, found {found}"));
        }
    }

    /// Whether the parenthesis `n` significant tokens ahead holds a `;` at its own level.
    fn paren_has_semicolon(&self, n: usize) -> bool {
        let Some(start) = self.significant_index(n) else {
            return false;
        };
        let mut parens = 0usize;
        let mut braces = 0usize;
        for token in self.tokens[start..].iter().filter(|t| !TRIVIA.contains(t.kind)) {
            match token.kind {
                SyntaxKind::LParen => parens += 1,
                SyntaxKind::RParen => {
                    parens = parens.saturating_sub(1);
                    if parens == 0 {
                        return false;
                    }
                }
                SyntaxKind::LBrace => braces += 1,
                SyntaxKind::RBrace => braces = braces.saturating_sub(1),
                SyntaxKind::Semicolon if parens == 1 && braces == 0 => return true,
                _ => {}
            }
        }
        false
    }

    /// `given (EXPR) BLOCK` / `when (EXPR) BLOCK`.
    fn given_when_statement(&mut self) {
        let kind = if self.at(SyntaxKind::KwGiven) {
            SyntaxKind::GivenStatement
        } else {
            SyntaxKind::WhenStatement
        };
        self.start_node(kind);
        self.bump();
        self.condition();
        self.lazy_block();
        self.finish_node();
    }

    /// `try BLOCK [catch [($e)] BLOCK] [finally BLOCK]`, followed by `;` in the Try::Tiny flavour.
    fn try_catch(&mut self) {
        self.start_node(SyntaxKind::TryCatch);
        self.bump();
        self.lazy_block();
        if self.at(SyntaxKind::KwCatch) {
            self.start_node(SyntaxKind::CatchClause);
            self.bump();
            if self.at(SyntaxKind::LParen) {
                self.condition();
            }
            self.lazy_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::KwFinally) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.lazy_block();
            self.finish_node();
        }
        if self.dialect.try_catch == TryCatchDialect::TryTiny {
            self.expect_semicolon();
        }
        self.finish_node();
    }

    /// `LABEL: STATEMENT`.
    fn labeled_statement(&mut self) {
        self.start_node(SyntaxKind::LabeledStatement);
        self.start_node(SyntaxKind::Label);
        self.bump();
        self.bump();
        self.finish_node();
        if !self.at_end() && !self.at(SyntaxKind::RBrace) {
            self.statement();
        }
        self.finish_node();
    }

    /// `( EXPR )` of a compound statement. An empty condition is allowed (`while ()`).
    fn condition(&mut self) {
        self.start_node(SyntaxKind::Condition);
        if self.expect(SyntaxKind::LParen, "`(`") {
            if !self.at(SyntaxKind::RParen) {
                self.expr();
            }
            self.expect(SyntaxKind::RParen, "`)`");
        } else if self.at_expr_start() {
            self.expr();
        }
        self.finish_node();
    }

    /// `EXPR [MODIFIER EXPR] ;`.
    fn expression_statement(&mut self) {
        if !self.at_expr_start() {
            let found = describe(self.current());
            self.recover(&format!("expected a statement, found {found}"));
            self.eat(SyntaxKind::Semicolon);
            return;
        }
        self.start_node(SyntaxKind::Statement);
        self.expr();
        if self.at_set(STATEMENT_MODIFIERS) {
            self.start_node(SyntaxKind::StatementModifier);
            self.bump();
            if !self.expr() {
                self.error("expected expression".to_string());
            }
            self.finish_node();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// `;` is optional before `}`, at end of input and before template text.
    fn expect_semicolon(&mut self) {
        match self.current() {
            SyntaxKind::Semicolon => self.bump(),
            SyntaxKind::Eof | SyntaxKind::RBrace | SyntaxKind::TemplateRegion => {}
            k if STATEMENT_RECOVERY.contains(k) => {
                let found = describe(k);
                self.error(format!("expected `;`, found {found}"));
            }
            k => {
                let found = describe(k);
                self.recover(&format!("expected `;`, found {found}"));
                self.eat(SyntaxKind::Semicolon);
            }
        }
    }
}
