/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking past trivia (`nth`, `current`, `at`)
/// - Consuming tokens into the tree (`bump`, `eat`, `expect`)
/// - Node bookkeeping (`start_node`, `mark`, `start_node_at`)
/// - Error recovery (`recover`, `error_token`)
impl<'t> Parser<'t> {
    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Index of the `n`-th significant token at or after the cursor.
    fn significant_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, t)| !TRIVIA.contains(t.kind))
            .nth(n)
            .map(|(i, _)| i)
    }

    /// Kind of the `n`-th significant token ahead; [`SyntaxKind::Eof`] past the end.
    fn nth(&self, n: usize) -> SyntaxKind {
        self.significant_index(n)
            .map_or(SyntaxKind::Eof, |i| self.tokens[i].kind)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    fn at_end(&self) -> bool {
        self.at(SyntaxKind::Eof)
    }

    /// Range of the current significant token, or an empty range after the last token.
    fn current_range(&self) -> TextRange {
        match self.significant_index(0) {
            Some(i) => self.tokens[i].range,
            None => TextRange::empty(self.tokens.last().map_or(self.last_end, |t| t.range.end())),
        }
    }

    // ========================================================================
    // Consuming
    // ========================================================================

    /// Attach pending trivia to the open node.
    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !TRIVIA.contains(token.kind) {
                break;
            }
            self.push_token(self.pos);
            self.pos += 1;
        }
    }

    /// Add `tokens[index]` to the tree. Composite tokens become a node over their parts.
    fn push_token(&mut self, index: usize) {
        let token = &self.tokens[index];
        if token.is_composite() {
            self.builder.start_node(raw(token.kind));
            for part in &token.parts {
                self.builder.token(raw(part.kind), slice(self.source, part.range));
            }
            self.builder.finish_node();
        } else {
            self.builder.token(raw(token.kind), slice(self.source, token.range));
        }
    }

    /// Consume the current significant token (with the trivia before it).
    fn bump(&mut self) {
        self.flush_trivia();
        if self.pos < self.tokens.len() {
            self.last_end = self.tokens[self.pos].range.end();
            self.push_token(self.pos);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report `expected {what}` right after the previous token.
    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = describe(self.current());
        self.error(format!("expected {what}, found {found}"));
        false
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(raw(kind));
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Remember the current position so that a node can be wrapped around what follows.
    fn mark(&mut self) -> Mark {
        self.flush_trivia();
        Mark {
            checkpoint: self.builder.checkpoint(),
            start: self.current_range().start(),
        }
    }

    fn start_node_at(&mut self, mark: Mark, kind: SyntaxKind) {
        self.builder.start_node_at(mark.checkpoint, raw(kind));
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Record an error at the end of the previous token.
    fn error(&mut self, message: String) {
        self.errors.push(SyntaxError::new(message, TextRange::empty(self.last_end)));
    }

    /// Wrap the current token alone in an error node.
    fn error_token(&mut self, message: &str) {
        if self.at_end() {
            self.error(message.to_string());
            return;
        }
        let start = self.current_range().start();
        self.start_node(SyntaxKind::ErrorElement);
        self.bump();
        self.finish_node();
        self.errors.push(SyntaxError::new(message, TextRange::new(start, self.last_end)));
    }

    /// Wrap the current token and everything up to the next statement starter in an error node.
    fn recover(&mut self, message: &str) {
        if self.at_end() {
            self.error(message.to_string());
            return;
        }
        let start = self.current_range().start();
        self.start_node(SyntaxKind::ErrorElement);
        self.bump();
        while !self.at_end() && !self.at_set(STATEMENT_RECOVERY) {
            self.bump();
        }
        self.finish_node();
        self.errors.push(SyntaxError::new(message, TextRange::new(start, self.last_end)));
    }

    /// Wrap every remaining significant token in one error node.
    fn recover_until_end(&mut self, message: &str) {
        let start = self.current_range().start();
        self.start_node(SyntaxKind::ErrorElement);
        while !self.at_end() {
            self.bump();
        }
        self.finish_node();
        self.errors.push(SyntaxError::new(message, TextRange::new(start, self.last_end)));
    }
}
