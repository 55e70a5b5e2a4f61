/// Lazy blocks.
///
/// A lazy block records its `{ ... }` tokens flat, counting only `{` and `}` to find its end. The statements inside
/// are parsed later by [`Parser::block`] when the block is expanded.
impl<'t> Parser<'t> {
    /// Record `{ ... }` as a [`SyntaxKind::LazyBlock`]. Returns whether the closing brace was found.
    fn lazy_block(&mut self) -> bool {
        if !self.at(SyntaxKind::LBrace) {
            let found = describe(self.current());
            self.error(format!("expected `{{`, found {found}"));
            return false;
        }
        let start = self.current_range().start();
        self.start_node(SyntaxKind::LazyBlock);
        let mut depth = 0usize;
        let mut closed = false;
        while let Some(token) = self.tokens.get(self.pos) {
            let kind = token.kind;
            if !TRIVIA.contains(kind) {
                self.last_end = token.range.end();
            }
            self.push_token(self.pos);
            self.pos += 1;
            match kind {
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        closed = true;
                        break;
                    }
                }
                _ => {}
            }
        }
        self.finish_node();
        if !closed {
            self.errors.push(
                SyntaxError::unterminated("unterminated block", TextRange::new(start, self.last_end))
                    .with_hint("add a closing `}`"),
            );
        }
        closed
    }
}
