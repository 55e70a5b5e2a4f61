/// Parser core types and entrypoints.
///
/// This chunk defines the [`Parser`] type and its top-level `file()` / `block()` drivers.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// A position in the tree under construction that a node can later be started at.
#[derive(Clone, Copy)]
struct Mark {
    checkpoint: Checkpoint,
    /// Offset of the first significant token after the mark.
    start: TextSize,
}

/// Parser state.
///
/// ## Notes
/// - Single pass over the merged token stream; trivia is attached to whatever node is open when the next
///   significant token is consumed.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'t> {
    source: &'t str,
    tokens: &'t [Token],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    dialect: Dialect,
    cancel: &'t dyn Cancellation,
    cancelled: bool,
    /// End of the last significant token consumed.
    last_end: TextSize,
}

impl<'t> Parser<'t> {
    /// Create a parser over merged tokens whose ranges index into `source`.
    pub fn new(source: &'t str, tokens: &'t [Token], dialect: &Dialect, cancel: &'t dyn Cancellation) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            dialect: *dialect,
            cancel,
            cancelled: false,
            last_end: TextSize::from(0),
        }
    }

    /// Parse the whole stream as a [`SyntaxKind::File`].
    pub fn file(&mut self) {
        self.builder.start_node(raw(SyntaxKind::File));
        self.statements(false);
        self.flush_trivia();
        // Only reachable after cancellation; keeps the tree lossless anyway.
        while self.pos < self.tokens.len() {
            self.push_token(self.pos);
            self.pos += 1;
        }
        self.builder.finish_node();
    }

    /// Parse a `{ ... }` stream as a [`SyntaxKind::Block`].
    pub fn block(&mut self) {
        self.builder.start_node(raw(SyntaxKind::Block));
        self.expect(SyntaxKind::LBrace, "`{`");
        self.statements(true);
        self.eat(SyntaxKind::RBrace);
        if !self.at_end() {
            let found = describe(self.current());
            self.recover_until_end(&format!("unexpected {found} after the end of the block"));
        }
        self.flush_trivia();
        self.builder.finish_node();
    }

    /// Whether the cancellation hook fired during [`Parser::file`].
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The finished green tree and the parser diagnostics.
    pub fn finish(self) -> (GreenNode, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    /// Statements up to the end of input, or up to `}` inside a block.
    fn statements(&mut self, in_block: bool) {
        loop {
            if self.cancel.is_cancelled() {
                self.cancelled = true;
                return;
            }
            match self.current() {
                SyntaxKind::Eof => return,
                SyntaxKind::RBrace if in_block => return,
                _ => {}
            }
            let before = self.pos;
            self.statement();
            if self.pos == before {
                let found = describe(self.current());
                self.error_token(&format!("unexpected {found}"));
            }
        }
    }
}
