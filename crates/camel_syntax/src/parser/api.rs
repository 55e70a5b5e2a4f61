// ============================================================================
// Public API
// ============================================================================

/// Lex, merge and parse `source`.
///
/// Never fails: malformed input yields error nodes plus diagnostics in [`Parse::errors`].
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse(source: &str, dialect: &Dialect) -> Parse {
    let lexed = lexer::lex(source, dialect);
    let tokens = merge(lexed.tokens);
    let mut parser = Parser::new(source, &tokens, dialect, &NeverCancel);
    parser.file();
    let (green, mut errors) = parser.finish();
    errors.extend(lexed.errors);
    Parse::new(green, errors, *dialect)
}

/// Like [`parse`], giving up with [`ParseError::Cancelled`] once `cancel` reports cancellation.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_with_cancellation(
    source: &str,
    dialect: &Dialect,
    cancel: &dyn Cancellation,
) -> Result<Parse, ParseError> {
    let lexed = lexer::lex(source, dialect);
    if cancel.is_cancelled() {
        return Err(ParseError::Cancelled);
    }
    let tokens = merge(lexed.tokens);
    let mut parser = Parser::new(source, &tokens, dialect, cancel);
    parser.file();
    if parser.is_cancelled() {
        tracing::debug!("parse cancelled");
        return Err(ParseError::Cancelled);
    }
    let (green, mut errors) = parser.finish();
    errors.extend(lexed.errors);
    Ok(Parse::new(green, errors, *dialect))
}

/// Parse an already merged token stream whose ranges index into `source`.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_tokens(source: &str, tokens: &[Token], dialect: &Dialect) -> Parse {
    let mut parser = Parser::new(source, tokens, dialect, &NeverCancel);
    parser.file();
    let (green, errors) = parser.finish();
    Parse::new(green, errors, *dialect)
}

/// Parse the tokens of one lazy block into a [`SyntaxKind::Block`] node.
///
/// `text` is the block's own text and token ranges are relative to it; so are the returned errors.
pub(crate) fn parse_block(text: &str, tokens: &[Token], dialect: &Dialect) -> (GreenNode, Vec<SyntaxError>) {
    let mut parser = Parser::new(text, tokens, dialect, &NeverCancel);
    parser.block();
    parser.finish()
}

/// Rebuild a [`SyntaxKind::LazyBlock`] from relexed tokens.
///
/// Returns `None` unless the tokens form exactly one closed `{ ... }`.
pub(crate) fn lazy_block_green(text: &str, tokens: &[Token], dialect: &Dialect) -> Option<GreenNode> {
    if tokens.first().map(|t| t.kind) != Some(SyntaxKind::LBrace) {
        return None;
    }
    let mut parser = Parser::new(text, tokens, dialect, &NeverCancel);
    let closed = parser.lazy_block();
    if !closed || parser.pos != tokens.len() {
        return None;
    }
    Some(parser.finish().0)
}
