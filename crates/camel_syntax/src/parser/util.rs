// ============================================================================
// Token classes and small helpers
// ============================================================================

/// Tokens that can begin an expression.
const EXPR_STARTS: TokenSet = TERM_STARTS
    .union(MOOSE_KEYWORDS)
    .union(SUB_LIKE_KEYWORDS)
    .union(TokenSet::new(&[SyntaxKind::LowNot, SyntaxKind::KwAsync]));

/// Expression starts that do not turn a preceding bare word into a list call.
const LIST_CALL_EXCLUDED: TokenSet = TokenSet::new(&[SyntaxKind::LBrace]);

/// Tokens after which a bare word or scalar following `print` is taken as the filehandle.
const FILEHANDLE_FOLLOWERS: TokenSet = QUOTE_LITERALS
    .union(SIGILS)
    .union(NUMBERS)
    .union(TokenSet::new(&[
        SyntaxKind::HeredocDeclaration,
        SyntaxKind::Identifier,
        SyntaxKind::PackageName,
        SyntaxKind::TagConstant,
    ]));

fn raw(kind: SyntaxKind) -> rowan::SyntaxKind {
    PerlLanguage::kind_to_raw(kind)
}

fn left_bp(prec: u8) -> u16 {
    u16::from(prec) * 2
}

fn slice(source: &str, range: TextRange) -> &str {
    source.get(usize::from(range.start())..usize::from(range.end())).unwrap_or("")
}

fn variable_kind(sigil: SyntaxKind) -> SyntaxKind {
    match sigil {
        SyntaxKind::ArraySigil => SyntaxKind::ArrayVariable,
        SyntaxKind::HashSigil => SyntaxKind::HashVariable,
        SyntaxKind::GlobSigil => SyntaxKind::GlobVariable,
        SyntaxKind::CodeSigil => SyntaxKind::CodeVariable,
        SyntaxKind::ArrayIndexSigil => SyntaxKind::ArrayIndexVariable,
        _ => SyntaxKind::ScalarVariable,
    }
}

fn declaration_kind(keyword: SyntaxKind) -> SyntaxKind {
    match keyword {
        SyntaxKind::KwOur => SyntaxKind::VariableDeclarationGlobal,
        SyntaxKind::KwLocal => SyntaxKind::VariableDeclarationLocal,
        _ => SyntaxKind::VariableDeclarationLexical,
    }
}

/// Human-readable name of a token kind for diagnostics.
fn describe(kind: SyntaxKind) -> String {
    use SyntaxKind::*;

    let punctuation = match kind {
        Eof => return "end of input".to_string(),
        LParen => "(",
        RParen => ")",
        LBracket | LBracketArray => "[",
        RBracket | RBracketArray => "]",
        LBrace | LBraceHash => "{",
        RBrace | RBraceHash => "}",
        Semicolon => ";",
        Colon => ":",
        _ => match keywords::as_str(kind).or_else(|| operators::as_str(kind)) {
            Some(spelling) => spelling,
            None => return kind.name().to_string(),
        },
    };
    format!("`{punctuation}`")
}
