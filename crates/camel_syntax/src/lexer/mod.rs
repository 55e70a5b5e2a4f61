//! Stateful, restartable lexer for Perl 5 source.
//!
//! Produces primitive tokens one at a time from an explicit [`StateStack`]: the same text, start offset and start
//! state always yield the same tokens and the same end state. That is what lets the reparse analyzer relex a single
//! element in isolation.
//!
//! ## Module Structure
//!
//! - `state` - Lexer frames, the state stack and the context-state mapping
//! - `tokens` - Token type
//! - `trivia` - Whitespace, comments, POD and annotations
//! - `quotes` - Quote-like constructs and string escapes
//! - `heredoc` - Heredoc markers and bodies
//! - `numbers` - Numeric literal scanning
//! - `template` - Template text and data sections
//!
//! ## Notes
//! - Every character of the input is covered by exactly one token; unknown characters become
//!   [`SyntaxKind::Unrecognized`].
//! - Lexing never fails. Unterminated constructs are reported once end of input is reached.

mod heredoc;
mod numbers;
mod quotes;
pub mod state;
mod template;
pub mod tokens;
mod trivia;

pub use state::{Expect, LexerState, ResumeState, StateStack, expect_after, state_for};
pub use tokens::Token;

use camel_core::lang::dialect::Dialect;
use camel_core::lang::keywords::{self, DATA_MARKERS, SPECIAL_BLOCK_NAMES, TAG_CONSTANTS};
use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::operators;
use camel_core::lang::token_sets::TRIVIA;

use crate::diagnostics::SyntaxError;
use state::{QuoteFrame, QuoteOp, SubscriptClose, after_trivia};
use tokens::text_range;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Frame transitions (simplified):
//
// [Code] → quote keyword → [QuoteDelimiter] → delimiter → [Quote] → close → [Modifiers] → pop
//    │                                                        └── middle/close → next section
//    ├── `$x{` / `->[` → [Subscript] → matching close → pop
//    ├── `\n` with pending heredocs → [Heredoc] → terminator → pop
//    ├── `#@key` → [Annotation] → end of line → pop
//    └── `__END__` → [Data]
// [Template] → `<?` → [Code] → `?>` → back to [Template]
// ============================================================================

/// Restartable lexer over one source text.
///
/// Iterating yields primitive tokens. Call [`Lexer::finish`] afterwards for the end state and the diagnostics.
pub struct Lexer<'a> {
    source: &'a str,
    current_pos: usize,
    stack: StateStack,
    dialect: Dialect,
    errors: Vec<SyntaxError>,
    /// Where the construct that may end up unterminated started.
    last_open: usize,
    eof_handled: bool,
}

/// End state of a lexer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutcome {
    pub state: StateStack,
    pub errors: Vec<SyntaxError>,
}

/// All primitive tokens of a text plus the lexer diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for a whole file.
    pub fn new(source: &'a str, dialect: &Dialect) -> Self {
        Self::starting_at(source, 0, StateStack::new(dialect), dialect)
    }

    /// Create a lexer that resumes at byte `offset` with `state`.
    ///
    /// An offset that is out of range or not on a char boundary is clamped back to the previous boundary.
    pub fn starting_at(source: &'a str, offset: usize, state: StateStack, dialect: &Dialect) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        Self {
            source,
            current_pos: offset,
            stack: state,
            dialect: *dialect,
            errors: Vec::new(),
            last_open: offset,
            eof_handled: false,
        }
    }

    /// The state the next token will be scanned in.
    pub fn state(&self) -> &StateStack {
        &self.stack
    }

    /// Byte offset of the next token.
    pub fn position(&self) -> usize {
        self.current_pos
    }

    /// Stop lexing and return the current state and the diagnostics collected so far.
    ///
    /// End-of-input diagnostics are only present if the iterator was run to completion.
    pub fn finish(self) -> LexOutcome {
        LexOutcome {
            state: self.stack,
            errors: self.errors,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&self) -> bool {
        self.current_pos >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.current_pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current_pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn match_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.current_pos += expected.len();
            true
        } else {
            false
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.current_pos += c.len_utf8();
        }
    }

    fn prev_char(&self, before: usize) -> Option<char> {
        self.source[..before].chars().next_back()
    }

    fn at_line_start(&self, offset: usize) -> bool {
        offset == 0 || self.source.as_bytes().get(offset - 1) == Some(&b'\n')
    }

    /// First character after any spaces, tabs and newlines from the current position.
    fn next_non_space(&self) -> Option<char> {
        self.rest().chars().find(|c| !c.is_whitespace())
    }

    /// Text after any whitespace from the current position.
    fn rest_after_space(&self) -> &'a str {
        self.rest().trim_start()
    }

    /// Try to match a compound operator, falling back to the simple one.
    fn operator(&mut self, simple: SyntaxKind, compounds: &[(&str, SyntaxKind)]) -> SyntaxKind {
        for (spelling, kind) in compounds {
            if self.match_str(spelling) {
                return *kind;
            }
        }
        simple
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    /// Scan one token in the active frame. `None` means the frame changed without consuming input.
    fn scan_token(&mut self) -> Option<SyntaxKind> {
        match self.stack.top().clone() {
            LexerState::Code(expect) | LexerState::Subscript { expect, .. } => Some(self.scan_code(expect)),
            LexerState::QuoteDelimiter(frame) => Some(self.scan_quote_delimiter(frame)),
            LexerState::Quote(frame) => self.scan_quote(frame),
            LexerState::Modifiers => self.scan_modifiers(),
            LexerState::Heredoc(spec) => self.scan_heredoc_body(&spec),
            LexerState::Annotation => self.scan_annotation(),
            LexerState::Template => Some(self.scan_template()),
            LexerState::Data => Some(self.scan_data()),
        }
    }

    /// Scan a code token and update the frame's expectation.
    fn scan_code(&mut self, expect: Expect) -> SyntaxKind {
        let depth = self.stack.depth();
        let kind = self.scan_code_token(expect);
        // Tokens that push or pop frames set expectations themselves.
        if self.stack.depth() == depth {
            let next = match kind {
                SyntaxKind::HeredocOpener => Expect::HeredocMarker {
                    indentable: self.source[..self.current_pos].ends_with('~'),
                },
                k if TRIVIA.contains(k) => after_trivia(expect),
                k => expect_after(k),
            };
            self.stack.set_expect(next);
        }
        kind
    }

    fn scan_code_token(&mut self, expect: Expect) -> SyntaxKind {
        match expect {
            Expect::Sigil => {
                if let Some(kind) = self.scan_variable_name() {
                    return kind;
                }
            }
            Expect::HeredocMarker { indentable } => {
                if let Some(kind) = self.scan_heredoc_marker(indentable) {
                    return kind;
                }
            }
            Expect::Method => {
                if let Some(kind) = self.scan_after_arrow() {
                    return kind;
                }
            }
            _ => {}
        }

        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return SyntaxKind::Eof;
        };
        let term = is_term_position(expect);

        match c {
            ' ' | '\t' | '\r' | '\n' | '\x0c' => self.scan_whitespace(c, expect),
            '#' => self.scan_comment(expect),
            '=' if self.at_line_start(start) && self.peek().is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.scan_pod()
            }

            ';' => SyntaxKind::Semicolon,
            ',' => SyntaxKind::Comma,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '[' => self.open_bracket(expect),
            ']' => self.close_bracket(),
            '{' => self.open_brace(expect),
            '}' => self.close_brace(),
            '\\' => SyntaxKind::Backslash,
            ':' => SyntaxKind::Colon,
            '?' => {
                if self.stack.in_template_code() && self.match_char('>') {
                    self.stack.return_to_template();
                    SyntaxKind::TemplateCodeClose
                } else {
                    SyntaxKind::Question
                }
            }

            // Quotes
            '\'' => self.open_quote(start, QuoteOp::Single, c, SyntaxKind::QuoteSingleOpen),
            '"' => self.open_quote(start, QuoteOp::Double, c, SyntaxKind::QuoteDoubleOpen),
            '`' => self.open_quote(start, QuoteOp::Tick, c, SyntaxKind::QuoteTickOpen),
            '/' if term => self.open_quote(start, QuoteOp::Slash, c, SyntaxKind::RegexQuoteOpen),

            // Sigils
            '$' => self.scan_scalar_sigil(),
            '@' => SyntaxKind::ArraySigil,
            '%' if term && self.sigil_follows(&['^', '+', '-', '!']) => SyntaxKind::HashSigil,
            '*' if term && self.sigil_follows(&[]) => SyntaxKind::GlobSigil,
            '&' if term && self.sigil_follows(&[]) => SyntaxKind::CodeSigil,

            // Operators
            '/' => self.operator(
                SyntaxKind::Slash,
                &[("/=", SyntaxKind::DefinedOrAssign), ("/", SyntaxKind::DefinedOr), ("=", SyntaxKind::SlashAssign)],
            ),
            '%' => self.operator(SyntaxKind::Percent, &[("=", SyntaxKind::PercentAssign)]),
            '*' => self.operator(
                SyntaxKind::Star,
                &[("*=", SyntaxKind::PowAssign), ("*", SyntaxKind::Pow), ("=", SyntaxKind::StarAssign)],
            ),
            '&' => self.operator(
                SyntaxKind::BitAnd,
                &[("&=", SyntaxKind::AndAndAssign), ("&", SyntaxKind::AndAnd), ("=", SyntaxKind::BitAndAssign)],
            ),
            '|' => self.operator(
                SyntaxKind::BitOr,
                &[("|=", SyntaxKind::OrOrAssign), ("|", SyntaxKind::OrOr), ("=", SyntaxKind::BitOrAssign)],
            ),
            '^' => self.operator(SyntaxKind::BitXor, &[("=", SyntaxKind::BitXorAssign)]),
            '~' => self.operator(SyntaxKind::Tilde, &[("~", SyntaxKind::SmartMatch)]),
            '+' => self.operator(
                SyntaxKind::Plus,
                &[("+", SyntaxKind::PlusPlus), ("=", SyntaxKind::PlusAssign)],
            ),
            '-' => self.scan_minus(term),
            '=' => self.operator(
                SyntaxKind::Assign,
                &[("=", SyntaxKind::NumEq), ("~", SyntaxKind::Match), (">", SyntaxKind::FatComma)],
            ),
            '!' => self.operator(
                SyntaxKind::Not,
                &[("=", SyntaxKind::NumNe), ("~", SyntaxKind::NotMatch)],
            ),
            '>' => self.operator(
                SyntaxKind::NumGt,
                &[(">=", SyntaxKind::ShiftRightAssign), (">", SyntaxKind::ShiftRight), ("=", SyntaxKind::NumGe)],
            ),
            '<' => self.scan_less(term),
            '.' => {
                if term && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(c)
                } else {
                    self.operator(
                        SyntaxKind::Concat,
                        &[("..", SyntaxKind::Ellipsis), (".", SyntaxKind::Range), ("=", SyntaxKind::ConcatAssign)],
                    )
                }
            }

            '0'..='9' => self.scan_number(c),
            _ if is_word_start(c) => self.scan_word(start, expect),

            _ => SyntaxKind::Unrecognized,
        }
    }

    // ========================================================================
    // Brackets and subscripts
    // ========================================================================

    fn open_bracket(&mut self, expect: Expect) -> SyntaxKind {
        if matches!(expect, Expect::Variable | Expect::Method) {
            self.stack.push(LexerState::Subscript {
                expect: Expect::Term,
                close: SubscriptClose::Bracket,
                depth: 0,
            });
            return SyntaxKind::LBracketArray;
        }
        self.nest_subscript(SubscriptClose::Bracket, 1);
        SyntaxKind::LBracket
    }

    fn close_bracket(&mut self) -> SyntaxKind {
        if self.closes_subscript(SubscriptClose::Bracket) {
            self.stack.pop();
            self.stack.set_expect(Expect::Variable);
            return SyntaxKind::RBracketArray;
        }
        self.nest_subscript(SubscriptClose::Bracket, -1);
        SyntaxKind::RBracket
    }

    fn open_brace(&mut self, expect: Expect) -> SyntaxKind {
        if matches!(expect, Expect::Variable | Expect::Method) {
            self.stack.push(LexerState::Subscript {
                expect: Expect::HashKey,
                close: SubscriptClose::Brace,
                depth: 0,
            });
            return SyntaxKind::LBraceHash;
        }
        self.nest_subscript(SubscriptClose::Brace, 1);
        SyntaxKind::LBrace
    }

    fn close_brace(&mut self) -> SyntaxKind {
        if self.closes_subscript(SubscriptClose::Brace) {
            self.stack.pop();
            self.stack.set_expect(Expect::Variable);
            return SyntaxKind::RBraceHash;
        }
        self.nest_subscript(SubscriptClose::Brace, -1);
        SyntaxKind::RBrace
    }

    fn closes_subscript(&self, shape: SubscriptClose) -> bool {
        matches!(self.stack.top(), LexerState::Subscript { close, depth: 0, .. } if *close == shape)
    }

    /// Track plain brackets of the same shape inside a subscript.
    fn nest_subscript(&mut self, shape: SubscriptClose, delta: i32) {
        if let LexerState::Subscript { expect, close, depth } = self.stack.top().clone()
            && close == shape
        {
            let depth = if delta > 0 { depth + 1 } else { depth.saturating_sub(1) };
            self.stack.replace_top(LexerState::Subscript { expect, close, depth });
        }
    }

    // ========================================================================
    // Sigils and variable names
    // ========================================================================

    fn scan_scalar_sigil(&mut self) -> SyntaxKind {
        if self.peek() == Some('#') && self.peek_next().is_some_and(|c| is_word_start(c) || c == '{' || c == '$') {
            self.advance();
            return SyntaxKind::ArrayIndexSigil;
        }
        SyntaxKind::ScalarSigil
    }

    /// `%`, `*`, `&` are sigils in term position when a name or a block follows.
    fn sigil_follows(&self, extra: &[char]) -> bool {
        self.peek()
            .is_some_and(|c| is_word_start(c) || matches!(c, '{' | '$' | ':') || extra.contains(&c))
    }

    /// Scan the name after a sigil. `None` leaves the character to the ordinary rules (`@$ref`, `%{...}`).
    fn scan_variable_name(&mut self) -> Option<SyntaxKind> {
        let sigil = self.prev_char(self.current_pos)?;
        let c = self.peek()?;

        if is_word_start(c) || (c == ':' && self.peek_next() == Some(':')) {
            self.scan_qualified_name();
            return Some(SyntaxKind::VariableName);
        }
        if c.is_ascii_digit() {
            self.advance_while(|c| c.is_ascii_digit());
            return Some(SyntaxKind::VariableName);
        }
        if c == '^' && self.peek_next().is_some_and(|c| c.is_ascii_uppercase() || "[]\\^_?".contains(c)) {
            self.advance();
            self.advance();
            return Some(SyntaxKind::VariableName);
        }
        if c == '{' && self.peek_next() == Some('^') {
            self.advance();
            self.advance();
            self.advance_while(is_word_continue);
            self.match_char('}');
            return Some(SyntaxKind::VariableName);
        }
        match sigil {
            '$' | '#' if c == '$' => {
                // `$$` is the process id unless another sigil-name pair follows.
                if self.peek_next().is_some_and(|n| is_word_start(n) || matches!(n, '{' | '$' | ':')) {
                    return None;
                }
                self.advance();
                Some(SyntaxKind::VariableName)
            }
            '$' if SPECIAL_SCALAR_PUNCT.contains(c) => {
                self.advance();
                Some(SyntaxKind::VariableName)
            }
            '@' if matches!(c, '-' | '+') => {
                self.advance();
                Some(SyntaxKind::VariableName)
            }
            '%' if matches!(c, '-' | '+' | '!') => {
                self.advance();
                Some(SyntaxKind::VariableName)
            }
            _ => None,
        }
    }

    /// Consume `Foo::Bar::baz`, `::foo`, `Foo::` and `Foo'Bar` forms.
    fn scan_qualified_name(&mut self) {
        loop {
            self.advance_while(is_word_continue);
            if self.rest().starts_with("::") {
                self.current_pos += 2;
                continue;
            }
            break;
        }
    }

    /// After `->`: postfix dereference or a method name.
    fn scan_after_arrow(&mut self) -> Option<SyntaxKind> {
        let c = self.peek()?;
        let next = self.peek_next();
        if matches!(c, '@' | '%' | '$' | '&' | '*') && next == Some('*') {
            self.advance();
            self.advance();
            return Some(SyntaxKind::PostfixDeref);
        }
        if c == '$' && next == Some('#') && self.peek_nth(2) == Some('*') {
            self.current_pos += 3;
            return Some(SyntaxKind::PostfixDeref);
        }
        if is_word_start(c) {
            self.scan_qualified_name();
            return Some(SyntaxKind::Identifier);
        }
        None
    }

    // ========================================================================
    // Operators needing lookahead
    // ========================================================================

    fn scan_minus(&mut self, term: bool) -> SyntaxKind {
        if term
            && let Some(letter) = self.peek()
            && FILE_TEST_LETTERS.contains(letter)
            && !self.peek_next().is_some_and(is_word_continue)
            && !self.rest()[1..].trim_start().starts_with("=>")
        {
            self.advance();
            return SyntaxKind::FileTest;
        }
        self.operator(
            SyntaxKind::Minus,
            &[(">", SyntaxKind::Arrow), ("-", SyntaxKind::MinusMinus), ("=", SyntaxKind::MinusAssign)],
        )
    }

    /// `<` family: heredoc openers, readline, shifts and comparisons.
    fn scan_less(&mut self, term: bool) -> SyntaxKind {
        if self.peek() == Some('<') {
            if self.heredoc_follows(term) {
                self.advance();
                self.match_char('~');
                return SyntaxKind::HeredocOpener;
            }
            if term && self.match_str("<>>") {
                return SyntaxKind::Readline;
            }
            self.advance();
            return self.operator(SyntaxKind::ShiftLeft, &[("=", SyntaxKind::ShiftLeftAssign)]);
        }
        if term && let Some(len) = self.readline_len() {
            self.current_pos += len;
            return SyntaxKind::Readline;
        }
        self.operator(
            SyntaxKind::NumLt,
            &[("=>", SyntaxKind::NumCmp), ("=", SyntaxKind::NumLe)],
        )
    }

    /// Length of `...>` after a `<` in term position: `<>`, `<STDIN>`, `<$fh>`.
    fn readline_len(&self) -> Option<usize> {
        let rest = self.rest();
        let body = rest.strip_prefix('$').unwrap_or(rest);
        let name_len = body.find(|c: char| !(is_word_continue(c) || c == ':')).unwrap_or(body.len());
        if body[name_len..].starts_with('>') {
            Some(rest.len() - body.len() + name_len + 1)
        } else {
            None
        }
    }

    // ========================================================================
    // Words
    // ========================================================================

    fn scan_word(&mut self, start: usize, expect: Expect) -> SyntaxKind {
        self.scan_qualified_name();
        let word = &self.source[start..self.current_pos];

        match expect {
            Expect::SubName => return SyntaxKind::SubName,
            Expect::Package => {
                return if is_version_word(word) {
                    self.scan_version_tail();
                    SyntaxKind::NumberVersion
                } else {
                    SyntaxKind::PackageName
                };
            }
            Expect::HashKey if self.next_non_space() == Some('}') => return SyntaxKind::Identifier,
            _ => {}
        }

        if self.rest_after_space().starts_with("=>") {
            return SyntaxKind::Identifier;
        }

        let operator_expected = matches!(expect, Expect::Operator | Expect::Variable);
        if word == "x" {
            if operator_expected {
                return self.operator(SyntaxKind::Repeat, &[("=", SyntaxKind::RepeatAssign)]);
            }
        } else if operator_expected && is_repeat_count(word) {
            // `x3`: the count is lexed as a number on its own.
            self.current_pos = start + 1;
            return SyntaxKind::Repeat;
        } else if let Some(kind) = operators::word_operator(word) {
            return kind;
        }

        if DATA_MARKERS.contains(&word) {
            self.stack.push(LexerState::Data);
            return SyntaxKind::DataMarker;
        }
        if TAG_CONSTANTS.contains(&word) {
            return SyntaxKind::TagConstant;
        }
        if SPECIAL_BLOCK_NAMES.contains(&word) && self.next_non_space() == Some('{') {
            return SyntaxKind::SpecialBlockName;
        }
        if is_version_word(word) && self.rest().starts_with('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.scan_version_tail();
            return SyntaxKind::NumberVersion;
        }

        if let Some(kind) = keywords::from_str(word, &self.dialect) {
            return match QuoteOp::from_keyword(kind) {
                Some(op) if self.quote_delimiter_follows() => {
                    self.stack.set_expect(Expect::Operator);
                    self.stack.push(LexerState::QuoteDelimiter(QuoteFrame::awaiting(op)));
                    self.last_open = start;
                    kind
                }
                Some(_) => SyntaxKind::Identifier,
                None => kind,
            };
        }

        if word.contains("::") || self.rest().starts_with("->") {
            return SyntaxKind::PackageName;
        }
        SyntaxKind::Identifier
    }

    /// `.1.2` after `v5` or `5`.
    fn scan_version_tail(&mut self) {
        while self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
        }
    }

    /// A quote keyword only opens a quote when a usable delimiter follows.
    fn quote_delimiter_follows(&self) -> bool {
        let rest = self.rest();
        let spaced = rest.starts_with(char::is_whitespace);
        let trimmed = rest.trim_start();
        let Some(c) = trimmed.chars().next() else {
            return false;
        };
        if c == '#' {
            // `q#...#` only without a space; after a space `#` starts a comment.
            return !spaced;
        }
        if trimmed.starts_with("=>") || is_word_continue(c) {
            return false;
        }
        !matches!(c, ',' | ';' | ')')
    }

    // ========================================================================
    // End of input
    // ========================================================================

    /// Close every frame still open at end of input, reporting the unterminated ones.
    fn close_at_eof(&mut self) {
        if self.eof_handled {
            return;
        }
        self.eof_handled = true;
        let end = self.current_pos;
        let range = text_range(self.last_open.min(end), end);

        loop {
            let message = match self.stack.top() {
                LexerState::Code(_) | LexerState::Template if self.stack.depth() == 1 => break,
                LexerState::Quote(frame) | LexerState::QuoteDelimiter(frame) => {
                    Some(format!("unterminated {}", describe_quote(frame.op)))
                }
                LexerState::Heredoc(spec) => Some(format!("unterminated heredoc `{}`", spec.terminator)),
                _ => None,
            };
            if let Some(message) = message {
                let hint = match self.stack.top() {
                    LexerState::Heredoc(spec) => format!("add a line containing only `{}`", spec.terminator),
                    _ => "add the closing delimiter".to_string(),
                };
                self.errors.push(SyntaxError::unterminated(message, range).with_hint(hint));
            }
            if !self.stack.pop() {
                break;
            }
        }

        while let Some(spec) = self.stack.next_heredoc() {
            self.errors.push(
                SyntaxError::unterminated(format!("heredoc `{}` has no body", spec.terminator), text_range(end, end))
                    .with_hint("the body starts on the line after the declaration"),
            );
        }
        tracing::trace!(errors = self.errors.len(), "lexer reached end of input");
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.is_at_end() {
                self.close_at_eof();
                return None;
            }
            let start = self.current_pos;
            if let Some(kind) = self.scan_token() {
                return Some(Token::new(kind, text_range(start, self.current_pos)));
            }
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// `$` followed by one of these is a punctuation variable (`$_` is a word and handled separately).
const SPECIAL_SCALAR_PUNCT: &str = "&`'+!@/\\,;.<>()\"-|?=~%0]";

/// Letters of the `-e`-style file test operators.
const FILE_TEST_LETTERS: &str = "erwxoRWXOezsfdlpSbcugktTBAMC";

/// Start of a term: `/` opens a pattern, `%` is a sigil, `<<` may open a heredoc.
fn is_term_position(expect: Expect) -> bool {
    !matches!(expect, Expect::Operator | Expect::Variable)
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `v5`, `v10`: the head of a version string.
fn is_version_word(word: &str) -> bool {
    word.strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// `x` directly followed by a decimal count, as in `$str x3`.
fn is_repeat_count(word: &str) -> bool {
    word.strip_prefix('x')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn describe_quote(op: QuoteOp) -> &'static str {
    match op {
        QuoteOp::Single | QuoteOp::Q => "string",
        QuoteOp::Double | QuoteOp::Qq => "interpolated string",
        QuoteOp::Tick | QuoteOp::Qx => "command string",
        QuoteOp::Qw => "word list",
        QuoteOp::Qr | QuoteOp::Match | QuoteOp::Slash => "pattern",
        QuoteOp::Subst => "substitution",
        QuoteOp::Trans => "transliteration",
    }
}

/// Lex a whole file into primitive tokens.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str, dialect: &Dialect) -> Lexed {
    let mut lexer = Lexer::new(source, dialect);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    let outcome = lexer.finish();
    Lexed {
        tokens,
        errors: outcome.errors,
    }
}

// ============================================================================
// TESTS
// ============================================================================
