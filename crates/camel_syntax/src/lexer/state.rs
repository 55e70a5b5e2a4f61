//! Lexer state: the frame enumeration, the per-invocation state stack and the context-state mapping.
//!
//! The lexer never keeps hidden mode flags: everything that influences how the next character is read lives in the
//! [`StateStack`] value, so lexing can be resumed from any offset given the stack that was current there.
//!
//! ## Notes
//! - The stack is never empty. Popping the last frame resets it to the default frame instead of failing.
//! - In code frames the [`Expect`] is a pure function of the previous significant token kind ([`expect_after`]) and
//!   of whether trivia followed it ([`after_trivia`]). The reparse analyzer relies on that to rebuild start states.

use std::collections::VecDeque;

use camel_core::lang::dialect::Dialect;
use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::token_sets::{HEREDOC_BODIES, NUMBERS, QUOTE_LITERALS, SIGILS};

/// What the code scanner expects next. Decides between sigil/operator, regex/division, heredoc/shift, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expect {
    /// Start of an expression: `/` opens a pattern, `%` is a sigil, `<<` may open a heredoc.
    Term,
    /// After a complete term: `/` divides, `%` is modulo.
    Operator,
    /// Right after a variable or subscript: `{` and `[` open subscripts.
    Variable,
    /// After a sigil: a variable name follows.
    Sigil,
    /// After `sub`, `method`, `func`.
    SubName,
    /// After `package`, `use`, `no`, `require`.
    Package,
    /// After `->`.
    Method,
    /// Inside `{ ... }` of a hash subscript: a lone bareword is a key.
    HashKey,
    /// After `<<` / `<<~`.
    HeredocMarker { indentable: bool },
}

/// Which closing bracket ends a subscript frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptClose {
    Brace,
    Bracket,
}

/// A quote-like construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteOp {
    Q,
    Qq,
    Qx,
    Qw,
    Qr,
    Match,
    Subst,
    Trans,
    /// `'...'`
    Single,
    /// `"..."`
    Double,
    /// backticks
    Tick,
    /// `/.../` in term position.
    Slash,
}

impl QuoteOp {
    /// Resolve the quote keyword kind.
    pub fn from_keyword(kind: SyntaxKind) -> Option<QuoteOp> {
        Some(match kind {
            SyntaxKind::KwQ => QuoteOp::Q,
            SyntaxKind::KwQq => QuoteOp::Qq,
            SyntaxKind::KwQx => QuoteOp::Qx,
            SyntaxKind::KwQw => QuoteOp::Qw,
            SyntaxKind::KwQr => QuoteOp::Qr,
            SyntaxKind::KwM => QuoteOp::Match,
            SyntaxKind::KwS => QuoteOp::Subst,
            SyntaxKind::KwTr | SyntaxKind::KwY => QuoteOp::Trans,
            _ => return None,
        })
    }

    /// Number of delimited sections.
    pub fn sections(self) -> u8 {
        match self {
            QuoteOp::Subst | QuoteOp::Trans => 2,
            _ => 1,
        }
    }

    /// Whether a modifier-letter run may follow the closing delimiter.
    pub fn takes_modifiers(self) -> bool {
        matches!(
            self,
            QuoteOp::Qr | QuoteOp::Match | QuoteOp::Subst | QuoteOp::Trans | QuoteOp::Slash
        )
    }

    /// Token kind for content of `section`.
    pub fn content_kind(self, section: u8) -> SyntaxKind {
        match (self, section) {
            (QuoteOp::Q | QuoteOp::Qw | QuoteOp::Single | QuoteOp::Trans, _) => SyntaxKind::StringContent,
            (QuoteOp::Qq | QuoteOp::Double, _) | (QuoteOp::Subst, 1) => SyntaxKind::StringContentQq,
            (QuoteOp::Qx | QuoteOp::Tick, _) => SyntaxKind::StringContentXq,
            (QuoteOp::Qr | QuoteOp::Match | QuoteOp::Slash | QuoteOp::Subst, _) => SyntaxKind::RegexContent,
        }
    }

    /// Whether backslash escapes become special tokens.
    pub fn interpolates(self, section: u8) -> bool {
        matches!(
            self.content_kind(section),
            SyntaxKind::StringContentQq | SyntaxKind::StringContentXq
        )
    }
}

/// An open quote-like construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteFrame {
    pub op: QuoteOp,
    pub open: char,
    pub close: char,
    /// Nesting depth of `open` inside the current section (bracket delimiters only).
    pub depth: u32,
    pub section: u8,
}

impl QuoteFrame {
    /// A frame waiting for its opening delimiter.
    pub fn awaiting(op: QuoteOp) -> Self {
        Self {
            op,
            open: '\0',
            close: '\0',
            depth: 0,
            section: 0,
        }
    }

    /// A frame whose delimiter is already known (`'`, `"`, backtick, `/`).
    pub fn delimited(op: QuoteOp, delimiter: char) -> Self {
        Self {
            op,
            open: delimiter,
            close: delimiter,
            depth: 0,
            section: 0,
        }
    }

    pub fn is_bracketed(&self) -> bool {
        self.open != self.close
    }
}

/// Matching closer for a bracket-style delimiter.
pub fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// How a heredoc body is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeredocMode {
    /// `<<'EOM'`: verbatim.
    Verbatim,
    /// `<<EOM`, `<<"EOM"`: escapes are scanned.
    Interpolate,
    /// backticked marker: command body.
    Command,
}

/// A declared heredoc: what ends it and how its body is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeredocSpec {
    pub terminator: String,
    pub mode: HeredocMode,
    /// `<<~`: the terminator may be indented.
    pub indentable: bool,
}

impl HeredocSpec {
    /// Derive the spec from a marker's text (`EOM`, `"EOM"`, `'EOM'`, backticked) and the opener.
    pub fn from_marker(marker: &str, indentable: bool) -> Self {
        let (mode, terminator) = match marker.chars().next() {
            Some('\'') => (HeredocMode::Verbatim, strip_quotes(marker)),
            Some('"') => (HeredocMode::Interpolate, strip_quotes(marker)),
            Some('`') => (HeredocMode::Command, strip_quotes(marker)),
            _ => (HeredocMode::Interpolate, marker),
        };
        Self {
            terminator: terminator.to_string(),
            mode,
            indentable,
        }
    }

    /// Token kind of body content.
    pub fn content_kind(&self) -> SyntaxKind {
        match self.mode {
            HeredocMode::Verbatim => SyntaxKind::StringContent,
            HeredocMode::Interpolate => SyntaxKind::StringContentQq,
            HeredocMode::Command => SyntaxKind::StringContentXq,
        }
    }
}

fn strip_quotes(marker: &str) -> &str {
    let inner = &marker[1..];
    match marker.chars().next() {
        Some(q) => inner.strip_suffix(q).unwrap_or(inner),
        None => inner,
    }
}

/// One frame of the lexer state stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LexerState {
    /// Ordinary code.
    Code(Expect),
    /// Code between a subscript's brackets; `depth` counts plain brackets of the same shape.
    Subscript {
        expect: Expect,
        close: SubscriptClose,
        depth: u32,
    },
    /// After a quote keyword, before the opening delimiter (also between bracketed sections).
    QuoteDelimiter(QuoteFrame),
    /// Inside a quote section.
    Quote(QuoteFrame),
    /// After the closing delimiter of a pattern.
    Modifiers,
    /// Inside a heredoc body.
    Heredoc(HeredocSpec),
    /// After an annotation key, up to the end of the line.
    Annotation,
    /// Template text outside `<? ... ?>`.
    Template,
    /// After `__END__` / `__DATA__`.
    Data,
}

static DEFAULT_FRAME: LexerState = LexerState::Code(Expect::Term);

/// The lexer's state stack. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateStack {
    frames: Vec<LexerState>,
    pending_heredocs: VecDeque<HeredocSpec>,
}

impl StateStack {
    /// The stack at offset 0 of a file.
    pub fn new(dialect: &Dialect) -> Self {
        if dialect.template {
            Self::with_frames(vec![LexerState::Template])
        } else {
            Self::code(Expect::Term)
        }
    }

    /// A single code frame.
    pub fn code(expect: Expect) -> Self {
        Self::with_frames(vec![LexerState::Code(expect)])
    }

    /// Build a stack from explicit frames. An empty list yields the default code frame.
    pub fn with_frames(frames: Vec<LexerState>) -> Self {
        let mut stack = Self {
            frames,
            pending_heredocs: VecDeque::new(),
        };
        if stack.frames.is_empty() {
            stack.frames.push(LexerState::Code(Expect::Term));
        }
        stack
    }

    /// The active frame.
    pub fn top(&self) -> &LexerState {
        self.frames.last().unwrap_or(&DEFAULT_FRAME)
    }

    pub fn frames(&self) -> &[LexerState] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, state: LexerState) {
        self.frames.push(state);
    }

    /// Pop the active frame.
    ///
    /// ## Returns
    /// `false` if the stack would have underflowed; it is then reset to the default code frame.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            self.frames = vec![LexerState::Code(Expect::Term)];
            false
        }
    }

    /// Replace the active frame.
    pub fn replace_top(&mut self, state: LexerState) {
        self.frames.pop();
        self.frames.push(state);
    }

    /// Expectation of the active code frame, if it is one.
    pub fn expect(&self) -> Option<Expect> {
        match self.top() {
            LexerState::Code(expect) | LexerState::Subscript { expect, .. } => Some(*expect),
            _ => None,
        }
    }

    /// Update the expectation of the active code frame. No-op for non-code frames.
    pub fn set_expect(&mut self, next: Expect) {
        match self.frames.last_mut() {
            Some(LexerState::Code(expect)) | Some(LexerState::Subscript { expect, .. }) => *expect = next,
            _ => {}
        }
    }

    /// `true` when a template text frame sits somewhere below the active frame.
    pub fn in_template_code(&self) -> bool {
        self.frames.len() > 1 && self.frames[..self.frames.len() - 1].contains(&LexerState::Template)
    }

    /// Pop frames until template text is active again.
    pub fn return_to_template(&mut self) {
        while self.frames.len() > 1 && self.top() != &LexerState::Template {
            self.frames.pop();
        }
    }

    pub fn queue_heredoc(&mut self, spec: HeredocSpec) {
        self.pending_heredocs.push_back(spec);
    }

    pub fn next_heredoc(&mut self) -> Option<HeredocSpec> {
        self.pending_heredocs.pop_front()
    }

    pub fn has_pending_heredocs(&self) -> bool {
        !self.pending_heredocs.is_empty()
    }

    pub fn pending_heredocs(&self) -> impl Iterator<Item = &HeredocSpec> {
        self.pending_heredocs.iter()
    }
}

/// Expectation after a significant token of `kind`.
pub fn expect_after(kind: SyntaxKind) -> Expect {
    use SyntaxKind::*;
    match kind {
        VariableName | RBracketArray | RBraceHash => Expect::Variable,
        Arrow => Expect::Method,
        KwSub | KwMethod | KwFunc => Expect::SubName,
        KwPackage | KwUse | KwNo | KwRequire => Expect::Package,
        LBraceHash => Expect::HashKey,
        HeredocOpener => Expect::HeredocMarker { indentable: false },
        RParen | RBracket | PackageName | SubName | QuoteClose | RegexModifiers | HeredocMarker | Readline
        | TagConstant | KwWantarray | PostfixDeref => Expect::Operator,
        k if SIGILS.contains(k) => Expect::Sigil,
        k if NUMBERS.contains(k) => Expect::Operator,
        // A quote or heredoc literal seen as a whole (merged stream).
        k if QUOTE_LITERALS.contains(k) || k == HeredocDeclaration => Expect::Operator,
        _ => Expect::Term,
    }
}

/// Expectation after trivia separated the previous token from the next one.
pub fn after_trivia(expect: Expect) -> Expect {
    match expect {
        Expect::Variable => Expect::Operator,
        other => other,
    }
}

/// Where lexing of an element resumes, as far as kinds alone can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeState {
    Code(Expect),
    /// Needs the declaring heredoc to become a concrete [`LexerState::Heredoc`].
    HeredocBody,
    Annotation,
    Template,
    /// Code inside a template's `<? ... ?>` region.
    TemplateCode(Expect),
}

impl ResumeState {
    /// The concrete stack to relex from. Heredoc bodies need their declaration's spec.
    pub fn stack(self, dialect: &Dialect, heredoc: Option<HeredocSpec>) -> Option<StateStack> {
        let mut frames = if dialect.template { vec![LexerState::Template] } else { Vec::new() };
        match self {
            ResumeState::Code(expect) | ResumeState::TemplateCode(expect) => frames.push(LexerState::Code(expect)),
            ResumeState::HeredocBody => {
                frames.push(LexerState::Code(Expect::Term));
                frames.push(LexerState::Heredoc(heredoc?));
            }
            ResumeState::Annotation => {
                frames.push(LexerState::Code(Expect::Term));
                frames.push(LexerState::Annotation);
            }
            ResumeState::Template => frames = vec![LexerState::Template],
        }
        Some(StateStack::with_frames(frames))
    }

    /// Apply [`after_trivia`] to the code expectation.
    pub fn after_trivia(self) -> Self {
        match self {
            ResumeState::Code(expect) => ResumeState::Code(after_trivia(expect)),
            ResumeState::TemplateCode(expect) => ResumeState::TemplateCode(after_trivia(expect)),
            other => other,
        }
    }
}

/// Map the kind of the element being lexed and the significant token before it to a start state.
///
/// `boundary` is `None` at the start of the file.
pub fn state_for(container: SyntaxKind, boundary: Option<SyntaxKind>) -> ResumeState {
    let code = || ResumeState::Code(boundary.map_or(Expect::Term, expect_after));
    match container {
        k if HEREDOC_BODIES.contains(k) => ResumeState::HeredocBody,
        SyntaxKind::AnnotationValue => ResumeState::Annotation,
        SyntaxKind::TemplateText => ResumeState::Template,
        // A region after code opens with `?>`; the first region of a file opens with text or `<?`.
        SyntaxKind::TemplateRegion => match boundary {
            Some(kind) => ResumeState::TemplateCode(expect_after(kind)),
            None => ResumeState::Template,
        },
        SyntaxKind::HashIndex => ResumeState::Code(Expect::HashKey),
        _ => code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_never_empties() {
        let mut stack = StateStack::code(Expect::Operator);
        assert!(!stack.pop());
        assert_eq!(stack.top(), &LexerState::Code(Expect::Term));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_template_stack() {
        let mut stack = StateStack::new(&Dialect::template());
        assert_eq!(stack.top(), &LexerState::Template);
        assert!(!stack.in_template_code());
        stack.push(LexerState::Code(Expect::Term));
        stack.push(LexerState::Subscript {
            expect: Expect::HashKey,
            close: SubscriptClose::Brace,
            depth: 0,
        });
        assert!(stack.in_template_code());
        stack.return_to_template();
        assert_eq!(stack.top(), &LexerState::Template);
    }

    #[test]
    fn test_heredoc_spec_from_marker() {
        let spec = HeredocSpec::from_marker("'END'", true);
        assert_eq!(spec.terminator, "END");
        assert_eq!(spec.mode, HeredocMode::Verbatim);
        assert!(spec.indentable);
        let spec = HeredocSpec::from_marker("EOM", false);
        assert_eq!(spec.mode, HeredocMode::Interpolate);
        assert_eq!(spec.content_kind(), SyntaxKind::StringContentQq);
        assert_eq!(HeredocSpec::from_marker("`CMD`", false).mode, HeredocMode::Command);
    }

    #[test]
    fn test_expect_after_variables_and_operators() {
        assert_eq!(expect_after(SyntaxKind::VariableName), Expect::Variable);
        assert_eq!(after_trivia(Expect::Variable), Expect::Operator);
        assert_eq!(expect_after(SyntaxKind::Assign), Expect::Term);
        assert_eq!(expect_after(SyntaxKind::RParen), Expect::Operator);
        assert_eq!(expect_after(SyntaxKind::ScalarSigil), Expect::Sigil);
    }

    #[test]
    fn test_state_for_maps_containers() {
        assert_eq!(state_for(SyntaxKind::HeredocQq, None), ResumeState::HeredocBody);
        assert_eq!(state_for(SyntaxKind::AnnotationValue, None), ResumeState::Annotation);
        assert_eq!(state_for(SyntaxKind::HashIndex, Some(SyntaxKind::LBraceHash)), ResumeState::Code(Expect::HashKey));
        assert_eq!(
            state_for(SyntaxKind::StringDq, Some(SyntaxKind::Assign)),
            ResumeState::Code(Expect::Term)
        );
        assert_eq!(state_for(SyntaxKind::TemplateRegion, None), ResumeState::Template);
        assert_eq!(
            state_for(SyntaxKind::TemplateRegion, Some(SyntaxKind::Semicolon)),
            ResumeState::TemplateCode(Expect::Term)
        );
    }

    #[test]
    fn test_resume_stacks() {
        let template = Dialect::template();
        let stack = ResumeState::TemplateCode(Expect::Operator).stack(&template, None);
        assert_eq!(
            stack.map(|s| s.frames().to_vec()),
            Some(vec![LexerState::Template, LexerState::Code(Expect::Operator)])
        );
        assert_eq!(ResumeState::HeredocBody.stack(&Dialect::new(), None), None);
        let spec = HeredocSpec::from_marker("'EOM'", false);
        let stack = ResumeState::HeredocBody.stack(&Dialect::new(), Some(spec.clone()));
        assert_eq!(stack.map(|s| s.top().clone()), Some(LexerState::Heredoc(spec)));
        assert_eq!(
            ResumeState::Code(Expect::Variable).after_trivia(),
            ResumeState::Code(Expect::Operator)
        );
    }

    #[test]
    fn test_quote_ops() {
        assert_eq!(QuoteOp::Subst.content_kind(0), SyntaxKind::RegexContent);
        assert_eq!(QuoteOp::Subst.content_kind(1), SyntaxKind::StringContentQq);
        assert_eq!(QuoteOp::Trans.sections(), 2);
        assert!(!QuoteOp::Single.interpolates(0));
        assert!(QuoteOp::Tick.interpolates(0));
        assert_eq!(closing_delimiter('<'), '>');
    }
}
