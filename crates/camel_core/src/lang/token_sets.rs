//! Named, immutable groupings of [`SyntaxKind`]s.
//!
//! Every set is a `const` bitset built at compile time from a list of kinds or from unions/differences of other sets,
//! so membership tests are a shift and a mask and nothing is allocated at runtime.
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::kinds::SyntaxKind;
//! use camel_core::lang::token_sets::{QUOTE_OPENERS, UNCHAINABLE_OPERATORS};
//!
//! assert!(QUOTE_OPENERS.contains(SyntaxKind::KwQq));
//! assert!(UNCHAINABLE_OPERATORS.contains(SyntaxKind::NumCmp));
//! assert!(!UNCHAINABLE_OPERATORS.contains(SyntaxKind::NumEq));
//! ```

use super::kinds::SyntaxKind;
use SyntaxKind::*;

const WORDS: usize = 10;

/// A set of kinds backed by a fixed bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSet([u64; WORDS]);

impl TokenSet {
    /// The empty set.
    pub const EMPTY: TokenSet = TokenSet([0; WORDS]);

    /// Build a set from a list of kinds.
    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = [0u64; WORDS];
        let mut i = 0;
        while i < kinds.len() {
            let raw = kinds[i] as usize;
            bits[raw / 64] |= 1 << (raw % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    /// Kinds present in either set.
    pub const fn union(self, other: TokenSet) -> TokenSet {
        let mut bits = self.0;
        let mut i = 0;
        while i < WORDS {
            bits[i] |= other.0[i];
            i += 1;
        }
        TokenSet(bits)
    }

    /// Kinds present in `self` but not in `other`.
    pub const fn difference(self, other: TokenSet) -> TokenSet {
        let mut bits = self.0;
        let mut i = 0;
        while i < WORDS {
            bits[i] &= !other.0[i];
            i += 1;
        }
        TokenSet(bits)
    }

    /// Membership test.
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let raw = kind as usize;
        raw / 64 < WORDS && self.0[raw / 64] & (1 << (raw % 64)) != 0
    }

    /// Iterate over the members in ascending discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        SyntaxKind::ALL.iter().copied().filter(|kind| self.contains(*kind))
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ============================================================================
// Trivia
// ============================================================================

/// Whitespace and comments in the narrow sense.
pub const WHITESPACE_AND_COMMENTS: TokenSet = TokenSet::new(&[Whitespace, CommentLine]);

/// Heredoc body kinds (composite).
pub const HEREDOC_BODIES: TokenSet = TokenSet::new(&[Heredoc, HeredocQq, HeredocQx]);

/// Heredoc terminator tokens.
pub const HEREDOC_ENDS: TokenSet = TokenSet::new(&[HeredocEnd]);

/// Everything the grammar skips over: whitespace, comments, POD, annotations, heredoc bodies and data sections.
pub const TRIVIA: TokenSet = WHITESPACE_AND_COMMENTS
    .union(TokenSet::new(&[
        Pod,
        AnnotationKey,
        AnnotationValue,
        Annotation,
        DataMarker,
        DataContent,
        DataSection,
    ]))
    .union(HEREDOC_BODIES)
    .union(HEREDOC_ENDS);

// ============================================================================
// Quotes and strings
// ============================================================================

/// Quote keywords taking a single delimited section.
pub const SIMPLE_QUOTE_OPENERS: TokenSet = TokenSet::new(&[KwQ, KwQq, KwQx, KwQw, KwQr, KwM]);

/// Quote keywords taking two sections: `s///`, `tr///`, `y///`.
pub const COMPLEX_QUOTE_OPENERS: TokenSet = TokenSet::new(&[KwS, KwTr, KwY]);

/// All quote-like keywords.
pub const QUOTE_OPENERS: TokenSet = SIMPLE_QUOTE_OPENERS.union(COMPLEX_QUOTE_OPENERS);

/// Punctuation that opens a quote without a keyword.
pub const QUOTE_PUNCT_OPENERS: TokenSet =
    TokenSet::new(&[QuoteSingleOpen, QuoteDoubleOpen, QuoteTickOpen, RegexQuoteOpen]);

/// Any token a quote composite may start with.
pub const QUOTE_STARTS: TokenSet = QUOTE_OPENERS.union(QUOTE_PUNCT_OPENERS);

/// Backslash escapes with meaning inside interpolated strings.
pub const STRING_SPECIALS: TokenSet = TokenSet::new(&[
    StringSpecialLf,
    StringSpecialTab,
    StringSpecialCr,
    StringSpecialFormFeed,
    StringSpecialBackspace,
    StringSpecialAlarm,
    StringSpecialEscape,
    StringSpecialHex,
    StringSpecialOct,
    StringSpecialCharName,
    StringSpecialControl,
    StringSpecialUpper,
    StringSpecialLower,
    StringSpecialUpperFirst,
    StringSpecialLowerFirst,
    StringSpecialQuote,
    StringSpecialFoldCase,
    StringSpecialEnd,
    StringEscapedChar,
]);

/// Plain string content kinds.
pub const STRING_CONTENT: TokenSet = TokenSet::new(&[StringContent, StringContentQq, StringContentXq]);

/// Everything that may appear inside a heredoc body.
pub const HEREDOC_BODY_PARTS: TokenSet = STRING_CONTENT.union(STRING_SPECIALS);

/// Pattern content.
pub const REGEX_CONTENT: TokenSet = TokenSet::new(&[RegexContent]);

/// Content tokens of a quote section.
pub const QUOTE_CONTENT: TokenSet = STRING_CONTENT.union(STRING_SPECIALS).union(REGEX_CONTENT);

/// Quote composites.
pub const QUOTE_LITERALS: TokenSet = TokenSet::new(&[
    StringSq,
    StringDq,
    StringXq,
    StringList,
    RegexMatch,
    RegexCompile,
    RegexReplace,
    Transliteration,
]);

/// Heredoc declarations and bodies.
pub const HEREDOC_COMPOSITES: TokenSet = HEREDOC_BODIES.union(TokenSet::new(&[HeredocDeclaration]));

/// Every composite token kind.
pub const COMPOSITE_LITERALS: TokenSet = QUOTE_LITERALS
    .union(HEREDOC_BODIES)
    .union(TokenSet::new(&[HeredocDeclaration, Annotation, TemplateRegion, DataSection]));

// ============================================================================
// Operators
// ============================================================================

/// Assignment operators.
pub const ASSIGN_OPERATORS: TokenSet = TokenSet::new(&[
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    PowAssign,
    ConcatAssign,
    RepeatAssign,
    AndAndAssign,
    OrOrAssign,
    DefinedOrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
]);

/// `== != <=> eq ne cmp ~~`
pub const EQUALITY_OPERATORS: TokenSet = TokenSet::new(&[NumEq, NumNe, NumCmp, StrEq, StrNe, StrCmp, SmartMatch]);

/// `< > <= >= lt gt le ge`
pub const RELATIONAL_OPERATORS: TokenSet =
    TokenSet::new(&[NumLt, NumGt, NumLe, NumGe, StrLt, StrGt, StrLe, StrGe]);

/// Comparison operators that may not be chained without parentheses.
pub const UNCHAINABLE_OPERATORS: TokenSet = TokenSet::new(&[NumCmp, StrCmp, SmartMatch]);

/// Word operators: `lt gt le ge eq ne cmp and or xor not isa x`.
pub const WORD_OPERATORS: TokenSet = TokenSet::new(&[
    StrLt, StrGt, StrLe, StrGe, StrEq, StrNe, StrCmp, LowAnd, LowOr, LowXor, LowNot, Isa, Repeat,
]);

/// Every operator token.
pub const OPERATORS: TokenSet = ASSIGN_OPERATORS
    .union(EQUALITY_OPERATORS)
    .union(RELATIONAL_OPERATORS)
    .union(WORD_OPERATORS)
    .union(TokenSet::new(&[
        OrOr, DefinedOr, AndAnd, BitOr, BitXor, BitAnd, ShiftLeft, ShiftRight, Plus, Minus, Concat, Star, Slash,
        Percent, Match, NotMatch, Not, Tilde, Pow, PlusPlus, MinusMinus, Range, Ellipsis, FileTest, Arrow,
        Backslash, Question, Colon, Comma, FatComma,
    ]));

// ============================================================================
// Keywords
// ============================================================================

/// `my our local state`
pub const VARIABLE_DECLARATORS: TokenSet = TokenSet::new(&[KwMy, KwOur, KwLocal, KwState]);

/// Keywords that open a compound statement.
pub const COMPOUND_KEYWORDS: TokenSet = TokenSet::new(&[
    KwIf, KwUnless, KwWhile, KwUntil, KwFor, KwForeach, KwGiven, KwWhen, KwDefault,
]);

/// Keywords introducing a named code definition.
pub const SUB_LIKE_KEYWORDS: TokenSet = TokenSet::new(&[KwSub, KwMethod, KwFunc]);

/// Keywords valid as statement modifiers.
pub const STATEMENT_MODIFIERS: TokenSet =
    TokenSet::new(&[KwIf, KwUnless, KwWhile, KwUntil, KwFor, KwForeach, KwWhen]);

/// `try catch finally`
pub const TRY_CATCH_KEYWORDS: TokenSet = TokenSet::new(&[KwTry, KwCatch, KwFinally]);

/// `async await`
pub const ASYNC_KEYWORDS: TokenSet = TokenSet::new(&[KwAsync, KwAwait]);

/// Moose sugar.
pub const MOOSE_KEYWORDS: TokenSet = TokenSet::new(&[
    KwHas, KwExtends, KwWith, KwBefore, KwAfter, KwAround, KwOverride, KwAugment, KwSuper, KwInner,
]);

/// Moose declarations taking a list.
pub const MOOSE_LIST_KEYWORDS: TokenSet =
    TokenSet::new(&[KwHas, KwExtends, KwWith, KwBefore, KwAfter, KwAround, KwOverride, KwAugment]);

/// Built-ins parsed as named unary operators.
pub const NAMED_UNARY_KEYWORDS: TokenSet = TokenSet::new(&[
    KwUndef, KwDefined, KwShift, KwPop, KwScalar, KwKeys, KwValues, KwEach, KwDelete, KwExists, KwRef, KwRequire,
]);

/// Built-ins parsed as list operators.
pub const LIST_OPERATOR_KEYWORDS: TokenSet =
    TokenSet::new(&[KwPrint, KwSay, KwPrintf, KwPush, KwUnshift, KwSplice, KwBless, KwDie, KwWarn]);

/// Built-ins accepting an optional leading filehandle.
pub const PRINT_KEYWORDS: TokenSet = TokenSet::new(&[KwPrint, KwSay, KwPrintf]);

/// `sort map grep`
pub const BLOCK_LIST_KEYWORDS: TokenSet = TokenSet::new(&[KwSort, KwMap, KwGrep]);

/// `last next redo goto`
pub const LOOP_CONTROL_KEYWORDS: TokenSet = TokenSet::new(&[KwLast, KwNext, KwRedo, KwGoto]);

/// Keywords that start a simple (non-compound) statement.
pub const STATEMENT_KEYWORDS: TokenSet = TokenSet::new(&[
    KwPackage, KwUse, KwNo, KwRequire, KwReturn, KwLast, KwNext, KwRedo, KwGoto,
]);

/// Every keyword kind.
pub const KEYWORDS: TokenSet = VARIABLE_DECLARATORS
    .union(COMPOUND_KEYWORDS)
    .union(SUB_LIKE_KEYWORDS)
    .union(TRY_CATCH_KEYWORDS)
    .union(ASYNC_KEYWORDS)
    .union(MOOSE_KEYWORDS)
    .union(NAMED_UNARY_KEYWORDS)
    .union(LIST_OPERATOR_KEYWORDS)
    .union(BLOCK_LIST_KEYWORDS)
    .union(LOOP_CONTROL_KEYWORDS)
    .union(QUOTE_OPENERS)
    .union(TokenSet::new(&[
        KwPackage, KwUse, KwNo, KwElsif, KwElse, KwDo, KwEval, KwReturn, KwContinue, KwWantarray,
    ]));

// ============================================================================
// Names and variables
// ============================================================================

/// Variable sigils.
pub const SIGILS: TokenSet =
    TokenSet::new(&[ScalarSigil, ArraySigil, HashSigil, GlobSigil, CodeSigil, ArrayIndexSigil]);

/// The name part of a variable.
pub const VARIABLE_NAMES: TokenSet = TokenSet::new(&[VariableName]);

/// Name tokens that carry user identifiers.
pub const NAME_TOKENS: TokenSet = TokenSet::new(&[VariableName, Identifier, PackageName, SubName]);

/// Numeric literals.
pub const NUMBERS: TokenSet = TokenSet::new(&[Number, NumberHex, NumberBin, NumberOct, NumberVersion]);

// ============================================================================
// Parser-facing groups
// ============================================================================

/// Node kinds whose contents are parsed on demand.
pub const LAZY_CODE_BLOCKS: TokenSet = TokenSet::new(&[LazyBlock]);

/// Element kinds the reparse analyzer may re-lex in isolation.
pub const REPARSABLE_LEAVES: TokenSet = QUOTE_LITERALS
    .union(HEREDOC_BODIES)
    .union(NAME_TOKENS)
    .union(LAZY_CODE_BLOCKS)
    .union(TokenSet::new(&[Pod, AnnotationValue, Annotation, TemplateRegion]));

/// Tokens that begin a statement; error recovery stops in front of them.
pub const STATEMENT_RECOVERY: TokenSet = VARIABLE_DECLARATORS
    .union(COMPOUND_KEYWORDS)
    .union(SUB_LIKE_KEYWORDS)
    .union(TokenSet::new(&[
        KwPackage,
        KwUse,
        KwNo,
        KwReturn,
        KwTry,
        SpecialBlockName,
        TemplateRegion,
        Semicolon,
        RBrace,
    ]));

/// Tokens that can start a term.
pub const TERM_STARTS: TokenSet = SIGILS
    .union(NUMBERS)
    .union(QUOTE_LITERALS)
    .union(VARIABLE_DECLARATORS)
    .union(NAMED_UNARY_KEYWORDS)
    .union(LIST_OPERATOR_KEYWORDS)
    .union(BLOCK_LIST_KEYWORDS)
    .union(LOOP_CONTROL_KEYWORDS)
    .union(TokenSet::new(&[
        HeredocDeclaration,
        Identifier,
        PackageName,
        TagConstant,
        LParen,
        LBracket,
        LBrace,
        Backslash,
        Not,
        Tilde,
        Minus,
        Plus,
        PlusPlus,
        MinusMinus,
        FileTest,
        Readline,
        KwSub,
        KwDo,
        KwEval,
        KwReturn,
        KwWantarray,
        KwAwait,
        KwSuper,
        KwInner,
    ]));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_difference() {
        let a = TokenSet::new(&[Plus, Minus]);
        let b = TokenSet::new(&[Minus, Star]);
        let u = a.union(b);
        assert!(u.contains(Plus) && u.contains(Minus) && u.contains(Star));
        let d = u.difference(b);
        assert!(d.contains(Plus));
        assert!(!d.contains(Minus));
        assert!(!d.contains(Star));
    }

    #[test]
    fn test_highest_kind_fits() {
        let last = SyntaxKind::ALL.iter().copied().max().unwrap_or(Eof);
        let set = TokenSet::new(&[last]);
        assert!(set.contains(last));
    }

    #[test]
    fn test_trivia_excludes_code() {
        assert!(TRIVIA.contains(Heredoc));
        assert!(TRIVIA.contains(HeredocEnd));
        assert!(!TRIVIA.contains(HeredocDeclaration));
        assert!(!TRIVIA.contains(Semicolon));
    }

    #[test]
    fn test_quote_sets_partition() {
        for kind in QUOTE_OPENERS.iter() {
            assert!(SIMPLE_QUOTE_OPENERS.contains(kind) != COMPLEX_QUOTE_OPENERS.contains(kind));
        }
        assert_eq!(QUOTE_OPENERS.iter().count(), 9);
    }

    #[test]
    fn test_iter_is_sorted() {
        let kinds: Vec<_> = UNCHAINABLE_OPERATORS.iter().collect();
        assert_eq!(kinds, vec![NumCmp, StrCmp, SmartMatch]);
    }
}
