//! Define the reserved word vocabulary.
//!
//! This module is the single source of truth for keyword spellings: a const metadata table ([`KEYWORDS`]) mapping
//! each spelling to its [`SyntaxKind`], a documentation category, and an optional dialect gate.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and honors dialect gates: `try` is a keyword only when the dialect
//!   enables try/catch, otherwise it is an ordinary identifier.
//! - Word operators (`eq`, `and`, `x`, ...) live in [`crate::lang::operators`].
//! - Built-in functions without grammar significance (`join`, `split`, `open`, ...) are not keywords; they lex as
//!   identifiers and parse as calls.
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_core::lang::keywords;
//! use camel_core::lang::kinds::SyntaxKind;
//!
//! assert_eq!(keywords::from_str("foreach", &Dialect::new()), Some(SyntaxKind::KwForeach));
//! assert_eq!(keywords::from_str("try", &Dialect::new()), None);
//! assert_eq!(keywords::from_str("try", &Dialect::modern()), Some(SyntaxKind::KwTry));
//! ```

use super::dialect::{Dialect, Feature};
use super::kinds::SyntaxKind;

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    ControlFlow,
    Module,
    Builtin,
    Quote,
    ObjectSystem,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub kind: SyntaxKind,
    pub spelling: &'static str,
    pub category: KeywordCategory,
    /// Extension that must be enabled for the spelling to be reserved.
    pub gate: Option<Feature>,
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    kw(SyntaxKind::KwMy, "my", KeywordCategory::Declaration),
    kw(SyntaxKind::KwOur, "our", KeywordCategory::Declaration),
    kw(SyntaxKind::KwLocal, "local", KeywordCategory::Declaration),
    kw(SyntaxKind::KwState, "state", KeywordCategory::Declaration),
    kw(SyntaxKind::KwSub, "sub", KeywordCategory::Declaration),
    gated(SyntaxKind::KwMethod, "method", KeywordCategory::Declaration, Feature::Signatures),
    gated(SyntaxKind::KwFunc, "func", KeywordCategory::Declaration, Feature::Signatures),
    gated(SyntaxKind::KwAsync, "async", KeywordCategory::Declaration, Feature::AsyncAwait),
    // Modules
    kw(SyntaxKind::KwPackage, "package", KeywordCategory::Module),
    kw(SyntaxKind::KwUse, "use", KeywordCategory::Module),
    kw(SyntaxKind::KwNo, "no", KeywordCategory::Module),
    kw(SyntaxKind::KwRequire, "require", KeywordCategory::Module),
    // Control flow
    kw(SyntaxKind::KwIf, "if", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwElsif, "elsif", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwElse, "else", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwUnless, "unless", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwWhile, "while", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwUntil, "until", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwFor, "for", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwForeach, "foreach", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwGiven, "given", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwWhen, "when", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwDefault, "default", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwDo, "do", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwEval, "eval", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwReturn, "return", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwLast, "last", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwNext, "next", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwRedo, "redo", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwGoto, "goto", KeywordCategory::ControlFlow),
    kw(SyntaxKind::KwContinue, "continue", KeywordCategory::ControlFlow),
    gated(SyntaxKind::KwTry, "try", KeywordCategory::ControlFlow, Feature::TryCatch),
    gated(SyntaxKind::KwCatch, "catch", KeywordCategory::ControlFlow, Feature::TryCatch),
    gated(SyntaxKind::KwFinally, "finally", KeywordCategory::ControlFlow, Feature::TryCatch),
    gated(SyntaxKind::KwAwait, "await", KeywordCategory::ControlFlow, Feature::AsyncAwait),
    // Built-ins with grammar significance
    kw(SyntaxKind::KwPrint, "print", KeywordCategory::Builtin),
    kw(SyntaxKind::KwSay, "say", KeywordCategory::Builtin),
    kw(SyntaxKind::KwPrintf, "printf", KeywordCategory::Builtin),
    kw(SyntaxKind::KwUndef, "undef", KeywordCategory::Builtin),
    kw(SyntaxKind::KwDefined, "defined", KeywordCategory::Builtin),
    kw(SyntaxKind::KwShift, "shift", KeywordCategory::Builtin),
    kw(SyntaxKind::KwUnshift, "unshift", KeywordCategory::Builtin),
    kw(SyntaxKind::KwPush, "push", KeywordCategory::Builtin),
    kw(SyntaxKind::KwPop, "pop", KeywordCategory::Builtin),
    kw(SyntaxKind::KwGrep, "grep", KeywordCategory::Builtin),
    kw(SyntaxKind::KwMap, "map", KeywordCategory::Builtin),
    kw(SyntaxKind::KwSort, "sort", KeywordCategory::Builtin),
    kw(SyntaxKind::KwScalar, "scalar", KeywordCategory::Builtin),
    kw(SyntaxKind::KwKeys, "keys", KeywordCategory::Builtin),
    kw(SyntaxKind::KwValues, "values", KeywordCategory::Builtin),
    kw(SyntaxKind::KwEach, "each", KeywordCategory::Builtin),
    kw(SyntaxKind::KwDelete, "delete", KeywordCategory::Builtin),
    kw(SyntaxKind::KwExists, "exists", KeywordCategory::Builtin),
    kw(SyntaxKind::KwSplice, "splice", KeywordCategory::Builtin),
    kw(SyntaxKind::KwBless, "bless", KeywordCategory::Builtin),
    kw(SyntaxKind::KwWantarray, "wantarray", KeywordCategory::Builtin),
    kw(SyntaxKind::KwRef, "ref", KeywordCategory::Builtin),
    kw(SyntaxKind::KwDie, "die", KeywordCategory::Builtin),
    kw(SyntaxKind::KwWarn, "warn", KeywordCategory::Builtin),
    // Quote-like operators
    kw(SyntaxKind::KwQ, "q", KeywordCategory::Quote),
    kw(SyntaxKind::KwQq, "qq", KeywordCategory::Quote),
    kw(SyntaxKind::KwQx, "qx", KeywordCategory::Quote),
    kw(SyntaxKind::KwQw, "qw", KeywordCategory::Quote),
    kw(SyntaxKind::KwQr, "qr", KeywordCategory::Quote),
    kw(SyntaxKind::KwM, "m", KeywordCategory::Quote),
    kw(SyntaxKind::KwS, "s", KeywordCategory::Quote),
    kw(SyntaxKind::KwTr, "tr", KeywordCategory::Quote),
    kw(SyntaxKind::KwY, "y", KeywordCategory::Quote),
    // Object system sugar
    gated(SyntaxKind::KwHas, "has", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwExtends, "extends", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwWith, "with", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwBefore, "before", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwAfter, "after", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwAround, "around", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwOverride, "override", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwAugment, "augment", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwSuper, "super", KeywordCategory::ObjectSystem, Feature::Moose),
    gated(SyntaxKind::KwInner, "inner", KeywordCategory::ObjectSystem, Feature::Moose),
];

/// Names that introduce special code blocks when followed by `{`.
pub const SPECIAL_BLOCK_NAMES: &[&str] = &["BEGIN", "END", "INIT", "CHECK", "UNITCHECK"];

/// Compile-time tag constants.
pub const TAG_CONSTANTS: &[&str] = &["__FILE__", "__LINE__", "__PACKAGE__", "__SUB__"];

/// Markers that end the code part of a file.
pub const DATA_MARKERS: &[&str] = &["__END__", "__DATA__"];

/// Resolve a spelling to its keyword kind, honoring dialect gates.
///
/// ## Returns
/// - `Some(kind)` if `spelling` is reserved under `dialect`.
/// - `None` otherwise (the word is an identifier).
pub fn from_str(spelling: &str, dialect: &Dialect) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|k| k.spelling == spelling)
        .filter(|k| k.gate.is_none_or(|feature| dialect.allows(feature)))
        .map(|k| k.kind)
}

/// Canonical spelling of a keyword kind, if it is one.
pub fn as_str(kind: SyntaxKind) -> Option<&'static str> {
    KEYWORDS.iter().find(|k| k.kind == kind).map(|k| k.spelling)
}

/// Metadata for a keyword kind.
pub fn info_for(kind: SyntaxKind) -> Option<&'static KeywordInfo> {
    KEYWORDS.iter().find(|k| k.kind == kind)
}

// --- helpers -----------------------------------------------------------------

const fn kw(kind: SyntaxKind, spelling: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        kind,
        spelling,
        category,
        gate: None,
    }
}

const fn gated(kind: SyntaxKind, spelling: &'static str, category: KeywordCategory, gate: Feature) -> KeywordInfo {
    KeywordInfo {
        kind,
        spelling,
        category,
        gate: Some(gate),
    }
}
