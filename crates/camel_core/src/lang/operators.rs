//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `+` and word operators like `eq`) along with
//! the metadata the expression parser is driven by: precedence, associativity, fixity and the node kind an application
//! of the operator produces.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Some operators have both a prefix and an infix form (`-`, `+`). Use [`infix_info`] / [`prefix_info`] /
//!   [`postfix_info`] to pick the role; [`info_for`] returns the first entry.
//! - `precedence` follows the usual operator table: higher binds tighter. The absolute scale is shared with the
//!   parser through the constants in [`precedence`].
//! - [`Associativity::Chain`] operators may appear several times in one chain (`$a < $b <= $c`) unless the operator is
//!   listed in [`crate::lang::token_sets::UNCHAINABLE_OPERATORS`].
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::kinds::SyntaxKind;
//! use camel_core::lang::operators::{self, Associativity};
//!
//! assert_eq!(operators::from_str("**"), Some(SyntaxKind::Pow));
//! let pow = operators::infix_info(SyntaxKind::Pow).map(|info| info.associativity);
//! assert_eq!(pow, Some(Associativity::Right));
//! ```

use super::kinds::SyntaxKind;

/// Define how operators associate when repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    /// `a .. b .. c` is a syntax error.
    NonAssoc,
    /// Comparisons: `a < b < c` is read as a chain.
    Chain,
}

/// Define where an operator sits relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
}

/// Binding strengths shared by the registry and the parser.
pub mod precedence {
    pub const LOW_OR: u8 = 10;
    pub const LOW_AND: u8 = 20;
    pub const LOW_NOT: u8 = 30;
    pub const LIST_OP: u8 = 40;
    pub const COMMA: u8 = 50;
    pub const ASSIGN: u8 = 60;
    pub const TERNARY: u8 = 70;
    pub const RANGE: u8 = 80;
    pub const OR: u8 = 90;
    pub const AND: u8 = 100;
    pub const BIT_OR: u8 = 110;
    pub const BIT_AND: u8 = 120;
    pub const EQUALITY: u8 = 130;
    pub const RELATIONAL: u8 = 140;
    pub const ISA: u8 = 150;
    pub const NAMED_UNARY: u8 = 160;
    pub const SHIFT: u8 = 170;
    pub const ADDITIVE: u8 = 180;
    pub const MULTIPLICATIVE: u8 = 190;
    pub const BINDING: u8 = 200;
    pub const UNARY: u8 = 210;
    pub const POW: u8 = 220;
    pub const INC_DEC: u8 = 230;
    pub const ARROW: u8 = 240;
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub kind: SyntaxKind,
    pub spellings: &'static [&'static str],
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    /// Node kind wrapping an application of the operator.
    pub node: SyntaxKind,
}

impl OperatorInfo {
    /// Return `true` if the spelling is a reserved word (`eq`, `and`, ...).
    pub fn is_word(&self) -> bool {
        self.spellings
            .first()
            .is_some_and(|s| s.chars().all(|c| c.is_ascii_alphabetic()))
    }
}

use Associativity::{Chain, Left, NonAssoc, Right};
use Fixity::{Infix, Postfix, Prefix};
use SyntaxKind as K;
use precedence as p;

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Low-precedence logic
    op(K::LowOr, &["or"], p::LOW_OR, Left, Infix, K::LowOrExpr),
    op(K::LowXor, &["xor"], p::LOW_OR, Left, Infix, K::LowOrExpr),
    op(K::LowAnd, &["and"], p::LOW_AND, Left, Infix, K::LowAndExpr),
    op(K::LowNot, &["not"], p::LOW_NOT, Right, Prefix, K::LowNotExpr),
    // Comma
    op(K::Comma, &[","], p::COMMA, Left, Infix, K::CommaExpr),
    op(K::FatComma, &["=>"], p::COMMA, Left, Infix, K::CommaExpr),
    // Assignment
    op(K::Assign, &["="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::PlusAssign, &["+="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::MinusAssign, &["-="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::StarAssign, &["*="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::SlashAssign, &["/="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::PercentAssign, &["%="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::PowAssign, &["**="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::ConcatAssign, &[".="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::RepeatAssign, &["x="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::AndAndAssign, &["&&="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::OrOrAssign, &["||="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::DefinedOrAssign, &["//="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::BitAndAssign, &["&="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::BitOrAssign, &["|="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::BitXorAssign, &["^="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::ShiftLeftAssign, &["<<="], p::ASSIGN, Right, Infix, K::AssignExpr),
    op(K::ShiftRightAssign, &[">>="], p::ASSIGN, Right, Infix, K::AssignExpr),
    // Ternary
    op(K::Question, &["?"], p::TERNARY, Right, Infix, K::TernaryExpr),
    // Range
    op(K::Range, &[".."], p::RANGE, NonAssoc, Infix, K::RangeExpr),
    op(K::Ellipsis, &["..."], p::RANGE, NonAssoc, Infix, K::RangeExpr),
    // Logic
    op(K::OrOr, &["||"], p::OR, Left, Infix, K::OrExpr),
    op(K::DefinedOr, &["//"], p::OR, Left, Infix, K::OrExpr),
    op(K::AndAnd, &["&&"], p::AND, Left, Infix, K::AndExpr),
    op(K::BitOr, &["|"], p::BIT_OR, Left, Infix, K::BitOrExpr),
    op(K::BitXor, &["^"], p::BIT_OR, Left, Infix, K::BitOrExpr),
    op(K::BitAnd, &["&"], p::BIT_AND, Left, Infix, K::BitAndExpr),
    // Equality
    op(K::NumEq, &["=="], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::NumNe, &["!="], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::NumCmp, &["<=>"], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::StrEq, &["eq"], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::StrNe, &["ne"], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::StrCmp, &["cmp"], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    op(K::SmartMatch, &["~~"], p::EQUALITY, Chain, Infix, K::EqualityExpr),
    // Relational
    op(K::NumLt, &["<"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::NumGt, &[">"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::NumLe, &["<="], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::NumGe, &[">="], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::StrLt, &["lt"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::StrGt, &["gt"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::StrLe, &["le"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::StrGe, &["ge"], p::RELATIONAL, Chain, Infix, K::RelationalExpr),
    op(K::Isa, &["isa"], p::ISA, NonAssoc, Infix, K::IsaExpr),
    // Arithmetic
    op(K::ShiftLeft, &["<<"], p::SHIFT, Left, Infix, K::ShiftExpr),
    op(K::ShiftRight, &[">>"], p::SHIFT, Left, Infix, K::ShiftExpr),
    op(K::Plus, &["+"], p::ADDITIVE, Left, Infix, K::AddExpr),
    op(K::Minus, &["-"], p::ADDITIVE, Left, Infix, K::AddExpr),
    op(K::Concat, &["."], p::ADDITIVE, Left, Infix, K::AddExpr),
    op(K::Star, &["*"], p::MULTIPLICATIVE, Left, Infix, K::MulExpr),
    op(K::Slash, &["/"], p::MULTIPLICATIVE, Left, Infix, K::MulExpr),
    op(K::Percent, &["%"], p::MULTIPLICATIVE, Left, Infix, K::MulExpr),
    op(K::Repeat, &["x"], p::MULTIPLICATIVE, Left, Infix, K::MulExpr),
    op(K::Match, &["=~"], p::BINDING, Left, Infix, K::MatchExpr),
    op(K::NotMatch, &["!~"], p::BINDING, Left, Infix, K::MatchExpr),
    // Unary
    op(K::Not, &["!"], p::UNARY, Right, Prefix, K::UnaryExpr),
    op(K::Tilde, &["~"], p::UNARY, Right, Prefix, K::UnaryExpr),
    op(K::Backslash, &["\\"], p::UNARY, Right, Prefix, K::RefExpr),
    op(K::Minus, &["-"], p::UNARY, Right, Prefix, K::UnaryExpr),
    op(K::Plus, &["+"], p::UNARY, Right, Prefix, K::UnaryExpr),
    op(K::FileTest, &["-e"], p::NAMED_UNARY, Right, Prefix, K::FileTestExpr),
    op(K::Pow, &["**"], p::POW, Right, Infix, K::PowExpr),
    op(K::PlusPlus, &["++"], p::INC_DEC, NonAssoc, Prefix, K::PrefixIncDec),
    op(K::MinusMinus, &["--"], p::INC_DEC, NonAssoc, Prefix, K::PrefixIncDec),
    op(K::PlusPlus, &["++"], p::INC_DEC, NonAssoc, Postfix, K::SuffixIncDec),
    op(K::MinusMinus, &["--"], p::INC_DEC, NonAssoc, Postfix, K::SuffixIncDec),
    op(K::Arrow, &["->"], p::ARROW, Left, Postfix, K::MethodCall),
];

/// Resolve a spelling to an operator kind.
pub fn from_str(spelling: &str) -> Option<SyntaxKind> {
    OPERATORS
        .iter()
        .find(|info| info.spellings.contains(&spelling))
        .map(|info| info.kind)
}

/// Resolve a spelling to a word-operator kind (`lt`, `eq`, `and`, `x`, ...).
pub fn word_operator(spelling: &str) -> Option<SyntaxKind> {
    OPERATORS
        .iter()
        .filter(|info| info.is_word())
        .find(|info| info.spellings.contains(&spelling))
        .map(|info| info.kind)
}

/// First registry entry for `kind`.
pub fn info_for(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    OPERATORS.iter().find(|info| info.kind == kind)
}

/// Registry entry for `kind` used as a binary operator.
pub fn infix_info(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    lookup(kind, Fixity::Infix)
}

/// Registry entry for `kind` used as a prefix operator.
pub fn prefix_info(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    lookup(kind, Fixity::Prefix)
}

/// Registry entry for `kind` used as a postfix operator.
pub fn postfix_info(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    lookup(kind, Fixity::Postfix)
}

/// Canonical spelling of an operator kind.
pub fn as_str(kind: SyntaxKind) -> Option<&'static str> {
    info_for(kind).and_then(|info| info.spellings.first().copied())
}

fn lookup(kind: SyntaxKind, fixity: Fixity) -> Option<&'static OperatorInfo> {
    OPERATORS.iter().find(|info| info.kind == kind && info.fixity == fixity)
}

const fn op(
    kind: SyntaxKind,
    spellings: &'static [&'static str],
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
    node: SyntaxKind,
) -> OperatorInfo {
    OperatorInfo {
        kind,
        spellings,
        precedence,
        associativity,
        fixity,
        node,
    }
}
