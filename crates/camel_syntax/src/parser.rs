//! Parser for Perl 5 source.
//!
//! Consumes the merged token stream and builds a lossless rowan tree. Statements and expressions get typed nodes;
//! the bodies of subs, compound statements, `do`/`eval`/`try` blocks and bare blocks become
//! [`SyntaxKind::LazyBlock`] nodes whose tokens are kept flat until [`crate::Parse::expand`] parses them.
//!
//! ## Notes
//! - Every decision is taken on token kinds only, never on token text. The reparse analyzer relies on that: swapping
//!   a token for another of the same kind cannot change the shape of the tree around it.
//! - Malformed input never fails the parse. The offending span is wrapped in [`SyntaxKind::ErrorElement`], an error is
//!   recorded, and parsing resumes at the next statement starter, `;` or `}`.
//! - Cancellation is polled between statements.
//!
//! ## Examples
//!
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_core::lang::kinds::SyntaxKind;
//! use camel_syntax::parser;
//!
//! let parse = parser::parse("my $x = 1 + 2;\n", &Dialect::new());
//! assert!(parse.errors().is_empty());
//! assert_eq!(parse.syntax_node().kind(), SyntaxKind::File);
//! ```

use camel_core::lang::dialect::{Dialect, TryCatchDialect};
use camel_core::lang::keywords;
use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::operators::{self, Associativity, precedence};
use camel_core::lang::token_sets::{
    BLOCK_LIST_KEYWORDS, LIST_OPERATOR_KEYWORDS, LOOP_CONTROL_KEYWORDS, MOOSE_KEYWORDS, MOOSE_LIST_KEYWORDS,
    NAMED_UNARY_KEYWORDS, NUMBERS, PRINT_KEYWORDS, QUOTE_LITERALS, SIGILS, STATEMENT_MODIFIERS, STATEMENT_RECOVERY,
    SUB_LIKE_KEYWORDS, TERM_STARTS, TRIVIA, TokenSet, UNCHAINABLE_OPERATORS, VARIABLE_DECLARATORS,
};
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, Language, TextRange, TextSize};

use crate::cancel::{Cancellation, NeverCancel};
use crate::diagnostics::{ParseError, SyntaxError};
use crate::lexer::{self, Token};
use crate::merge::merge;
use crate::tree::{Parse, PerlLanguage};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/blocks.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
