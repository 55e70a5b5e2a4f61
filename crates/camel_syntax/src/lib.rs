//! Syntax front end for Perl 5 source: stateful lexer, token merger, lossless parser and incremental reparse analyzer.
//!
//! Parsing never fails. Every byte of the input ends up in the tree, malformed regions are wrapped in error nodes and
//! the diagnostics travel alongside in [`Parse::errors`].
//!
//! ## Module Structure
//! - [`lexer`]: primitive tokens from a stack of lexer states; resumable from any state.
//! - [`merge`]: coalesces primitive tokens into composite literals, heredoc bodies, annotations and template regions.
//! - [`parser`]: recursive descent with a Pratt expression core, building rowan green trees. Code blocks are kept as
//!   lazy blocks until [`Parse::expand`] is asked for them.
//! - [`reparse`]: decides whether an edit can be applied by relexing one element, and grafts the result.
//! - [`ast`]: typed wrappers and the kind capability registry.
//! - [`tree`], [`diagnostics`], [`cancel`]: the parse result, errors and cooperative cancellation.
//!
//! ## Notes
//! - Vocabulary (kinds, kind sets, keywords, operators, dialects) comes from `camel_core::lang`.
//! - No IO and no name resolution.
//!
//! ## Examples
//! ```rust
//! use camel_core::Dialect;
//! use camel_syntax::parse;
//!
//! let parse = parse("my $x = 1;\n", &Dialect::new());
//! assert!(parse.errors().is_empty());
//! assert_eq!(parse.text(), "my $x = 1;\n");
//! ```

#![forbid(unsafe_code)]

pub mod ast;
pub mod cancel;
pub mod diagnostics;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod reparse;
pub mod tree;

pub use cancel::{Cancellation, CancellationFlag, NeverCancel};
pub use diagnostics::{ParseError, SyntaxError, SyntaxErrorKind};
pub use parser::{parse, parse_tokens, parse_with_cancellation};
pub use reparse::{ReparseOutcome, TextEdit, analyze, reparse};
pub use tree::{Parse, PerlLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
