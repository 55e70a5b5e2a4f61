#![forbid(unsafe_code)]
//! Camel: an incremental lexer and parser for Perl 5 source.
//!
//! The syntax front end lives in the workspace crates; this crate bundles them behind one import and provides the
//! `camel` command-line tool for inspecting token streams, trees and incremental reparses.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//! ```rust
//! use camel::{Dialect, parse};
//!
//! let parse = parse("print 'hi';\n", &Dialect::new());
//! assert!(parse.errors().is_empty());
//! ```

pub mod cli;

pub use camel_core::lang;
pub use camel_core::{Dialect, SyntaxKind, TokenSet};
pub use camel_syntax::{ast, cancel, diagnostics, lexer, merge, parser, reparse, tree};
pub use camel_syntax::{Parse, ParseError, SyntaxError, SyntaxNode, TextEdit, parse, parse_with_cancellation};
