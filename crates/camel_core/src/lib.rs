//! Provide the shared, pure vocabulary of the Camel Perl front end.
//!
//! This crate is small and dependency-free. It holds the stable kind table, the named kind sets, the keyword and
//! operator registries and the dialect description, all of which the lexer, the parser, the incremental reparser and
//! downstream tooling agree on.
//!
//! ## Notes
//!
//! - **No IO**, no global state, no tree types.
//! - Kind discriminants are persisted by downstream tools; see [`lang::kinds`] for the stability rules.

#![forbid(unsafe_code)]

pub mod lang;

pub use lang::dialect::Dialect;
pub use lang::kinds::SyntaxKind;
pub use lang::token_sets::TokenSet;
