//! Language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: the kind table, named kind groupings, reserved
//! keywords, operators and the per-file dialect switches that gate some of them.
//!
//! Callers work with **stable kinds** ([`kinds::SyntaxKind`]) and look up spellings and metadata via registry tables
//! instead of comparing strings across the lexer, the parser and tooling.
//!
//! ## Notes
//! - Registries are **pure**: no tree types, no IO, no side effects.
//! - The lexer and parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   highlighting, dumps).
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_core::lang::{keywords, kinds::SyntaxKind};
//!
//! assert_eq!(keywords::from_str("if", &Dialect::new()), Some(SyntaxKind::KwIf));
//! assert_eq!(keywords::as_str(SyntaxKind::KwIf), Some("if"));
//! ```

pub mod dialect;
pub mod keywords;
pub mod kinds;
pub mod operators;
pub mod token_sets;
