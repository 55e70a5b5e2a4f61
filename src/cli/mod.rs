//! CLI module for the Camel front end
//!
//! This module provides the command-line interface for inspecting how Perl source is lexed, parsed and reparsed.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the merged (or `--primitive`) token stream
//! - `parse <file>` - Print the tree dump, JSON or an outline, then the diagnostics
//! - `reparse <file> --offset N --delete LEN --insert TEXT` - Apply one edit and compare against a full parse
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `diagnostic` - miette rendering of syntax errors
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod diagnostic;

use std::fmt;
use std::path::PathBuf;
use std::process;

use camel_core::lang::dialect::{Dialect, ObjectSystem};
use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Incremental lexer and parser for Perl 5 source
#[derive(Parser, Debug)]
#[command(name = "camel")]
#[command(version = VERSION)]
#[command(about = "Incremental lexer and parser for Perl 5 source", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Grammar extensions to enable
    #[arg(long, value_enum, default_value_t = DialectArg::Perl, global = true)]
    pub dialect: DialectArg,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE")]
    pub parse_file: Option<PathBuf>,
}

/// Named dialect presets.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    /// Plain Perl 5
    Perl,
    /// Signatures, native try/catch, async/await
    Modern,
    /// Plain Perl plus Moose sugar
    Moose,
    /// Embedded template document
    Template,
}

impl DialectArg {
    pub fn dialect(self) -> Dialect {
        match self {
            DialectArg::Perl => Dialect::new(),
            DialectArg::Modern => Dialect::modern(),
            DialectArg::Moose => Dialect::new().with_object_system(ObjectSystem::Moose),
            DialectArg::Template => Dialect::template(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Show primitive tokens instead of merged ones
        #[arg(long)]
        primitive: bool,
    },

    /// Print the syntax tree and diagnostics
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Expand every lazy block first
        #[arg(long)]
        expand: bool,
        /// Print the tree as JSON
        #[arg(long, conflicts_with = "outline")]
        json: bool,
        /// Print packages, subs and uses instead of the tree
        #[arg(long)]
        outline: bool,
    },

    /// Apply one edit and report how it was reparsed
    Reparse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Byte offset of the edit
        #[arg(long)]
        offset: u32,
        /// Number of bytes to delete at the offset
        #[arg(long, default_value_t = 0)]
        delete: u32,
        /// Text to insert at the offset
        #[arg(long, default_value = "")]
        insert: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let dialect = cli.dialect.dialect();

    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file, &dialect, false);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file, &dialect, commands::ParseOutput::Tree, false);
    }

    match cli.command {
        Some(Command::Lex { file, primitive }) => commands::lex_file(&file, &dialect, primitive),
        Some(Command::Parse {
            file,
            expand,
            json,
            outline,
        }) => {
            let output = if json {
                commands::ParseOutput::Json
            } else if outline {
                commands::ParseOutput::Outline
            } else {
                commands::ParseOutput::Tree
            };
            commands::parse_file(&file, &dialect, output, expand)
        }
        Some(Command::Reparse {
            file,
            offset,
            delete,
            insert,
        }) => commands::reparse_file(&file, &dialect, offset, delete, &insert),
        // No command - show help
        None => Err(CliError::new(
            "no command given; run `camel --help` for usage",
            ExitCode::FAILURE,
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use camel_core::lang::dialect::TryCatchDialect;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["camel", "lex", "a.pl", "--primitive"]).unwrap();
        if let Some(Command::Lex { primitive, .. }) = cli.command {
            assert!(primitive);
        } else {
            panic!("Expected Lex command");
        }
    }

    #[test]
    fn test_cli_parse_parse_flags() {
        let cli = Cli::try_parse_from(["camel", "parse", "a.pl", "--expand", "--json"]).unwrap();
        if let Some(Command::Parse { expand, json, outline, .. }) = cli.command {
            assert!(expand && json && !outline);
        } else {
            panic!("Expected Parse command");
        }
        assert!(Cli::try_parse_from(["camel", "parse", "a.pl", "--json", "--outline"]).is_err());
    }

    #[test]
    fn test_cli_parse_reparse() {
        let cli = Cli::try_parse_from(["camel", "reparse", "a.pl", "--offset", "4", "--insert", "x"]).unwrap();
        if let Some(Command::Reparse {
            offset, delete, insert, ..
        }) = cli.command
        {
            assert_eq!((offset, delete, insert.as_str()), (4, 0, "x"));
        } else {
            panic!("Expected Reparse command");
        }
    }

    #[test]
    fn test_cli_dialect_flag() {
        let cli = Cli::try_parse_from(["camel", "parse", "a.pl", "--dialect", "modern"]).unwrap();
        assert_eq!(cli.dialect, DialectArg::Modern);
        assert_eq!(cli.dialect.dialect().try_catch, TryCatchDialect::Native);

        let cli = Cli::try_parse_from(["camel", "--dialect", "template", "lex", "a.tpl"]).unwrap();
        assert!(cli.dialect.dialect().template);

        let cli = Cli::try_parse_from(["camel", "lex", "a.pl"]).unwrap();
        assert_eq!(cli.dialect.dialect(), Dialect::new());
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["camel", "--lex", "a.pl"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["camel", "--parse", "a.pl"]).unwrap();
        assert!(cli.parse_file.is_some());
    }
}
