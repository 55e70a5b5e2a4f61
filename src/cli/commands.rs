//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use camel_core::Dialect;
use camel_syntax::ast::{AstNode, PackageStatement, SourceFile, SubDefinition, UseStatement};
use camel_syntax::lexer::{self, Token};
use camel_syntax::merge::merge;
use camel_syntax::reparse::{self, ReparseOutcome, TextEdit};
use camel_syntax::{Parse, SyntaxNode, parse};
use rowan::{NodeOrToken, TextRange};
use serde_json::{Value, json};

use super::diagnostic;
use super::{CliError, CliResult, ExitCode};

/// How `parse` prints the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutput {
    Tree,
    Json,
    Outline,
}

// ============================================================================
// Source Loading
// ============================================================================

/// Maximum source file size (100 MB).
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, refusing anything above [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &Path) -> CliResult<String> {
    // Check file size before reading
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path.display(), e)))
}

// ============================================================================
// Commands
// ============================================================================

/// Tokenize and display tokens.
pub fn lex_file(file_path: &Path, dialect: &Dialect, primitive: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lexed = lexer::lex(&source, dialect);
    let tokens = if primitive { lexed.tokens } else { merge(lexed.tokens) };

    print!("{}", token_dump(&source, &tokens));
    report(&source, file_path, &lexed.errors)
}

/// Parse and display the tree, then the diagnostics.
#[tracing::instrument(skip_all, fields(file = %file_path.display()))]
pub fn parse_file(file_path: &Path, dialect: &Dialect, output: ParseOutput, expand: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let mut tree = parse(&source, dialect);
    if expand {
        tree = tree.expand_all();
    }

    match output {
        ParseOutput::Tree => print!("{}", tree.debug_dump()),
        ParseOutput::Json => {
            let rendered = serde_json::to_string_pretty(&tree_json(&tree.syntax_node()))
                .map_err(|e| CliError::failure(format!("Cannot serialize tree: {e}")))?;
            println!("{rendered}");
        }
        ParseOutput::Outline => print!("{}", outline(&tree)),
    }
    report(&source, file_path, tree.errors())
}

/// Apply one edit, report whether the incremental path was taken and check it against a full parse.
#[tracing::instrument(skip_all, fields(file = %file_path.display(), offset = offset, delete = delete))]
pub fn reparse_file(file_path: &Path, dialect: &Dialect, offset: u32, delete: u32, insert: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let end = offset
        .checked_add(delete)
        .ok_or_else(|| CliError::failure("Edit range overflows"))?;
    let edit = TextEdit::new(TextRange::new(offset.into(), end.into()), insert);
    let Some(new_text) = edit.apply(&source) else {
        return Err(CliError::failure(format!(
            "Edit {offset}..{end} does not fit '{}' ({} bytes) or splits a character",
            file_path.display(),
            source.len()
        )));
    };

    let old = parse(&source, dialect);
    let full = parse(&new_text, dialect);
    let result = match reparse::analyze(&old, &edit, dialect) {
        ReparseOutcome::Patch(patch) => {
            println!(
                "incremental: relexed {} {:?} -> {:?}",
                patch.kind, patch.old_range, patch.new_range
            );
            patch.parse
        }
        ReparseOutcome::FullReparseRequired(reason) => {
            println!("full reparse: {reason}");
            full.clone()
        }
    };

    if result != full {
        tracing::error!("incremental tree differs from a full parse");
        return Err(CliError::failure(format!(
            "Incremental result differs from a full parse\n--- incremental\n{}--- full\n{}",
            result.debug_dump(),
            full.debug_dump()
        )));
    }
    println!("matches full parse ({} error(s))", full.errors().len());
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Output Helpers
// ============================================================================

/// Print diagnostics to stderr; failure when there are any.
fn report(source: &str, file_path: &Path, errors: &[camel_syntax::SyntaxError]) -> CliResult<ExitCode> {
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    let path = file_path.display().to_string();
    Err(CliError::failure(diagnostic::render_all(errors, &path, source).trim_end()))
}

/// One `Kind@start..end "text"` line per token.
pub fn token_dump(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{}@{:?} {:?}", token.kind, token.range, token.text(source));
    }
    out
}

/// The tree as nested JSON objects; tokens carry their text.
pub fn tree_json(node: &SyntaxNode) -> Value {
    let children: Vec<Value> = node
        .children_with_tokens()
        .map(|child| match child {
            NodeOrToken::Node(n) => tree_json(&n),
            NodeOrToken::Token(t) => json!({
                "kind": t.kind().name(),
                "range": [u32::from(t.text_range().start()), u32::from(t.text_range().end())],
                "text": t.text(),
            }),
        })
        .collect();
    json!({
        "kind": node.kind().name(),
        "range": [u32::from(node.text_range().start()), u32::from(node.text_range().end())],
        "children": children,
    })
}

/// Packages, `use`/`no` statements and subs, one per line.
pub fn outline(parse: &Parse) -> String {
    let root = parse.syntax_node();
    let mut out = String::new();
    let Some(file) = SourceFile::cast(root.clone()) else {
        return out;
    };

    for node in root.descendants() {
        if let Some(package) = PackageStatement::cast(node.clone()) {
            let name = package.name().unwrap_or_default();
            let block = if package.has_block() { " { ... }" } else { "" };
            let _ = writeln!(out, "package {name}{block}");
        } else if let Some(usage) = UseStatement::cast(node.clone()) {
            let keyword = if usage.is_no() { "no" } else { "use" };
            let module = usage.module().unwrap_or_else(|| "<version>".to_string());
            let _ = writeln!(out, "{keyword} {module}");
        } else if let Some(sub) = SubDefinition::cast(node) {
            let _ = writeln!(out, "{}", describe_sub(&sub));
        }
    }
    tracing::debug!(statements = file.statements().count(), "outline built");
    out
}

fn describe_sub(sub: &SubDefinition) -> String {
    let name = sub.name().unwrap_or_else(|| "<anon>".to_string());
    let prefix = if sub.is_async() { "async sub" } else { "sub" };
    match sub.body() {
        None => format!("{prefix} {name};"),
        Some(body) if body.is_lazy() => format!("{prefix} {name} {{ ... }}"),
        Some(_) => format!("{prefix} {name} {{ }}"),
    }
}
