//! Rendering of syntax errors with miette.
//!
//! [`SyntaxError`] already implements [`miette::Diagnostic`]; this module attaches the named source so the report can
//! show the offending lines with a label under the error range.

use miette::{NamedSource, Report};

use camel_syntax::SyntaxError;

/// Render one error against its source file.
pub fn render(error: &SyntaxError, source_path: &str, source: &str) -> String {
    let report = Report::new(error.clone()).with_source_code(NamedSource::new(source_path, source.to_string()));
    format!("{report:?}")
}

/// Render every error, separated by blank lines.
pub fn render_all(errors: &[SyntaxError], source_path: &str, source: &str) -> String {
    errors
        .iter()
        .map(|error| render(error, source_path, source))
        .collect::<Vec<_>>()
        .join("\n")
}
