//! End-to-end tests for the `camel` binary.

use std::path::Path;
use std::process::{Command, Output};

fn camel(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_camel"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const CART: &str = "tests/fixtures/valid/cart.pl";
const SORTING: &str = "tests/fixtures/valid/sorting.pl";

#[test]
fn test_valid_fixtures_parse_cleanly() {
    for entry in std::fs::read_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid")).unwrap() {
        let path = entry.unwrap().path();
        let path = path.to_string_lossy();
        let output = camel(&["parse", &path, "--expand"]);
        assert!(output.status.success(), "{path}: {}", stderr(&output));
        assert!(stdout(&output).starts_with("File@"));
    }
}

#[test]
fn test_invalid_fixtures_report_errors() {
    for entry in std::fs::read_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/invalid")).unwrap() {
        let path = entry.unwrap().path();
        let path = path.to_string_lossy();
        let output = camel(&["parse", &path]);
        assert_eq!(output.status.code(), Some(1), "{path}");
        assert!(!stderr(&output).is_empty(), "{path}");
    }
}

#[test]
fn test_lex_prints_merged_tokens() {
    let output = camel(&["lex", SORTING]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("KwMy@0..2 \"my\"\n"), "{out}");
    assert!(out.contains("StringSq@"), "{out}");
}

#[test]
fn test_lex_primitive_splits_literals() {
    let output = camel(&["lex", SORTING, "--primitive"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(!out.contains("StringSq@"), "{out}");
    assert!(out.contains("QuoteSingleOpen@"), "{out}");
}

#[test]
fn test_debug_lex_flag_matches_subcommand() {
    assert_eq!(stdout(&camel(&["--lex", SORTING])), stdout(&camel(&["lex", SORTING])));
}

#[test]
fn test_parse_json() {
    let output = camel(&["parse", CART, "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"], "File");
    assert_eq!(value["range"][0], 0);
}

#[test]
fn test_parse_outline() {
    let output = camel(&["parse", CART, "--outline"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "package Shop::Cart\nuse strict\nuse warnings\nsub total { ... }\n"
    );
}

#[test]
fn test_reparse_inside_heredoc_is_incremental() {
    let source = std::fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join(CART)).unwrap();
    let offset = (source.find("Total:").unwrap() + 2).to_string();
    let output = camel(&["reparse", CART, "--offset", &offset, "--insert", "x"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("incremental: relexed HeredocQq"), "{out}");
    assert!(out.contains("matches full parse"), "{out}");
}

#[test]
fn test_reparse_across_statements_falls_back() {
    let output = camel(&["reparse", CART, "--offset", "0", "--delete", "30"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("full reparse:"), "{out}");
    assert!(out.contains("matches full parse"), "{out}");
}

#[test]
fn test_reparse_rejects_an_edit_past_the_end() {
    let output = camel(&["reparse", SORTING, "--offset", "100000"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not fit"));
}

#[test]
fn test_missing_file() {
    let output = camel(&["parse", "tests/fixtures/missing.pl"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot access file"));
}
