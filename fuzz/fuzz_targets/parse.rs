#![no_main]

use camel::{Dialect, lexer, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        for dialect in [Dialect::new(), Dialect::modern(), Dialect::template()] {
            let lexed = lexer::lex(s, &dialect);
            let covered: usize = lexed.tokens.iter().map(|t| t.text(s).len()).sum();
            assert_eq!(covered, s.len());

            let tree = parse(s, &dialect);
            assert_eq!(tree.text(), s);
            assert_eq!(tree.expand_all().text(), s);
        }
    }
});
