#![no_main]

use camel::reparse::reparse;
use camel::{Dialect, TextEdit, parse};
use libfuzzer_sys::fuzz_target;
use rowan::TextRange;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the edit position and length, the next byte splits insert text from source.
    let [at, len, split, rest @ ..] = data else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let split = usize::from(*split).min(text.len());
    if !text.is_char_boundary(split) {
        return;
    }
    let (insert, source) = text.split_at(split);

    let start = usize::from(*at) % (source.len() + 1);
    let end = (start + usize::from(*len % 8)).min(source.len());
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return;
    }
    let (Ok(start), Ok(end)) = (u32::try_from(start), u32::try_from(end)) else {
        return;
    };
    let range = TextRange::new(start.into(), end.into());
    let edit = TextEdit::new(range, insert);
    let Some(new_text) = edit.apply(source) else {
        return;
    };

    let dialect = Dialect::new();
    let incremental = reparse(&parse(source, &dialect), &edit, &dialect);
    let full = parse(&new_text, &dialect);
    assert_eq!(incremental.debug_dump(), full.debug_dump());
    assert_eq!(incremental.errors(), full.errors());
});
