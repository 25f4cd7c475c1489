#![no_main]

use jsonmodem::{NullHandler, ParserOptions, StreamingParser};
use libfuzzer_sys::fuzz_target;

/// Splits `data` into `step`-sized, UTF-8-boundary-safe chunks.
fn split_into_safe_chunks(data: &str, step: u8) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = data.len();
    let step = usize::from(step).max(1);

    while start < len {
        let mut end = (start + step).min(len);
        while end < len && !data.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&data[start..end]);
        start = end;
    }

    chunks
}

/// Parses `input` in one shot and, separately, split into `chunks`, and
/// asserts both runs agree on whether the document is well-formed.
///
/// This is the fragmentation-invariance property: where an input is split
/// across `receive` calls must never change the parser's verdict.
fn check_fragmentation_invariant(input: &str, chunks: &[&str]) {
    let mut whole = StreamingParser::new(NullHandler, ParserOptions::default());
    let whole_ok = whole.receive(input.as_bytes()).and_then(|()| whole.close()).is_ok();

    let mut fragmented = StreamingParser::new(NullHandler, ParserOptions::default());
    let mut fragmented_ok = true;
    for chunk in chunks {
        if fragmented.receive(chunk.as_bytes()).is_err() {
            fragmented_ok = false;
            break;
        }
    }
    if fragmented_ok {
        fragmented_ok = fragmented.close().is_ok();
    }

    assert_eq!(
        whole_ok, fragmented_ok,
        "whole vs. fragmented acceptance diverged for {input:?}"
    );
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let step = data[0];
    let Ok(input) = core::str::from_utf8(&data[1..]) else {
        return;
    };

    let chunks = split_into_safe_chunks(input, step);
    check_fragmentation_invariant(input, &chunks);
});
