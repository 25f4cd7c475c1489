//! Throughput benchmarks for the streaming parser and writer.
//!
//! Unlike the teacher crate's `competitive_benchmarks.rs` (which compares
//! against `jiter`/`serde_json` over fixture files checked into the repo),
//! this bench is self-contained: it generates its own representative
//! payloads in-process, since this crate has no DOM/`Value` type to compare
//! against a tree-building competitor and no non-goal-violating fixture
//! corpus to maintain.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use jsonmodem::{Number, NullHandler, ParserOptions, StreamingParser, Writer, WriterOptions};

fn int_array(len: usize) -> String {
    let mut s = String::from("[");
    for i in 0..len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&i.to_string());
    }
    s.push(']');
    s
}

fn nested_objects(depth: usize) -> String {
    let mut s = String::new();
    for _ in 0..depth {
        s.push_str(r#"{"a":"#);
    }
    s.push_str("null");
    for _ in 0..depth {
        s.push('}');
    }
    s
}

fn string_array(len: usize) -> String {
    let mut s = String::from("[");
    for i in 0..len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(r#""element number {i}""#));
    }
    s.push(']');
    s
}

fn parse_whole(input: &str) {
    let mut parser = StreamingParser::new(NullHandler, ParserOptions::default());
    parser.receive(input.as_bytes()).unwrap();
    parser.close().unwrap();
}

fn parse_chunked(input: &str, chunk: usize) {
    let mut parser = StreamingParser::new(NullHandler, ParserOptions::default());
    for window in input.as_bytes().chunks(chunk) {
        parser.receive(window).unwrap();
    }
    parser.close().unwrap();
}

fn bench_parser(c: &mut Criterion) {
    let int_arr = int_array(10_000);
    let nested = nested_objects(1_000);
    let strings = string_array(5_000);

    let mut group = c.benchmark_group("parse_whole");
    group.bench_function("int_array_10k", |b| b.iter(|| parse_whole(black_box(&int_arr))));
    group.bench_function("nested_objects_1k_deep", |b| {
        b.iter(|| parse_whole(black_box(&nested)));
    });
    group.bench_function("string_array_5k", |b| b.iter(|| parse_whole(black_box(&strings))));
    group.finish();

    let mut group = c.benchmark_group("parse_fragmented_64b_chunks");
    group.bench_function("int_array_10k", |b| {
        b.iter(|| parse_chunked(black_box(&int_arr), 64));
    });
    group.bench_function("string_array_5k", |b| {
        b.iter(|| parse_chunked(black_box(&strings), 64));
    });
    group.finish();
}

fn bench_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer");
    group.bench_function("int_array_10k_compact", |b| {
        b.iter(|| {
            let mut w = Writer::new(Vec::new(), WriterOptions::default());
            w.start_array();
            for i in 0..10_000i32 {
                w.number_value(&Number::Int32(i));
            }
            w.end_array();
            black_box(w.close().unwrap())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parser, bench_writer);
criterion_main!(benches);
