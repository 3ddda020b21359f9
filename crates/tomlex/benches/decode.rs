//! Benchmark – codepoint decoding from slices and streams
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tomlex::{BufferedReader, CodepointReader, ReaderOptions, Utf8Reader};

/// A deterministic TOML-ish document of exactly `target_len` bytes mixing
/// one-, two-, three- and four-byte codepoints.
fn make_payload(target_len: usize) -> String {
    const LINES: [&str; 4] = [
        "name = \"tomlex\"\n",
        "città = \"Zürich\"\n",
        "греет = '日本語'\n",
        "emoji = \"😀🚀\"\n",
    ];
    let mut s = String::with_capacity(target_len + 32);
    for line in LINES.iter().cycle() {
        if s.len() + line.len() > target_len {
            break;
        }
        s.push_str(line);
    }
    s.extend(std::iter::repeat_n('#', target_len - s.len()));
    debug_assert_eq!(s.len(), target_len);
    s
}

/// Reads every codepoint and returns how many there were.
fn drain<R: CodepointReader<Mode = tomlex::Raise>>(mut reader: R) -> usize {
    let mut count = 0usize;
    while reader.read_next().unwrap().is_some() {
        count += 1;
    }
    count
}

/// Reads forward, stepping back `hop` codepoints after every `every` reads.
/// `every` must exceed `hop` for the read to make progress.
fn drain_with_backtracking(payload: &str, every: usize, hop: usize) -> usize {
    let mut inner = Utf8Reader::from_str(payload);
    let mut reader: BufferedReader<'_, _> = BufferedReader::new(&mut inner);
    let mut count = 0usize;
    while reader.read_next().unwrap().is_some() {
        count += 1;
        if count % every == 0 && reader.offset() == 0 && reader.history_len() >= hop {
            let _ = reader.step_back(hop);
        }
    }
    count
}

fn bench_decode(c: &mut Criterion) {
    let payload = make_payload(64 * 1024);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("slice", |b| {
        b.iter(|| black_box(drain(Utf8Reader::from_str(black_box(&payload)))));
    });

    for &chunk in &[64usize, 4096] {
        let options = ReaderOptions {
            stream_chunk_size: chunk,
            ..ReaderOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("stream", chunk), &options, |b, options| {
            b.iter(|| {
                let source = black_box(payload.as_bytes());
                let reader = Utf8Reader::from_reader_with_options(source, options);
                black_box(drain(reader))
            });
        });
    }

    group.bench_function("buffered", |b| {
        b.iter(|| {
            let mut inner = Utf8Reader::from_str(black_box(&payload));
            let reader: BufferedReader<'_, _> = BufferedReader::new(&mut inner);
            black_box(drain(reader))
        });
    });

    for &hop in &[1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("backtracking", hop), &hop, |b, &hop| {
            b.iter(|| black_box(drain_with_backtracking(black_box(&payload), 64, hop)));
        });
    }

    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_decode }
criterion_main!(benches);
