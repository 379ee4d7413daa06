// Copyright 2026 The Cadence Project
// SPDX-License-Identifier: Apache-2.0

//! Chunking throughput benchmarks.
//!
//! Measures:
//! - Detector cost per call for each built-in granularity
//! - Classifier cost against growing buffers
//! - End-to-end smoothing of a token-sized fragment stream with instant delays
//!
//! Run: cargo bench --bench chunking_throughput

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio_stream::StreamExt;

use cadence::stream::{Chunking, ContextClassifier};
use cadence::{ChunkingOption, DelayPolicy, Fragment, InstantSleeper, SmoothStream, SmoothingConfig};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const RESPONSE: &str = "Here is how to do it:\n\
- install the toolchain\n\
- run the tests\n\n\
```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\n\
| step | time |\n|------|------|\n| build | 3s |\n\n\
See https://example.com/docs for more.\n";

fn response_of(repeats: usize) -> String {
    RESPONSE.repeat(repeats)
}

/// Split text into token-sized deltas of roughly four bytes.
fn tokenize(text: &str) -> Vec<Fragment<()>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, _) in text.char_indices() {
        if i - start >= 4 {
            out.push(Fragment::text(&text[start..i]));
            start = i;
        }
    }
    out.push(Fragment::text(&text[start..]));
    out
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

fn bench_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");
    let buffer = "install the toolchain and then run the tests\nnext line";

    for (name, chunking) in [
        ("word", Chunking::Word),
        ("line", Chunking::Line),
        ("list_item", Chunking::ListItem),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| chunking.detect(black_box(buffer)));
        });
    }

    // No boundary anywhere: the scan has to cover the whole buffer
    group.bench_function("word_no_boundary", |b| {
        let buffer = "x".repeat(4096);
        b.iter(|| Chunking::Word.detect(black_box(&buffer)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for repeats in [1, 8, 64] {
        let buffer = response_of(repeats);
        group.bench_with_input(BenchmarkId::new("buffer_repeats", repeats), &buffer, |b, buffer| {
            let mut classifier = ContextClassifier::new();
            b.iter(|| classifier.observe(black_box(buffer)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_stream");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    for repeats in [1, 16] {
        let fragments = tokenize(&response_of(repeats));
        group.bench_with_input(
            BenchmarkId::new("adaptive_instant", repeats),
            &fragments,
            |b, fragments| {
                let pipeline =
                    SmoothStream::new(SmoothingConfig::new(ChunkingOption::Adaptive, DelayPolicy::None))
                        .with_sleeper(Arc::new(InstantSleeper));
                b.iter(|| {
                    runtime.block_on(async {
                        let mut output = pipeline.process(tokio_stream::iter(fragments.clone()));
                        let mut chunks = 0usize;
                        while let Some(item) = output.next().await {
                            black_box(item.unwrap());
                            chunks += 1;
                        }
                        chunks
                    })
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_detectors, bench_classifier, bench_smoothing);
criterion_main!(benches);
