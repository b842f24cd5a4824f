//! Benchmarks for buffer growth and snapshot history.
//!
//! Run with: cargo bench -p scribe-core --bench edit_bench
//!
//! Every edit captures a full snapshot, so history cost scales with content
//! length. These numbers show where that starts to dominate.
//!
//! | Scenario                    | Expectation                         |
//! |-----------------------------|-------------------------------------|
//! | append N small chunks       | amortized O(1) growth + O(len) snap |
//! | undo/redo sweep             | O(len) per step                     |
//! | find in large buffer        | linear scan                         |

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scribe_core::{BufferConfig, HistoryConfig, TextBuffer};

// ============================================================================
// Setup helpers
// ============================================================================

fn unlimited() -> TextBuffer {
    TextBuffer::with_config(BufferConfig::default().with_history(HistoryConfig::unlimited()))
}

fn filled(chunks: usize) -> TextBuffer {
    let mut buf = unlimited();
    for i in 0..chunks {
        buf.append(format!("line {i}\n"));
    }
    buf
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for &chunks in &[100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(chunks), &chunks, |b, &n| {
            b.iter(|| black_box(filled(n)));
        });
    }
    group.finish();
}

fn bench_undo_redo_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo_redo_sweep");
    for &chunks in &[100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(chunks), &chunks, |b, &n| {
            let mut buf = filled(n);
            b.iter(|| {
                while buf.undo().is_ok() {}
                while buf.redo().is_ok() {}
                black_box(buf.len())
            });
        });
    }
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut buf = filled(10_000);
    buf.append("needle");
    c.bench_function("find_text_tail", |b| {
        b.iter(|| black_box(buf.find_text(black_box("needle"))));
    });
}

criterion_group!(benches, bench_append, bench_undo_redo_sweep, bench_find);
criterion_main!(benches);
