//! Benchmarks for tempex-core.
//!
//! Run with: `cargo bench -p tempex-core`
//!
//! Results are saved to `target/criterion/` with HTML reports.

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempex_core::merge::add_to;
use tempex_core::{Category, ExtractResult, Locale, Recognizer};

/// Benchmark inputs representing common use cases, one per locale.
struct BenchmarkInputs {
    /// Short English sentence with a modifier
    english: &'static str,
    /// French sentence with several overlapping candidates
    french: &'static str,
    /// Japanese sentence without spaces
    japanese: &'static str,
    /// Text with nothing temporal in it
    plain: &'static str,
}

const INPUTS: BenchmarkInputs = BenchmarkInputs {
    english: "Let's meet next Friday at 3pm, or tomorrow morning before 10am.",
    french: "Rendez-vous vendredi prochain à 8 heures du soir, avant 22h.",
    japanese: "明日の午後3時に会いましょう。3時以降なら大丈夫です。",
    plain: "The quick brown fox jumps over the lazy dog.",
};

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Benchmark merged extraction per locale.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let inputs = [
        (Locale::English, "english", INPUTS.english),
        (Locale::English, "plain", INPUTS.plain),
        (Locale::French, "french", INPUTS.french),
        (Locale::Japanese, "japanese", INPUTS.japanese),
    ];

    for (locale, name, input) in inputs {
        let recognizer = Recognizer::new(locale).unwrap();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("input", name), &input, |b, input| {
            b.iter(|| recognizer.extract_at(black_box(input), reference()));
        });
    }

    group.finish();
}

/// Benchmark extraction plus resolution.
fn bench_recognize(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize");

    for locale in Locale::ALL {
        let recognizer = Recognizer::new(locale).unwrap();
        let input = match locale {
            Locale::English => INPUTS.english,
            Locale::French => INPUTS.french,
            Locale::Japanese => INPUTS.japanese,
        };
        group.bench_with_input(BenchmarkId::new("locale", locale), &input, |b, input| {
            b.iter(|| recognizer.recognize_at(black_box(input), reference()));
        });
    }

    group.finish();
}

/// Benchmark recognizer creation (configuration is cached after the first).
fn bench_initialization(c: &mut Criterion) {
    c.bench_function("Recognizer::new", |b| {
        b.iter(|| Recognizer::new(black_box(Locale::English)));
    });
}

/// Benchmark the accumulator with many overlapping candidates.
fn bench_add_to(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_to");

    let sizes = [16, 64, 256];
    for size in sizes {
        let source = "x".repeat(size * 4 + 8);
        let batches: Vec<Vec<ExtractResult>> = (0..4)
            .map(|shift| {
                (0..size)
                    .map(|i| {
                        ExtractResult::from_source(&source, i * 4 + shift, 3 + shift, Category::Date)
                    })
                    .collect()
            })
            .collect();

        group.throughput(Throughput::Elements((size * 4) as u64));
        group.bench_with_input(BenchmarkId::new("spans", size), &batches, |b, batches| {
            b.iter(|| {
                let mut acc = Vec::new();
                for batch in batches {
                    add_to(&mut acc, black_box(batch.clone()));
                }
                acc
            });
        });
    }

    group.finish();
}

/// Benchmark throughput with varying input sizes.
fn bench_throughput(c: &mut Criterion) {
    let recognizer = Recognizer::new(Locale::English).unwrap();

    let mut group = c.benchmark_group("throughput");

    let sizes = [1, 8, 64];
    for size in sizes {
        let input = vec![INPUTS.english; size].join(" ");
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("sentences", size), &input, |b, input| {
            b.iter(|| recognizer.extract_at(black_box(input), reference()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_extract,
    bench_recognize,
    bench_initialization,
    bench_add_to,
    bench_throughput,
);

criterion_main!(benches);
