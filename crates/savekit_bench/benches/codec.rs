//! Text codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use savekit_bench::{entity_document, nested_document};
use savekit_codec::{CodecVariant, Document, TypeNameHandling};

/// Benchmark encoding under each variant.
fn bench_encode_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let doc = entity_document(100);

    for variant in CodecVariant::ALL {
        let settings = variant.settings().type_names(TypeNameHandling::Auto);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{variant:?}")),
            &settings,
            |b, settings| {
                b.iter(|| {
                    let text = black_box(&doc).to_text(settings).unwrap();
                    black_box(text);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark decoding under each variant.
fn bench_decode_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let doc = entity_document(100);

    for variant in CodecVariant::ALL {
        let settings = variant.settings().type_names(TypeNameHandling::Auto);
        let text = doc.to_text(&settings).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{variant:?}")),
            &text,
            |b, text| {
                b.iter(|| {
                    let back = Document::from_text(black_box(text), &settings).unwrap();
                    black_box(back);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark decoding with varying document sizes.
fn bench_decode_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_size");
    let settings = CodecVariant::IndentedCommentsBefore.settings();

    for entities in [10, 100, 1000].iter() {
        let text = entity_document(*entities).to_text(&settings).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entities), &text, |b, text| {
            b.iter(|| {
                let back = Document::from_text(black_box(text), &settings).unwrap();
                black_box(back);
            });
        });
    }

    group.finish();
}

/// Benchmark roundtrip (encode + decode).
fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    let settings = CodecVariant::Compact.settings();

    group.bench_function("nested_depth3_width5", |b| {
        let doc = nested_document(3, 5);

        b.iter(|| {
            let text = black_box(&doc).to_text(&settings).unwrap();
            let back = Document::from_text(&text, &settings).unwrap();
            black_box(back);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_variants,
    bench_decode_variants,
    bench_decode_size,
    bench_roundtrip,
);

criterion_main!(benches);
