//! Record codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dynschema_bench::{columns, random_document};
use dynschema_codec::{from_cbor, to_canonical_cbor, RecordCodec, Value};

const WIDTHS: [usize; 4] = [4, 16, 64, 256];

/// Benchmark compiling a codec from a column list.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for width in WIDTHS {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            let cols = columns(width);
            b.iter(|| {
                let codec = RecordCodec::compile(black_box(cols.iter().cloned()));
                black_box(codec);
            });
        });
    }

    group.finish();
}

/// Benchmark record encoding at varying widths.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_encode");

    for width in WIDTHS {
        let codec = RecordCodec::compile(columns(width));
        let doc = random_document(width);
        let size = codec.encode(&doc).unwrap().len();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &doc, |b, doc| {
            b.iter(|| {
                let result = codec.encode(black_box(doc)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark record decoding at varying widths.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_decode");

    for width in WIDTHS {
        let codec = RecordCodec::compile(columns(width));
        let encoded = codec.encode(&random_document(width)).unwrap();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &encoded, |b, encoded| {
            b.iter(|| {
                let result = codec.decode(black_box(encoded)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark the raw canonical CBOR layer.
fn bench_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("value");

    let value = Value::map(
        (0..32)
            .map(|i| (Value::Integer(i), Value::Text(format!("v{i}"))))
            .collect(),
    );
    let encoded = to_canonical_cbor(&value).unwrap();

    group.bench_function("encode_map_32", |b| {
        b.iter(|| {
            let result = to_canonical_cbor(black_box(&value)).unwrap();
            black_box(result);
        });
    });

    group.bench_function("decode_map_32", |b| {
        b.iter(|| {
            let result = from_cbor(black_box(&encoded)).unwrap();
            black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_encode, bench_decode, bench_value);

criterion_main!(benches);
