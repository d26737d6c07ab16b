//! Benchmarks for the Veil codec and file pipeline.
//!
//! Run with: cargo bench -p veil-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageBuffer, Rgb};
use veil_core::codec::{KeyedPermutationCodec, PermutationTable, PixelFormat, PixelGrid};
use veil_core::config::LimitsConfig;

fn gradient_grid(width: u32, height: u32) -> PixelGrid {
    let data: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    PixelGrid::new(width, height, PixelFormat::Rgb8, data).unwrap()
}

fn benchmark_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("permutation_table");
    for size in [256usize, 1920, 8192] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| PermutationTable::build(black_box(size), black_box("hunter2")))
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let codec = KeyedPermutationCodec::from_password("hunter2");
    let grid = gradient_grid(1920, 1080);

    c.bench_function("encode_gather_1080p", |b| {
        b.iter(|| codec.encode(black_box(&grid)).unwrap())
    });

    c.bench_function("encode_in_place_1080p", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut g| codec.encode_in_place(&mut g).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn benchmark_decode_png(c: &mut Criterion) {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_fn(512, 512, |x, y| {
        Rgb([x as u8, y as u8, (x ^ y) as u8])
    }));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.png");
    let bytes = veil_core::pipeline::encode_png(&img, &path).unwrap();
    std::fs::write(&path, bytes).unwrap();

    let decoder = veil_core::pipeline::ImageDecoder::new(LimitsConfig::default());
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("decode_png_512", |b| {
        b.iter(|| {
            let _ = rt.block_on(decoder.decode(black_box(&path)));
        })
    });
}

criterion_group!(
    benches,
    benchmark_table_build,
    benchmark_encode,
    benchmark_decode_png
);
criterion_main!(benches);
