//! Criterion benchmarks for outfit store critical paths
//!
//! Benchmarks the operations a game frame depends on:
//! - Decode: outfit code to layer indices
//! - Compose: building an outfit on a cache miss
//! - Cache: serving an already built outfit
//! - Adjust: whole-outfit color adjustment

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, Rgba, RgbaImage};
use outfitstore::composition::{apply_adjustment, BlendMode};
use outfitstore::outfit::{ColorProfile, LayerKind, OutfitCode};
use outfitstore::provider::MemorySpriteProvider;
use outfitstore::store::OutfitStore;
use std::sync::Arc;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Sprite with an opaque lower half, like a torso or dress
fn make_layer(size: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(size, size, |_, y| {
        if y >= size / 2 {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Provider with every layer of outfit 10020305 at the given size
fn make_provider(size: u32) -> MemorySpriteProvider {
    MemorySpriteProvider::new()
        .with("outfits/body/body_005.png", RgbaImage::from_pixel(size, size, Rgba([220, 180, 150, 255])))
        .with("outfits/dress_3.png", make_layer(size, [200, 200, 200]))
        .with("outfits/head_2.png", make_layer(size, [230, 190, 160]))
        .with("outfits/hair_10.png", make_layer(size, [180, 180, 180]))
}

fn tinted_profile() -> ColorProfile {
    ColorProfile::new()
        .with_tint(LayerKind::Dress, Rgb([40, 80, 200]))
        .with_tint(LayerKind::Hair, Rgb([120, 60, 20]))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("decode_10_digits", |b| b.iter(|| black_box(OutfitCode(9_908_070_605)).decode()));
    group.bench_function("parse_profile", |b| {
        b.iter(|| black_box("dress=#2850c8,hair=saddlebrown").parse::<ColorProfile>())
    });

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let profile = tinted_profile();

    for size in [32u32, 64, 128] {
        let store = OutfitStore::new(Arc::new(make_provider(size)), "outfits");
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("cache_miss", size), &store, |b, store| {
            b.iter(|| {
                store.clear_cache();
                store.get_outfit(black_box(OutfitCode(10_020_305)), &profile)
            })
        });
    }

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let store = OutfitStore::new(Arc::new(make_provider(64)), "outfits");
    let profile = tinted_profile();
    let _ = store.get_outfit(OutfitCode(10_020_305), &profile);
    let _ = store.get_adjusted_outfit(
        OutfitCode(10_020_305),
        &profile,
        Some(Rgb([255, 128, 0])),
        Some(BlendMode::Multiply),
    );

    group.bench_function("hit", |b| b.iter(|| store.get_outfit(black_box(OutfitCode(10_020_305)), &profile)));
    group.bench_function("adjusted_hit", |b| {
        b.iter(|| {
            store.get_adjusted_outfit(
                black_box(OutfitCode(10_020_305)),
                &profile,
                Some(Rgb([255, 128, 0])),
                Some(BlendMode::Multiply),
            )
        })
    });

    group.finish();
}

fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    let image = make_layer(64, [200, 150, 100]);

    for mode in [BlendMode::Multiply, BlendMode::Screen, BlendMode::Overlay] {
        group.bench_with_input(BenchmarkId::new("apply", mode.as_str()), &mode, |b, mode| {
            b.iter(|| apply_adjustment(black_box(&image), Rgb([255, 128, 0]), *mode))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_compose, bench_cache, bench_adjust);
criterion_main!(benches);
