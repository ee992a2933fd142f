//! Criterion benchmarks for island generation and draw-list building.
//!
//! Run with: cargo bench --bench island_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec2;
use greengrid::camera::IsoProjector;
use greengrid::render::day_night::DayNightConfig;
use greengrid::render::{build_draw_list, DrawView};
use greengrid::world::{IslandGenerator, NoiseKind, Seed, WorldConfig};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("island_generate");
    let world = WorldConfig::default();
    let seed = Seed::new(42).unwrap();

    for kind in [NoiseKind::HashedSine, NoiseKind::Gradient] {
        let generator = IslandGenerator::new(kind);
        group.bench_function(format!("{kind:?}_64x64"), |b| {
            b.iter(|| black_box(generator.generate(world.width, world.height, black_box(seed))));
        });
    }

    group.finish();
}

fn bench_draw_list(c: &mut Criterion) {
    let world = WorldConfig::default();
    let grid = IslandGenerator::default().generate(world.width, world.height, Seed::new(42).unwrap());
    let projector = IsoProjector::from_config(&world);
    let day_night = DayNightConfig::default();
    let mut draw = Vec::new();

    c.bench_function("draw_list_64x64", |b| {
        b.iter(|| {
            let view = DrawView {
                grid: &grid,
                projector: &projector,
                offset: Vec2::new(640.0, 0.0),
                night_intensity: 0.5,
                sky: day_night.sky_tint(0.5),
                ghost: None,
            };
            build_draw_list(black_box(&view), &mut draw);
            black_box(draw.len())
        });
    });
}

criterion_group!(benches, bench_generate, bench_draw_list);
criterion_main!(benches);
