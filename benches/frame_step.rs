//! Benchmarks for the per-frame particle work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparkles::{DrawSurface, Particle, ParticleConfig, Raster, Vec2};

fn spawn(count: usize, width: f32, height: f32) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(7);
    let config = ParticleConfig::default();
    (0..count)
        .map(|_| Particle::create(width, height, &config, &mut rng))
        .collect()
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_update");
    let bounds = Vec2::new(1920.0, 1080.0);

    for count in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut particles = spawn(count, bounds.x, bounds.y);
            let pointer = Vec2::new(960.0, 540.0);
            b.iter(|| {
                for p in &mut particles {
                    p.update(bounds, black_box(pointer));
                }
            })
        });
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_frame");
    let config = ParticleConfig::default();

    for count in [100usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut raster = Raster::new(1280, 720);
            let particles = spawn(count, 1280.0, 720.0);
            b.iter(|| {
                raster.clear();
                for p in &particles {
                    p.draw(&mut raster, &config);
                }
                black_box(raster.pixels().len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_frame);
criterion_main!(benches);
