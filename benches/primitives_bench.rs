//! Benchmarks comparing the oracle with the compile-time default backend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lanewise::ops::Horizontal;
use lanewise::{Backend, DefaultBackend, Simd, Simulated};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SIZES: [usize; 3] = [1 << 10, 1 << 14, 1 << 18];

/// Generate test data with a fixed seed
fn generate_i16(len: usize) -> Vec<i16> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    (0..len).map(|_| rng.gen_range(-1000..1000)).collect()
}

fn generate_f32(len: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    (0..len).map(|_| rng.gen_range(-1e3..1e3)).collect()
}

/// Dot product through `mul_sum` with an `i32` accumulator
fn dot<B: Backend>(a: &[i16], b: &[i16]) -> i32 {
    let mut acc = Simd::<i32, 4, B>::splat(0);
    for (x, y) in a.chunks_exact(8).zip(b.chunks_exact(8)) {
        let x = Simd::<i16, 8, B>::from_array(x.try_into().unwrap_or([0; 8]));
        let y = Simd::<i16, 8, B>::from_array(y.try_into().unwrap_or([0; 8]));
        acc = x.mul_sum(y, acc);
    }
    acc.reduce_sum()
}

/// Saturating accumulation of every chunk into one vector
fn saturating_fold<B: Backend>(data: &[i16]) -> Simd<i16, 8, B> {
    data.chunks_exact(8).fold(Simd::splat(0), |acc, chunk| {
        acc.add_saturated(Simd::from_array(chunk.try_into().unwrap_or([0; 8])))
    })
}

/// Minimum of the whole buffer
fn minimum<B: Backend>(data: &[f32]) -> f32 {
    data.chunks_exact(4)
        .fold(Simd::<f32, 4, B>::splat(f32::INFINITY), |acc, chunk| {
            acc.min(Simd::from_array(chunk.try_into().unwrap_or([0.0; 4])))
        })
        .hmin()
}

fn bench_mul_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul_sum_dot");
    for size in SIZES {
        let a = generate_i16(size);
        let b = generate_i16(size);
        group.bench_with_input(BenchmarkId::new("oracle", size), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(dot::<Simulated>(a, b)))
        });
        group.bench_with_input(
            BenchmarkId::new(DefaultBackend::NAME, size),
            &(&a, &b),
            |bench, (a, b)| bench.iter(|| black_box(dot::<DefaultBackend>(a, b))),
        );
    }
    group.finish();
}

fn bench_add_saturated(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_saturated_fold");
    for size in SIZES {
        let data = generate_i16(size);
        group.bench_with_input(BenchmarkId::new("oracle", size), &data, |bench, data| {
            bench.iter(|| black_box(saturating_fold::<Simulated>(data)))
        });
        group.bench_with_input(
            BenchmarkId::new(DefaultBackend::NAME, size),
            &data,
            |bench, data| bench.iter(|| black_box(saturating_fold::<DefaultBackend>(data))),
        );
    }
    group.finish();
}

fn bench_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_hmin");
    for size in SIZES {
        let data = generate_f32(size);
        group.bench_with_input(BenchmarkId::new("oracle", size), &data, |bench, data| {
            bench.iter(|| black_box(minimum::<Simulated>(data)))
        });
        group.bench_with_input(
            BenchmarkId::new(DefaultBackend::NAME, size),
            &data,
            |bench, data| bench.iter(|| black_box(minimum::<DefaultBackend>(data))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_mul_sum, bench_add_saturated, bench_min);
criterion_main!(benches);
