//! Shared utilities for integration tests

#![allow(dead_code)]

use lanewise_core::{Element, Simd, Simulated};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use approx::assert_relative_eq;

pub const SEED: u64 = 0x1a2e_5eed;

/// Integer boundary values: extremes, zero, ±1 and the half-range points
pub fn int_boundaries<T: Element>() -> Vec<T> {
    let mut values = vec![T::min_value(), T::max_value(), T::zero(), T::one()];
    let half = T::max_value().to_f64_lossy() / 2.0;
    values.push(T::from_f64_lossy(half));
    values.push(T::from_f64_lossy(half + 1.0));
    if T::KIND.is_signed() {
        values.push(T::from_f64_lossy(-1.0));
        values.push(T::from_f64_lossy(-half));
        values.push(T::min_value().lane_add(T::one()));
    }
    values
}

/// Special floating-point values, NaN excluded
pub fn float_specials() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        1.0,
        -1.0,
        0.5,
        -0.5,
        1.5,
        -1.5,
        2.5,
        -2.5,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        1e-3,
        1e3,
        65_504.0,
        1e30,
        -1e30,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ]
}

/// Vector of `N` lanes cycling through `values`, starting at `offset`
pub fn cycle<T: Element, const N: usize>(values: &[T], offset: usize) -> Simd<T, N, Simulated> {
    Simd::from_fn(|i| values[(i + offset) % values.len()])
}

/// Seeded random vector over the full range of `T` (floats in `±1e6`)
pub fn random_vector<T: Element, const N: usize>(rng: &mut ChaCha8Rng) -> Simd<T, N, Simulated> {
    Simd::from_fn(|_| {
        if T::KIND.is_float() {
            T::from_f64_lossy(rng.gen_range(-1e6..1e6))
        } else {
            let bits: u64 = rng.gen();
            lane_from_bits(bits)
        }
    })
}

/// Low `size_of::<T>()` bytes of `bits` as a lane
fn lane_from_bits<T: Element>(bits: u64) -> T {
    let bytes = bits.to_le_bytes();
    let mut lane = T::zero();
    let width = std::mem::size_of::<T>();
    bytemuck::bytes_of_mut(&mut lane).copy_from_slice(&bytes[..width]);
    lane
}

pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(SEED)
}
