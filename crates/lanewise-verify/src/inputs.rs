//! Input vectors for oracle comparisons
//!
//! Each case sees every rotation of a boundary table (extremes, zero, ±1, the
//! half-range points and, for floats, signed zeros, infinities, NaN,
//! denormals and the edges of the integer-safe range) followed by seeded
//! random vectors. Inputs whose result the
//! contract leaves open are sanitized per primitive before use.

use lanewise_core::{Element, FloatElement, Primitive};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Boundary lanes for `T`
pub fn boundary_values<T: Element>() -> Vec<T> {
    if T::KIND.is_float() {
        return [
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
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            1e-3,
            -7.25,
            65_504.0,
            3e9,
            -3e9,
            1e30,
        ]
        .into_iter()
        .map(T::from_f64_lossy)
        .chain([
            T::min_value(),
            T::max_value(),
            smallest_normal::<T>(),
            denormal::<T>(),
        ])
        .chain(safe_int_edges::<T>())
        .collect();
    }

    let half = T::max_value().to_f64_lossy() / 2.0;
    let mut values = vec![
        T::min_value(),
        T::max_value(),
        T::zero(),
        T::one(),
        T::from_f64_lossy(half),
        T::from_f64_lossy(half + 1.0),
    ];
    if T::KIND.is_signed() {
        values.extend([
            T::from_f64_lossy(-1.0),
            T::from_f64_lossy(-half),
            T::min_value().lane_add(T::one()),
        ]);
    }
    values
}

/// Smallest positive normal value of a float lane type
fn smallest_normal<T: Element>() -> T {
    match T::KIND.size() {
        4 => T::from_f64_lossy(f32::MIN_POSITIVE as f64),
        _ => T::from_f64_lossy(f64::MIN_POSITIVE),
    }
}

/// A positive subnormal value of a float lane type
fn denormal<T: Element>() -> T {
    match T::KIND.size() {
        4 => T::from_f64_lossy((f32::MIN_POSITIVE / 4.0) as f64),
        _ => T::from_f64_lossy(f64::MIN_POSITIVE / 4.0),
    }
}

/// `SAFE_INT_MIN`, `SAFE_INT_MAX` and their neighbours on both sides
fn safe_int_edges<T: Element>() -> Vec<T> {
    let edges: Vec<f64> = match T::KIND.size() {
        4 => [f32::SAFE_INT_MIN, f32::SAFE_INT_MAX]
            .into_iter()
            .flat_map(|x| {
                let bits = x.to_bits();
                [f32::from_bits(bits - 1), x, f32::from_bits(bits + 1)]
            })
            .map(f64::from)
            .collect(),
        _ => [f64::SAFE_INT_MIN, f64::SAFE_INT_MAX]
            .into_iter()
            .flat_map(|x| {
                let bits = x.to_bits();
                [f64::from_bits(bits - 1), x, f64::from_bits(bits + 1)]
            })
            .collect(),
    };
    edges.into_iter().map(T::from_f64_lossy).collect()
}

/// Deterministic source of input vectors
#[derive(Debug, Clone)]
pub struct InputGenerator {
    rng: ChaCha8Rng,
    random_rounds: usize,
}

impl InputGenerator {
    pub fn new(seed: u64, random_rounds: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            random_rounds,
        }
    }

    /// Boundary rotations followed by random vectors
    pub fn vectors<T: Element, const N: usize>(&mut self) -> Vec<[T; N]> {
        let boundaries = boundary_values::<T>();
        let mut vectors: Vec<[T; N]> = (0..boundaries.len())
            .map(|k| std::array::from_fn(|i| boundaries[(i + k) % boundaries.len()]))
            .collect();
        for _ in 0..self.random_rounds {
            let v = std::array::from_fn(|_| self.random_lane());
            vectors.push(v);
        }
        vectors
    }

    /// Operand pairs: each vector against a differently rotated partner
    pub fn pairs<T: Element, const N: usize>(&mut self) -> Vec<([T; N], [T; N])> {
        let vectors = self.vectors::<T, N>();
        let len = vectors.len();
        (0..len)
            .map(|k| (vectors[k], vectors[(k * 7 + 3) % len]))
            .collect()
    }

    /// Full-range integer lane, or a float of random sign and magnitude
    fn random_lane<T: Element>(&mut self) -> T {
        if T::KIND.is_float() {
            let magnitude = 10f64.powf(self.rng.gen_range(-30.0..30.0));
            let sign = if self.rng.gen::<bool>() { -1.0 } else { 1.0 };
            T::from_f64_lossy(sign * magnitude * self.rng.gen_range(1.0..10.0))
        } else {
            let bits: u64 = self.rng.gen();
            let bytes = bits.to_le_bytes();
            let mut lane = T::zero();
            let width = std::mem::size_of::<T>();
            bytemuck::bytes_of_mut(&mut lane).copy_from_slice(&bytes[..width]);
            lane
        }
    }
}

/// Replace lanes whose result is left open for `primitive`
///
/// - NaN lanes become zero where the NaN result is unspecified
/// - Estimate inputs are clamped to magnitudes in `[1e-30, 1e30]`, away from
///   denormal results that hardware estimates flush to zero. The reciprocal
///   keeps the sign; the reciprocal square root takes the magnitude.
pub fn sanitize<T: Element, const N: usize>(primitive: Primitive, lanes: [T; N]) -> [T; N] {
    if !T::KIND.is_float() {
        return lanes;
    }
    match primitive {
        Primitive::ReciprocalEstimate => lanes.map(|x| {
            let v = x.to_f64_lossy();
            let folded = if v.is_nan() {
                1.0
            } else {
                v.signum() * v.abs().clamp(1e-30, 1e30)
            };
            T::from_f64_lossy(folded)
        }),
        Primitive::ReciprocalSqrtEstimate => lanes.map(|x| {
            let v = x.to_f64_lossy();
            let folded = if v.is_nan() { 1.0 } else { v.abs().clamp(1e-30, 1e30) };
            T::from_f64_lossy(folded)
        }),
        p if p.nan_unspecified() => lanes.map(|x| {
            if x.to_f64_lossy().is_nan() {
                T::zero()
            } else {
                x
            }
        }),
        _ => lanes,
    }
}
