//! Default backend against the oracle on boundary and seeded random inputs
//!
//! On targets without native overrides both sides run the oracle and the
//! comparisons hold trivially.

mod common;

use common::{cycle, float_specials, int_boundaries, random_vector, rng};
use lanewise_core::{Backend, DefaultBackend, Element, Primitive, Simd, Simulated};

type Native<T, const N: usize> = Simd<T, N, DefaultBackend>;

const RANDOM_ROUNDS: usize = 64;

fn native<T: Element, const N: usize>(v: Simd<T, N, Simulated>) -> Native<T, N> {
    v.with_backend()
}

/// Inputs for one width: every rotation of the boundary table, then random
fn int_inputs<T: Element, const N: usize>() -> Vec<Simd<T, N, Simulated>> {
    let boundaries = int_boundaries::<T>();
    let mut inputs: Vec<_> = (0..boundaries.len()).map(|k| cycle(&boundaries, k)).collect();
    let mut rng = rng();
    inputs.extend((0..RANDOM_ROUNDS).map(|_| random_vector(&mut rng)));
    inputs
}

macro_rules! check_integer_lanes {
    ($name:ident, $t:ty, $n:literal) => {
        #[test]
        fn $name() {
            let inputs = int_inputs::<$t, $n>();
            for (k, &a) in inputs.iter().enumerate() {
                let b = inputs[(k * 7 + 3) % inputs.len()];
                let (na, nb) = (native(a), native(b));
                assert_eq!(DefaultBackend::abs(na).to_array(), Simulated::abs(a).to_array());
                assert_eq!(DefaultBackend::min(na, nb).to_array(), Simulated::min(a, b).to_array());
                assert_eq!(DefaultBackend::max(na, nb).to_array(), Simulated::max(a, b).to_array());
                assert_eq!(
                    DefaultBackend::add_saturated(na, nb).to_array(),
                    Simulated::add_saturated(a, b).to_array()
                );
                assert_eq!(
                    DefaultBackend::sub_saturated(na, nb).to_array(),
                    Simulated::sub_saturated(a, b).to_array()
                );
                assert_eq!(DefaultBackend::movemask(na), Simulated::movemask(a));
                assert_eq!(na.simd_lt(nb).to_array(), a.simd_lt(b).to_array());
            }
        }
    };
}

check_integer_lanes!(test_i8x16, i8, 16);
check_integer_lanes!(test_u8x16, u8, 16);
check_integer_lanes!(test_i16x8, i16, 8);
check_integer_lanes!(test_u16x8, u16, 8);
check_integer_lanes!(test_i32x4, i32, 4);
check_integer_lanes!(test_u32x4, u32, 4);
check_integer_lanes!(test_i64x2, i64, 2);
check_integer_lanes!(test_u64x2, u64, 2);
check_integer_lanes!(test_i16x16, i16, 16);
check_integer_lanes!(test_u8x8, u8, 8);

macro_rules! check_widening {
    ($name:ident, $t:ty, $n:literal, $w:ty, $h:literal) => {
        #[test]
        fn $name() {
            let inputs = int_inputs::<$t, $n>();
            for (k, &a) in inputs.iter().enumerate() {
                let b = inputs[(k * 5 + 1) % inputs.len()];
                let (na, nb) = (native(a), native(b));
                assert_eq!(
                    DefaultBackend::mul_widened(na, nb).to_array(),
                    Simulated::mul_widened(a, b).to_array()
                );
                assert_eq!(
                    DefaultBackend::reduce_add::<$t, $w, $n, $h>(na).to_array(),
                    Simulated::reduce_add::<$t, $w, $n, $h>(a).to_array()
                );
            }
        }
    };
}

check_widening!(test_widening_i8x8, i8, 8, i16, 4);
check_widening!(test_widening_u8x8, u8, 8, u16, 4);
check_widening!(test_widening_i16x4, i16, 4, i32, 2);
check_widening!(test_widening_u16x4, u16, 4, u32, 2);
check_widening!(test_widening_i32x2, i32, 2, i64, 1);
check_widening!(test_widening_u32x2, u32, 2, u64, 1);

#[test]
fn test_native_reductions() {
    let inputs = int_inputs::<i16, 8>();
    for &a in &inputs {
        assert_eq!(
            DefaultBackend::reduce_add::<i16, i32, 8, 4>(native(a)).to_array(),
            Simulated::reduce_add::<i16, i32, 8, 4>(a).to_array()
        );
        let acc = Simd::<i32, 4, Simulated>::from_fn(|i| a[i] as i32 * 1000);
        assert_eq!(
            DefaultBackend::mul_sum(native(a), native(a), native(acc)).to_array(),
            Simulated::mul_sum(a, a, acc).to_array()
        );
    }
    for &a in &int_inputs::<u8, 16>() {
        assert_eq!(
            DefaultBackend::reduce_add::<u8, u64, 16, 2>(native(a)).to_array(),
            Simulated::reduce_add::<u8, u64, 16, 2>(a).to_array()
        );
        assert_eq!(
            DefaultBackend::reduce_add::<u8, u16, 16, 8>(native(a)).to_array(),
            Simulated::reduce_add::<u8, u16, 16, 8>(a).to_array()
        );
        let b: Simd<i8, 16, Simulated> = a.bit_cast::<i8, 16>().map(|x| x.wrapping_neg());
        assert_eq!(
            DefaultBackend::maddubs::<16, 8>(native(a), native(b)).to_array(),
            Simulated::maddubs::<16, 8>(a, b).to_array()
        );
    }
}

fn float_inputs<const N: usize>() -> Vec<Simd<f32, N, Simulated>> {
    let specials: Vec<f32> = float_specials().into_iter().map(|x| x as f32).collect();
    let mut inputs: Vec<_> = (0..specials.len()).map(|k| cycle(&specials, k)).collect();
    let mut rng = rng();
    inputs.extend((0..RANDOM_ROUNDS).map(|_| random_vector(&mut rng)));
    inputs
}

#[test]
fn test_float_exact_primitives() {
    let inputs = float_inputs::<4>();
    for (k, &a) in inputs.iter().enumerate() {
        let b = inputs[(k * 3 + 2) % inputs.len()];
        let (na, nb) = (native(a), native(b));
        assert_eq!(DefaultBackend::abs(na).to_array(), Simulated::abs(a).to_array());
        assert_eq!(DefaultBackend::min(na, nb).to_array(), Simulated::min(a, b).to_array());
        assert_eq!(DefaultBackend::max(na, nb).to_array(), Simulated::max(a, b).to_array());
        assert_eq!(DefaultBackend::round(na).to_array(), Simulated::round(a).to_array());
        assert_eq!(
            DefaultBackend::round_to_integer(na).to_array(),
            Simulated::round_to_integer(a).to_array()
        );
        assert_eq!(DefaultBackend::movemask(na), Simulated::movemask(a));
    }
}

#[test]
fn test_float_estimates_within_tolerance() {
    let mut rng = rng();
    for _ in 0..RANDOM_ROUNDS {
        let a = random_vector::<f32, 4>(&mut rng).map(|x| x.abs().max(1e-3));
        let na = native(a);
        let checks = [
            (
                Primitive::ReciprocalEstimate,
                DefaultBackend::reciprocal_estimate(na).to_array(),
                Simulated::reciprocal_estimate(a).to_array(),
            ),
            (
                Primitive::Sqrt,
                DefaultBackend::sqrt(na).to_array(),
                Simulated::sqrt(a).to_array(),
            ),
            (
                Primitive::ReciprocalSqrtEstimate,
                DefaultBackend::reciprocal_sqrt_estimate(na).to_array(),
                Simulated::reciprocal_sqrt_estimate(a).to_array(),
            ),
        ];
        for (primitive, got, want) in checks {
            let tolerance = DefaultBackend::tolerance(primitive);
            for i in 0..4 {
                let err = ((got[i] - want[i]) / want[i]).abs() as f64;
                assert!(
                    err <= tolerance,
                    "{primitive}: lane {i} got {} want {} (err {err:e})",
                    got[i],
                    want[i]
                );
            }
        }
    }
}

#[test]
fn test_aligned_load_matches_unaligned() {
    #[repr(align(64))]
    struct Aligned([i32; 20]);

    let buf = Aligned(std::array::from_fn(|i| i as i32 * 3 - 7));
    for offset in 0..4 {
        let src = &buf.0[offset..];
        let via_backend: Native<i32, 4> = DefaultBackend::load_aligned(src);
        assert_eq!(via_backend.to_array(), Simulated::load_aligned::<i32, 4>(src).to_array());
    }
    assert!(Native::<i32, 4>::load_aligned_checked(&buf.0).is_ok());
}
