//! Reference oracle: scalar-loop definition of every primitive
//!
//! These functions are the meaning of each primitive. They are the default
//! bodies of [`Backend`](super::Backend) and the baseline that
//! `lanewise-verify` compares overrides against.
//!
//! Integer arithmetic wraps unless the primitive saturates by name. Float
//! arithmetic is plain IEEE-754 on the lane type.

use num_traits::{AsPrimitive, Saturating};

use crate::algebra::{Rescale, Widened};
use crate::element::{Element, FloatElement, IntElement};
use crate::primitives::Backend;
use crate::simd::Simd;

/// First `N` elements of `src`
///
/// # Panics
///
/// Panics if `src` has fewer than `N` elements.
#[inline]
pub fn load<T: Element, const N: usize, B: Backend>(src: &[T]) -> Simd<T, N, B> {
    let src = &src[..N];
    Simd::from_fn(|i| src[i])
}

/// `abs` of a signed minimum is the minimum
#[inline]
pub fn abs<T: Element, const N: usize, B: Backend>(v: Simd<T, N, B>) -> Simd<T, N, B> {
    v.map(Element::lane_abs)
}

/// `rhs` unless `lhs < rhs`; a NaN in either lane yields `rhs`
#[inline]
pub fn min<T: Element, const N: usize, B: Backend>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
) -> Simd<T, N, B> {
    lhs.zip_map(rhs, Element::lane_min)
}

/// `rhs` unless `lhs > rhs`; a NaN in either lane yields `rhs`
#[inline]
pub fn max<T: Element, const N: usize, B: Backend>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
) -> Simd<T, N, B> {
    lhs.zip_map(rhs, Element::lane_max)
}

#[inline]
pub fn round<T: FloatElement, const N: usize, B: Backend>(v: Simd<T, N, B>) -> Simd<T, N, B> {
    v.map(FloatElement::round_even)
}

#[inline]
pub fn reciprocal_estimate<T: FloatElement, const N: usize, B: Backend>(
    v: Simd<T, N, B>,
) -> Simd<T, N, B> {
    v.map(|x| T::one() / x)
}

#[inline]
pub fn sqrt<T: FloatElement, const N: usize, B: Backend>(v: Simd<T, N, B>) -> Simd<T, N, B> {
    v.map(num_traits::Float::sqrt)
}

#[inline]
pub fn reciprocal_sqrt_estimate<T: FloatElement, const N: usize, B: Backend>(
    v: Simd<T, N, B>,
) -> Simd<T, N, B> {
    v.map(|x| T::one() / num_traits::Float::sqrt(x))
}

#[inline]
pub fn add_saturated<T: IntElement, const N: usize, B: Backend>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
) -> Simd<T, N, B> {
    lhs.zip_map(rhs, Saturating::saturating_add)
}

#[inline]
pub fn sub_saturated<T: IntElement, const N: usize, B: Backend>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
) -> Simd<T, N, B> {
    lhs.zip_map(rhs, Saturating::saturating_sub)
}

/// Out-of-range values saturate, NaN becomes zero
#[inline]
pub fn round_to_integer<T: FloatElement, const N: usize, B: Backend>(
    v: Simd<T, N, B>,
) -> Simd<T::Int, N, B> {
    v.map(|x| x.round_even().to_int())
}

/// Pairwise tree: each level adds even lane `2i` to odd lane `2i + 1`
/// until `M` lanes remain, so output lane `j` sums inputs
/// `j * N / M .. (j + 1) * N / M`.
pub fn reduce_add<T, D, const N: usize, const M: usize, B>(v: Simd<T, N, B>) -> Simd<D, M, B>
where
    T: Element + AsPrimitive<D>,
    D: Element,
    B: Backend,
{
    const { assert!(M > 0 && M <= N && N % M == 0, "reduce_add: M must divide N") };

    let mut work: [D; N] = std::array::from_fn(|i| v[i].as_());
    let mut len = N;
    while len > M {
        len /= 2;
        for i in 0..len {
            work[i] = work[2 * i].lane_add(work[2 * i + 1]);
        }
    }
    Simd::from_fn(|i| work[i])
}

#[inline]
pub fn mul_widened<T: Rescale<2, 1>, const N: usize, B: Backend>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
) -> Simd<Widened<T>, N, B> {
    lhs.zip_map(rhs, |a, b| a.rescale().lane_mul(b.rescale()))
}

pub fn mul_sum<T, D, const N: usize, const M: usize, B>(
    lhs: Simd<T, N, B>,
    rhs: Simd<T, N, B>,
    acc: Simd<D, M, B>,
) -> Simd<D, M, B>
where
    T: Rescale<2, 1>,
    Widened<T>: AsPrimitive<D>,
    D: Element,
    B: Backend,
{
    const {
        assert!(
            N * std::mem::size_of::<T>() == M * std::mem::size_of::<D>(),
            "mul_sum: inputs and accumulator must have the same byte width"
        )
    };

    let sums: Simd<D, M, B> = reduce_add(mul_widened(lhs, rhs));
    acc.zip_map(sums, Element::lane_add)
}

pub fn movemask<T: Element, const N: usize, B: Backend>(v: Simd<T, N, B>) -> u64 {
    const { assert!(N <= 64, "movemask: at most 64 lanes fit the mask") };

    v.iter()
        .enumerate()
        .fold(0u64, |mask, (i, lane)| mask | ((lane.sign_bit() as u64) << i))
}

pub fn maddubs<const N: usize, const M: usize, B: Backend>(
    lhs: Simd<u8, N, B>,
    rhs: Simd<i8, N, B>,
) -> Simd<i16, M, B> {
    const { assert!(N == 2 * M, "maddubs: output must have half the lanes") };

    Simd::from_fn(|i| {
        let lo = lhs[2 * i] as i16 * rhs[2 * i] as i16;
        let hi = lhs[2 * i + 1] as i16 * rhs[2 * i + 1] as i16;
        lo.saturating_add(hi)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Simulated;

    type S<T, const N: usize> = Simd<T, N, Simulated>;

    #[test]
    fn test_saturating_edges() {
        let r = add_saturated(S::<i8, 4>::splat(120), S::splat(50));
        assert_eq!(r, [127; 4]);
        let r = sub_saturated(S::<u8, 4>::splat(10), S::splat(20));
        assert_eq!(r, [0; 4]);
        let r = add_saturated(S::<i16, 2>::from_array([-32000, 5]), S::from_array([-1000, 5]));
        assert_eq!(r, [i16::MIN, 10]);
    }

    #[test]
    fn test_round_half_to_even() {
        let r = round(S::<f32, 4>::from_array([-1.5, 0.5, 2.5, 3.5]));
        assert_eq!(r, [-2.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_round_to_integer_saturates() {
        let v = S::<f32, 4>::from_array([2.5, f32::NAN, 1e20, -1e20]);
        assert_eq!(round_to_integer(v), [2, 0, i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_min_max_nan_returns_second_operand() {
        let a = S::<f64, 2>::from_array([f64::NAN, 1.0]);
        let b = S::<f64, 2>::from_array([3.0, f64::NAN]);
        let lo = min(a, b);
        assert_eq!(lo[0], 3.0);
        assert!(lo[1].is_nan());
        let hi = max(b, a);
        assert!(hi[0].is_nan());
        assert_eq!(hi[1], 1.0);
    }

    #[test]
    fn test_abs_wraps_at_minimum() {
        let r = abs(S::<i8, 4>::from_array([-128, -5, 0, 7]));
        assert_eq!(r, [-128, 5, 0, 7]);
        let r = abs(S::<f32, 2>::from_array([-0.0, -2.0]));
        assert!(!r[0].is_sign_negative());
        assert_eq!(r[1], 2.0);
    }

    #[test]
    fn test_reduce_add_groups() {
        let v = S::<i32, 4>::from_array([1, 2, 3, 4]);
        let r: S<i64, 2> = reduce_add(v);
        assert_eq!(r, [3, 7]);

        let v = S::<u8, 8>::from_fn(|i| i as u8 + 1);
        let r: S<u32, 2> = reduce_add(v);
        assert_eq!(r, [10, 26]);
        let r: S<u8, 8> = reduce_add(v);
        assert_eq!(r, v);
    }

    #[test]
    fn test_reduce_add_wraps_in_destination() {
        let v = S::<u8, 4>::splat(200);
        let r: S<u8, 1> = reduce_add(v);
        assert_eq!(r, [(800u32 % 256) as u8]);
    }

    #[test]
    fn test_mul_widened_does_not_overflow() {
        let a = S::<i16, 4>::splat(i16::MIN);
        let r = mul_widened(a, a);
        assert_eq!(r, [1_073_741_824i32; 4]);
    }

    #[test]
    fn test_mul_sum_reference_values() {
        let v = S::<i16, 8>::from_fn(|i| i as i16);
        let acc = S::<i32, 4>::from_array([0, 1, 2, 3]);
        assert_eq!(mul_sum(v, v, acc), [1, 14, 43, 88]);
    }

    #[test]
    fn test_movemask() {
        let v = S::<i32, 4>::from_array([-1, 2, -3, 4]);
        assert_eq!(movemask(v), 0b0101);
        let v = S::<f64, 2>::from_array([0.0, -0.0]);
        assert_eq!(movemask(v), 0b10);
    }

    #[test]
    fn test_maddubs_saturates() {
        let a = S::<u8, 4>::from_array([255, 255, 1, 2]);
        let b = S::<i8, 4>::from_array([127, 127, -3, 4]);
        let r: S<i16, 2> = maddubs(a, b);
        assert_eq!(r, [i16::MAX, 5]);
    }

    #[test]
    #[should_panic]
    fn test_load_short_buffer_panics() {
        let _: S<u16, 8> = load(&[1u16, 2, 3]);
    }
}
