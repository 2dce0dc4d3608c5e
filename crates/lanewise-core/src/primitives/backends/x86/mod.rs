//! x86_64 backend
//!
//! SSE2 is the baseline and always available on x86_64. SSSE3 and SSE4.1
//! overrides are compiled in only when the build enables those target
//! features (`-C target-feature=+sse4.1` or a matching `target-cpu`); there
//! is no runtime detection. The `avx2` cargo feature, together with the
//! `avx2` target feature, adds 256-bit native layouts.
//!
//! Each override matches on `(T::KIND, N)`. Only full 128-bit vectors (or the
//! 64-bit half-register inputs of `mul_widened`) take a native path, every
//! other shape falls through to the oracle.

mod utils;

use std::arch::x86_64::*;
use std::mem::size_of;

use num_traits::AsPrimitive;

use crate::abi::is_aligned;
use crate::algebra::{self, Rescale, Widened};
use crate::element::{Element, ElementKind, FloatElement, IntElement};
use crate::native::native_layout_table;
use crate::primitives::{oracle, Backend, Primitive};
use crate::simd::Simd;

use self::utils::*;

/// x86_64 SSE backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct X86;

/// Widest vector of `T` in one native register
#[cfg(not(all(feature = "avx2", target_feature = "avx2")))]
pub type NativeSimd<T> = algebra::Simd128<T, X86>;

/// Widest vector of `T` in one native register
#[cfg(all(feature = "avx2", target_feature = "avx2"))]
pub type NativeSimd<T> = algebra::Simd256<T, X86>;

pub type Simd128<T> = algebra::Simd128<T, X86>;

pub type Simd64<T> = algebra::Simd64<T, X86>;

// rcpps / rsqrtps: |relative error| <= 1.5 * 2^-12
const ESTIMATE_TOLERANCE: f64 = 1.5 / 4096.0;

impl Backend for X86 {
    const NAME: &'static str = "x86";
    const REGISTER_BYTES: usize = 16;
    const ALIGNMENT: usize = 16;

    fn tolerance(primitive: Primitive) -> f64 {
        match primitive {
            Primitive::ReciprocalEstimate | Primitive::ReciprocalSqrtEstimate => ESTIMATE_TOLERANCE,
            _ => 0.0,
        }
    }

    #[inline]
    fn load_aligned<T: Element, const N: usize>(src: &[T]) -> Simd<T, N, Self> {
        let src = &src[..N];
        if size_of::<[T; N]>() == 16 && is_aligned(src.as_ptr(), 16) {
            // SAFETY: 16 readable bytes at a 16-byte aligned address
            unsafe { simd_from_m128i(_mm_load_si128(src.as_ptr() as *const __m128i)) }
        } else {
            oracle::load(src)
        }
    }

    #[inline]
    fn abs<T: Element, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        // SAFETY (all arms): the pattern fixes the vector at 16 bytes
        match (T::KIND, N) {
            #[cfg(target_feature = "ssse3")]
            (ElementKind::I8, 16) => unsafe { map_si128(v, |a| _mm_abs_epi8(a)) },
            #[cfg(target_feature = "ssse3")]
            (ElementKind::I16, 8) => unsafe { map_si128(v, |a| _mm_abs_epi16(a)) },
            #[cfg(target_feature = "ssse3")]
            (ElementKind::I32, 4) => unsafe { map_si128(v, |a| _mm_abs_epi32(a)) },
            (ElementKind::F32, 4) => unsafe { map_ps(v, |a| _mm_andnot_ps(_mm_set1_ps(-0.0), a)) },
            (ElementKind::F64, 2) => unsafe { map_pd(v, |a| _mm_andnot_pd(_mm_set1_pd(-0.0), a)) },
            _ => oracle::abs(v),
        }
    }

    #[inline]
    fn min<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::U8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epu8(a, b)) },
            (ElementKind::I16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epi16(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::I8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epi8(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::U16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epu16(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::I32, 4) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epi32(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::U32, 4) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_min_epu32(a, b)) },
            // minps returns the second operand when either is NaN, as the oracle does
            (ElementKind::F32, 4) => unsafe { zip_ps(lhs, rhs, |a, b| _mm_min_ps(a, b)) },
            (ElementKind::F64, 2) => unsafe { zip_pd(lhs, rhs, |a, b| _mm_min_pd(a, b)) },
            _ => oracle::min(lhs, rhs),
        }
    }

    #[inline]
    fn max<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::U8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epu8(a, b)) },
            (ElementKind::I16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epi16(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::I8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epi8(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::U16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epu16(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::I32, 4) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epi32(a, b)) },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::U32, 4) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_max_epu32(a, b)) },
            (ElementKind::F32, 4) => unsafe { zip_ps(lhs, rhs, |a, b| _mm_max_ps(a, b)) },
            (ElementKind::F64, 2) => unsafe { zip_pd(lhs, rhs, |a, b| _mm_max_pd(a, b)) },
            _ => oracle::max(lhs, rhs),
        }
    }

    #[inline]
    fn round<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::F32, 4) => unsafe {
                map_ps(v, |a| {
                    _mm_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(a)
                })
            },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::F64, 2) => unsafe {
                map_pd(v, |a| {
                    _mm_round_pd::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(a)
                })
            },
            _ => oracle::round(v),
        }
    }

    #[inline]
    fn reciprocal_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => unsafe { map_ps(v, |a| _mm_rcp_ps(a)) },
            _ => oracle::reciprocal_estimate(v),
        }
    }

    #[inline]
    fn sqrt<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => unsafe { map_ps(v, |a| _mm_sqrt_ps(a)) },
            (ElementKind::F64, 2) => unsafe { map_pd(v, |a| _mm_sqrt_pd(a)) },
            _ => oracle::sqrt(v),
        }
    }

    #[inline]
    fn reciprocal_sqrt_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => unsafe { map_ps(v, |a| _mm_rsqrt_ps(a)) },
            _ => oracle::reciprocal_sqrt_estimate(v),
        }
    }

    #[inline]
    fn add_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_adds_epi8(a, b)) },
            (ElementKind::U8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_adds_epu8(a, b)) },
            (ElementKind::I16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_adds_epi16(a, b)) },
            (ElementKind::U16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_adds_epu16(a, b)) },
            _ => oracle::add_saturated(lhs, rhs),
        }
    }

    #[inline]
    fn sub_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_subs_epi8(a, b)) },
            (ElementKind::U8, 16) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_subs_epu8(a, b)) },
            (ElementKind::I16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_subs_epi16(a, b)) },
            (ElementKind::U16, 8) => unsafe { zip_si128(lhs, rhs, |a, b| _mm_subs_epu16(a, b)) },
            _ => oracle::sub_saturated(lhs, rhs),
        }
    }

    #[inline]
    fn round_to_integer<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T::Int, N, Self> {
        match (T::KIND, N) {
            // cvtps2dq rounds with MXCSR, nearest-even unless the caller changed it.
            // Overflow yields i32::MIN; flip positive overflow lanes to i32::MAX.
            (ElementKind::F32, 4) => unsafe {
                let x = to_m128(v.as_array());
                let overflow = _mm_castps_si128(_mm_cmpge_ps(x, _mm_set1_ps(2_147_483_648.0)));
                simd_from_m128i(_mm_xor_si128(_mm_cvtps_epi32(x), overflow))
            },
            _ => oracle::round_to_integer(v),
        }
    }

    #[inline]
    fn reduce_add<T, D, const N: usize, const M: usize>(v: Simd<T, N, Self>) -> Simd<D, M, Self>
    where
        T: Element + AsPrimitive<D>,
        D: Element,
    {
        match (T::KIND, D::KIND, N, M) {
            (ElementKind::I16, ElementKind::I32, 8, 4) => unsafe {
                map_si128(v, |a| _mm_madd_epi16(a, _mm_set1_epi16(1)))
            },
            (ElementKind::U8, ElementKind::U64, 16, 2) => unsafe {
                map_si128(v, |a| _mm_sad_epu8(a, _mm_setzero_si128()))
            },
            #[cfg(target_feature = "ssse3")]
            (ElementKind::U8, ElementKind::U16, 16, 8) => unsafe {
                map_si128(v, |a| _mm_maddubs_epi16(a, _mm_set1_epi8(1)))
            },
            _ => oracle::reduce_add(v),
        }
    }

    #[inline]
    fn mul_widened<T: Rescale<2, 1>, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<Widened<T>, N, Self> {
        // SAFETY (all arms): 8-byte inputs, 16-byte outputs
        match (T::KIND, N) {
            (ElementKind::I16, 4) => unsafe {
                let a = to_m128i_low(lhs.as_array());
                let b = to_m128i_low(rhs.as_array());
                simd_from_m128i(_mm_unpacklo_epi16(_mm_mullo_epi16(a, b), _mm_mulhi_epi16(a, b)))
            },
            (ElementKind::U16, 4) => unsafe {
                let a = to_m128i_low(lhs.as_array());
                let b = to_m128i_low(rhs.as_array());
                simd_from_m128i(_mm_unpacklo_epi16(_mm_mullo_epi16(a, b), _mm_mulhi_epu16(a, b)))
            },
            (ElementKind::U32, 2) => unsafe {
                // lanes 0 and 1 moved to the even slots pmuludq reads
                let a = _mm_shuffle_epi32::<0b01_01_00_00>(to_m128i_low(lhs.as_array()));
                let b = _mm_shuffle_epi32::<0b01_01_00_00>(to_m128i_low(rhs.as_array()));
                simd_from_m128i(_mm_mul_epu32(a, b))
            },
            #[cfg(target_feature = "sse4.1")]
            (ElementKind::I32, 2) => unsafe {
                let a = _mm_shuffle_epi32::<0b01_01_00_00>(to_m128i_low(lhs.as_array()));
                let b = _mm_shuffle_epi32::<0b01_01_00_00>(to_m128i_low(rhs.as_array()));
                simd_from_m128i(_mm_mul_epi32(a, b))
            },
            _ => oracle::mul_widened(lhs, rhs),
        }
    }

    #[inline]
    fn mul_sum<T, D, const N: usize, const M: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
        acc: Simd<D, M, Self>,
    ) -> Simd<D, M, Self>
    where
        T: Rescale<2, 1>,
        Widened<T>: AsPrimitive<D>,
        D: Element,
    {
        match (T::KIND, D::KIND, N, M) {
            // pmaddwd wraps only for MIN * MIN + MIN * MIN, as i32 addition would
            (ElementKind::I16, ElementKind::I32, 8, 4) => unsafe {
                let products = _mm_madd_epi16(to_m128i(lhs.as_array()), to_m128i(rhs.as_array()));
                simd_from_m128i(_mm_add_epi32(to_m128i(acc.as_array()), products))
            },
            _ => oracle::mul_sum(lhs, rhs, acc),
        }
    }

    #[inline]
    fn movemask<T: Element, const N: usize>(v: Simd<T, N, Self>) -> u64 {
        match (T::KIND.size(), N) {
            (1, 16) => unsafe { _mm_movemask_epi8(to_m128i(v.as_array())) as u32 as u64 },
            (2, 8) => unsafe {
                // signed saturation keeps each lane's sign in its byte
                let packed = _mm_packs_epi16(to_m128i(v.as_array()), _mm_setzero_si128());
                (_mm_movemask_epi8(packed) as u32 & 0xff) as u64
            },
            (4, 4) => unsafe { _mm_movemask_ps(to_m128(v.as_array())) as u32 as u64 },
            (8, 2) => unsafe { _mm_movemask_pd(to_m128d(v.as_array())) as u32 as u64 },
            _ => oracle::movemask(v),
        }
    }

    #[inline]
    fn maddubs<const N: usize, const M: usize>(
        lhs: Simd<u8, N, Self>,
        rhs: Simd<i8, N, Self>,
    ) -> Simd<i16, M, Self> {
        match (N, M) {
            #[cfg(target_feature = "ssse3")]
            (16, 8) => unsafe { maddubs_ssse3(lhs, rhs) },
            _ => oracle::maddubs(lhs, rhs),
        }
    }
}

/// # Safety
///
/// `N` must be 16 and `M` must be 8.
#[cfg(target_feature = "ssse3")]
#[inline]
unsafe fn maddubs_ssse3<const N: usize, const M: usize>(
    lhs: Simd<u8, N, X86>,
    rhs: Simd<i8, N, X86>,
) -> Simd<i16, M, X86> {
    simd_from_m128i(_mm_maddubs_epi16(
        to_m128i(lhs.as_array()),
        to_m128i(rhs.as_array()),
    ))
}

// =============================================================================
// Native layouts
// =============================================================================

native_layout_table! {
    X86 {
        __m128i, to: to_m128i, from: from_m128i => [
            (i8; 16), (u8; 16), (i16; 8), (u16; 8), (i32; 4), (u32; 4), (i64; 2), (u64; 2),
        ];
        __m128, to: to_m128, from: from_m128 => [(f32; 4)];
        __m128d, to: to_m128d, from: from_m128d => [(f64; 2)];
    }
}

#[cfg(all(feature = "avx2", target_feature = "avx2"))]
native_layout_table! {
    X86 {
        __m256i, to: to_m256i, from: from_m256i => [
            (i8; 32), (u8; 32), (i16; 16), (u16; 16), (i32; 8), (u32; 8), (i64; 4), (u64; 4),
        ];
        __m256, to: to_m256, from: from_m256 => [(f32; 8)];
        __m256d, to: to_m256d, from: from_m256d => [(f64; 4)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Simulated;

    fn via_oracle<T: Element, const N: usize>(v: Simd<T, N, X86>) -> Simd<T, N, Simulated> {
        v.with_backend()
    }

    #[test]
    fn test_saturating_matches_oracle() {
        let a = Simd::<i8, 16, X86>::from_fn(|i| (i as i8).wrapping_mul(37));
        let b = Simd::<i8, 16, X86>::from_fn(|i| (120 - i as i16 * 15) as i8);
        assert_eq!(
            X86::add_saturated(a, b).to_array(),
            Simulated::add_saturated(via_oracle(a), via_oracle(b)).to_array()
        );
        assert_eq!(
            X86::sub_saturated(a, b).to_array(),
            Simulated::sub_saturated(via_oracle(a), via_oracle(b)).to_array()
        );
    }

    #[test]
    fn test_min_max_f32_nan_semantics() {
        let a = Simd::<f32, 4, X86>::from_array([f32::NAN, 1.0, 0.0, -2.0]);
        let b = Simd::<f32, 4, X86>::from_array([3.0, f32::NAN, -0.0, 5.0]);
        let lo = X86::min(a, b).to_array().map(f32::to_bits);
        let expected = Simulated::min(via_oracle(a), via_oracle(b)).to_array().map(f32::to_bits);
        assert_eq!(lo, expected);
    }

    #[test]
    fn test_mul_sum_native_path() {
        let v = Simd::<i16, 8, X86>::from_fn(|i| i as i16);
        let acc = Simd::<i32, 4, X86>::from_array([0, 1, 2, 3]);
        assert_eq!(X86::mul_sum(v, v, acc), [1, 14, 43, 88]);

        let m = Simd::<i16, 8, X86>::splat(i16::MIN);
        let zero = Simd::<i32, 4, X86>::splat(0);
        let oracle = Simulated::mul_sum(via_oracle(m), via_oracle(m), zero.with_backend());
        assert_eq!(X86::mul_sum(m, m, zero).to_array(), oracle.to_array());
    }

    #[test]
    fn test_reduce_add_native_paths() {
        let v = Simd::<i16, 8, X86>::from_fn(|i| i as i16 * 1000 - 3000);
        let r: Simd<i32, 4, X86> = X86::reduce_add(v);
        let o: Simd<i32, 4, Simulated> = Simulated::reduce_add(via_oracle(v));
        assert_eq!(r.to_array(), o.to_array());

        let bytes = Simd::<u8, 16, X86>::from_fn(|i| 250 - i as u8);
        let r: Simd<u64, 2, X86> = X86::reduce_add(bytes);
        let o: Simd<u64, 2, Simulated> = Simulated::reduce_add(via_oracle(bytes));
        assert_eq!(r.to_array(), o.to_array());
    }

    #[test]
    fn test_mul_widened_native_paths() {
        let a = Simd::<i16, 4, X86>::from_array([i16::MIN, -1, 300, i16::MAX]);
        let b = Simd::<i16, 4, X86>::from_array([i16::MIN, 7, -300, 2]);
        assert_eq!(
            X86::mul_widened(a, b).to_array(),
            Simulated::mul_widened(via_oracle(a), via_oracle(b)).to_array()
        );

        let a = Simd::<u32, 2, X86>::from_array([u32::MAX, 3]);
        let b = Simd::<u32, 2, X86>::from_array([u32::MAX, 5]);
        assert_eq!(X86::mul_widened(a, b), [u64::from(u32::MAX) * u64::from(u32::MAX), 15]);
    }

    #[test]
    fn test_movemask_every_width() {
        let v = Simd::<i8, 16, X86>::from_fn(|i| if i % 3 == 0 { -1 } else { 1 });
        assert_eq!(X86::movemask(v), Simulated::movemask(via_oracle(v)));
        let v = Simd::<u16, 8, X86>::from_fn(|i| if i % 2 == 0 { 0x8000 } else { 0x7fff });
        assert_eq!(X86::movemask(v), 0b0101_0101);
        let v = Simd::<f32, 4, X86>::from_array([-0.0, 0.0, -1.0, 1.0]);
        assert_eq!(X86::movemask(v), 0b0101);
        let v = Simd::<i64, 2, X86>::from_array([1, -1]);
        assert_eq!(X86::movemask(v), 0b10);
    }

    #[test]
    fn test_round_to_integer_in_range() {
        let v = Simd::<f32, 4, X86>::from_array([-1.5, 0.5, 2.5, 1e6 + 0.5]);
        assert_eq!(X86::round_to_integer(v), [-2, 0, 2, 1_000_000]);
    }

    #[test]
    fn test_round_to_integer_saturates() {
        let v = Simd::<f32, 4, X86>::from_array([3e9, -3e9, f32::INFINITY, 2_147_483_520.0]);
        let oracle = Simulated::round_to_integer(v.with_backend::<Simulated>());
        assert_eq!(X86::round_to_integer(v).to_array(), oracle.to_array());
        assert_eq!(oracle, [i32::MAX, i32::MIN, i32::MAX, 2_147_483_520]);
    }

    #[test]
    fn test_estimates_within_tolerance() {
        let v = Simd::<f32, 4, X86>::from_array([1.0, 3.0, 0.25, 1234.5]);
        let tol = X86::tolerance(Primitive::ReciprocalEstimate);
        let est = X86::reciprocal_estimate(v);
        let sq = X86::reciprocal_sqrt_estimate(v);
        for i in 0..4 {
            let exact = 1.0 / v[i] as f64;
            assert!(((est[i] as f64 - exact) / exact).abs() <= tol);
            let exact = 1.0 / (v[i] as f64).sqrt();
            assert!(((sq[i] as f64 - exact) / exact).abs() <= tol);
        }
    }

    #[test]
    fn test_load_aligned_falls_back_when_misaligned() {
        #[repr(align(16))]
        struct Buf([u32; 8]);
        let buf = Buf([1, 2, 3, 4, 5, 6, 7, 8]);
        let v: Simd<u32, 4, X86> = X86::load_aligned(&buf.0);
        assert_eq!(v, [1, 2, 3, 4]);
        let v: Simd<u32, 4, X86> = X86::load_aligned(&buf.0[1..]);
        assert_eq!(v, [2, 3, 4, 5]);
    }

    #[test]
    fn test_native_layout_roundtrip() {
        let v = Simd::<u16, 8, X86>::from_fn(|i| i as u16 * 1001);
        let raw: __m128i = v.raw();
        assert_eq!(Simd::<u16, 8, X86>::from_raw(raw), v);

        let f = Simd::<f64, 2, X86>::from_array([1.5, -2.25]);
        let raw: __m128d = f.raw();
        assert_eq!(Simd::<f64, 2, X86>::from_raw(raw), f);
    }
}
