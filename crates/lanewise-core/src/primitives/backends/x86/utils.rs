//! Register conversions shared by the x86 overrides
//!
//! Every function here moves raw bytes between a lane array and a register
//! with unaligned loads and stores. Callers guarantee the byte counts match.

use std::arch::x86_64::*;
use std::mem::size_of;

use crate::element::Element;
use crate::primitives::backends::x86::X86;
use crate::simd::Simd;

// =============================================================================
// Array <-> register
// =============================================================================

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn to_m128i<T: Copy, const N: usize>(lanes: &[T; N]) -> __m128i {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_loadu_si128(lanes.as_ptr() as *const __m128i)
}

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn from_m128i<T: Copy, const N: usize>(reg: __m128i, lanes: &mut [T; N]) {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, reg)
}

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn to_m128<T: Copy, const N: usize>(lanes: &[T; N]) -> __m128 {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_loadu_ps(lanes.as_ptr() as *const f32)
}

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn from_m128<T: Copy, const N: usize>(reg: __m128, lanes: &mut [T; N]) {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_storeu_ps(lanes.as_mut_ptr() as *mut f32, reg)
}

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn to_m128d<T: Copy, const N: usize>(lanes: &[T; N]) -> __m128d {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_loadu_pd(lanes.as_ptr() as *const f64)
}

/// # Safety
///
/// `size_of::<[T; N]>()` must be 16.
#[inline]
pub unsafe fn from_m128d<T: Copy, const N: usize>(reg: __m128d, lanes: &mut [T; N]) {
    debug_assert_eq!(size_of::<[T; N]>(), 16);
    _mm_storeu_pd(lanes.as_mut_ptr() as *mut f64, reg)
}

/// Low 8 bytes of the register hold the lanes, the high half is zero
///
/// # Safety
///
/// `size_of::<[T; N]>()` must be 8.
#[inline]
pub unsafe fn to_m128i_low<T: Copy, const N: usize>(lanes: &[T; N]) -> __m128i {
    debug_assert_eq!(size_of::<[T; N]>(), 8);
    _mm_loadl_epi64(lanes.as_ptr() as *const __m128i)
}

#[cfg(all(feature = "avx2", target_feature = "avx2"))]
pub use self::wide::*;

#[cfg(all(feature = "avx2", target_feature = "avx2"))]
mod wide {
    use super::*;

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn to_m256i<T: Copy, const N: usize>(lanes: &[T; N]) -> __m256i {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_loadu_si256(lanes.as_ptr() as *const __m256i)
    }

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn from_m256i<T: Copy, const N: usize>(reg: __m256i, lanes: &mut [T; N]) {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, reg)
    }

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn to_m256<T: Copy, const N: usize>(lanes: &[T; N]) -> __m256 {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_loadu_ps(lanes.as_ptr() as *const f32)
    }

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn from_m256<T: Copy, const N: usize>(reg: __m256, lanes: &mut [T; N]) {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_storeu_ps(lanes.as_mut_ptr() as *mut f32, reg)
    }

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn to_m256d<T: Copy, const N: usize>(lanes: &[T; N]) -> __m256d {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_loadu_pd(lanes.as_ptr() as *const f64)
    }

    /// # Safety
    ///
    /// `size_of::<[T; N]>()` must be 32.
    #[inline]
    pub unsafe fn from_m256d<T: Copy, const N: usize>(reg: __m256d, lanes: &mut [T; N]) {
        debug_assert_eq!(size_of::<[T; N]>(), 32);
        _mm256_storeu_pd(lanes.as_mut_ptr() as *mut f64, reg)
    }
}

// =============================================================================
// Simd <-> register
// =============================================================================

/// # Safety
///
/// `size_of::<[U; M]>()` must be 16.
#[inline]
pub unsafe fn simd_from_m128i<U: Element, const M: usize>(reg: __m128i) -> Simd<U, M, X86> {
    let mut out = [U::default(); M];
    from_m128i(reg, &mut out);
    Simd::from_array(out)
}

/// # Safety
///
/// `size_of::<[U; M]>()` must be 16.
#[inline]
pub unsafe fn simd_from_m128<U: Element, const M: usize>(reg: __m128) -> Simd<U, M, X86> {
    let mut out = [U::default(); M];
    from_m128(reg, &mut out);
    Simd::from_array(out)
}

/// # Safety
///
/// `size_of::<[U; M]>()` must be 16.
#[inline]
pub unsafe fn simd_from_m128d<U: Element, const M: usize>(reg: __m128d) -> Simd<U, M, X86> {
    let mut out = [U::default(); M];
    from_m128d(reg, &mut out);
    Simd::from_array(out)
}

/// Apply a one-register integer operation
///
/// # Safety
///
/// Both `[T; N]` and `[U; M]` must be 16 bytes.
#[inline]
pub unsafe fn map_si128<T: Element, U: Element, const N: usize, const M: usize>(
    v: Simd<T, N, X86>,
    op: impl FnOnce(__m128i) -> __m128i,
) -> Simd<U, M, X86> {
    simd_from_m128i(op(to_m128i(v.as_array())))
}

/// Apply a two-register integer operation
///
/// # Safety
///
/// Both `[T; N]` and `[U; M]` must be 16 bytes.
#[inline]
pub unsafe fn zip_si128<T: Element, U: Element, const N: usize, const M: usize>(
    lhs: Simd<T, N, X86>,
    rhs: Simd<T, N, X86>,
    op: impl FnOnce(__m128i, __m128i) -> __m128i,
) -> Simd<U, M, X86> {
    simd_from_m128i(op(to_m128i(lhs.as_array()), to_m128i(rhs.as_array())))
}

/// # Safety
///
/// `[T; N]` must be 16 bytes.
#[inline]
pub unsafe fn map_ps<T: Element, const N: usize>(
    v: Simd<T, N, X86>,
    op: impl FnOnce(__m128) -> __m128,
) -> Simd<T, N, X86> {
    simd_from_m128(op(to_m128(v.as_array())))
}

/// # Safety
///
/// `[T; N]` must be 16 bytes.
#[inline]
pub unsafe fn zip_ps<T: Element, const N: usize>(
    lhs: Simd<T, N, X86>,
    rhs: Simd<T, N, X86>,
    op: impl FnOnce(__m128, __m128) -> __m128,
) -> Simd<T, N, X86> {
    simd_from_m128(op(to_m128(lhs.as_array()), to_m128(rhs.as_array())))
}

/// # Safety
///
/// `[T; N]` must be 16 bytes.
#[inline]
pub unsafe fn map_pd<T: Element, const N: usize>(
    v: Simd<T, N, X86>,
    op: impl FnOnce(__m128d) -> __m128d,
) -> Simd<T, N, X86> {
    simd_from_m128d(op(to_m128d(v.as_array())))
}

/// # Safety
///
/// `[T; N]` must be 16 bytes.
#[inline]
pub unsafe fn zip_pd<T: Element, const N: usize>(
    lhs: Simd<T, N, X86>,
    rhs: Simd<T, N, X86>,
    op: impl FnOnce(__m128d, __m128d) -> __m128d,
) -> Simd<T, N, X86> {
    simd_from_m128d(op(to_m128d(lhs.as_array()), to_m128d(rhs.as_array())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m128i_roundtrip() {
        let lanes: [i16; 8] = [1, -2, 3, -4, 5, -6, 7, -8];
        let mut back = [0i16; 8];
        unsafe { from_m128i(to_m128i(&lanes), &mut back) };
        assert_eq!(back, lanes);
    }

    #[test]
    fn test_low_half_is_zero_extended() {
        let lanes: [u16; 4] = [1, 2, 3, 4];
        let mut back = [0xffffu16; 8];
        unsafe { from_m128i(to_m128i_low(&lanes), &mut back) };
        assert_eq!(back, [1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn test_map_ps_keeps_bits() {
        let v = Simd::<f32, 4, X86>::from_array([1.0, -0.0, f32::INFINITY, 2.5]);
        let r = unsafe { map_ps(v, |a| a) };
        assert_eq!(r.to_array().map(f32::to_bits), v.to_array().map(f32::to_bits));
    }
}
