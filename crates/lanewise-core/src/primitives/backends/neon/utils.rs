//! Register conversions shared by the NEON overrides

use std::arch::aarch64::*;
use std::mem::size_of;

use crate::element::Element;
use crate::primitives::backends::neon::Neon;
use crate::simd::Simd;

/// `to(&[T; N]) -> reg` / `from(reg, &mut [T; N])` for one register type
macro_rules! register_io {
    ($($reg:ty, $elem:ty, $bytes:literal: $to:ident = $ld:ident, $from:ident = $st:ident;)*) => {
        $(
            /// # Safety
            ///
            #[doc = concat!("`size_of::<[T; N]>()` must be ", stringify!($bytes), ".")]
            #[inline]
            pub unsafe fn $to<T: Copy, const N: usize>(lanes: &[T; N]) -> $reg {
                debug_assert_eq!(size_of::<[T; N]>(), $bytes);
                $ld(lanes.as_ptr() as *const $elem)
            }

            /// # Safety
            ///
            #[doc = concat!("`size_of::<[T; N]>()` must be ", stringify!($bytes), ".")]
            #[inline]
            pub unsafe fn $from<T: Copy, const N: usize>(reg: $reg, lanes: &mut [T; N]) {
                debug_assert_eq!(size_of::<[T; N]>(), $bytes);
                $st(lanes.as_mut_ptr() as *mut $elem, reg)
            }
        )*
    };
}

register_io! {
    int8x16_t, i8, 16: to_s8 = vld1q_s8, from_s8 = vst1q_s8;
    uint8x16_t, u8, 16: to_u8 = vld1q_u8, from_u8 = vst1q_u8;
    int16x8_t, i16, 16: to_s16 = vld1q_s16, from_s16 = vst1q_s16;
    uint16x8_t, u16, 16: to_u16 = vld1q_u16, from_u16 = vst1q_u16;
    int32x4_t, i32, 16: to_s32 = vld1q_s32, from_s32 = vst1q_s32;
    uint32x4_t, u32, 16: to_u32 = vld1q_u32, from_u32 = vst1q_u32;
    int64x2_t, i64, 16: to_s64 = vld1q_s64, from_s64 = vst1q_s64;
    uint64x2_t, u64, 16: to_u64 = vld1q_u64, from_u64 = vst1q_u64;
    float32x4_t, f32, 16: to_f32 = vld1q_f32, from_f32 = vst1q_f32;
    float64x2_t, f64, 16: to_f64 = vld1q_f64, from_f64 = vst1q_f64;
    int8x8_t, i8, 8: to_s8_half = vld1_s8, from_s8_half = vst1_s8;
    uint8x8_t, u8, 8: to_u8_half = vld1_u8, from_u8_half = vst1_u8;
    int16x4_t, i16, 8: to_s16_half = vld1_s16, from_s16_half = vst1_s16;
    uint16x4_t, u16, 8: to_u16_half = vld1_u16, from_u16_half = vst1_u16;
    int32x2_t, i32, 8: to_s32_half = vld1_s32, from_s32_half = vst1_s32;
    uint32x2_t, u32, 8: to_u32_half = vld1_u32, from_u32_half = vst1_u32;
}

/// Build a vector from a register through `store`
///
/// # Safety
///
/// `store` must write exactly `size_of::<[U; M]>()` bytes.
#[inline]
pub unsafe fn collect<U: Element, const M: usize>(store: impl FnOnce(&mut [U; M])) -> Simd<U, M, Neon> {
    let mut out = [U::default(); M];
    store(&mut out);
    Simd::from_array(out)
}
