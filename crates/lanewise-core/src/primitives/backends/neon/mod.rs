//! aarch64 NEON backend
//!
//! NEON (Advanced SIMD) is mandatory on aarch64, so every override here is
//! unconditional. Vectors of one 128-bit Q register, or one 64-bit D register
//! for `mul_widened` inputs, take the native path.
//!
//! Float `min`/`max` propagate NaN (`fmin`/`fmax`) where the oracle returns
//! the second operand; NaN lanes of those primitives are unspecified.

mod utils;

use std::arch::aarch64::*;

use num_traits::AsPrimitive;

use crate::algebra::{self, Rescale, Widened};
use crate::element::{Element, ElementKind, FloatElement, IntElement};
use crate::native::native_layout_table;
use crate::primitives::{oracle, Backend, Primitive};
use crate::simd::Simd;

use self::utils::*;

/// aarch64 Advanced SIMD backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Neon;

/// Widest vector of `T` in one native register
pub type NativeSimd<T> = algebra::Simd128<T, Neon>;

pub type Simd128<T> = algebra::Simd128<T, Neon>;

pub type Simd64<T> = algebra::Simd64<T, Neon>;

// frecpe / frsqrte: 8-bit estimates
const ESTIMATE_TOLERANCE: f64 = 1.0 / 128.0;

/// One-Q-register unary override
macro_rules! q_unary {
    ($v:expr, $to:ident, $op:ident, $from:ident) => {
        // SAFETY: the enclosing match arm fixes the vector at 16 bytes
        unsafe { collect(|out| $from($op($to($v.as_array())), out)) }
    };
}

/// One-Q-register binary override
macro_rules! q_binary {
    ($lhs:expr, $rhs:expr, $to:ident, $op:ident, $from:ident) => {
        // SAFETY: the enclosing match arm fixes the vector at 16 bytes
        unsafe { collect(|out| $from($op($to($lhs.as_array()), $to($rhs.as_array())), out)) }
    };
}

/// D-register inputs, Q-register output
macro_rules! d_widening {
    ($lhs:expr, $rhs:expr, $to:ident, $op:ident, $from:ident) => {
        // SAFETY: 8-byte inputs, 16-byte output
        unsafe { collect(|out| $from($op($to($lhs.as_array()), $to($rhs.as_array())), out)) }
    };
}

impl Backend for Neon {
    const NAME: &'static str = "neon";
    const REGISTER_BYTES: usize = 16;
    const ALIGNMENT: usize = 16;

    fn tolerance(primitive: Primitive) -> f64 {
        match primitive {
            Primitive::ReciprocalEstimate | Primitive::ReciprocalSqrtEstimate => ESTIMATE_TOLERANCE,
            _ => 0.0,
        }
    }

    #[inline]
    fn abs<T: Element, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => q_unary!(v, to_s8, vabsq_s8, from_s8),
            (ElementKind::I16, 8) => q_unary!(v, to_s16, vabsq_s16, from_s16),
            (ElementKind::I32, 4) => q_unary!(v, to_s32, vabsq_s32, from_s32),
            (ElementKind::I64, 2) => q_unary!(v, to_s64, vabsq_s64, from_s64),
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vabsq_f32, from_f32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vabsq_f64, from_f64),
            _ => oracle::abs(v),
        }
    }

    #[inline]
    fn min<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => q_binary!(lhs, rhs, to_s8, vminq_s8, from_s8),
            (ElementKind::U8, 16) => q_binary!(lhs, rhs, to_u8, vminq_u8, from_u8),
            (ElementKind::I16, 8) => q_binary!(lhs, rhs, to_s16, vminq_s16, from_s16),
            (ElementKind::U16, 8) => q_binary!(lhs, rhs, to_u16, vminq_u16, from_u16),
            (ElementKind::I32, 4) => q_binary!(lhs, rhs, to_s32, vminq_s32, from_s32),
            (ElementKind::U32, 4) => q_binary!(lhs, rhs, to_u32, vminq_u32, from_u32),
            (ElementKind::F32, 4) => q_binary!(lhs, rhs, to_f32, vminq_f32, from_f32),
            (ElementKind::F64, 2) => q_binary!(lhs, rhs, to_f64, vminq_f64, from_f64),
            _ => oracle::min(lhs, rhs),
        }
    }

    #[inline]
    fn max<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => q_binary!(lhs, rhs, to_s8, vmaxq_s8, from_s8),
            (ElementKind::U8, 16) => q_binary!(lhs, rhs, to_u8, vmaxq_u8, from_u8),
            (ElementKind::I16, 8) => q_binary!(lhs, rhs, to_s16, vmaxq_s16, from_s16),
            (ElementKind::U16, 8) => q_binary!(lhs, rhs, to_u16, vmaxq_u16, from_u16),
            (ElementKind::I32, 4) => q_binary!(lhs, rhs, to_s32, vmaxq_s32, from_s32),
            (ElementKind::U32, 4) => q_binary!(lhs, rhs, to_u32, vmaxq_u32, from_u32),
            (ElementKind::F32, 4) => q_binary!(lhs, rhs, to_f32, vmaxq_f32, from_f32),
            (ElementKind::F64, 2) => q_binary!(lhs, rhs, to_f64, vmaxq_f64, from_f64),
            _ => oracle::max(lhs, rhs),
        }
    }

    #[inline]
    fn round<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vrndnq_f32, from_f32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vrndnq_f64, from_f64),
            _ => oracle::round(v),
        }
    }

    #[inline]
    fn reciprocal_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vrecpeq_f32, from_f32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vrecpeq_f64, from_f64),
            _ => oracle::reciprocal_estimate(v),
        }
    }

    #[inline]
    fn sqrt<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vsqrtq_f32, from_f32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vsqrtq_f64, from_f64),
            _ => oracle::sqrt(v),
        }
    }

    #[inline]
    fn reciprocal_sqrt_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vrsqrteq_f32, from_f32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vrsqrteq_f64, from_f64),
            _ => oracle::reciprocal_sqrt_estimate(v),
        }
    }

    #[inline]
    fn add_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => q_binary!(lhs, rhs, to_s8, vqaddq_s8, from_s8),
            (ElementKind::U8, 16) => q_binary!(lhs, rhs, to_u8, vqaddq_u8, from_u8),
            (ElementKind::I16, 8) => q_binary!(lhs, rhs, to_s16, vqaddq_s16, from_s16),
            (ElementKind::U16, 8) => q_binary!(lhs, rhs, to_u16, vqaddq_u16, from_u16),
            (ElementKind::I32, 4) => q_binary!(lhs, rhs, to_s32, vqaddq_s32, from_s32),
            (ElementKind::U32, 4) => q_binary!(lhs, rhs, to_u32, vqaddq_u32, from_u32),
            (ElementKind::I64, 2) => q_binary!(lhs, rhs, to_s64, vqaddq_s64, from_s64),
            (ElementKind::U64, 2) => q_binary!(lhs, rhs, to_u64, vqaddq_u64, from_u64),
            _ => oracle::add_saturated(lhs, rhs),
        }
    }

    #[inline]
    fn sub_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 16) => q_binary!(lhs, rhs, to_s8, vqsubq_s8, from_s8),
            (ElementKind::U8, 16) => q_binary!(lhs, rhs, to_u8, vqsubq_u8, from_u8),
            (ElementKind::I16, 8) => q_binary!(lhs, rhs, to_s16, vqsubq_s16, from_s16),
            (ElementKind::U16, 8) => q_binary!(lhs, rhs, to_u16, vqsubq_u16, from_u16),
            (ElementKind::I32, 4) => q_binary!(lhs, rhs, to_s32, vqsubq_s32, from_s32),
            (ElementKind::U32, 4) => q_binary!(lhs, rhs, to_u32, vqsubq_u32, from_u32),
            (ElementKind::I64, 2) => q_binary!(lhs, rhs, to_s64, vqsubq_s64, from_s64),
            (ElementKind::U64, 2) => q_binary!(lhs, rhs, to_u64, vqsubq_u64, from_u64),
            _ => oracle::sub_saturated(lhs, rhs),
        }
    }

    #[inline]
    fn round_to_integer<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T::Int, N, Self> {
        // fcvtns: nearest-even, saturating, NaN to zero
        match (T::KIND, N) {
            (ElementKind::F32, 4) => q_unary!(v, to_f32, vcvtnq_s32_f32, from_s32),
            (ElementKind::F64, 2) => q_unary!(v, to_f64, vcvtnq_s64_f64, from_s64),
            _ => oracle::round_to_integer(v),
        }
    }

    #[inline]
    fn reduce_add<T, D, const N: usize, const M: usize>(v: Simd<T, N, Self>) -> Simd<D, M, Self>
    where
        T: Element + AsPrimitive<D>,
        D: Element,
    {
        // pairwise add-long: one step of the tree in the doubled width
        match (T::KIND, D::KIND, N, M) {
            (ElementKind::I8, ElementKind::I16, 16, 8) => q_unary!(v, to_s8, vpaddlq_s8, from_s16),
            (ElementKind::U8, ElementKind::U16, 16, 8) => q_unary!(v, to_u8, vpaddlq_u8, from_u16),
            (ElementKind::I16, ElementKind::I32, 8, 4) => q_unary!(v, to_s16, vpaddlq_s16, from_s32),
            (ElementKind::U16, ElementKind::U32, 8, 4) => q_unary!(v, to_u16, vpaddlq_u16, from_u32),
            (ElementKind::I32, ElementKind::I64, 4, 2) => q_unary!(v, to_s32, vpaddlq_s32, from_s64),
            (ElementKind::U32, ElementKind::U64, 4, 2) => q_unary!(v, to_u32, vpaddlq_u32, from_u64),
            _ => oracle::reduce_add(v),
        }
    }

    #[inline]
    fn mul_widened<T: Rescale<2, 1>, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<Widened<T>, N, Self> {
        match (T::KIND, N) {
            (ElementKind::I8, 8) => d_widening!(lhs, rhs, to_s8_half, vmull_s8, from_s16),
            (ElementKind::U8, 8) => d_widening!(lhs, rhs, to_u8_half, vmull_u8, from_u16),
            (ElementKind::I16, 4) => d_widening!(lhs, rhs, to_s16_half, vmull_s16, from_s32),
            (ElementKind::U16, 4) => d_widening!(lhs, rhs, to_u16_half, vmull_u16, from_u32),
            (ElementKind::I32, 2) => d_widening!(lhs, rhs, to_s32_half, vmull_s32, from_s64),
            (ElementKind::U32, 2) => d_widening!(lhs, rhs, to_u32_half, vmull_u32, from_u64),
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
            // SAFETY: i16 x 8 inputs and i32 x 4 accumulator, one Q register each
            (ElementKind::I16, ElementKind::I32, 8, 4) => unsafe {
                let a = to_s16(lhs.as_array());
                let b = to_s16(rhs.as_array());
                let lo = vmull_s16(vget_low_s16(a), vget_low_s16(b));
                let hi = vmull_high_s16(a, b);
                let sums = vaddq_s32(to_s32(acc.as_array()), vpaddq_s32(lo, hi));
                collect(|out| from_s32(sums, out))
            },
            _ => oracle::mul_sum(lhs, rhs, acc),
        }
    }
}

// =============================================================================
// Native layouts
// =============================================================================

native_layout_table! {
    Neon {
        int8x16_t, to: to_s8, from: from_s8 => [(i8; 16)];
        uint8x16_t, to: to_u8, from: from_u8 => [(u8; 16)];
        int16x8_t, to: to_s16, from: from_s16 => [(i16; 8)];
        uint16x8_t, to: to_u16, from: from_u16 => [(u16; 8)];
        int32x4_t, to: to_s32, from: from_s32 => [(i32; 4)];
        uint32x4_t, to: to_u32, from: from_u32 => [(u32; 4)];
        int64x2_t, to: to_s64, from: from_s64 => [(i64; 2)];
        uint64x2_t, to: to_u64, from: from_u64 => [(u64; 2)];
        float32x4_t, to: to_f32, from: from_f32 => [(f32; 4)];
        float64x2_t, to: to_f64, from: from_f64 => [(f64; 2)];
        int8x8_t, to: to_s8_half, from: from_s8_half => [(i8; 8)];
        uint8x8_t, to: to_u8_half, from: from_u8_half => [(u8; 8)];
        int16x4_t, to: to_s16_half, from: from_s16_half => [(i16; 4)];
        uint16x4_t, to: to_u16_half, from: from_u16_half => [(u16; 4)];
        int32x2_t, to: to_s32_half, from: from_s32_half => [(i32; 2)];
        uint32x2_t, to: to_u32_half, from: from_u32_half => [(u32; 2)];
    }
}
