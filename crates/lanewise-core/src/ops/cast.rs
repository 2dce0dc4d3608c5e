//! Conversions between element types and rounding
//!
//! | Operation | Semantics |
//! |-----------|-----------|
//! | [`Simd::cast`] | `as` per lane; float to int saturates, NaN becomes 0 |
//! | [`Simd::convert`] | lossless only, narrowing does not compile |
//! | [`Simd::narrow_saturated`] | clamp to the target range, then convert |
//! | [`Simd::bit_cast`] | same bytes, any shape with equal total size |
//! | [`Simd::reinterpret`] | same bytes, shape taken from [`ReinterpretTo`] |

use std::mem::size_of;

use num_traits::{AsPrimitive, Bounded, Float, NumCast};

use crate::algebra::{Reinterpret, ReinterpretTo, SimdVector};
use crate::element::{Element, FloatElement};
use crate::primitives::Backend;
use crate::simd::Simd;

/// Element-wise `as` cast
#[inline]
pub fn static_simd_cast<U, T, const N: usize, B>(v: Simd<T, N, B>) -> Simd<U, N, B>
where
    T: Element + AsPrimitive<U>,
    U: Element,
    B: Backend,
{
    v.map(AsPrimitive::as_)
}

/// Element-wise lossless conversion
#[inline]
pub fn simd_cast<U, T, const N: usize, B>(v: Simd<T, N, B>) -> Simd<U, N, B>
where
    T: Element,
    U: Element + From<T>,
    B: Backend,
{
    v.map(<U as From<T>>::from)
}

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// Element-wise `as` cast
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<f32, 4, Simulated>::from_array([1.9, -1.9, 1e10, f32::NAN]);
    /// assert_eq!(v.cast::<i16>().to_array(), [1, -1, i16::MAX, 0]);
    /// ```
    #[inline]
    pub fn cast<U: Element>(self) -> Simd<U, N, B>
    where
        T: AsPrimitive<U>,
    {
        static_simd_cast(self)
    }

    /// Element-wise lossless conversion
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<u8, 4, Simulated>::from_array([1, 2, 3, 255]);
    /// assert_eq!(v.convert::<i16>().to_array(), [1, 2, 3, 255]);
    /// ```
    ///
    /// Narrowing is rejected by the type system:
    ///
    /// ```compile_fail
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<i32, 4, Simulated>::splat(1);
    /// let _ = v.convert::<i16>();
    /// ```
    #[inline]
    pub fn convert<U: Element + From<T>>(self) -> Simd<U, N, B> {
        simd_cast(self)
    }

    /// Convert with clamping to the range of `U`
    ///
    /// In-range floats converted to integers truncate toward zero; NaN
    /// becomes zero.
    pub fn narrow_saturated<U: Element>(self) -> Simd<U, N, B> {
        self.map(|x| match <U as NumCast>::from(x) {
            Some(value) => value,
            None if x > T::zero() => <U as Bounded>::max_value(),
            None if x < T::zero() => <U as Bounded>::min_value(),
            None => U::zero(),
        })
    }

    /// Reinterpret the bytes as `M` lanes of `U`
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<f32, 2, Simulated>::from_array([1.0, -0.0]);
    /// let bits = v.bit_cast::<u32, 2>();
    /// assert_eq!(bits.to_array(), [0x3f80_0000, 0x8000_0000]);
    /// assert_eq!(bits.bit_cast::<f32, 2>(), v);
    /// ```
    #[inline]
    pub fn bit_cast<U: Element, const M: usize>(self) -> Simd<U, M, B> {
        const {
            assert!(
                N * size_of::<T>() == M * size_of::<U>(),
                "bit_cast: total byte size must not change"
            )
        };
        Simd::from_array(bytemuck::cast::<[T; N], [U; M]>(self.to_array()))
    }

    /// Reinterpret the bytes as lanes of `U`, lane count derived from the widths
    #[inline]
    pub fn reinterpret<U: Element>(self) -> ReinterpretTo<Self, U>
    where
        Self: Reinterpret<U>,
    {
        let bytes: &[u8] = bytemuck::cast_slice(self.as_slice());
        let width = size_of::<U>();
        <ReinterpretTo<Self, U> as SimdVector>::from_lanes(|i| {
            bytemuck::pod_read_unaligned(&bytes[i * width..(i + 1) * width])
        })
    }
}

// =============================================================================
// Rounding
// =============================================================================

impl<T: FloatElement, const N: usize, B: Backend> Simd<T, N, B> {
    /// Round half to even
    #[inline]
    pub fn round(self) -> Self {
        B::round(self)
    }

    #[inline]
    pub fn floor(self) -> Self {
        self.map(Float::floor)
    }

    #[inline]
    pub fn ceil(self) -> Self {
        self.map(Float::ceil)
    }

    #[inline]
    pub fn trunc(self) -> Self {
        self.map(Float::trunc)
    }

    /// Round half to even into the same-width signed integer
    #[inline]
    pub fn round_to_integer(self) -> Simd<T::Int, N, B> {
        B::round_to_integer(self)
    }
}
