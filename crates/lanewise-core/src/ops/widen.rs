//! Widening multiplies and bit-mask extraction
//!
//! `mul_widened` hands the backend at most half a register per call: wider
//! inputs are split into halves, multiplied separately and concatenated, so
//! each native product exactly fills one register.

use std::mem::size_of;

use num_traits::{AsPrimitive, Zero};

use crate::algebra::{for_each_lane_pair, Rescale, ScaleElem, ScaleElemBy, Widened};
use crate::element::Element;
use crate::ops::layout::concat;
use crate::primitives::Backend;
use crate::simd::Simd;

/// Lane-wise product in the doubled element width
///
/// ```rust
/// use lanewise_core::{ops::MulWidened, Simd, Simulated};
///
/// let a = Simd::<i16, 8, Simulated>::splat(-30_000);
/// let p = a.mul_widened(Simd::splat(3));
/// assert_eq!(p.to_array(), [-90_000i32; 8]);
/// ```
pub trait MulWidened: ScaleElem<2, 1> {
    fn mul_widened(self, rhs: Self) -> ScaleElemBy<Self, 2, 1>;
}

impl<T: Rescale<2, 1>, B: Backend> MulWidened for Simd<T, 1, B> {
    #[inline]
    fn mul_widened(self, rhs: Self) -> Simd<Widened<T>, 1, B> {
        B::mul_widened(self, rhs)
    }
}

macro_rules! impl_mul_widened {
    ($n:literal, $h:literal) => {
        impl<T: Rescale<2, 1>, B: Backend> MulWidened for Simd<T, $n, B> {
            #[inline]
            fn mul_widened(self, rhs: Self) -> Simd<Widened<T>, $n, B> {
                if $n * size_of::<T>() > B::REGISTER_BYTES / 2 {
                    let [a_lo, a_hi] = self.split_by::<2, $h>();
                    let [b_lo, b_hi] = rhs.split_by::<2, $h>();
                    concat([a_lo.mul_widened(b_lo), a_hi.mul_widened(b_hi)])
                } else {
                    B::mul_widened(self, rhs)
                }
            }
        }
    };
}

for_each_lane_pair!(impl_mul_widened);

/// `mul_sum` with a zero accumulator of the widened type and half the lanes
pub trait MulSumDefault: ScaleElem<2, 1> {
    type Output;

    fn mul_sum_default(self, rhs: Self) -> <Self as MulSumDefault>::Output;
}

macro_rules! impl_mul_sum_default {
    ($n:literal, $h:literal) => {
        impl<T, B> MulSumDefault for Simd<T, $n, B>
        where
            T: Rescale<2, 1>,
            Widened<T>: AsPrimitive<Widened<T>>,
            B: Backend,
        {
            type Output = Simd<Widened<T>, $h, B>;

            #[inline]
            fn mul_sum_default(self, rhs: Self) -> <Self as MulSumDefault>::Output {
                self.mul_sum(rhs, Simd::splat(Zero::zero()))
            }
        }
    };
}

for_each_lane_pair!(impl_mul_sum_default);

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// `acc + reduce_add::<D, M>(mul_widened(self, rhs))`
    ///
    /// `self`, `rhs` and `acc` must have the same byte width.
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<i16, 8, Simulated>::from_fn(|i| i as i16);
    /// let acc = Simd::<i32, 4, Simulated>::from_array([0, 1, 2, 3]);
    /// assert_eq!(v.mul_sum(v, acc).to_array(), [1, 14, 43, 88]);
    /// ```
    #[inline]
    pub fn mul_sum<D: Element, const M: usize>(self, rhs: Self, acc: Simd<D, M, B>) -> Simd<D, M, B>
    where
        T: Rescale<2, 1>,
        Widened<T>: AsPrimitive<D>,
    {
        const {
            assert!(
                N * size_of::<T>() == M * size_of::<D>(),
                "mul_sum: inputs and accumulator must have the same byte width"
            )
        };
        B::mul_sum(self, rhs, acc)
    }

    /// Sign bit of lane `i` in bit `i`
    #[inline]
    pub fn movemask(self) -> u64 {
        const { assert!(N <= 64, "movemask: at most 64 lanes fit the mask") };
        B::movemask(self)
    }
}

impl<const N: usize, B: Backend> Simd<u8, N, B> {
    /// Multiply unsigned bytes by signed bytes and add adjacent products with
    /// `i16` saturation
    #[inline]
    pub fn maddubs<const M: usize>(self, rhs: Simd<i8, N, B>) -> Simd<i16, M, B> {
        const { assert!(N == 2 * M, "maddubs: output must have half the lanes") };
        B::maddubs(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{DefaultBackend, Simulated};

    #[test]
    fn test_mul_widened_splits_wide_inputs() {
        // 32 bytes of input: two levels of splitting before the backend sees it
        let a = Simd::<i16, 16, DefaultBackend>::from_fn(|i| i as i16 * 1000 - 8000);
        let b = Simd::<i16, 16, DefaultBackend>::splat(-4);
        let p = a.mul_widened(b);
        for i in 0..16 {
            assert_eq!(p[i], (i as i32 * 1000 - 8000) * -4);
        }
    }

    #[test]
    fn test_mul_widened_unsigned() {
        let a = Simd::<u32, 4, DefaultBackend>::splat(u32::MAX);
        let p = a.mul_widened(a);
        assert_eq!(p, [u64::from(u32::MAX) * u64::from(u32::MAX); 4]);
        let f = Simd::<f32, 2, Simulated>::from_array([1.5, f32::MAX]);
        let p = f.mul_widened(f);
        assert_eq!(p[0], 2.25f64);
        assert!(p[1].is_finite());
    }

    #[test]
    fn test_mul_sum_reference_values() {
        let v = Simd::<i16, 8, DefaultBackend>::from_fn(|i| i as i16);
        let acc = Simd::<i32, 4, DefaultBackend>::from_array([0, 1, 2, 3]);
        assert_eq!(v.mul_sum(v, acc), [1, 14, 43, 88]);
    }

    #[test]
    fn test_mul_sum_default_zero_accumulator() {
        let v = Simd::<i16, 8, Simulated>::from_fn(|i| i as i16);
        assert_eq!(v.mul_sum_default(v), [1, 13, 41, 85]);
        let b = Simd::<u8, 4, Simulated>::from_array([255, 255, 1, 2]);
        let r: Simd<u16, 2, Simulated> = b.mul_sum_default(b);
        assert_eq!(r, [65025u16.wrapping_add(65025), 5]);
    }

    #[test]
    fn test_movemask() {
        let v = Simd::<i8, 16, DefaultBackend>::from_fn(|i| if i < 4 { -1 } else { 1 });
        assert_eq!(v.movemask(), 0b1111);
        let v = Simd::<i32, 8, Simulated>::from_fn(|i| if i == 7 { -5 } else { 5 });
        assert_eq!(v.movemask(), 1 << 7);
    }

    #[test]
    fn test_maddubs() {
        let a = Simd::<u8, 16, DefaultBackend>::from_fn(|i| if i < 2 { 255 } else { i as u8 });
        let b = Simd::<i8, 16, DefaultBackend>::from_fn(|i| if i < 2 { 127 } else { -1 });
        let r = a.maddubs::<8>(b);
        assert_eq!(r[0], i16::MAX);
        assert_eq!(r[1], -(2 + 3));
        assert_eq!(r[7], -(14 + 15));
    }
}
