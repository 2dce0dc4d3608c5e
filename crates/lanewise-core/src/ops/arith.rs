//! Element-wise operators, comparisons and the single-vector primitives
//!
//! Integer `+ - *` and negation wrap. Shifts take the count modulo the lane
//! width. Comparisons return a [`Mask`] with all-ones lanes for `true`; any
//! comparison involving NaN is `false` except `simd_ne`.

use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, Mul, MulAssign, Neg, Not, Shl, Shr, Sub, SubAssign,
};

use crate::element::{Element, FloatElement, IntElement};
use crate::primitives::Backend;
use crate::simd::Simd;

/// Comparison result: unsigned lanes of the same width, all-zeros or all-ones
pub type Mask<T, const N: usize, B> = Simd<<T as Element>::Mask, N, B>;

macro_rules! lanewise_binary {
    ($bound:ident: $($trait:ident :: $method:ident => $lane:expr;)*) => {
        $(
            impl<T: $bound, const N: usize, B: Backend> $trait for Simd<T, N, B> {
                type Output = Self;

                #[inline]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_map(rhs, $lane)
                }
            }
        )*
    };
}

lanewise_binary! {
    Element:
    Add::add => Element::lane_add;
    Sub::sub => Element::lane_sub;
    Mul::mul => Element::lane_mul;
}

lanewise_binary! {
    FloatElement:
    Div::div => |a: T, b: T| a / b;
}

lanewise_binary! {
    IntElement:
    BitAnd::bitand => |a: T, b: T| a & b;
    BitOr::bitor => |a: T, b: T| a | b;
    BitXor::bitxor => |a: T, b: T| a ^ b;
}

impl<T: Element, const N: usize, B: Backend> AddAssign for Simd<T, N, B> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Element, const N: usize, B: Backend> SubAssign for Simd<T, N, B> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Element, const N: usize, B: Backend> MulAssign for Simd<T, N, B> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Element, const N: usize, B: Backend> Neg for Simd<T, N, B> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(Element::lane_neg)
    }
}

impl<T: IntElement, const N: usize, B: Backend> Not for Simd<T, N, B> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.map(|a| !a)
    }
}

impl<T: IntElement, const N: usize, B: Backend> Shl<u32> for Simd<T, N, B> {
    type Output = Self;

    #[inline]
    fn shl(self, count: u32) -> Self {
        self.map(|a| a.lane_shl(count))
    }
}

impl<T: IntElement, const N: usize, B: Backend> Shr<u32> for Simd<T, N, B> {
    type Output = Self;

    #[inline]
    fn shr(self, count: u32) -> Self {
        self.map(|a| a.lane_shr(count))
    }
}

// =============================================================================
// Comparisons
// =============================================================================

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    #[inline]
    fn compare(self, rhs: Self, mut pred: impl FnMut(&T, &T) -> bool) -> Mask<T, N, B> {
        self.zip_map(rhs, |a, b| <T::Mask as IntElement>::from_bool(pred(&a, &b)))
    }

    #[inline]
    pub fn simd_eq(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialEq::eq)
    }

    #[inline]
    pub fn simd_ne(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialEq::ne)
    }

    #[inline]
    pub fn simd_lt(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialOrd::lt)
    }

    #[inline]
    pub fn simd_le(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialOrd::le)
    }

    #[inline]
    pub fn simd_gt(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialOrd::gt)
    }

    #[inline]
    pub fn simd_ge(self, rhs: Self) -> Mask<T, N, B> {
        self.compare(rhs, PartialOrd::ge)
    }

    /// Lane `i` from `if_true` where `mask[i]` is non-zero, else from `if_false`
    #[inline]
    pub fn select(mask: Mask<T, N, B>, if_true: Self, if_false: Self) -> Self {
        Self::from_fn(|i| {
            if mask[i] != <T::Mask as num_traits::Zero>::zero() {
                if_true[i]
            } else {
                if_false[i]
            }
        })
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Absolute value; the signed minimum maps to itself
    #[inline]
    pub fn abs(self) -> Self {
        B::abs(self)
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        B::min(self, rhs)
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        B::max(self, rhs)
    }
}

impl<T: IntElement, const N: usize, B: Backend> Simd<T, N, B> {
    #[inline]
    pub fn add_saturated(self, rhs: Self) -> Self {
        B::add_saturated(self, rhs)
    }

    #[inline]
    pub fn sub_saturated(self, rhs: Self) -> Self {
        B::sub_saturated(self, rhs)
    }
}

impl<T: FloatElement, const N: usize, B: Backend> Simd<T, N, B> {
    #[inline]
    pub fn sqrt(self) -> Self {
        B::sqrt(self)
    }

    /// `1 / x`, possibly approximated within `B::tolerance`
    #[inline]
    pub fn reciprocal_estimate(self) -> Self {
        B::reciprocal_estimate(self)
    }

    /// `1 / sqrt(x)`, possibly approximated within `B::tolerance`
    #[inline]
    pub fn reciprocal_sqrt_estimate(self) -> Self {
        B::reciprocal_sqrt_estimate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{DefaultBackend, Simulated};

    type I = Simd<i32, 4, Simulated>;
    type F = Simd<f32, 4, Simulated>;

    #[test]
    fn test_wrapping_operators() {
        let a = I::from_array([i32::MAX, 1, -4, 7]);
        let b = I::from_array([1, 2, 3, -7]);
        assert_eq!(a + b, [i32::MIN, 3, -1, 0]);
        assert_eq!(a - b, [i32::MAX - 1, -1, -7, 14]);
        assert_eq!(a * b, [i32::MAX, 2, -12, -49]);
        assert_eq!(-I::splat(i32::MIN), [i32::MIN; 4]);

        let mut c = a;
        c += b;
        c -= b;
        c *= I::splat(1);
        assert_eq!(c, a);
    }

    #[test]
    fn test_float_division() {
        let r = F::from_array([1.0, -1.0, 0.0, 6.0]) / F::from_array([0.0, 0.0, 1.0, 3.0]);
        assert_eq!(r[0], f32::INFINITY);
        assert_eq!(r[1], f32::NEG_INFINITY);
        assert_eq!(r[3], 2.0);
    }

    #[test]
    fn test_bitwise_and_shifts() {
        let a = Simd::<u8, 4, Simulated>::from_array([0b1100, 0xff, 0x80, 1]);
        let b = Simd::<u8, 4, Simulated>::splat(0b1010);
        assert_eq!(a & b, [0b1000, 0b1010, 0, 0]);
        assert_eq!(a | b, [0b1110, 0xff, 0x8a, 0b1011]);
        assert_eq!(a ^ b, [0b0110, 0xf5, 0x8a, 0b1011]);
        assert_eq!(!a, [0xf3, 0, 0x7f, 0xfe]);
        assert_eq!(a >> 7, [0, 1, 1, 0]);
        // count taken modulo the lane width
        assert_eq!(a << 9, [0b11000, 0xfe, 0, 2]);
        let s = Simd::<i16, 2, Simulated>::from_array([-16, 16]);
        assert_eq!(s >> 2, [-4, 4]);
    }

    #[test]
    fn test_comparisons_produce_masks() {
        let a = I::from_array([1, 5, 3, 3]);
        let b = I::from_array([2, 4, 3, 9]);
        assert_eq!(a.simd_lt(b), [u32::MAX, 0, 0, u32::MAX]);
        assert_eq!(a.simd_ge(b), [0, u32::MAX, u32::MAX, 0]);
        assert_eq!(a.simd_eq(b), [0, 0, u32::MAX, 0]);
        assert_eq!(a.simd_ne(b), !a.simd_eq(b));
        assert_eq!(a.simd_le(b), [u32::MAX, 0, u32::MAX, u32::MAX]);
        assert_eq!(a.simd_gt(b), [0, u32::MAX, 0, 0]);
    }

    #[test]
    fn test_nan_compares_false() {
        let a = F::splat(f32::NAN);
        assert_eq!(a.simd_eq(a), [0; 4]);
        assert_eq!(a.simd_lt(F::splat(1.0)), [0; 4]);
        assert_eq!(a.simd_ne(a), [u32::MAX; 4]);
    }

    #[test]
    fn test_select() {
        let a = I::from_array([1, 2, 3, 4]);
        let b = I::from_array([10, 20, 30, 40]);
        let mask = a.simd_gt(I::splat(2));
        assert_eq!(I::select(mask, a, b), [10, 20, 3, 4]);
    }

    #[test]
    fn test_primitive_wrappers() {
        let a = Simd::<i8, 16, DefaultBackend>::splat(120);
        assert_eq!(a.add_saturated(Simd::splat(50)), [127; 16]);
        let u = Simd::<u8, 16, DefaultBackend>::splat(10);
        assert_eq!(u.sub_saturated(Simd::splat(20)), [0; 16]);
        assert_eq!(I::from_array([-3, 3, 0, i32::MIN]).abs(), [3, 3, 0, i32::MIN]);
        let f = F::from_array([4.0, 9.0, 1.0, 0.25]);
        assert_eq!(f.sqrt(), [2.0, 3.0, 1.0, 0.5]);
        assert_eq!(f.min(F::splat(2.0)), [2.0, 2.0, 1.0, 0.25]);
        assert_eq!(f.max(F::splat(2.0)), [4.0, 9.0, 2.0, 2.0]);
    }
}
