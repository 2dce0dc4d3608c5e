//! Horizontal reductions
//!
//! `reduce_add` is the primitive: groups of `N / M` consecutive lanes summed
//! into each of `M` destination lanes, wrapping in the destination type.
//! Everything else here folds or recurses over halves.

use num_traits::AsPrimitive;

use crate::algebra::{for_each_lane_pair, SimdVector};
use crate::element::Element;
use crate::primitives::Backend;
use crate::simd::Simd;

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// Segmented sum into `M` lanes of `D`
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<i32, 4, Simulated>::from_array([1, 2, 3, 4]);
    /// assert_eq!(v.reduce_add::<i64, 2>().to_array(), [3, 7]);
    /// ```
    #[inline]
    pub fn reduce_add<D: Element, const M: usize>(self) -> Simd<D, M, B>
    where
        T: AsPrimitive<D>,
    {
        const { assert!(M > 0 && M <= N && N % M == 0, "reduce_add: M must divide N") };
        B::reduce_add(self)
    }

    /// Left fold of `op` over the lanes, starting from lane 0
    #[inline]
    pub fn reduce(self, mut op: impl FnMut(T, T) -> T) -> T {
        let mut acc = self[0];
        for &lane in &self.as_array()[1..] {
            acc = op(acc, lane);
        }
        acc
    }

    /// Sum of all lanes
    ///
    /// Integer lanes wrap. Float summation order is unspecified.
    #[inline]
    pub fn reduce_sum(self) -> T
    where
        T: AsPrimitive<T>,
    {
        if T::KIND.is_integral() {
            self.reduce_add::<T, 1>()[0]
        } else {
            self.reduce(Element::lane_add)
        }
    }
}

// =============================================================================
// Horizontal min / max
// =============================================================================

/// Minimum and maximum across lanes, through the backend's `min` / `max`
pub trait Horizontal: SimdVector {
    fn hmin(self) -> Self::Elem;

    fn hmax(self) -> Self::Elem;
}

impl<T: Element, B: Backend> Horizontal for Simd<T, 1, B> {
    #[inline]
    fn hmin(self) -> T {
        self[0]
    }

    #[inline]
    fn hmax(self) -> T {
        self[0]
    }
}

macro_rules! impl_horizontal {
    ($n:literal, $h:literal) => {
        impl<T: Element, B: Backend> Horizontal for Simd<T, $n, B> {
            #[inline]
            fn hmin(self) -> T {
                let [lo, hi] = self.split_by::<2, $h>();
                B::min(lo, hi).hmin()
            }

            #[inline]
            fn hmax(self) -> T {
                let [lo, hi] = self.split_by::<2, $h>();
                B::max(lo, hi).hmax()
            }
        }
    };
}

for_each_lane_pair!(impl_horizontal);
