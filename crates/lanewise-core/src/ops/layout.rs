//! Concatenation and splitting
//!
//! Shapes are checked at compile time: a `concat` or `split_by` whose lane
//! counts do not multiply out fails when the call is monomorphized.

use crate::algebra::{Double, DoubleOf, HalfOf, Halve, SimdVector};
use crate::element::Element;
use crate::primitives::Backend;
use crate::simd::Simd;

/// Join `K` vectors; lane `i` of the result is lane `i % N` of part `i / N`
///
/// ```rust
/// use lanewise_core::{ops::concat, Simd, Simulated};
///
/// let a = Simd::<u8, 2, Simulated>::from_array([1, 2]);
/// let b = Simd::<u8, 2, Simulated>::from_array([3, 4]);
/// let joined: Simd<u8, 4, Simulated> = concat([a, b]);
/// assert_eq!(joined.to_array(), [1, 2, 3, 4]);
/// ```
#[inline]
pub fn concat<T, const N: usize, const K: usize, const M: usize, B>(
    parts: [Simd<T, N, B>; K],
) -> Simd<T, M, B>
where
    T: Element,
    B: Backend,
{
    const { assert!(M == K * N, "concat: output lanes must equal K * N") };
    Simd::from_fn(|i| parts[i / N][i % N])
}

/// Join two vectors into one of twice the lanes
#[inline]
pub fn concat_halves<V: Double>(lo: V, hi: V) -> DoubleOf<V> {
    <DoubleOf<V> as SimdVector>::from_lanes(|i| {
        if i < V::LANES {
            lo.lanes()[i]
        } else {
            hi.lanes()[i - V::LANES]
        }
    })
}

/// Split into the low and high half
#[inline]
pub fn split_halves<V: Halve>(v: V) -> [HalfOf<V>; 2] {
    let half = V::LANES / 2;
    let lanes = v.lanes();
    [
        <HalfOf<V> as SimdVector>::from_lanes(|i| lanes[i]),
        <HalfOf<V> as SimdVector>::from_lanes(|i| lanes[half + i]),
    ]
}

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// Inverse of a uniform [`concat`]: `K` consecutive pieces of `M` lanes
    ///
    /// ```rust
    /// use lanewise_core::{Simd, Simulated};
    ///
    /// let v = Simd::<i16, 8, Simulated>::from_fn(|i| i as i16);
    /// let [a, b, c, d] = v.split_by::<4, 2>();
    /// assert_eq!(c.to_array(), [4, 5]);
    /// # let _ = (a, b, d);
    /// ```
    #[inline]
    pub fn split_by<const K: usize, const M: usize>(self) -> [Simd<T, M, B>; K] {
        const { assert!(N == K * M, "split_by: input lanes must equal K * M") };
        std::array::from_fn(|k| Simd::from_fn(|i| self[k * M + i]))
    }

    /// Low and high half
    #[inline]
    pub fn split_halves(self) -> [HalfOf<Self>; 2]
    where
        Self: Halve,
    {
        split_halves(self)
    }

    /// Append `hi` after `self`
    #[inline]
    pub fn concat_with(self, hi: Self) -> DoubleOf<Self>
    where
        Self: Double,
    {
        concat_halves(self, hi)
    }
}
