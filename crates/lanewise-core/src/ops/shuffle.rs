//! Compile-time lane permutations
//!
//! A [`Swizzle`] is a type carrying a constant index table. Indices address
//! the virtual sequence `lhs ++ rhs`; `-1` marks a lane whose value does not
//! matter (it comes out as zero). Any other index outside `0..2N` is rejected
//! when the shuffle is monomorphized.

use crate::algebra::{Double, DoubleOf};
use crate::element::Element;
use crate::ops::layout::concat_halves;
use crate::primitives::Backend;
use crate::simd::Simd;

/// Index value for a lane whose content is irrelevant
pub const DONT_CARE: isize = -1;

/// `true` when every index is `DONT_CARE` or below `len`
pub const fn indices_in_range(index: &[isize], len: usize) -> bool {
    let mut i = 0;
    while i < index.len() {
        let idx = index[i];
        if idx < DONT_CARE || (idx >= 0 && idx as usize >= len) {
            return false;
        }
        i += 1;
    }
    true
}

/// Constant index table producing `M` lanes
///
/// ```rust
/// use lanewise_core::{ops::Swizzle, Simd, Simulated};
///
/// struct Reverse;
///
/// impl Swizzle<4> for Reverse {
///     const INDEX: [isize; 4] = [3, 2, 1, 0];
/// }
///
/// let v = Simd::<u8, 4, Simulated>::from_array([1, 2, 3, 4]);
/// assert_eq!(Reverse::swizzle(v).to_array(), [4, 3, 2, 1]);
/// ```
pub trait Swizzle<const M: usize> {
    const INDEX: [isize; M];

    /// Select from `lhs ++ rhs`
    #[inline]
    fn concat_swizzle<T, const N: usize, B>(lhs: Simd<T, N, B>, rhs: Simd<T, N, B>) -> Simd<T, M, B>
    where
        T: Element,
        B: Backend,
    {
        const {
            assert!(
                indices_in_range(&Self::INDEX, 2 * N),
                "swizzle index out of range"
            )
        };
        Simd::from_fn(|i| match Self::INDEX[i] {
            DONT_CARE => T::zero(),
            idx if (idx as usize) < N => lhs[idx as usize],
            idx => rhs[idx as usize - N],
        })
    }

    /// Select from a single vector
    #[inline]
    fn swizzle<T, const N: usize, B>(v: Simd<T, N, B>) -> Simd<T, M, B>
    where
        T: Element,
        B: Backend,
    {
        const {
            assert!(
                indices_in_range(&Self::INDEX, N),
                "swizzle index out of range"
            )
        };
        Self::concat_swizzle(v, v)
    }
}

// =============================================================================
// Interleaving
// =============================================================================

/// `offset + i`-th lane of the interleave `lhs[0], rhs[0], lhs[1], rhs[1], ...`
const fn zip_index<const N: usize>(offset: usize) -> [isize; N] {
    let mut index = [0isize; N];
    let mut i = 0;
    while i < N {
        let j = offset + i;
        index[i] = (j / 2 + (j % 2) * N) as isize;
        i += 1;
    }
    index
}

/// Every other lane of `lhs ++ rhs`, starting at `first`
const fn stride_index<const N: usize>(first: usize) -> [isize; N] {
    let mut index = [0isize; N];
    let mut i = 0;
    while i < N {
        index[i] = (2 * i + first) as isize;
        i += 1;
    }
    index
}

/// Low half of the interleave of two `N`-lane vectors
pub struct ZipLo<const N: usize>;

/// High half of the interleave of two `N`-lane vectors
pub struct ZipHi<const N: usize>;

/// Even lanes of `lhs ++ rhs`
pub struct Evens<const N: usize>;

/// Odd lanes of `lhs ++ rhs`
pub struct Odds<const N: usize>;

impl<const N: usize> Swizzle<N> for ZipLo<N> {
    const INDEX: [isize; N] = zip_index::<N>(0);
}

impl<const N: usize> Swizzle<N> for ZipHi<N> {
    const INDEX: [isize; N] = zip_index::<N>(N);
}

impl<const N: usize> Swizzle<N> for Evens<N> {
    const INDEX: [isize; N] = stride_index::<N>(0);
}

impl<const N: usize> Swizzle<N> for Odds<N> {
    const INDEX: [isize; N] = stride_index::<N>(1);
}

/// `lhs[0], rhs[0], lhs[1], rhs[1], ...`
#[inline]
pub fn zip<T, const N: usize, B>(lhs: Simd<T, N, B>, rhs: Simd<T, N, B>) -> DoubleOf<Simd<T, N, B>>
where
    T: Element,
    B: Backend,
    Simd<T, N, B>: Double,
{
    concat_halves(
        ZipLo::<N>::concat_swizzle(lhs, rhs),
        ZipHi::<N>::concat_swizzle(lhs, rhs),
    )
}

/// Inverse of [`zip`]: `[even lanes, odd lanes]` of `lo ++ hi`
#[inline]
pub fn unzip<T, const N: usize, B>(lo: Simd<T, N, B>, hi: Simd<T, N, B>) -> [Simd<T, N, B>; 2]
where
    T: Element,
    B: Backend,
{
    [
        Evens::<N>::concat_swizzle(lo, hi),
        Odds::<N>::concat_swizzle(lo, hi),
    ]
}

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// Apply swizzle `S` to `self ++ rhs`
    #[inline]
    pub fn shuffle<S: Swizzle<M>, const M: usize>(self, rhs: Self) -> Simd<T, M, B> {
        S::concat_swizzle(self, rhs)
    }

    #[inline]
    pub fn zip(self, rhs: Self) -> DoubleOf<Self>
    where
        Self: Double,
    {
        zip(self, rhs)
    }

    #[inline]
    pub fn unzip(self, hi: Self) -> [Self; 2] {
        unzip(self, hi)
    }
}
