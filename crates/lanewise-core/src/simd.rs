//! The vector value type
//!
//! `Simd<T, N, B>` holds `N` lanes of `T` laid out exactly like `[T; N]`.
//! The backend tag `B` only decides which primitive implementations run; it
//! never changes the in-memory layout, so a vector can always be viewed as an
//! array or handed to a backend's native register type via [`Simd::raw`].

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::Index;

use crate::abi::{is_aligned, Abi, Alignment, LaneCount, VectorAligned};
use crate::backends::DefaultBackend;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::native::NativeLayout;
use crate::primitives::Backend;

/// Fixed-width vector of `N` lanes of `T`, executed by backend `B`
///
/// `N` must be a non-zero power of two. Any other value fails to compile as
/// soon as a vector of that width is constructed.
///
/// # Example
///
/// ```rust
/// use lanewise_core::{Simd, Simulated};
///
/// let v = Simd::<i32, 4, Simulated>::from_array([1, 2, 3, 4]);
/// let w = v + Simd::splat(10);
/// assert_eq!(w.to_array(), [11, 12, 13, 14]);
/// assert_eq!(w[2], 13);
/// ```
#[repr(transparent)]
pub struct Simd<T, const N: usize, B = DefaultBackend> {
    lanes: [T; N],
    _backend: PhantomData<B>,
}

impl<T: Element, const N: usize, B: Backend> Simd<T, N, B> {
    /// Number of lanes
    pub const LANES: usize = N;

    /// Descriptor of this vector's backend and width
    pub const fn abi() -> Abi<B, N> {
        Abi(PhantomData)
    }

    /// Number of lanes
    #[inline]
    pub const fn size(&self) -> usize {
        N
    }

    /// Build a vector from its lanes
    #[inline]
    pub const fn from_array(lanes: [T; N]) -> Self {
        const {
            assert!(
                LaneCount::<N>::IS_POWER_OF_TWO,
                "lane count must be a non-zero power of two"
            )
        };
        Self {
            lanes,
            _backend: PhantomData,
        }
    }

    /// Broadcast `value` to every lane
    #[inline]
    pub fn splat(value: T) -> Self {
        Self::from_array([value; N])
    }

    /// Lane `i` is `f(i)`; `f` is called exactly once per lane
    #[inline]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self::from_array(std::array::from_fn(f))
    }

    /// Read the first `N` elements of `src`
    ///
    /// With [`VectorAligned`] the caller promises `src` is aligned to
    /// `B::ALIGNMENT`, which lets the backend pick an aligned load.
    ///
    /// # Panics
    ///
    /// Panics if `src` has fewer than `N` elements.
    #[inline]
    pub fn load<A: Alignment>(src: &[T], _alignment: A) -> Self {
        A::load(src)
    }

    /// Write all lanes to the first `N` elements of `dst`
    ///
    /// # Panics
    ///
    /// Panics if `dst` has fewer than `N` elements.
    #[inline]
    pub fn store<A: Alignment>(self, dst: &mut [T], _alignment: A) {
        debug_assert!(
            !A::VECTOR || is_aligned(dst.as_ptr(), B::ALIGNMENT),
            "vector_aligned store to a buffer not aligned to {} bytes",
            B::ALIGNMENT
        );
        dst[..N].copy_from_slice(&self.lanes);
    }

    /// Fallible form of an element-aligned load
    pub fn try_from_slice(src: &[T]) -> Result<Self> {
        if src.len() < N {
            return Err(Error::size_mismatch(N, src.len()));
        }
        Ok(Self::from_fn(|i| src[i]))
    }

    /// Aligned load that verifies the alignment promise instead of assuming it
    pub fn load_aligned_checked(src: &[T]) -> Result<Self> {
        if src.len() < N {
            return Err(Error::size_mismatch(N, src.len()));
        }
        if !is_aligned(src.as_ptr(), B::ALIGNMENT) {
            return Err(Error::misaligned(src.as_ptr(), B::ALIGNMENT));
        }
        Ok(Self::load(src, VectorAligned))
    }

    #[inline]
    pub fn to_array(self) -> [T; N] {
        self.lanes
    }

    #[inline]
    pub const fn as_array(&self) -> &[T; N] {
        &self.lanes
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.lanes
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.lanes.iter()
    }

    /// Read lane `i` without a bounds check
    ///
    /// # Safety
    ///
    /// `i` must be less than `N`.
    #[inline]
    pub unsafe fn extract_unchecked(&self, i: usize) -> T {
        *self.lanes.get_unchecked(i)
    }

    /// Copy of `self` with lane `i` replaced
    ///
    /// # Panics
    ///
    /// Panics if `i >= N`.
    #[inline]
    pub fn with_lane(mut self, i: usize, value: T) -> Self {
        self.lanes[i] = value;
        self
    }

    /// Apply `f` to every lane
    #[inline]
    pub fn map<U: Element>(self, mut f: impl FnMut(T) -> U) -> Simd<U, N, B> {
        Simd::from_fn(|i| f(self.lanes[i]))
    }

    /// Combine lanes pairwise
    #[inline]
    pub fn zip_map<U: Element, R: Element>(
        self,
        rhs: Simd<U, N, B>,
        mut f: impl FnMut(T, U) -> R,
    ) -> Simd<R, N, B> {
        Simd::from_fn(|i| f(self.lanes[i], rhs.lanes[i]))
    }

    /// Same lanes, different backend tag
    #[inline]
    pub fn with_backend<C: Backend>(self) -> Simd<T, N, C> {
        Simd::from_array(self.lanes)
    }

    /// Convert to the backend's native register type
    #[inline]
    pub fn raw(self) -> <B as NativeLayout<T, N>>::External
    where
        B: NativeLayout<T, N>,
    {
        B::to_native(self.lanes)
    }

    /// Build from the backend's native register type
    #[inline]
    pub fn from_raw(raw: <B as NativeLayout<T, N>>::External) -> Self
    where
        B: NativeLayout<T, N>,
    {
        Self::from_array(B::from_native(raw))
    }
}

impl<T: Copy, const N: usize, B> Clone for Simd<T, N, B> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, const N: usize, B> Copy for Simd<T, N, B> {}

impl<T: PartialEq, const N: usize, B> PartialEq for Simd<T, N, B> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: Element, const N: usize, B: Backend> PartialEq<[T; N]> for Simd<T, N, B> {
    #[inline]
    fn eq(&self, other: &[T; N]) -> bool {
        &self.lanes == other
    }
}

impl<T: Element, const N: usize, B: Backend> Default for Simd<T, N, B> {
    #[inline]
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T: Debug, const N: usize, B: Backend> Debug for Simd<T, N, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Simd<{}>", B::NAME)?;
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}

impl<T, const N: usize, B> Index<usize> for Simd<T, N, B> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.lanes[i]
    }
}

impl<T: Element, const N: usize, B: Backend> From<[T; N]> for Simd<T, N, B> {
    #[inline]
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Element, const N: usize, B: Backend> From<Simd<T, N, B>> for [T; N] {
    #[inline]
    fn from(v: Simd<T, N, B>) -> Self {
        v.lanes
    }
}

impl<T: Element, const N: usize, B: Backend> TryFrom<&[T]> for Simd<T, N, B> {
    type Error = Error;

    fn try_from(src: &[T]) -> Result<Self> {
        Self::try_from_slice(src)
    }
}

impl<'a, T, const N: usize, B> IntoIterator for &'a Simd<T, N, B> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.lanes.iter()
    }
}
