//! Derived-type algebra
//!
//! Type-level functions from one vector or element type to a related one.
//! Every algorithm that changes lane count or element width names its result
//! through these aliases, so the same source compiles against every backend.
//!
//! | Alias | Meaning |
//! |-------|---------|
//! | [`ResizeTo<V, M>`] | same element and backend, `M` lanes |
//! | [`ReinterpretTo<V, U>`] | same total bytes, lanes of `U` |
//! | [`ScaleBy<T, NUM, DEN>`] | element `NUM/DEN` times as wide, same signedness |
//! | [`ScaleElemBy<V, NUM, DEN>`] | vector of `ScaleBy` elements, same lanes and backend |
//! | [`HalfOf<V>`] / [`DoubleOf<V>`] | half / twice the lanes |
//!
//! None of these produce runtime entities.
//!
//! Lane arithmetic cannot be expressed over const generics on stable Rust, so
//! the lane-changing relations are generated from declarative tables keyed on
//! `(byte width, lane count)`.

use std::fmt::Debug;

use crate::abi::{Abi, AbiDescriptor, LaneCount};
use crate::element::{ByteWidth, Element, W1, W2, W4, W8};
use crate::primitives::Backend;
use crate::simd::Simd;

/// Compile-time view of any vector type
pub trait SimdVector: Copy + Debug + PartialEq + Send + Sync + 'static {
    type Elem: Element;
    type Policy: Backend;
    type Abi: AbiDescriptor<Policy = Self::Policy>;
    const LANES: usize;

    fn lanes(&self) -> &[Self::Elem];

    fn from_lanes(f: impl FnMut(usize) -> Self::Elem) -> Self;
}

impl<T: Element, const N: usize, B: Backend> SimdVector for Simd<T, N, B> {
    type Elem = T;
    type Policy = B;
    type Abi = Abi<B, N>;
    const LANES: usize = N;

    #[inline]
    fn lanes(&self) -> &[T] {
        self.as_slice()
    }

    #[inline]
    fn from_lanes(f: impl FnMut(usize) -> T) -> Self {
        Simd::from_fn(f)
    }
}

// =============================================================================
// Resize
// =============================================================================

/// Same element type and backend, `M` lanes
pub trait Resize<const M: usize>: SimdVector {
    type Output: SimdVector<Elem = Self::Elem, Policy = Self::Policy>;
}

impl<T: Element, const N: usize, const M: usize, B: Backend> Resize<M> for Simd<T, N, B> {
    type Output = Simd<T, M, B>;
}

pub type ResizeTo<V, const M: usize> = <V as Resize<M>>::Output;

// =============================================================================
// Element scaling
// =============================================================================

/// Element type `NUM/DEN` times as wide with the same signedness / float-ness
pub trait Rescale<const NUM: usize, const DEN: usize>: Element {
    type Output: Element;

    /// `as` conversion into the scaled type
    fn rescale(self) -> <Self as Rescale<NUM, DEN>>::Output;
}

pub type ScaleBy<T, const NUM: usize, const DEN: usize> = <T as Rescale<NUM, DEN>>::Output;

/// Twice the width
pub type Widened<T> = ScaleBy<T, 2, 1>;

/// Half the width
pub type Narrowed<T> = ScaleBy<T, 1, 2>;

macro_rules! rescale_table {
    ($(($num:literal, $den:literal): [$($from:ty => $to:ty),* $(,)?];)*) => {
        $($(
            impl Rescale<$num, $den> for $from {
                type Output = $to;

                #[inline]
                fn rescale(self) -> $to {
                    self as $to
                }
            }
        )*)*
    };
}

rescale_table! {
    (1, 1): [i8 => i8, i16 => i16, i32 => i32, i64 => i64, u8 => u8, u16 => u16, u32 => u32, u64 => u64, f32 => f32, f64 => f64];
    (2, 1): [i8 => i16, i16 => i32, i32 => i64, u8 => u16, u16 => u32, u32 => u64, f32 => f64];
    (4, 1): [i8 => i32, i16 => i64, u8 => u32, u16 => u64];
    (8, 1): [i8 => i64, u8 => u64];
    (1, 2): [i16 => i8, i32 => i16, i64 => i32, u16 => u8, u32 => u16, u64 => u32, f64 => f32];
    (1, 4): [i32 => i8, i64 => i16, u32 => u8, u64 => u16];
    (1, 8): [i64 => i8, u64 => u8];
}

/// Vector of `ScaleBy` elements with unchanged lane count and backend
pub trait ScaleElem<const NUM: usize, const DEN: usize>: SimdVector {
    type Output: SimdVector<Policy = Self::Policy>;
}

impl<T, const N: usize, B, const NUM: usize, const DEN: usize> ScaleElem<NUM, DEN> for Simd<T, N, B>
where
    T: Rescale<NUM, DEN>,
    B: Backend,
{
    type Output = Simd<ScaleBy<T, NUM, DEN>, N, B>;
}

pub type ScaleElemBy<V, const NUM: usize, const DEN: usize> = <V as ScaleElem<NUM, DEN>>::Output;

// =============================================================================
// Halving / doubling
// =============================================================================

/// Half the lanes
pub trait Halve: SimdVector {
    type Half: SimdVector<Elem = Self::Elem, Policy = Self::Policy>;
}

/// Twice the lanes
pub trait Double: SimdVector {
    type Doubled: SimdVector<Elem = Self::Elem, Policy = Self::Policy>;
}

pub type HalfOf<V> = <V as Halve>::Half;

pub type DoubleOf<V> = <V as Double>::Doubled;

/// Invoke `$m!(n, n / 2)` for every supported lane count `n > 1`
macro_rules! for_each_lane_pair {
    ($m:ident) => {
        $m!(2, 1);
        $m!(4, 2);
        $m!(8, 4);
        $m!(16, 8);
        $m!(32, 16);
        $m!(64, 32);
        $m!(128, 64);
    };
}

pub(crate) use for_each_lane_pair;

macro_rules! impl_halve_double {
    ($n:literal, $h:literal) => {
        impl<T: Element, B: Backend> Halve for Simd<T, $n, B> {
            type Half = Simd<T, $h, B>;
        }

        impl<T: Element, B: Backend> Double for Simd<T, $h, B> {
            type Doubled = Simd<T, $n, B>;
        }
    };
}

for_each_lane_pair!(impl_halve_double);

// =============================================================================
// Reinterpretation
// =============================================================================

/// Same bytes viewed as lanes of `U`
pub trait Reinterpret<U: Element>: SimdVector {
    type Output: SimdVector<Elem = U, Policy = Self::Policy>;
}

/// Row of the reinterpretation table: `(from width, to width, lanes)` to the output vector
#[doc(hidden)]
pub trait LaneRatio<U: Element, B: Backend> {
    type Output: SimdVector<Elem = U, Policy = B>;
}

impl<T, U, const N: usize, B> Reinterpret<U> for Simd<T, N, B>
where
    T: Element,
    U: Element,
    B: Backend,
    (T::Width, U::Width, LaneCount<N>): LaneRatio<U, B>,
{
    type Output = <(T::Width, U::Width, LaneCount<N>) as LaneRatio<U, B>>::Output;
}

pub type ReinterpretTo<V, U> = <V as Reinterpret<U>>::Output;

impl<W: ByteWidth, U: Element, B: Backend, const N: usize> LaneRatio<U, B> for (W, W, LaneCount<N>) {
    type Output = Simd<U, N, B>;
}

macro_rules! lane_ratio_table {
    ($(($from:ty, $to:ty): [$($n:literal => $m:literal),* $(,)?];)*) => {
        $($(
            impl<U: Element, B: Backend> LaneRatio<U, B> for ($from, $to, LaneCount<$n>) {
                type Output = Simd<U, $m, B>;
            }
        )*)*
    };
}

lane_ratio_table! {
    (W1, W2): [2 => 1, 4 => 2, 8 => 4, 16 => 8, 32 => 16, 64 => 32];
    (W1, W4): [4 => 1, 8 => 2, 16 => 4, 32 => 8, 64 => 16];
    (W1, W8): [8 => 1, 16 => 2, 32 => 4, 64 => 8];
    (W2, W1): [1 => 2, 2 => 4, 4 => 8, 8 => 16, 16 => 32, 32 => 64];
    (W2, W4): [2 => 1, 4 => 2, 8 => 4, 16 => 8, 32 => 16, 64 => 32];
    (W2, W8): [4 => 1, 8 => 2, 16 => 4, 32 => 8, 64 => 16];
    (W4, W1): [1 => 4, 2 => 8, 4 => 16, 8 => 32, 16 => 64];
    (W4, W2): [1 => 2, 2 => 4, 4 => 8, 8 => 16, 16 => 32, 32 => 64];
    (W4, W8): [2 => 1, 4 => 2, 8 => 4, 16 => 8, 32 => 16, 64 => 32];
    (W8, W1): [1 => 8, 2 => 16, 4 => 32, 8 => 64];
    (W8, W2): [1 => 4, 2 => 8, 4 => 16, 8 => 32, 16 => 64];
    (W8, W4): [1 => 2, 2 => 4, 4 => 8, 8 => 16, 16 => 32, 32 => 64];
}

// =============================================================================
// Fixed-width aliases
// =============================================================================

/// Lane counts giving 64-, 128-, 256- and 512-bit vectors of an element
pub trait FixedWidth: Element {
    type In64<B>;
    type In128<B>;
    type In256<B>;
    type In512<B>;
}

macro_rules! fixed_width_table {
    ($($t:ty => [$w64:literal, $w128:literal, $w256:literal, $w512:literal];)*) => {
        $(
            impl FixedWidth for $t {
                type In64<B> = Simd<$t, $w64, B>;
                type In128<B> = Simd<$t, $w128, B>;
                type In256<B> = Simd<$t, $w256, B>;
                type In512<B> = Simd<$t, $w512, B>;
            }
        )*
    };
}

fixed_width_table! {
    i8 => [8, 16, 32, 64];
    u8 => [8, 16, 32, 64];
    i16 => [4, 8, 16, 32];
    u16 => [4, 8, 16, 32];
    i32 => [2, 4, 8, 16];
    u32 => [2, 4, 8, 16];
    f32 => [2, 4, 8, 16];
    i64 => [1, 2, 4, 8];
    u64 => [1, 2, 4, 8];
    f64 => [1, 2, 4, 8];
}

/// 64-bit vector of `T`
pub type Simd64<T, B = crate::backends::DefaultBackend> = <T as FixedWidth>::In64<B>;

/// 128-bit vector of `T`
pub type Simd128<T, B = crate::backends::DefaultBackend> = <T as FixedWidth>::In128<B>;

/// 256-bit vector of `T`
pub type Simd256<T, B = crate::backends::DefaultBackend> = <T as FixedWidth>::In256<B>;

/// 512-bit vector of `T`
pub type Simd512<T, B = crate::backends::DefaultBackend> = <T as FixedWidth>::In512<B>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Simulated;
    use std::any::TypeId;

    fn same<A: 'static, B: 'static>() -> bool {
        TypeId::of::<A>() == TypeId::of::<B>()
    }

    type V = Simd<i16, 8, Simulated>;

    #[test]
    fn test_resize() {
        assert!(same::<ResizeTo<V, 4>, Simd<i16, 4, Simulated>>());
        assert!(same::<ResizeTo<V, 16>, Simd<i16, 16, Simulated>>());
    }

    #[test]
    fn test_scale_by_preserves_signedness() {
        assert!(same::<ScaleBy<i16, 2, 1>, i32>());
        assert!(same::<ScaleBy<u16, 2, 1>, u32>());
        assert!(same::<ScaleBy<u8, 4, 1>, u32>());
        assert!(same::<ScaleBy<i64, 1, 2>, i32>());
        assert!(same::<ScaleBy<f32, 2, 1>, f64>());
        assert!(same::<Narrowed<f64>, f32>());
        assert_eq!(Rescale::<1, 2>::rescale(300i16), 44i8);
    }

    #[test]
    fn test_scale_elem_keeps_lanes_and_backend() {
        assert!(same::<ScaleElemBy<V, 2, 1>, Simd<i32, 8, Simulated>>());
        assert!(same::<ScaleElemBy<V, 1, 2>, Simd<i8, 8, Simulated>>());
    }

    #[test]
    fn test_halve_and_double() {
        assert!(same::<HalfOf<V>, Simd<i16, 4, Simulated>>());
        assert!(same::<DoubleOf<V>, Simd<i16, 16, Simulated>>());
        assert!(same::<HalfOf<DoubleOf<V>>, V>());
    }

    #[test]
    fn test_reinterpret_keeps_total_bytes() {
        assert!(same::<ReinterpretTo<V, u8>, Simd<u8, 16, Simulated>>());
        assert!(same::<ReinterpretTo<V, f64>, Simd<f64, 2, Simulated>>());
        assert!(same::<ReinterpretTo<V, u16>, Simd<u16, 8, Simulated>>());
        assert!(same::<ReinterpretTo<Simd<f32, 4, Simulated>, i32>, Simd<i32, 4, Simulated>>());
    }

    #[test]
    fn test_fixed_width_aliases() {
        assert!(same::<Simd128<i8, Simulated>, Simd<i8, 16, Simulated>>());
        assert!(same::<Simd64<i32, Simulated>, Simd<i32, 2, Simulated>>());
        assert!(same::<Simd256<f64, Simulated>, Simd<f64, 4, Simulated>>());
        assert_eq!(std::mem::size_of::<Simd512<u16, Simulated>>(), 64);
    }

    #[test]
    fn test_abi_of_vector() {
        assert_eq!(<<V as SimdVector>::Abi as AbiDescriptor>::LANES, 8);
        assert_eq!(<V as SimdVector>::LANES, 8);
    }
}
