//! The backend trait: one generic associated function per primitive
//!
//! Every default body is the reference oracle. A backend overrides the
//! primitives it has instructions for and, inside each override, matches on
//! the compile-time constants `(T::KIND, N)`; combinations it has no native
//! sequence for fall through to the oracle. The match is on constants, so
//! monomorphization keeps exactly one arm.

use std::fmt::{self, Debug, Display};

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::algebra::{Rescale, Widened};
use crate::element::{Element, FloatElement, IntElement};
use crate::primitives::oracle;
use crate::simd::Simd;

/// Storage policy and primitive implementations of a backend
///
/// Implementors are zero-sized tags. The trait has no required items beyond
/// the three constants: a backend that overrides nothing is the oracle.
pub trait Backend: Copy + Debug + Default + Send + Sync + 'static {
    /// Short lowercase name used in logs and reports
    const NAME: &'static str;

    /// Width of one native register
    const REGISTER_BYTES: usize;

    /// Alignment promised by `VectorAligned`
    const ALIGNMENT: usize;

    /// Maximum relative error against the oracle for `primitive`
    ///
    /// Zero means the backend must match bit-exactly.
    #[inline]
    fn tolerance(primitive: Primitive) -> f64 {
        let _ = primitive;
        0.0
    }

    /// Load from a buffer aligned to `ALIGNMENT`
    #[inline]
    fn load_aligned<T: Element, const N: usize>(src: &[T]) -> Simd<T, N, Self> {
        oracle::load(src)
    }

    #[inline]
    fn abs<T: Element, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        oracle::abs(v)
    }

    #[inline]
    fn min<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::min(lhs, rhs)
    }

    #[inline]
    fn max<T: Element, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::max(lhs, rhs)
    }

    /// Round half to even
    #[inline]
    fn round<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        oracle::round(v)
    }

    #[inline]
    fn reciprocal_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::reciprocal_estimate(v)
    }

    #[inline]
    fn sqrt<T: FloatElement, const N: usize>(v: Simd<T, N, Self>) -> Simd<T, N, Self> {
        oracle::sqrt(v)
    }

    #[inline]
    fn reciprocal_sqrt_estimate<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::reciprocal_sqrt_estimate(v)
    }

    #[inline]
    fn add_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::add_saturated(lhs, rhs)
    }

    #[inline]
    fn sub_saturated<T: IntElement, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<T, N, Self> {
        oracle::sub_saturated(lhs, rhs)
    }

    /// Round half to even, then convert to the same-width signed integer
    #[inline]
    fn round_to_integer<T: FloatElement, const N: usize>(
        v: Simd<T, N, Self>,
    ) -> Simd<T::Int, N, Self> {
        oracle::round_to_integer(v)
    }

    /// Sum groups of `N / M` consecutive lanes into `M` lanes of `D`
    #[inline]
    fn reduce_add<T, D, const N: usize, const M: usize>(v: Simd<T, N, Self>) -> Simd<D, M, Self>
    where
        T: Element + AsPrimitive<D>,
        D: Element,
    {
        oracle::reduce_add(v)
    }

    /// Lane-wise product in the doubled element width
    ///
    /// Generic code only calls this with vectors of at most half a register.
    #[inline]
    fn mul_widened<T: Rescale<2, 1>, const N: usize>(
        lhs: Simd<T, N, Self>,
        rhs: Simd<T, N, Self>,
    ) -> Simd<Widened<T>, N, Self> {
        oracle::mul_widened(lhs, rhs)
    }

    /// `acc + reduce_add(mul_widened(lhs, rhs))`
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
        oracle::mul_sum(lhs, rhs, acc)
    }

    /// Sign bit of lane `i` in bit `i`
    #[inline]
    fn movemask<T: Element, const N: usize>(v: Simd<T, N, Self>) -> u64 {
        oracle::movemask(v)
    }

    /// Unsigned-by-signed byte products, adjacent pairs summed with i16 saturation
    #[inline]
    fn maddubs<const N: usize, const M: usize>(
        lhs: Simd<u8, N, Self>,
        rhs: Simd<i8, N, Self>,
    ) -> Simd<i16, M, Self> {
        oracle::maddubs(lhs, rhs)
    }
}

// =============================================================================
// Primitive catalogue
// =============================================================================

/// Names of the override points, for tolerances and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    LoadAligned,
    Abs,
    Min,
    Max,
    Round,
    ReciprocalEstimate,
    Sqrt,
    ReciprocalSqrtEstimate,
    AddSaturated,
    SubSaturated,
    RoundToInteger,
    ReduceAdd,
    MulWidened,
    MulSum,
    Movemask,
    Maddubs,
}

impl Primitive {
    pub const ALL: [Primitive; 16] = [
        Primitive::LoadAligned,
        Primitive::Abs,
        Primitive::Min,
        Primitive::Max,
        Primitive::Round,
        Primitive::ReciprocalEstimate,
        Primitive::Sqrt,
        Primitive::ReciprocalSqrtEstimate,
        Primitive::AddSaturated,
        Primitive::SubSaturated,
        Primitive::RoundToInteger,
        Primitive::ReduceAdd,
        Primitive::MulWidened,
        Primitive::MulSum,
        Primitive::Movemask,
        Primitive::Maddubs,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::LoadAligned => "load_aligned",
            Primitive::Abs => "abs",
            Primitive::Min => "min",
            Primitive::Max => "max",
            Primitive::Round => "round",
            Primitive::ReciprocalEstimate => "reciprocal_estimate",
            Primitive::Sqrt => "sqrt",
            Primitive::ReciprocalSqrtEstimate => "reciprocal_sqrt_estimate",
            Primitive::AddSaturated => "add_saturated",
            Primitive::SubSaturated => "sub_saturated",
            Primitive::RoundToInteger => "round_to_integer",
            Primitive::ReduceAdd => "reduce_add",
            Primitive::MulWidened => "mul_widened",
            Primitive::MulSum => "mul_sum",
            Primitive::Movemask => "movemask",
            Primitive::Maddubs => "maddubs",
        }
    }

    /// Float primitives that a backend may approximate within its tolerance
    pub const fn is_estimate(self) -> bool {
        matches!(
            self,
            Primitive::ReciprocalEstimate | Primitive::Sqrt | Primitive::ReciprocalSqrtEstimate
        )
    }

    /// Primitives whose result for a NaN input lane is not fixed
    pub const fn nan_unspecified(self) -> bool {
        matches!(
            self,
            Primitive::Min | Primitive::Max | Primitive::RoundToInteger
        )
    }

    /// Only defined for float lanes
    pub const fn float_only(self) -> bool {
        matches!(
            self,
            Primitive::Round
                | Primitive::ReciprocalEstimate
                | Primitive::Sqrt
                | Primitive::ReciprocalSqrtEstimate
                | Primitive::RoundToInteger
        )
    }

    /// Only defined for integer lanes
    pub const fn integer_only(self) -> bool {
        matches!(
            self,
            Primitive::AddSaturated | Primitive::SubSaturated | Primitive::Maddubs
        )
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
