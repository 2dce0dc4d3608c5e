//! Backend descriptors and load/store alignment tags
//!
//! An [`Abi`] is the pair *(storage policy, lane count)*. It is a zero-sized
//! type: two descriptors with different policies are different types even when
//! they describe the same number of bits, so a backend can offer several
//! physical layouts for one width.

use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;

use serde::Serialize;

use crate::element::{Element, Sealed};
use crate::primitives::{oracle, Backend};
use crate::simd::Simd;

/// Compile-time descriptor `(B, N)`
pub struct Abi<B, const N: usize>(pub(crate) PhantomData<B>);

/// Type-level access to the parts of an [`Abi`]
pub trait AbiDescriptor: 'static {
    /// Storage policy (the backend tag)
    type Policy: Backend;

    /// Element count
    const LANES: usize;

    /// Runtime summary, for logs and reports
    fn describe() -> AbiInfo {
        AbiInfo {
            policy: <Self::Policy as Backend>::NAME,
            lanes: Self::LANES,
            register_bytes: <Self::Policy as Backend>::REGISTER_BYTES,
            alignment: <Self::Policy as Backend>::ALIGNMENT,
        }
    }
}

impl<B: Backend, const N: usize> AbiDescriptor for Abi<B, N> {
    type Policy = B;
    const LANES: usize = N;
}

/// Runtime view of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbiInfo {
    pub policy: &'static str,
    pub lanes: usize,
    pub register_bytes: usize,
    pub alignment: usize,
}

impl Display for AbiInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] (register {}B, align {}B)",
            self.policy, self.lanes, self.register_bytes, self.alignment
        )
    }
}

/// Type-level lane count, the key of the lane tables in [`crate::algebra`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneCount<const N: usize>;

impl<const N: usize> LaneCount<N> {
    pub const LANES: usize = N;

    /// Whether `N` is a valid lane count
    pub const IS_POWER_OF_TWO: bool = N > 0 && N.is_power_of_two();
}

/// `true` when `ptr` is aligned to `align` bytes
#[inline]
pub(crate) fn is_aligned<T>(ptr: *const T, align: usize) -> bool {
    (ptr as usize) % align == 0
}

// =============================================================================
// Alignment tags
// =============================================================================

/// Alignment promise made by the caller of [`Simd::load`] / [`Simd::store`]
pub trait Alignment: Sealed + Copy + Debug + Default + 'static {
    /// Whether the buffer is promised to be aligned to `B::ALIGNMENT`
    const VECTOR: bool;

    #[doc(hidden)]
    fn load<T: Element, const N: usize, B: Backend>(src: &[T]) -> Simd<T, N, B>;
}

/// No alignment assumed beyond the element's own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementAligned;

/// Buffer aligned to the backend's natural register alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorAligned;

impl Sealed for ElementAligned {}
impl Sealed for VectorAligned {}

impl Alignment for ElementAligned {
    const VECTOR: bool = false;

    #[inline]
    fn load<T: Element, const N: usize, B: Backend>(src: &[T]) -> Simd<T, N, B> {
        oracle::load(src)
    }
}

impl Alignment for VectorAligned {
    const VECTOR: bool = true;

    #[inline]
    fn load<T: Element, const N: usize, B: Backend>(src: &[T]) -> Simd<T, N, B> {
        debug_assert!(
            is_aligned(src.as_ptr(), B::ALIGNMENT),
            "vector_aligned load from a buffer not aligned to {} bytes",
            B::ALIGNMENT
        );
        B::load_aligned(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Simulated;

    #[test]
    fn test_describe() {
        let info = <Abi<Simulated, 8> as AbiDescriptor>::describe();
        assert_eq!(info.policy, "simulated");
        assert_eq!(info.lanes, 8);
        assert_eq!(info.to_string(), "simulated[8] (register 16B, align 16B)");
    }

    #[test]
    fn test_lane_count_validity() {
        assert!(LaneCount::<1>::IS_POWER_OF_TWO);
        assert!(LaneCount::<64>::IS_POWER_OF_TWO);
        assert!(!LaneCount::<0>::IS_POWER_OF_TWO);
        assert!(!LaneCount::<12>::IS_POWER_OF_TWO);
    }

    #[test]
    fn test_is_aligned() {
        #[repr(align(16))]
        struct Buf([u8; 32]);
        let buf = Buf([0; 32]);
        assert!(is_aligned(buf.0.as_ptr(), 16));
        assert!(!is_aligned(buf.0[1..].as_ptr(), 16));
    }

    #[test]
    fn test_alignment_flags() {
        assert!(!ElementAligned::VECTOR);
        assert!(VectorAligned::VECTOR);
    }
}
