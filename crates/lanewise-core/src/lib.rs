//! Portable fixed-width vector values with compile-time backend dispatch
//!
//! This crate provides [`Simd<T, N, B>`], a value of `N` lanes of a primitive
//! numeric type `T`. Algorithms are written once against it; the backend tag
//! `B` decides at compile time which instruction sequences implement the
//! handful of primitives they are built from.
//!
//! # Architecture Overview
//!
//! The library is organized into layers, leaves first:
//!
//! 1. **Descriptors** - [`ElementKind`], the sealed [`Element`] trait, [`Abi`]
//! 2. **Value type** - [`Simd`], construction, lane access, load/store
//! 3. **Type algebra** - [`ResizeTo`], [`ReinterpretTo`], [`ScaleElemBy`],
//!    [`HalfOf`], [`DoubleOf`]
//! 4. **Algorithms** - [`ops`]: concat, split, shuffle, reductions, widening
//! 5. **Primitives** - the [`Backend`] trait and its backends
//! 6. **Oracle** - [`primitives::oracle`], the reference every backend must match
//!
//! # Design Philosophy
//!
//! - **Fixed at compile time**: backend, lane count and shapes are type parameters
//! - **One definition per algorithm**: backends only override primitives
//! - **Shape errors do not compile**: lane counts that do not multiply out,
//!   byte widths that differ and narrowing conversions are rejected statically
//! - **No allocation**: a vector is exactly `[T; N]`
//!
//! # Example
//!
//! ```rust
//! use lanewise_core::{ops::zip, Simd, Simulated};
//!
//! let a = Simd::<i32, 2, Simulated>::from_array([0, 1]);
//! let b = Simd::<i32, 2, Simulated>::from_array([2, 3]);
//! assert_eq!(zip(a, b).to_array(), [0, 2, 1, 3]);
//!
//! let v = Simd::<i32, 4, Simulated>::from_array([1, 2, 3, 4]);
//! assert_eq!(v.reduce_add::<i64, 2>().to_array(), [3, 7]);
//! ```

pub mod abi;
pub mod algebra;
pub mod element;
pub mod error;
pub mod native;
pub mod ops;
pub mod primitives;
pub mod simd;

pub use primitives::backends;

// Re-export core types
pub use error::{Error, Result};

pub use abi::{Abi, AbiDescriptor, AbiInfo, Alignment, ElementAligned, LaneCount, VectorAligned};
pub use algebra::{
    Double, DoubleOf, FixedWidth, HalfOf, Halve, Narrowed, Reinterpret, ReinterpretTo, Rescale,
    Resize, ResizeTo, ScaleBy, ScaleElem, ScaleElemBy, Simd128, Simd256, Simd512, Simd64,
    SimdVector, Widened,
};
pub use element::{ByteWidth, Element, ElementKind, FloatElement, IntElement};
pub use native::NativeLayout;
pub use ops::Mask;
pub use primitives::{
    active_backend, default_backend_name, Backend, DefaultBackend, Primitive, Simulated,
};
#[cfg(target_arch = "aarch64")]
pub use primitives::Neon;
#[cfg(target_arch = "x86_64")]
pub use primitives::X86;
pub use simd::Simd;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Backend, DefaultBackend, DoubleOf, Element, ElementAligned, FloatElement, HalfOf,
        IntElement, Mask, ReinterpretTo, ScaleElemBy, Simd, Simulated, VectorAligned,
    };

    pub use crate::ops::{Horizontal, MulSumDefault, MulWidened, Swizzle};
}
