//! Portable fixed-width vector values with compile-time backend dispatch
//!
//! This crate re-exports the workspace members:
//!
//! - [`lanewise_core`] - the `Simd<T, N, B>` value type, the derived-type
//!   algebra, generic algorithms, backends and the reference oracle
//! - [`lanewise_verify`] - oracle-vs-backend checks
//!
//! # Example
//!
//! ```rust
//! use lanewise::prelude::*;
//!
//! let a = Simd::<i16, 8>::from_fn(|i| i as i16);
//! let acc = Simd::<i32, 4>::from_array([0, 1, 2, 3]);
//! assert_eq!(a.mul_sum(a, acc).to_array(), [1, 14, 43, 88]);
//! ```

pub use lanewise_core;
pub use lanewise_verify;

pub use lanewise_core::{
    backends, ops, Backend, DefaultBackend, Element, ElementKind, Error, Mask, Primitive, Result,
    Simd, Simulated,
};
pub use lanewise_verify::{check_all, CheckConfig, CheckReport};

pub use lanewise_core::prelude;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
