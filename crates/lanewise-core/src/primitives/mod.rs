//! Primitive operations with compile-time backend dispatch
//!
//! The small set of operations every generic algorithm is built from, and the
//! backends that implement them.
//!
//! # Architecture
//!
//! - Single [`Backend`] trait; its default method bodies are the [`oracle`]
//! - Concrete backends: [`Simulated`](backends::Simulated), `X86`, `Neon`
//! - Backend selection is fixed at compile time, there is no runtime detection
//! - Overrides branch on `(T::KIND, N)`, constants folded by monomorphization
//!
//! # Usage
//!
//! ```rust
//! use lanewise_core::{Backend, Simd, Simulated};
//!
//! let v = Simd::<i8, 16, Simulated>::splat(120);
//! let r = Simulated::add_saturated(v, Simd::splat(50));
//! assert_eq!(r.to_array(), [127; 16]);
//! ```

pub mod backends;
pub mod oracle;
pub mod traits;

pub use traits::{Backend, Primitive};

// Re-export the backends
pub use backends::{active_backend, default_backend_name, DefaultBackend, Simulated};
#[cfg(target_arch = "aarch64")]
pub use backends::Neon;
#[cfg(target_arch = "x86_64")]
pub use backends::X86;
