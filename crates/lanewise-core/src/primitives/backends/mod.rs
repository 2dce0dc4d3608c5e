//! Backend implementations
//!
//! Concrete zero-sized backend tags. Selection is compile-time only:
//! `DefaultBackend` follows `cfg(target_arch)` unless the `simulated` feature
//! forces the oracle.

pub mod simulated;
#[cfg(target_arch = "x86_64")]
pub mod x86;
#[cfg(target_arch = "aarch64")]
pub mod neon;

pub use simulated::Simulated;
#[cfg(target_arch = "x86_64")]
pub use x86::X86;
#[cfg(target_arch = "aarch64")]
pub use neon::Neon;

use crate::abi::{Abi, AbiDescriptor, AbiInfo};
use crate::primitives::Backend;

/// Backend used when `Simd<T, N>` names none
#[cfg(all(target_arch = "x86_64", not(feature = "simulated")))]
pub type DefaultBackend = X86;

/// Backend used when `Simd<T, N>` names none
#[cfg(all(target_arch = "aarch64", not(feature = "simulated")))]
pub type DefaultBackend = Neon;

/// Backend used when `Simd<T, N>` names none
#[cfg(any(
    feature = "simulated",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
pub type DefaultBackend = Simulated;

/// Name of the compile-time default backend
pub fn default_backend_name() -> &'static str {
    DefaultBackend::NAME
}

/// Describe the single-lane descriptor of the default backend and log it at
/// debug level
pub fn active_backend() -> AbiInfo {
    let info = <Abi<DefaultBackend, 1> as AbiDescriptor>::describe();
    log::debug!(
        "lanewise backend: {} (lanes {}, {}-byte registers, {}-byte alignment)",
        info.policy,
        info.lanes,
        info.register_bytes,
        info.alignment
    );
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_is_consistent() {
        let info = active_backend();
        assert_eq!(info.policy, default_backend_name());
        assert!(info.register_bytes.is_power_of_two());
        assert!(info.alignment >= 16);
        assert_eq!(info.lanes, 1);
        assert_eq!(info.register_bytes, DefaultBackend::REGISTER_BYTES);
    }

    #[cfg(feature = "simulated")]
    #[test]
    fn test_simulated_feature_forces_oracle() {
        assert_eq!(default_backend_name(), "simulated");
    }
}
