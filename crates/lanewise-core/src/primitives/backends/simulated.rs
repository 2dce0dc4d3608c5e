//! Simulated backend
//!
//! Overrides nothing: every primitive runs the oracle. Vectors of any lane
//! count live in plain arrays, which also makes this the reference the
//! verification harness compares native backends against.

use crate::element::Element;
use crate::native::NativeLayout;
use crate::primitives::Backend;

/// Backend-independent reference backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Simulated;

impl Backend for Simulated {
    const NAME: &'static str = "simulated";
    const REGISTER_BYTES: usize = 16;
    const ALIGNMENT: usize = 16;

    // All primitives use the default implementations from the trait
}

impl<T: Element, const N: usize> NativeLayout<T, N> for Simulated {
    type External = [T; N];

    #[inline]
    fn to_native(lanes: [T; N]) -> [T; N] {
        lanes
    }

    #[inline]
    fn from_native(raw: [T; N]) -> [T; N] {
        raw
    }
}

/// Widest vector of `T` in one simulated register
pub type NativeSimd<T> = crate::algebra::Simd128<T, Simulated>;

pub type Simd128<T> = crate::algebra::Simd128<T, Simulated>;

pub type Simd64<T> = crate::algebra::Simd64<T, Simulated>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Primitive;

    #[test]
    fn test_simulated_is_exact() {
        for p in Primitive::ALL {
            assert_eq!(Simulated::tolerance(p), 0.0);
        }
    }

    #[test]
    fn test_module_aliases() {
        assert_eq!(<NativeSimd<u8>>::LANES, 16);
        assert_eq!(<Simd64<f32>>::LANES, 2);
        assert_eq!(<Simd128<i64>>::LANES, 2);
    }
}
