//! Native external layouts
//!
//! A backend declares, per `(element, lane count)` it maps onto a hardware
//! register, the register type users can hand to intrinsics directly.
//! Conversions are value copies through unaligned loads and stores, so the
//! vector itself never has to carry the register's alignment.

use crate::element::Element;
use crate::primitives::Backend;

/// Register type of `Simd<T, N, Self>`
pub trait NativeLayout<T: Element, const N: usize>: Backend {
    type External: Copy;

    fn to_native(lanes: [T; N]) -> Self::External;

    fn from_native(raw: Self::External) -> [T; N];
}

/// Rows of `(element; lanes) => register` plus the two conversions per register
///
/// ```text
/// native_layout_table! {
///     Backend {
///         __m128i, to: to_fn, from: from_fn => [(i8; 16), (u8; 16)];
///     }
/// }
/// ```
///
/// `to_fn(&[T; N]) -> Reg` and `from_fn(Reg, &mut [T; N])` are unsafe
/// functions that move exactly `size_of::<Reg>()` bytes.
macro_rules! native_layout_table {
    ($backend:ty { $($reg:ty, to: $to:path, from: $from:path => [$(($t:ty; $n:literal)),* $(,)?];)* }) => {
        $($(
            impl $crate::native::NativeLayout<$t, $n> for $backend {
                type External = $reg;

                #[inline]
                fn to_native(lanes: [$t; $n]) -> $reg {
                    const { assert!(core::mem::size_of::<[$t; $n]>() == core::mem::size_of::<$reg>()) };
                    // SAFETY: sizes are equal, the conversion reads exactly one register
                    unsafe { $to(&lanes) }
                }

                #[inline]
                fn from_native(raw: $reg) -> [$t; $n] {
                    let mut lanes = [<$t as Default>::default(); $n];
                    // SAFETY: sizes are equal, the conversion writes exactly one register
                    unsafe { $from(raw, &mut lanes) };
                    lanes
                }
            }
        )*)*
    };
}

#[allow(unused_imports)]
pub(crate) use native_layout_table;
