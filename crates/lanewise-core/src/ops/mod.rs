//! Width-polymorphic algorithms
//!
//! Everything here is written once against [`Backend`](crate::Backend)
//! primitives and the derived-type algebra. Lane-count changes are named
//! through [`HalfOf`](crate::HalfOf), [`DoubleOf`](crate::DoubleOf),
//! [`ScaleElemBy`](crate::ScaleElemBy) or an explicit destination type whose
//! shape is checked at compile time.
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`arith`] | operators, comparisons, `select`, `abs`, `min`, saturating add/sub |
//! | [`layout`] | `concat`, `split_by`, halves |
//! | [`shuffle`] | `Swizzle`, `zip`, `unzip` |
//! | [`reduce`] | `reduce_add`, `reduce`, `reduce_sum`, `hmin` / `hmax` |
//! | [`widen`] | `mul_widened`, `mul_sum`, `movemask`, `maddubs` |
//! | [`cast`] | `cast`, `convert`, `narrow_saturated`, `bit_cast`, rounding |

pub mod arith;
pub mod cast;
pub mod layout;
pub mod reduce;
pub mod shuffle;
pub mod widen;

pub use arith::Mask;
pub use cast::{simd_cast, static_simd_cast};
pub use layout::{concat, concat_halves, split_halves};
pub use reduce::Horizontal;
pub use shuffle::{unzip, zip, Evens, Odds, Swizzle, ZipHi, ZipLo, DONT_CARE};
pub use widen::{MulSumDefault, MulWidened};
