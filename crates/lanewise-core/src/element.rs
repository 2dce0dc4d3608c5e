//! Element kinds and the lane-level numeric trait hierarchy
//!
//! This module describes *what* lives in a lane. It is pure type information
//! plus the scalar arithmetic the reference oracle is defined with.
//!
//! # Design Philosophy
//!
//! - **Closed set**: the ten primitive kinds below, nothing else. `Element` is sealed.
//! - **Table driven**: every impl comes from one row of `element_table!`
//! - **Defined overflow**: integer lane arithmetic wraps, so the oracle is total

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use bytemuck::Pod;
use num_traits::{Bounded, Float, NumCast, One, PrimInt, Saturating, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::Error;

mod private {
    pub trait Sealed {}
}

pub(crate) use private::Sealed;

/// Primitive element kind of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ElementKind {
    /// Every supported kind, signed integers first
    pub const ALL: [ElementKind; 10] = [
        ElementKind::I8,
        ElementKind::I16,
        ElementKind::I32,
        ElementKind::I64,
        ElementKind::U8,
        ElementKind::U16,
        ElementKind::U32,
        ElementKind::U64,
        ElementKind::F32,
        ElementKind::F64,
    ];

    /// Width of one lane in bytes
    pub const fn size(self) -> usize {
        match self {
            ElementKind::I8 | ElementKind::U8 => 1,
            ElementKind::I16 | ElementKind::U16 => 2,
            ElementKind::I32 | ElementKind::U32 | ElementKind::F32 => 4,
            ElementKind::I64 | ElementKind::U64 | ElementKind::F64 => 8,
        }
    }

    /// Floats count as signed
    pub const fn is_signed(self) -> bool {
        !matches!(
            self,
            ElementKind::U8 | ElementKind::U16 | ElementKind::U32 | ElementKind::U64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    pub const fn is_integral(self) -> bool {
        !self.is_float()
    }

    /// Lowercase Rust spelling, e.g. `"u16"`
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::I8 => "i8",
            ElementKind::I16 => "i16",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::U8 => "u8",
            ElementKind::U16 => "u16",
            ElementKind::U32 => "u32",
            ElementKind::U64 => "u64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidParameter(format!("unknown element kind `{s}`")))
    }
}

// =============================================================================
// Byte-width markers
// =============================================================================

/// Type-level lane width, used to key the reinterpretation table
pub trait ByteWidth: Sealed + Copy + Debug + Send + Sync + 'static {
    const BYTES: usize;
}

macro_rules! byte_widths {
    ($($name:ident = $bytes:literal),* $(,)?) => {
        $(
            #[doc = concat!("Marker for ", stringify!($bytes), "-byte lanes")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name;

            impl Sealed for $name {}

            impl ByteWidth for $name {
                const BYTES: usize = $bytes;
            }
        )*
    };
}

byte_widths!(W1 = 1, W2 = 2, W4 = 4, W8 = 8);

// =============================================================================
// Trait hierarchy
// =============================================================================

/// A primitive that can occupy a lane
///
/// Lane arithmetic here is what the oracle means by `+`, `-`, `*`: integers
/// wrap, floats follow IEEE-754.
pub trait Element:
    Sealed
    + Pod
    + Default
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Zero
    + One
    + Bounded
    + NumCast
    + ToPrimitive
    + Send
    + Sync
    + 'static
{
    /// Runtime tag for this type
    const KIND: ElementKind;

    /// Lane width in bits
    const BITS: u32;

    /// Type-level lane width
    type Width: ByteWidth;

    /// Unsigned integer of the same width, used for comparison results
    type Mask: IntElement;

    fn lane_add(self, rhs: Self) -> Self;

    fn lane_sub(self, rhs: Self) -> Self;

    fn lane_mul(self, rhs: Self) -> Self;

    fn lane_neg(self) -> Self;

    /// `abs` of the signed minimum wraps back to the minimum
    fn lane_abs(self) -> Self;

    /// Returns `self` when `self < rhs`, otherwise `rhs`
    #[inline]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    /// Returns `self` when `self > rhs`, otherwise `rhs`
    #[inline]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }

    /// Most significant bit of the lane's bit pattern
    fn sign_bit(self) -> bool;

    /// Lossy conversion used when generating test inputs
    fn from_f64_lossy(value: f64) -> Self;

    fn to_f64_lossy(self) -> f64;
}

/// Integer lanes: bitwise operations, shifts and saturating arithmetic
pub trait IntElement: Element + PrimInt + Saturating {
    /// Every bit set
    const ALL_ONES: Self;

    /// Shift left, count taken modulo the lane width
    fn lane_shl(self, count: u32) -> Self;

    /// Arithmetic shift for signed lanes, logical for unsigned
    fn lane_shr(self, count: u32) -> Self;

    #[inline]
    fn from_bool(value: bool) -> Self {
        if value {
            Self::ALL_ONES
        } else {
            Self::zero()
        }
    }
}

/// Floating-point lanes
pub trait FloatElement: Element + Float {
    /// Signed integer of the same width, the target of `round_to_integer`
    type Int: IntElement;

    /// Smallest value that converts to `Int` without leaving its range
    const SAFE_INT_MIN: Self;

    /// Largest value that converts to `Int` without leaving its range
    const SAFE_INT_MAX: Self;

    /// Round half to even
    fn round_even(self) -> Self;

    /// `as` conversion to the same-width integer; saturates, NaN becomes zero
    fn to_int(self) -> Self::Int;
}

// =============================================================================
// Implementations
// =============================================================================

macro_rules! element_table {
    (@lanes signed) => {
        #[inline]
        fn lane_add(self, rhs: Self) -> Self {
            self.wrapping_add(rhs)
        }

        #[inline]
        fn lane_sub(self, rhs: Self) -> Self {
            self.wrapping_sub(rhs)
        }

        #[inline]
        fn lane_mul(self, rhs: Self) -> Self {
            self.wrapping_mul(rhs)
        }

        #[inline]
        fn lane_neg(self) -> Self {
            self.wrapping_neg()
        }

        #[inline]
        fn lane_abs(self) -> Self {
            self.wrapping_abs()
        }

        #[inline]
        fn sign_bit(self) -> bool {
            self < 0
        }
    };
    (@lanes unsigned) => {
        #[inline]
        fn lane_add(self, rhs: Self) -> Self {
            self.wrapping_add(rhs)
        }

        #[inline]
        fn lane_sub(self, rhs: Self) -> Self {
            self.wrapping_sub(rhs)
        }

        #[inline]
        fn lane_mul(self, rhs: Self) -> Self {
            self.wrapping_mul(rhs)
        }

        #[inline]
        fn lane_neg(self) -> Self {
            self.wrapping_neg()
        }

        #[inline]
        fn lane_abs(self) -> Self {
            self
        }

        #[inline]
        fn sign_bit(self) -> bool {
            (self >> (Self::BITS - 1)) != 0
        }
    };
    (@lanes float) => {
        #[inline]
        fn lane_add(self, rhs: Self) -> Self {
            self + rhs
        }

        #[inline]
        fn lane_sub(self, rhs: Self) -> Self {
            self - rhs
        }

        #[inline]
        fn lane_mul(self, rhs: Self) -> Self {
            self * rhs
        }

        #[inline]
        fn lane_neg(self) -> Self {
            -self
        }

        #[inline]
        fn lane_abs(self) -> Self {
            self.abs()
        }

        #[inline]
        fn sign_bit(self) -> bool {
            self.is_sign_negative()
        }
    };
    (@int $t:ty) => {
        impl IntElement for $t {
            const ALL_ONES: Self = !0;

            #[inline]
            fn lane_shl(self, count: u32) -> Self {
                self.wrapping_shl(count)
            }

            #[inline]
            fn lane_shr(self, count: u32) -> Self {
                self.wrapping_shr(count)
            }
        }
    };
    ($($t:ty => $kind:ident, $width:ty, mask = $mask:ty, $class:ident;)*) => {
        $(
            impl Sealed for $t {}

            impl Element for $t {
                const KIND: ElementKind = ElementKind::$kind;
                const BITS: u32 = (core::mem::size_of::<$t>() * 8) as u32;
                type Width = $width;
                type Mask = $mask;

                element_table!(@lanes $class);

                #[inline]
                fn from_f64_lossy(value: f64) -> Self {
                    value as $t
                }

                #[inline]
                fn to_f64_lossy(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

element_table! {
    i8 => I8, W1, mask = u8, signed;
    i16 => I16, W2, mask = u16, signed;
    i32 => I32, W4, mask = u32, signed;
    i64 => I64, W8, mask = u64, signed;
    u8 => U8, W1, mask = u8, unsigned;
    u16 => U16, W2, mask = u16, unsigned;
    u32 => U32, W4, mask = u32, unsigned;
    u64 => U64, W8, mask = u64, unsigned;
    f32 => F32, W4, mask = u32, float;
    f64 => F64, W8, mask = u64, float;
}

element_table!(@int i8);
element_table!(@int i16);
element_table!(@int i32);
element_table!(@int i64);
element_table!(@int u8);
element_table!(@int u16);
element_table!(@int u32);
element_table!(@int u64);

impl FloatElement for f32 {
    type Int = i32;
    const SAFE_INT_MIN: Self = -2_147_483_648.0;
    // largest f32 below 2^31
    const SAFE_INT_MAX: Self = 2_147_483_520.0;

    #[inline]
    fn round_even(self) -> Self {
        self.round_ties_even()
    }

    #[inline]
    fn to_int(self) -> i32 {
        self as i32
    }
}

impl FloatElement for f64 {
    type Int = i64;
    const SAFE_INT_MIN: Self = -9_223_372_036_854_775_808.0;
    // largest f64 below 2^63
    const SAFE_INT_MAX: Self = 9_223_372_036_854_774_784.0;

    #[inline]
    fn round_even(self) -> Self {
        self.round_ties_even()
    }

    #[inline]
    fn to_int(self) -> i64 {
        self as i64
    }
}

// =============================================================================
// Tests
// =============================================================================
