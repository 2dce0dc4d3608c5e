//! Oracle-vs-backend correctness checks for `lanewise` primitives
//!
//! Every backend override must agree with the reference oracle: bit-exactly
//! for integer, bitwise, saturating and reduction primitives, and within the
//! backend's declared tolerance for estimate-class float primitives.
//!
//! # Components
//!
//! - [`inputs`] - boundary tables, seeded random vectors, per-primitive sanitizing
//! - [`compare`] - lane comparison rules
//! - [`harness`] - [`OracleCheck`] and the [`CheckReport`] it produces
//! - [`config`] - [`CheckConfig`], loadable from JSON
//!
//! # Example
//!
//! ```rust
//! use lanewise_verify::{check_all, CheckConfig};
//!
//! let report = check_all(CheckConfig::default().with_random_rounds(16)).unwrap();
//! assert!(report.passed(), "{}", report.to_json().unwrap());
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod harness;
pub mod inputs;

pub use compare::{compare_lanes, lane_matches, LaneMismatch};
pub use config::CheckConfig;
pub use error::{Error, Result};
pub use harness::{check_all, check_backend, CaseReport, CheckReport, OracleCheck};
pub use inputs::{boundary_values, sanitize, InputGenerator};
