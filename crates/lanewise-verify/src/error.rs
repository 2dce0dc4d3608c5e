//! Error types for the verification harness

use lanewise_core::{ElementKind, Primitive};
use thiserror::Error;

/// Verification error type
#[derive(Error, Debug)]
pub enum Error {
    /// A backend produced a different value than the oracle for an exact primitive
    #[error(
        "{backend} {primitive} on {element}x{lanes}: lane {lane} is {got}, oracle has {expected}"
    )]
    Mismatch {
        backend: &'static str,
        primitive: Primitive,
        element: ElementKind,
        lanes: usize,
        lane: usize,
        got: String,
        expected: String,
    },

    /// An estimate-class primitive strayed further from the oracle than its tolerance
    #[error(
        "{backend} {primitive} on {element}x{lanes}: lane {lane} relative error {relative_error:e} exceeds {tolerance:e}"
    )]
    ToleranceExceeded {
        backend: &'static str,
        primitive: Primitive,
        element: ElementKind,
        lanes: usize,
        lane: usize,
        relative_error: f64,
        tolerance: f64,
    },

    /// Invalid harness configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration or report (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by the vector library itself
    #[error("Core error: {0}")]
    Core(#[from] lanewise_core::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// `true` for errors that report a backend disagreeing with the oracle
    pub fn is_divergence(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::ToleranceExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Mismatch {
            backend: "x86",
            primitive: Primitive::AddSaturated,
            element: ElementKind::I8,
            lanes: 16,
            lane: 3,
            got: "-128".to_string(),
            expected: "127".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "x86 add_saturated on i8x16: lane 3 is -128, oracle has 127"
        );
        assert!(err.is_divergence());

        let err = Error::config("random_rounds must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: random_rounds must be positive"
        );
        assert!(!err.is_divergence());
    }

    #[test]
    fn test_from_conversions() {
        let err: Error = lanewise_core::Error::size_mismatch(4, 1).into();
        assert!(matches!(err, Error::Core(_)));

        let err: Error = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "Other error: boom");

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
