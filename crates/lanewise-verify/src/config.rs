//! Harness configuration
//!
//! A [`CheckConfig`] is plain data: it can be built in code with the `with_*`
//! setters or loaded from JSON, where every field is optional.
//!
//! ```rust
//! use lanewise_verify::CheckConfig;
//!
//! let config = CheckConfig::from_json(r#"{ "seed": 7, "primitives": ["mul_sum"] }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.random_rounds, CheckConfig::default().random_rounds);
//! ```

use std::path::Path;

use lanewise_core::Primitive;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings for one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Seed of the random input generator
    pub seed: u64,
    /// Random vectors generated per `(primitive, element, lanes)` case, on top
    /// of the boundary vectors
    pub random_rounds: usize,
    /// Primitives to check; empty means all
    pub primitives: Vec<Primitive>,
    /// Stop at the first divergence instead of collecting all of them
    pub fail_fast: bool,
    /// Factor applied to every backend-declared tolerance
    pub tolerance_scale: f64,
    /// Mismatching lanes kept per case in the report
    pub max_reported: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            seed: 0x1a2e_5eed,
            random_rounds: 256,
            primitives: Vec::new(),
            fail_fast: false,
            tolerance_scale: 1.0,
            max_reported: 8,
        }
    }
}

impl CheckConfig {
    /// Set the input generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of random vectors per case
    pub fn with_random_rounds(mut self, random_rounds: usize) -> Self {
        self.random_rounds = random_rounds;
        self
    }

    /// Restrict the run to the given primitives
    pub fn with_primitives(mut self, primitives: impl IntoIterator<Item = Primitive>) -> Self {
        self.primitives = primitives.into_iter().collect();
        self
    }

    /// Stop at the first divergence
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Scale every backend tolerance by `scale`
    pub fn with_tolerance_scale(mut self, scale: f64) -> Self {
        self.tolerance_scale = scale;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the settings describe a meaningful run
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance_scale.is_finite() || self.tolerance_scale < 0.0 {
            return Err(Error::config(format!(
                "tolerance_scale must be finite and non-negative, got {}",
                self.tolerance_scale
            )));
        }
        if self.max_reported == 0 {
            return Err(Error::config("max_reported must be at least 1"));
        }
        Ok(())
    }

    /// Whether `primitive` is part of this run
    pub fn is_enabled(&self, primitive: Primitive) -> bool {
        self.primitives.is_empty() || self.primitives.contains(&primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = CheckConfig::default();
        assert!(Primitive::ALL.iter().all(|&p| config.is_enabled(p)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CheckConfig::default()
            .with_seed(42)
            .with_random_rounds(3)
            .with_primitives([Primitive::Sqrt, Primitive::Round])
            .with_fail_fast(true)
            .with_tolerance_scale(2.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.random_rounds, 3);
        assert!(config.fail_fast);
        assert!(config.is_enabled(Primitive::Sqrt));
        assert!(!config.is_enabled(Primitive::Abs));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CheckConfig::default()
            .with_seed(9)
            .with_primitives([Primitive::MulSum]);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"mul_sum\""));
        assert_eq!(CheckConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = CheckConfig::from_json(r#"{ "tolerance_scale": -1.0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = CheckConfig::from_json(r#"{ "seeds": 1 }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = CheckConfig::from_json(r#"{ "primitives": ["fma"] }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CheckConfig::from_path("/nonexistent/lanewise.json").unwrap_err();
        assert!(matches!(err, Error::Other(_)));
    }
}
