// Global configuration for the decay sampler
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{DecayError, Result};

// Process-wide default settings
pub static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

/// Numerical settings and cutoffs used by the exit channels and the cascade
/// driver.
///
/// A single global instance is exposed via the `CONFIG` static. Channels take
/// a snapshot of it when they are constructed (see [`Config::global`]), so
/// changing the global settings never alters a channel that already exists.
/// Channels built with `with_config` ignore the global instance entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of Chebyshev nodes used for the first interpolation attempt
    pub initial_degree: usize,
    /// Largest node count tried before accepting an unconverged interpolant
    pub max_degree: usize,
    /// Relative size of the trailing Chebyshev coefficients that counts as converged
    pub interpolation_tolerance: f64,
    /// Root-finding tolerance for CDF inversion, relative to the interval width
    pub root_tolerance: f64,
    /// Iteration cap for CDF inversion
    pub max_root_iterations: usize,
    /// Largest fragment orbital angular momentum included in spin-parity tables
    pub fragment_l_max: u32,
    /// Largest gamma-ray multipolarity included in spin-parity tables
    pub max_gamma_multipolarity: u32,
    /// Step limit for a single cascade
    pub max_cascade_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_degree: 16,
            max_degree: 1024,
            interpolation_tolerance: 1e-10,
            root_tolerance: 1e-12,
            max_root_iterations: 200,
            fragment_l_max: 5,
            max_gamma_multipolarity: 2,
            max_cascade_steps: 1000,
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| DecayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DecayError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DecayError::Config(e.to_string()))
    }

    /// Check that the settings can drive the sampler.
    pub fn validate(&self) -> Result<()> {
        if self.initial_degree < 2 {
            return Err(DecayError::Config(format!(
                "initial_degree must be at least 2, got {}",
                self.initial_degree
            )));
        }
        if self.max_degree < self.initial_degree {
            return Err(DecayError::Config(format!(
                "max_degree ({}) is below initial_degree ({})",
                self.max_degree, self.initial_degree
            )));
        }
        if !(self.interpolation_tolerance > 0.0) || !(self.root_tolerance > 0.0) {
            return Err(DecayError::Config(
                "tolerances must be positive".to_string(),
            ));
        }
        if self.max_root_iterations == 0 || self.max_cascade_steps == 0 {
            return Err(DecayError::Config(
                "iteration and step limits must be non-zero".to_string(),
            ));
        }
        if self.max_gamma_multipolarity == 0 {
            return Err(DecayError::Config(
                "max_gamma_multipolarity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the global configuration instance
    pub fn global() -> std::sync::MutexGuard<'static, Self> {
        CONFIG
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current global configuration
    pub fn snapshot() -> Self {
        Self::global().clone()
    }

    /// Replace the global configuration after validating it.
    pub fn set_global(config: Config) -> Result<()> {
        config.validate()?;
        *Self::global() = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::new().fragment_l_max, 5);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = Config::from_json_str(r#"{"max_degree": 256, "fragment_l_max": 3}"#).unwrap();
        assert_eq!(config.max_degree, 256);
        assert_eq!(config.fragment_l_max, 3);
        assert_eq!(config.initial_degree, 16);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::default();
        config.max_cascade_steps = 50;
        let text = config.to_json_string().unwrap();
        assert_eq!(Config::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = Config::from_json_str(r#"{"initial_degree": 64, "max_degree": 32}"#);
        assert!(matches!(err, Err(DecayError::Config(_))));
        assert!(Config::from_json_str(r#"{"root_tolerance": 0.0}"#).is_err());
        assert!(Config::from_json_str("not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_json_file("/nonexistent/hf_decay.json");
        assert!(matches!(err, Err(DecayError::Config(_))));
    }

    #[test]
    fn test_global_snapshot() {
        let snapshot = Config::snapshot();
        assert!(snapshot.validate().is_ok());
    }
}
