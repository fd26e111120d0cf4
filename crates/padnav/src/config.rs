#![forbid(unsafe_code)]

//! Tunable parameters for the navigation engine.
//!
//! Every field defaults to the empirically tuned value the engine ships
//! with, so `NavConfig::default()` is the reference behavior. With the
//! `policy-config` feature the config can be loaded from TOML or JSON:
//!
//! ```toml
//! # padnav.toml
//! direction_threshold = 24.0
//! debounce_ms = 80
//! ```
//!
//! ```rust,ignore
//! let config = NavConfig::from_toml_file("padnav.toml")?;
//! ```

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use padnav_core::geometry::DEFAULT_DIRECTION_THRESHOLD;

/// Default tolerance (layout units) for grouping grid cells into a row or
/// column.
pub const DEFAULT_CLUSTER_TOLERANCE: f64 = 10.0;

/// Default maximum focus-history depth.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct NavConfig {
    /// Minimum displacement along the movement axis. Default: 20.
    pub direction_threshold: f64,
    /// Row/column clustering tolerance for implicit grids. Default: 10.
    pub cluster_tolerance: f64,
    /// Weight of the angular deviation in the composite score. Default: 2.
    pub angle_weight: f64,
    /// Focus-history capacity. Default: 50.
    pub history_capacity: usize,
    /// Trailing-edge debounce window for directional input. Default: 50ms.
    pub debounce_ms: u64,
    /// Per-gesture latency budget; slower gestures are logged. Default: 16ms.
    pub frame_budget_ms: u64,
    /// Delay callers wait after a screen transition before trusting the
    /// candidate set. Default: 100ms.
    pub settle_delay_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            cluster_tolerance: DEFAULT_CLUSTER_TOLERANCE,
            angle_weight: 2.0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            debounce_ms: 50,
            frame_budget_ms: 16,
            settle_delay_ms: 100,
        }
    }
}

impl NavConfig {
    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[inline]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }

    #[inline]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, NavConfigError> {
        let config: Self = toml::from_str(s).map_err(NavConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NavConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NavConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, NavConfigError> {
        let config: Self = serde_json::from_str(s).map_err(NavConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NavConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(NavConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.direction_threshold.is_finite() || self.direction_threshold < 0.0 {
            errors.push(format!(
                "direction_threshold must be a finite value >= 0, got {}",
                self.direction_threshold
            ));
        }
        if !self.cluster_tolerance.is_finite() || self.cluster_tolerance < 0.0 {
            errors.push(format!(
                "cluster_tolerance must be a finite value >= 0, got {}",
                self.cluster_tolerance
            ));
        }
        if !self.angle_weight.is_finite() || self.angle_weight < 0.0 {
            errors.push(format!(
                "angle_weight must be a finite value >= 0, got {}",
                self.angle_weight
            ));
        }
        if self.history_capacity == 0 {
            errors.push("history_capacity must be > 0".to_string());
        }
        if self.frame_budget_ms == 0 {
            errors.push("frame_budget_ms must be > 0".to_string());
        }
        errors
    }

    /// `self` if valid, otherwise the collected validation errors.
    pub fn checked(self) -> Result<Self, NavConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(NavConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a navigation configuration.
#[derive(Debug)]
pub enum NavConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for NavConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for NavConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
