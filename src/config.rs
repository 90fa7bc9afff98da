//! Runtime configuration for the explorer.
//!
//! Every field has a default reproducing the tuned constants of the deployed
//! robot, so an empty JSON object is a valid configuration.
//!
//! # Examples
//!
//! ```
//! use marker_explorer::config::ExplorerConfig;
//!
//! let config = ExplorerConfig::from_json_slice(br#"{"align": {"tolerance": 0.05}}"#)
//!     .expect("valid configuration");
//! assert!((config.align.tolerance - 0.05).abs() < f64::EPSILON);
//! assert_eq!(config.navigation.waypoints.len(), 4);
//! ```

use std::time::Duration;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behavior::domain::{CameraIntrinsics, WaypointEntry, WaypointTable};

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`ExplorerConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level explorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Align behavior settings.
    pub align: AlignConfig,
    /// Rotate-and-detect behavior settings.
    pub rotate: RotateConfig,
    /// Move behavior settings.
    pub navigation: NavigationConfig,
    /// Photograph behavior settings.
    pub photograph: PhotographConfig,
    /// Marker registry service settings.
    pub registry: RegistryConfig,
    /// Capacity of each behavior inbox.
    pub inbox_capacity: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            align: AlignConfig::default(),
            rotate: RotateConfig::default(),
            navigation: NavigationConfig::default(),
            photograph: PhotographConfig::default(),
            registry: RegistryConfig::default(),
            inbox_capacity: 32,
        }
    }
}

impl ExplorerConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`ExplorerConfig::from_json_slice`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let bytes = read_file(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("align.timeout_ms", self.align.timeout_ms),
            ("align.tick_period_ms", self.align.tick_period_ms),
            ("rotate.timeout_ms", self.rotate.timeout_ms),
            ("rotate.tick_period_ms", self.rotate.tick_period_ms),
            ("navigation.server_wait_ms", self.navigation.server_wait_ms),
            ("navigation.tick_period_ms", self.navigation.tick_period_ms),
            ("photograph.timeout_ms", self.photograph.timeout_ms),
            ("photograph.tick_period_ms", self.photograph.tick_period_ms),
            ("registry.broadcast_period_ms", self.registry.broadcast_period_ms),
        ];
        if let Some((field, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{field} must be positive")));
        }
        if self.align.tolerance.is_nan() || self.align.tolerance < 0.0 {
            return Err(invalid("align.tolerance must be non-negative"));
        }
        if self.navigation.waypoints.is_empty() {
            return Err(invalid("navigation.waypoints must not be empty"));
        }
        if self.photograph.marker_size.is_nan() || self.photograph.marker_size <= 0.0 {
            return Err(invalid("photograph.marker_size must be positive"));
        }
        if self.photograph.output_dir.trim().is_empty() {
            return Err(invalid("photograph.output_dir must not be empty"));
        }
        if self.inbox_capacity == 0 {
            return Err(invalid("inbox_capacity must be positive"));
        }
        Ok(())
    }
}

/// Align behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Largest lateral offset accepted as centred.
    pub tolerance: f64,
    /// Magnitude of the corrective yaw rate.
    pub angular_speed: f64,
    /// Deadline for one align step.
    pub timeout_ms: u64,
    /// Tick period.
    pub tick_period_ms: u64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.03,
            angular_speed: 0.3,
            timeout_ms: 5_000,
            tick_period_ms: 100,
        }
    }
}

impl AlignConfig {
    /// Returns the step deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Rotate-and-detect behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotateConfig {
    /// Scanning yaw rate.
    pub angular_speed: f64,
    /// Deadline for one sweep.
    pub timeout_ms: u64,
    /// Tick period.
    pub tick_period_ms: u64,
    /// Longest wait for the registry before a registration is dropped.
    pub registry_wait_ms: u64,
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            angular_speed: 0.5,
            timeout_ms: 60_000,
            tick_period_ms: 100,
            registry_wait_ms: 1_000,
        }
    }
}

impl RotateConfig {
    /// Returns the sweep deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Returns the registry readiness wait.
    #[must_use]
    pub const fn registry_wait(&self) -> Duration {
        Duration::from_millis(self.registry_wait_ms)
    }
}

/// Move behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Tour waypoints, in visiting order.
    pub waypoints: Vec<WaypointEntry>,
    /// Longest wait for the navigation server per tick.
    pub server_wait_ms: u64,
    /// Tick period.
    pub tick_period_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            waypoints: WaypointTable::default_tour().entries().to_vec(),
            server_wait_ms: 1_000,
            tick_period_ms: 500,
        }
    }
}

impl NavigationConfig {
    /// Builds the waypoint table.
    #[must_use]
    pub fn waypoint_table(&self) -> WaypointTable {
        WaypointTable::new(self.waypoints.iter().cloned())
    }

    /// Returns the navigation server wait.
    #[must_use]
    pub const fn server_wait(&self) -> Duration {
        Duration::from_millis(self.server_wait_ms)
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Photograph behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotographConfig {
    /// Deadline for one photograph step.
    pub timeout_ms: u64,
    /// Tick period.
    pub tick_period_ms: u64,
    /// Camera intrinsics used for projection.
    pub intrinsics: CameraIntrinsics,
    /// Physical marker side length in metres.
    pub marker_size: f64,
    /// Directory annotated photographs are written to.
    pub output_dir: String,
}

impl Default for PhotographConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            tick_period_ms: 100,
            intrinsics: CameraIntrinsics::default(),
            marker_size: 0.0742,
            output_dir: "images".to_owned(),
        }
    }
}

impl PhotographConfig {
    /// Returns the step deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Marker registry service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Snapshot broadcast period.
    pub broadcast_period_ms: u64,
    /// Request queue capacity.
    pub request_capacity: usize,
    /// Broadcast channel capacity; slow subscribers skip old snapshots.
    pub broadcast_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            broadcast_period_ms: 500,
            request_capacity: 64,
            broadcast_capacity: 16,
        }
    }
}

impl RegistryConfig {
    /// Returns the broadcast period.
    #[must_use]
    pub const fn broadcast_period(&self) -> Duration {
        Duration::from_millis(self.broadcast_period_ms)
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_owned())
}

fn read_file(path: &Utf8Path) -> std::io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "configuration path has no file name",
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}
