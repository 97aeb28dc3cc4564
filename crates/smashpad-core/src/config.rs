//! Configuration loading and typed config structures for Smashpad.
//!
//! The configuration lives in `smashpad-config.yaml`. Every field has a
//! default, so an empty file (or no file at all) yields the tuned values
//! the toy ships with. The interaction core itself only consumes
//! [`InteractionConfig`], [`ViewportConfig`], and [`CleanupConfig`]; the
//! logging section is read by the engine binary.

use std::path::Path;

use serde::Deserialize;

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "SMASHPAD_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level toy configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToyConfig {
    /// Cooldowns, hold threshold, tween speed, and hit radius.
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Play-area dimensions used for keyboard and gamepad spawns.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Automatic removal of idle objects.
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ToyConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// `SMASHPAD_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interaction.validate()?;
        self.viewport.validate()
    }
}

/// The flat option set injected into the interaction core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InteractionConfig {
    /// Length of both debounce windows (post-spawn and post-movement).
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// How long a pointer must stay down after a spawn before a drag is
    /// primed.
    #[serde(default = "default_hold_duration_ms")]
    pub hold_duration_ms: u64,

    /// Tween progress added per frame tick, in `(0, 1]`.
    #[serde(default = "default_lerp_speed")]
    pub lerp_speed: f64,

    /// Maximum distance from an object's centre that still counts as a hit.
    #[serde(default = "default_hit_radius_px")]
    pub hit_radius_px: f64,

    /// Pointer travel tolerated while waiting for the hold threshold.
    #[serde(default = "default_hold_slop_px")]
    pub hold_slop_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            hold_duration_ms: default_hold_duration_ms(),
            lerp_speed: default_lerp_speed(),
            hit_radius_px: default_hit_radius_px(),
            hold_slop_px: default_hold_slop_px(),
        }
    }
}

impl InteractionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lerp_speed > 0.0 && self.lerp_speed <= 1.0) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "interaction.lerp_speed must be in (0, 1], got {}",
                    self.lerp_speed
                ),
            });
        }
        if !(self.hit_radius_px >= 0.0 && self.hit_radius_px.is_finite()) {
            return Err(ConfigError::Invalid {
                reason: "interaction.hit_radius_px must be a finite non-negative number"
                    .to_owned(),
            });
        }
        if !(self.hold_slop_px >= 0.0 && self.hold_slop_px.is_finite()) {
            return Err(ConfigError::Invalid {
                reason: "interaction.hold_slop_px must be a finite non-negative number"
                    .to_owned(),
            });
        }
        Ok(())
    }
}

/// Play-area dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    /// Width in pixels.
    #[serde(default = "default_viewport_width")]
    pub width: f64,

    /// Height in pixels.
    #[serde(default = "default_viewport_height")]
    pub height: f64,

    /// Distance from each edge that keyboard/gamepad spawns stay clear of.
    #[serde(default = "default_viewport_margin")]
    pub margin: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            margin: default_viewport_margin(),
        }
    }
}

impl ViewportConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.margin >= 0.0 && self.margin.is_finite()) {
            return Err(ConfigError::Invalid {
                reason: "viewport.margin must be a finite non-negative number".to_owned(),
            });
        }
        let min_extent = self.margin * 2.0;
        if !(self.width > min_extent && self.height > min_extent) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "viewport {}x{} leaves no room inside a {}px margin",
                    self.width, self.height, self.margin
                ),
            });
        }
        Ok(())
    }
}

/// Automatic cleanup of objects nobody is playing with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CleanupConfig {
    /// Inactive objects untouched for this long are removed (0 disables).
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,

    /// Cap on live objects; the oldest inactive one makes room for a new
    /// spawn (0 disables).
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            idle_ms: default_idle_ms(),
            max_objects: default_max_objects(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. `info`, `smashpad_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Apply the `SMASHPAD_LOG` override, if present and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV)
            && !level.trim().is_empty()
        {
            self.level = level;
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_cooldown_ms() -> u64 {
    200
}

const fn default_hold_duration_ms() -> u64 {
    500
}

const fn default_lerp_speed() -> f64 {
    0.15
}

const fn default_hit_radius_px() -> f64 {
    60.0
}

const fn default_hold_slop_px() -> f64 {
    10.0
}

const fn default_viewport_width() -> f64 {
    1280.0
}

const fn default_viewport_height() -> f64 {
    720.0
}

const fn default_viewport_margin() -> f64 {
    50.0
}

const fn default_idle_ms() -> u64 {
    30_000
}

const fn default_max_objects() -> usize {
    40
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = ToyConfig::parse("").unwrap();
        assert_eq!(config.interaction.cooldown_ms, 200);
        assert_eq!(config.interaction.hold_duration_ms, 500);
        assert!((config.interaction.lerp_speed - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.cleanup.max_objects, 40);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = "interaction:\n  cooldown_ms: 350\nviewport:\n  width: 800.0\n";
        let config = ToyConfig::parse(yaml).unwrap();
        assert_eq!(config.interaction.cooldown_ms, 350);
        assert_eq!(config.interaction.hold_duration_ms, 500);
        assert!((config.viewport.width - 800.0).abs() < f64::EPSILON);
        assert!((config.viewport.height - 720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn json_log_format_parses() {
        let config = ToyConfig::parse("logging:\n  format: json\n").unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn zero_lerp_speed_is_rejected() {
        let result = ToyConfig::parse("interaction:\n  lerp_speed: 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn lerp_speed_above_one_is_rejected() {
        let result = ToyConfig::parse("interaction:\n  lerp_speed: 1.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn negative_hit_radius_is_rejected() {
        let result = ToyConfig::parse("interaction:\n  hit_radius_px: -1.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn viewport_smaller_than_margins_is_rejected() {
        let result = ToyConfig::parse("viewport:\n  width: 90.0\n  margin: 50.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = ToyConfig::parse("interaction: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ToyConfig::from_file(Path::new("/nonexistent/smashpad-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let yaml = include_str!("../../../smashpad-config.yaml");
        let config = ToyConfig::parse(yaml).unwrap();
        let defaults = ToyConfig::default();
        assert_eq!(config.interaction, defaults.interaction);
        assert_eq!(config.viewport, defaults.viewport);
        assert_eq!(config.cleanup, defaults.cleanup);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}
