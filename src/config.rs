//! Tunable parameters for the chase core.
//!
//! A [`ChaseConfig`] is plain data: the movement system re-reads it every
//! frame, so replacing it between frames takes effect immediately. Configs
//! load from JSON with every field optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_DANGER_RADIUS, DEFAULT_EVADER_SPEED, DEFAULT_INTELLIGENCE,
    DEFAULT_MID_EDGE_JUKE_CHANCE, DEFAULT_NODE_JUKE_CHANCE, DEFAULT_PURSUER_SPEED,
    DEFAULT_SENSING_RADIUS, DEFAULT_SEPARATION_FOLLOW_CHANCE, DEFAULT_SEPARATION_RANGE,
};

/// Errors raised while loading or validating a [`ChaseConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The JSON document is malformed or has mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its permitted range.
    #[error("config field `{field}` = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },
}

/// Evader and pursuer tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChaseConfig {
    /// Probability in `[0, 1]` that a sensed threat triggers the escape
    /// branch. Evaders may override it individually.
    pub intelligence: f32,
    /// Probability in `[0, 1]` of a node juke after choosing an escape.
    pub node_juke_chance: f32,
    /// Mid-edge reversal rate per simulated second.
    pub mid_edge_juke_chance: f32,
    /// A pursuer closer than this may provoke a mid-edge juke.
    pub danger_radius: f32,
    /// Pursuers closer than this contribute to the threat field.
    pub sensing_radius: f32,
    /// Peer evaders closer than this contribute to the separation field.
    pub separation_range: f32,
    /// Probability in `[0, 1]` of following the separation field when no
    /// threat is acted on.
    pub separation_follow_chance: f32,
    /// Speed of pursuers without their own override; read every frame.
    pub pursuer_speed: f32,
    /// Speed of evaders without their own override; read every frame.
    pub evader_speed: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            intelligence: DEFAULT_INTELLIGENCE,
            node_juke_chance: DEFAULT_NODE_JUKE_CHANCE,
            mid_edge_juke_chance: DEFAULT_MID_EDGE_JUKE_CHANCE,
            danger_radius: DEFAULT_DANGER_RADIUS,
            sensing_radius: DEFAULT_SENSING_RADIUS,
            separation_range: DEFAULT_SEPARATION_RANGE,
            separation_follow_chance: DEFAULT_SEPARATION_FOLLOW_CHANCE,
            pursuer_speed: DEFAULT_PURSUER_SPEED,
            evader_speed: DEFAULT_EVADER_SPEED,
        }
    }
}

impl ChaseConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::OutOfRange`] for invalid values.
    ///
    /// # Examples
    /// ```
    /// use pathchase::ChaseConfig;
    /// let config = ChaseConfig::from_json_str(r#"{ "intelligence": 0.5 }"#).expect("valid");
    /// assert_eq!(config.intelligence, 0.5);
    /// assert_eq!(config.sensing_radius, 30.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks every field against its permitted range.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("intelligence", self.intelligence),
            ("node_juke_chance", self.node_juke_chance),
            ("separation_follow_chance", self.separation_follow_chance),
        ];
        for (field, value) in probabilities {
            check_range(field, value, 0.0, 1.0)?;
        }
        let non_negative = [
            ("mid_edge_juke_chance", self.mid_edge_juke_chance),
            ("danger_radius", self.danger_radius),
            ("sensing_radius", self.sensing_radius),
            ("separation_range", self.separation_range),
            ("pursuer_speed", self.pursuer_speed),
            ("evader_speed", self.evader_speed),
        ];
        for (field, value) in non_negative {
            check_range(field, value, 0.0, f32::MAX)?;
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN fails the containment check.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
