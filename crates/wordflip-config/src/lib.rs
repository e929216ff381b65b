//! Wordflip configuration system
//!
//! Settings are read from `wordflip.toml`; environment variables override
//! individual values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use wordflip_core::options::{
    DEFAULT_ANIMATION_MS, DEFAULT_CONTAINER_CLASS, DEFAULT_DELAY_MS, DEFAULT_WORD_TAG,
};
use wordflip_core::{CycleOptions, LastWordPolicy, SwitcherOptions};

/// File looked up by [`WordflipConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "wordflip.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WordflipConfig {
    /// Container discovery and word element settings
    pub switcher: SwitcherConfig,
    /// Marker class names
    pub markers: MarkersConfig,
    /// Countdown and animation timing
    pub timing: TimingConfig,
    /// Cycle behaviour
    pub cycle: CycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Class marking container elements
    pub class: String,
    /// Word delimiter inside a container
    pub delimiter: String,
    /// Tag of generated word elements
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkersConfig {
    /// Prefix for `-show`, `-hide`, `-flip-in`, `-flip-out`
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Time a word stays shown between its entry and exit animations
    pub delay_ms: u64,
    /// Simulated animation length; 0 disables simulation
    pub animation_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CycleConfig {
    /// What the last word does: hold, exit or wrap
    pub last_word: LastWordPolicy,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            class: DEFAULT_CONTAINER_CLASS.to_string(),
            delimiter: wordflip_core::words::DEFAULT_DELIMITER.to_string(),
            tag: DEFAULT_WORD_TAG.to_string(),
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            prefix: wordflip_core::markers::DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            animation_ms: DEFAULT_ANIMATION_MS,
        }
    }
}

impl WordflipConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `wordflip.toml` from the current directory, or defaults if it is
    /// missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over file values. Unparseable
    /// values are logged and ignored.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests).
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(class) = lookup("WORDFLIP_CLASS") {
            self.switcher.class = class;
        }
        if let Some(delimiter) = lookup("WORDFLIP_DELIMITER") {
            self.switcher.delimiter = delimiter;
        }
        if let Some(prefix) = lookup("WORDFLIP_PREFIX") {
            self.markers.prefix = prefix;
        }
        if let Some(val) = lookup("WORDFLIP_DELAY_MS") {
            match val.parse::<u64>() {
                Ok(delay) => self.timing.delay_ms = delay,
                Err(_) => warn!(value = %val, "ignoring invalid WORDFLIP_DELAY_MS"),
            }
        }
        if let Some(val) = lookup("WORDFLIP_ANIMATION_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.timing.animation_ms = ms,
                Err(_) => warn!(value = %val, "ignoring invalid WORDFLIP_ANIMATION_MS"),
            }
        }
        if let Some(val) = lookup("WORDFLIP_LAST_WORD") {
            match val.parse::<LastWordPolicy>() {
                Ok(policy) => self.cycle.last_word = policy,
                Err(err) => warn!("ignoring WORDFLIP_LAST_WORD: {err}"),
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from wordflip.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Options handed to the initializer.
    pub fn switcher_options(&self) -> SwitcherOptions {
        SwitcherOptions {
            container_class: self.switcher.class.clone(),
            delimiter: self.switcher.delimiter.clone(),
            word_tag: self.switcher.tag.clone(),
            marker_prefix: self.markers.prefix.clone(),
            animation_ms: (self.timing.animation_ms > 0).then_some(self.timing.animation_ms),
            cycle: CycleOptions {
                delay_ms: self.timing.delay_ms,
                last_word: self.cycle.last_word,
            },
        }
    }
}
