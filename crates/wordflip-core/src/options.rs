//! Setup parameters shared by every container on a page.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::markers::{DEFAULT_PREFIX, MarkerSet};
use crate::words::DEFAULT_DELIMITER;

/// Delay between a word's entry completing and its exit starting.
pub const DEFAULT_DELAY_MS: u64 = 1500;

/// Duration the simulated styling layer takes to play one entry or exit.
pub const DEFAULT_ANIMATION_MS: u64 = 600;

/// Class that marks a container element.
pub const DEFAULT_CONTAINER_CLASS: &str = "words-switcher";

/// Element created for each word.
pub const DEFAULT_WORD_TAG: &str = "span";

/// What happens once the last word has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastWordPolicy {
    /// The last word stays shown once its entry completes; the cycle ends.
    #[default]
    Hold,
    /// The last word runs its countdown and exit, then the cycle ends with
    /// nothing shown.
    Exit,
    /// The last word hands off to the first one and the cycle never ends.
    Wrap,
}

impl FromStr for LastWordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hold" => Ok(Self::Hold),
            "exit" => Ok(Self::Exit),
            "wrap" => Ok(Self::Wrap),
            other => Err(format!("unknown last-word policy '{other}'")),
        }
    }
}

/// Parameters of one container's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOptions {
    pub delay_ms: u64,
    pub last_word: LastWordPolicy,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            last_word: LastWordPolicy::Hold,
        }
    }
}

impl CycleOptions {
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_last_word(mut self, policy: LastWordPolicy) -> Self {
        self.last_word = policy;
        self
    }
}

/// Everything the initializer needs to turn containers into running cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitcherOptions {
    /// Class identifying container elements.
    pub container_class: String,
    /// Literal segment delimiter.
    pub delimiter: String,
    /// Tag name of generated word elements.
    pub word_tag: String,
    /// Prefix the marker class names are derived from.
    pub marker_prefix: String,
    /// Simulated animation length; `None` means a real styling layer reports
    /// completions.
    pub animation_ms: Option<u64>,
    pub cycle: CycleOptions,
}

impl Default for SwitcherOptions {
    fn default() -> Self {
        Self {
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            word_tag: DEFAULT_WORD_TAG.to_string(),
            marker_prefix: DEFAULT_PREFIX.to_string(),
            animation_ms: Some(DEFAULT_ANIMATION_MS),
            cycle: CycleOptions::default(),
        }
    }
}

impl SwitcherOptions {
    /// Derive the marker names for this setup pass.
    pub fn markers(&self) -> MarkerSet {
        MarkerSet::from_prefix(&self.marker_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SwitcherOptions::default();
        assert_eq!(options.container_class, "words-switcher");
        assert_eq!(options.delimiter, "|");
        assert_eq!(options.cycle.delay_ms, 1500);
        assert_eq!(options.cycle.last_word, LastWordPolicy::Hold);
        assert_eq!(options.markers().start, "ws-show ws-flip-in");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Wrap".parse::<LastWordPolicy>(), Ok(LastWordPolicy::Wrap));
        assert_eq!(" exit ".parse::<LastWordPolicy>(), Ok(LastWordPolicy::Exit));
        assert!("loop".parse::<LastWordPolicy>().is_err());
    }
}
