//! Style marker names consumed by the external stylesheet.

use serde::{Deserialize, Serialize};

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "ws";

/// A named visual-state tag carried by a word node.
///
/// `Shown`/`Hidden` form the visibility set, `Entering`/`Exiting` the
/// transient set. A node always has exactly one of the former and at most one
/// of the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Shown,
    Hidden,
    Entering,
    Exiting,
}

/// Class names derived from a single prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    pub show: String,
    pub hide: String,
    pub entry: String,
    pub exit: String,
    /// `show entry`, applied to the first word at setup.
    pub start: String,
    /// `hide exit`.
    pub end: String,
}

impl MarkerSet {
    /// Derive every class name from `prefix`.
    pub fn from_prefix(prefix: &str) -> Self {
        let show = format!("{prefix}-show");
        let hide = format!("{prefix}-hide");
        let entry = format!("{prefix}-flip-in");
        let exit = format!("{prefix}-flip-out");
        let start = format!("{show} {entry}");
        let end = format!("{hide} {exit}");
        Self {
            show,
            hide,
            entry,
            exit,
            start,
            end,
        }
    }

    /// Class name for a single marker.
    pub fn name(&self, marker: Marker) -> &str {
        match marker {
            Marker::Shown => &self.show,
            Marker::Hidden => &self.hide,
            Marker::Entering => &self.entry,
            Marker::Exiting => &self.exit,
        }
    }

    /// Space-separated class attribute value for a marker list.
    pub fn class_list(&self, markers: &[Marker]) -> String {
        markers
            .iter()
            .map(|m| self.name(*m))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Map a class name back to its marker, if it belongs to this set.
    pub fn marker_for(&self, class: &str) -> Option<Marker> {
        [
            Marker::Shown,
            Marker::Hidden,
            Marker::Entering,
            Marker::Exiting,
        ]
        .into_iter()
        .find(|m| self.name(*m) == class)
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::from_prefix(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_names() {
        let set = MarkerSet::default();
        assert_eq!(set.show, "ws-show");
        assert_eq!(set.hide, "ws-hide");
        assert_eq!(set.entry, "ws-flip-in");
        assert_eq!(set.exit, "ws-flip-out");
        assert_eq!(set.start, "ws-show ws-flip-in");
        assert_eq!(set.end, "ws-hide ws-flip-out");
    }

    #[test]
    fn test_custom_prefix_is_deterministic() {
        let a = MarkerSet::from_prefix("hero");
        let b = MarkerSet::from_prefix("hero");
        assert_eq!(a, b);
        assert_eq!(a.entry, "hero-flip-in");
    }

    #[test]
    fn test_class_list_matches_composites() {
        let set = MarkerSet::default();
        assert_eq!(
            set.class_list(&[Marker::Shown, Marker::Entering]),
            set.start
        );
        assert_eq!(set.class_list(&[Marker::Hidden, Marker::Exiting]), set.end);
        assert_eq!(set.class_list(&[]), "");
    }

    #[test]
    fn test_marker_for_reverse_lookup() {
        let set = MarkerSet::default();
        assert_eq!(set.marker_for("ws-flip-out"), Some(Marker::Exiting));
        assert_eq!(set.marker_for("words-switcher"), None);
    }
}
