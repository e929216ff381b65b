//! Per-word lifecycle.

use serde::{Deserialize, Serialize};

use crate::markers::Marker;

/// Where a word node is in its show/hide cycle.
///
/// ```text
/// Hidden -> Showing -(entry done)-> Steady -(delay)-> Exiting -(exit done)-> Hidden
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordPhase {
    #[default]
    Hidden,
    /// Entry animation playing.
    Showing,
    /// Entry finished; visible until the exit countdown elapses.
    Steady,
    /// Exit animation playing.
    Exiting,
}

impl WordPhase {
    /// Markers the stylesheet sees for this phase.
    ///
    /// `Steady` keeps the entry marker until the exit countdown elapses.
    pub fn markers(self) -> &'static [Marker] {
        match self {
            Self::Hidden => &[Marker::Hidden],
            Self::Showing | Self::Steady => &[Marker::Shown, Marker::Entering],
            Self::Exiting => &[Marker::Shown, Marker::Exiting],
        }
    }

    pub fn is_shown(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether the styling layer is expected to report a completion.
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Showing | Self::Exiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_sets_are_exclusive() {
        for phase in [
            WordPhase::Hidden,
            WordPhase::Showing,
            WordPhase::Steady,
            WordPhase::Exiting,
        ] {
            let markers = phase.markers();
            let visible = markers
                .iter()
                .filter(|m| matches!(m, Marker::Shown | Marker::Hidden))
                .count();
            let transient = markers
                .iter()
                .filter(|m| matches!(m, Marker::Entering | Marker::Exiting))
                .count();
            assert_eq!(visible, 1, "{phase:?}");
            assert!(transient <= 1, "{phase:?}");
        }
    }

    #[test]
    fn test_hidden_is_not_shown() {
        assert!(!WordPhase::Hidden.is_shown());
        assert!(WordPhase::Steady.is_shown());
        assert!(!WordPhase::Steady.is_animating());
        assert!(WordPhase::Exiting.is_animating());
    }
}
