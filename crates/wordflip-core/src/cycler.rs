//! The cycling routine for one container.
//!
//! A [`WordCycler`] owns the container's word nodes and advances them in
//! response to two kinds of [`Signal`]: an animation completing on a word, and
//! a word's exit countdown elapsing. Each signal yields the [`Effect`]s the
//! host has to carry out (update a class attribute, arm a timer).
//!
//! # Usage
//!
//! ```
//! use wordflip_core::{CycleOptions, Effect, Signal, WordCycler, WordPhase};
//!
//! let mut cycler = WordCycler::new(vec!["a".into(), "b".into()], CycleOptions::default());
//! assert_eq!(cycler.phase(0), Some(WordPhase::Showing));
//!
//! // Entry animation on "a" finished: a countdown is armed.
//! let effects = cycler.handle(Signal::AnimationCompleted { word: 0 }).unwrap();
//! let countdown = effects
//!     .iter()
//!     .find_map(|e| match e {
//!         Effect::ArmTimer { countdown, .. } => Some(*countdown),
//!         _ => None,
//!     })
//!     .unwrap();
//!
//! // Countdown elapsed, then the exit animation finished: "b" takes over.
//! cycler.handle(Signal::TimerElapsed { word: 0, countdown }).unwrap();
//! cycler.handle(Signal::AnimationCompleted { word: 0 }).unwrap();
//! assert_eq!(cycler.phase(0), Some(WordPhase::Hidden));
//! assert_eq!(cycler.phase(1), Some(WordPhase::Showing));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CycleError, Result};
use crate::markers::{Marker, MarkerSet};
use crate::options::{CycleOptions, LastWordPolicy};
use crate::phase::WordPhase;

/// Input driving a cycler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// The styling layer finished the animation currently playing on `word`.
    AnimationCompleted { word: usize },
    /// The exit countdown armed for `word` elapsed.
    TimerElapsed { word: usize, countdown: u64 },
}

impl Signal {
    pub fn word(&self) -> usize {
        match self {
            Self::AnimationCompleted { word } | Self::TimerElapsed { word, .. } => *word,
        }
    }
}

/// Work the host carries out after a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// `word` moved between phases; its markers must be re-rendered.
    PhaseChanged {
        word: usize,
        from: WordPhase,
        to: WordPhase,
    },
    /// Deliver `Signal::TimerElapsed { word, countdown }` after `delay_ms`.
    ArmTimer {
        word: usize,
        delay_ms: u64,
        countdown: u64,
    },
    /// The cycle reached its end; `shown` is the word left visible, if any.
    Finished { shown: Option<usize> },
}

/// One rendered segment of the container's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordNode {
    pub text: String,
    pub phase: WordPhase,
    /// Pending exit countdown, cleared when it fires.
    pub countdown: Option<u64>,
}

impl WordNode {
    fn new(text: String, phase: WordPhase) -> Self {
        Self {
            text,
            phase,
            countdown: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordCycler {
    nodes: Vec<WordNode>,
    options: CycleOptions,
    next_countdown: u64,
    finished: bool,
}

impl WordCycler {
    /// Build the word nodes: the first starts showing, the rest are hidden.
    ///
    /// A cycler without words is finished from the start.
    pub fn new(words: Vec<String>, options: CycleOptions) -> Self {
        let nodes: Vec<WordNode> = words
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let phase = if index == 0 {
                    WordPhase::Showing
                } else {
                    WordPhase::Hidden
                };
                WordNode::new(text, phase)
            })
            .collect();
        let finished = nodes.is_empty();
        Self {
            nodes,
            options,
            next_countdown: 1,
            finished,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn options(&self) -> &CycleOptions {
        &self.options
    }

    pub fn nodes(&self) -> &[WordNode] {
        &self.nodes
    }

    pub fn node(&self, word: usize) -> Option<&WordNode> {
        self.nodes.get(word)
    }

    pub fn phase(&self, word: usize) -> Option<WordPhase> {
        self.nodes.get(word).map(|n| n.phase)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.text.as_str())
    }

    pub fn markers(&self, word: usize) -> Option<&'static [Marker]> {
        self.phase(word).map(WordPhase::markers)
    }

    /// Class attribute value for `word` under the given marker names.
    pub fn class_attr(&self, word: usize, markers: &MarkerSet) -> Option<String> {
        self.markers(word).map(|m| markers.class_list(m))
    }

    /// Index of the word currently shown.
    pub fn active(&self) -> Option<usize> {
        self.nodes.iter().position(|n| n.phase.is_shown())
    }

    pub fn shown_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.phase.is_shown()).count()
    }

    /// Whether no further signal can change any word.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Word that takes over from `word` after its exit.
    pub fn successor(&self, word: usize) -> Option<usize> {
        if word + 1 < self.nodes.len() {
            Some(word + 1)
        } else if self.options.last_word == LastWordPolicy::Wrap && !self.nodes.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// React to one signal.
    pub fn handle(&mut self, signal: Signal) -> Result<Vec<Effect>> {
        let word = signal.word();
        let Some(node) = self.nodes.get(word) else {
            return Err(CycleError::UnknownWord {
                index: word,
                len: self.nodes.len(),
            });
        };
        let phase = node.phase;
        let pending = node.countdown;

        let effects = match (signal, phase) {
            (Signal::AnimationCompleted { .. }, WordPhase::Showing) => self.entry_completed(word),
            (Signal::AnimationCompleted { .. }, WordPhase::Exiting) => self.exit_completed(word),
            (Signal::TimerElapsed { countdown, .. }, WordPhase::Steady)
                if pending == Some(countdown) =>
            {
                self.nodes[word].countdown = None;
                vec![self.set_phase(word, WordPhase::Exiting)]
            }
            _ => {
                trace!(word, ?phase, ?signal, "signal ignored");
                Vec::new()
            }
        };
        Ok(effects)
    }

    fn entry_completed(&mut self, word: usize) -> Vec<Effect> {
        let changed = self.set_phase(word, WordPhase::Steady);
        if self.successor(word).is_none() && self.options.last_word == LastWordPolicy::Hold {
            self.finished = true;
            debug!(word, "cycle finished, holding last word");
            return vec![changed, Effect::Finished { shown: Some(word) }];
        }

        let countdown = self.next_countdown;
        self.next_countdown += 1;
        self.nodes[word].countdown = Some(countdown);
        trace!(word, countdown, delay_ms = self.options.delay_ms, "exit countdown armed");
        vec![
            changed,
            Effect::ArmTimer {
                word,
                delay_ms: self.options.delay_ms,
                countdown,
            },
        ]
    }

    fn exit_completed(&mut self, word: usize) -> Vec<Effect> {
        let hidden = self.set_phase(word, WordPhase::Hidden);
        match self.successor(word) {
            Some(next) => {
                let showing = self.set_phase(next, WordPhase::Showing);
                trace!(from = word, to = next, "hand-off");
                vec![hidden, showing]
            }
            None => {
                self.finished = true;
                debug!(word, "cycle finished after last exit");
                vec![hidden, Effect::Finished { shown: None }]
            }
        }
    }

    fn set_phase(&mut self, word: usize, to: WordPhase) -> Effect {
        let node = &mut self.nodes[word];
        let from = node.phase;
        node.phase = to;
        trace!(word, ?from, ?to, "phase changed");
        Effect::PhaseChanged { word, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycler(input: &str, policy: LastWordPolicy) -> WordCycler {
        let words = crate::words::split_words(input, "|");
        WordCycler::new(words, CycleOptions::default().with_last_word(policy))
    }

    fn armed_countdown(effects: &[Effect]) -> Option<u64> {
        effects.iter().find_map(|e| match e {
            Effect::ArmTimer { countdown, .. } => Some(*countdown),
            _ => None,
        })
    }

    /// Entry completion, countdown, exit completion on the active word.
    fn run_word(cycler: &mut WordCycler, word: usize) -> Vec<Effect> {
        let effects = cycler
            .handle(Signal::AnimationCompleted { word })
            .unwrap();
        let Some(countdown) = armed_countdown(&effects) else {
            return effects;
        };
        cycler
            .handle(Signal::TimerElapsed { word, countdown })
            .unwrap();
        cycler
            .handle(Signal::AnimationCompleted { word })
            .unwrap()
    }

    #[test]
    fn test_initial_phases() {
        let c = cycler("a|b|c", LastWordPolicy::Hold);
        assert_eq!(c.len(), 3);
        assert_eq!(c.words().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(c.phase(0), Some(WordPhase::Showing));
        assert_eq!(c.phase(1), Some(WordPhase::Hidden));
        assert_eq!(c.phase(2), Some(WordPhase::Hidden));
        assert_eq!(c.class_attr(0, &MarkerSet::default()).unwrap(), "ws-show ws-flip-in");
        assert_eq!(c.class_attr(1, &MarkerSet::default()).unwrap(), "ws-hide");
        assert!(!c.is_finished());
    }

    #[test]
    fn test_entry_completion_arms_one_countdown() {
        let mut c = cycler("a|b", LastWordPolicy::Hold);
        let effects = c.handle(Signal::AnimationCompleted { word: 0 }).unwrap();
        let armed: Vec<_> = effects
            .iter()
            .filter(|e| matches!(e, Effect::ArmTimer { .. }))
            .collect();
        assert_eq!(armed.len(), 1);
        assert!(matches!(
            armed[0],
            Effect::ArmTimer { word: 0, delay_ms: 1500, .. }
        ));
        assert_eq!(c.phase(0), Some(WordPhase::Steady));
        // Markers do not change until the countdown elapses.
        assert_eq!(c.markers(0), Some(&[Marker::Shown, Marker::Entering][..]));
    }

    #[test]
    fn test_countdown_swaps_entry_for_exit() {
        let mut c = cycler("a|b", LastWordPolicy::Hold);
        let effects = c.handle(Signal::AnimationCompleted { word: 0 }).unwrap();
        let countdown = armed_countdown(&effects).unwrap();
        let effects = c
            .handle(Signal::TimerElapsed { word: 0, countdown })
            .unwrap();
        assert_eq!(
            effects,
            vec![Effect::PhaseChanged {
                word: 0,
                from: WordPhase::Steady,
                to: WordPhase::Exiting
            }]
        );
        assert_eq!(c.markers(0), Some(&[Marker::Shown, Marker::Exiting][..]));
        assert_eq!(c.node(0).unwrap().countdown, None);
    }

    #[test]
    fn test_hand_off() {
        let mut c = cycler("a|b|c", LastWordPolicy::Hold);
        run_word(&mut c, 0);
        assert_eq!(c.markers(0), Some(&[Marker::Hidden][..]));
        assert_eq!(c.markers(1), Some(&[Marker::Shown, Marker::Entering][..]));
        assert_eq!(c.markers(2), Some(&[Marker::Hidden][..]));
        assert_eq!(c.active(), Some(1));
    }

    #[test]
    fn test_hold_policy_keeps_last_word() {
        let mut c = cycler("a|b|c", LastWordPolicy::Hold);
        run_word(&mut c, 0);
        run_word(&mut c, 1);
        let effects = run_word(&mut c, 2);
        assert_eq!(armed_countdown(&effects), None);
        assert!(effects.contains(&Effect::Finished { shown: Some(2) }));
        assert!(c.is_finished());
        assert_eq!(c.phase(2), Some(WordPhase::Steady));
        assert_eq!(c.active(), Some(2));

        // Later completions on the held word change nothing.
        assert!(c.handle(Signal::AnimationCompleted { word: 2 }).unwrap().is_empty());
    }

    #[test]
    fn test_exit_policy_hides_last_word() {
        let mut c = cycler("a|b|c", LastWordPolicy::Exit);
        run_word(&mut c, 0);
        run_word(&mut c, 1);
        let effects = run_word(&mut c, 2);
        assert!(effects.contains(&Effect::Finished { shown: None }));
        assert!(c.is_finished());
        assert_eq!(c.shown_count(), 0);
        assert_eq!(c.phase(0), Some(WordPhase::Hidden));
    }

    #[test]
    fn test_wrap_policy_returns_to_first_word() {
        let mut c = cycler("a|b|c", LastWordPolicy::Wrap);
        for word in [0, 1, 2, 0, 1] {
            assert_eq!(c.active(), Some(word));
            run_word(&mut c, word);
        }
        assert_eq!(c.active(), Some(2));
        assert!(!c.is_finished());
    }

    #[test]
    fn test_single_word_policies() {
        let mut hold = cycler("solo", LastWordPolicy::Hold);
        run_word(&mut hold, 0);
        assert_eq!(hold.phase(0), Some(WordPhase::Steady));
        assert!(hold.is_finished());

        let mut exit = cycler("solo", LastWordPolicy::Exit);
        run_word(&mut exit, 0);
        assert_eq!(exit.phase(0), Some(WordPhase::Hidden));

        let mut wrap = cycler("solo", LastWordPolicy::Wrap);
        run_word(&mut wrap, 0);
        assert_eq!(wrap.phase(0), Some(WordPhase::Showing));
        assert_eq!(wrap.shown_count(), 1);
    }

    #[test]
    fn test_empty_content_never_starts() {
        let c = cycler("", LastWordPolicy::Hold);
        assert!(c.is_empty());
        assert!(c.is_finished());
        assert_eq!(c.active(), None);
    }

    #[test]
    fn test_at_most_one_word_shown() {
        let mut c = cycler("a|b|c|d", LastWordPolicy::Wrap);
        for step in 0..12 {
            let word = c.active().unwrap();
            let effects = c.handle(Signal::AnimationCompleted { word }).unwrap();
            assert!(c.shown_count() <= 1, "step {step}");
            let countdown = armed_countdown(&effects).unwrap();
            c.handle(Signal::TimerElapsed { word, countdown }).unwrap();
            assert!(c.shown_count() <= 1, "step {step}");
            c.handle(Signal::AnimationCompleted { word }).unwrap();
            assert_eq!(c.shown_count(), 1, "step {step}");
        }
    }

    #[test]
    fn test_stale_and_misplaced_signals_are_ignored() {
        let mut c = cycler("a|b", LastWordPolicy::Hold);
        // Hidden word.
        assert!(c.handle(Signal::AnimationCompleted { word: 1 }).unwrap().is_empty());
        // Timer before any countdown was armed.
        assert!(
            c.handle(Signal::TimerElapsed { word: 0, countdown: 99 })
                .unwrap()
                .is_empty()
        );

        let effects = c.handle(Signal::AnimationCompleted { word: 0 }).unwrap();
        let countdown = armed_countdown(&effects).unwrap();
        // A second completion while steady does not arm another countdown.
        assert!(c.handle(Signal::AnimationCompleted { word: 0 }).unwrap().is_empty());
        // Wrong token.
        assert!(
            c.handle(Signal::TimerElapsed { word: 0, countdown: countdown + 1 })
                .unwrap()
                .is_empty()
        );
        assert_eq!(c.phase(0), Some(WordPhase::Steady));
        // A fired countdown cannot fire twice.
        assert_eq!(
            c.handle(Signal::TimerElapsed { word: 0, countdown })
                .unwrap()
                .len(),
            1
        );
        assert!(
            c.handle(Signal::TimerElapsed { word: 0, countdown })
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_unknown_word() {
        let mut c = cycler("a|b", LastWordPolicy::Hold);
        let err = c.handle(Signal::AnimationCompleted { word: 5 }).unwrap_err();
        assert_eq!(err, CycleError::UnknownWord { index: 5, len: 2 });
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::ArmTimer {
            word: 3,
            delay_ms: 1500,
            countdown: 7,
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("arm_timer"));
        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }
}
