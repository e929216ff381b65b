//! Runtime hosting every switcher on a page.
//!
//! The `Stage` owns the document, one cycler per container and a simulated
//! clock. Signals from all containers go through a single timer queue, so
//! they are handled strictly in arrival order.
//!
//! # Usage
//!
//! ```
//! use wordflip_core::SwitcherOptions;
//! use wordflip_dom::{Document, Stage};
//!
//! let doc = Document::parse_fragment(r#"<span class="words-switcher">a|b</span>"#);
//! let mut stage = Stage::new(doc, SwitcherOptions::default()).unwrap();
//!
//! stage.run_until(10_000).unwrap();
//! for event in stage.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use wordflip_core::{Effect, MarkerSet, Signal, SwitcherOptions, TimerQueue, WordPhase};

use crate::document::Document;
use crate::error::{DocumentError, Result};
use crate::setup::{ContainerBinding, initialize};

/// A signal waiting on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    container: usize,
    signal: Signal,
}

/// Observable outcome of a handled signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageEvent {
    /// A word's markers changed.
    Transition {
        at_ms: u64,
        container: usize,
        word: usize,
        text: String,
        from: WordPhase,
        to: WordPhase,
        class: String,
    },
    /// A container's cycle ended.
    Finished {
        at_ms: u64,
        container: usize,
        shown: Option<usize>,
    },
}

impl StageEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Transition { at_ms, .. } | Self::Finished { at_ms, .. } => *at_ms,
        }
    }

    pub fn container(&self) -> usize {
        match self {
            Self::Transition { container, .. } | Self::Finished { container, .. } => *container,
        }
    }
}

pub struct Stage {
    document: Document,
    options: SwitcherOptions,
    markers: Arc<MarkerSet>,
    containers: Vec<ContainerBinding>,
    timers: TimerQueue<Pending>,
    events: Vec<StageEvent>,
}

impl Stage {
    /// Initialize every container in `document` and start their cycles.
    ///
    /// A zero `animation_ms` disables simulation, as it does in `wordflip.toml`.
    pub fn new(mut document: Document, mut options: SwitcherOptions) -> Result<Self> {
        options.animation_ms = options.animation_ms.filter(|ms| *ms > 0);
        let markers = Arc::new(options.markers());
        let containers = initialize(&mut document, &options, &markers)?;
        debug!(containers = containers.len(), "stage initialized");

        let mut stage = Self {
            document,
            options,
            markers,
            containers,
            timers: TimerQueue::new(),
            events: Vec::new(),
        };
        for container in 0..stage.containers.len() {
            let animating: Vec<usize> = stage.containers[container]
                .cycler
                .nodes()
                .iter()
                .enumerate()
                .filter(|(_, node)| node.phase.is_animating())
                .map(|(word, _)| word)
                .collect();
            for word in animating {
                stage.schedule_animation(container, word);
            }
        }
        Ok(stage)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn options(&self) -> &SwitcherOptions {
        &self.options
    }

    pub fn markers(&self) -> &Arc<MarkerSet> {
        &self.markers
    }

    pub fn containers(&self) -> &[ContainerBinding] {
        &self.containers
    }

    pub fn container(&self, index: usize) -> Result<&ContainerBinding> {
        self.containers
            .get(index)
            .ok_or(DocumentError::UnknownContainer {
                index,
                len: self.containers.len(),
            })
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Due time of the next pending signal.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.next_due_ms()
    }

    /// Whether every container has reached the end of its cycle.
    pub fn is_finished(&self) -> bool {
        self.containers.iter().all(|c| c.cycler.is_finished())
    }

    /// Current class attribute of every word in a container.
    pub fn classes(&self, container: usize) -> Result<Vec<String>> {
        let binding = self.container(container)?;
        Ok(binding
            .words
            .iter()
            .map(|id| self.document.class(*id).unwrap_or_default().to_string())
            .collect())
    }

    /// Report that the styling layer finished animating `word`, at the
    /// current time.
    pub fn animation_ended(&mut self, container: usize, word: usize) -> Result<()> {
        self.container(container)?;
        self.dispatch(container, Signal::AnimationCompleted { word })
    }

    /// Handle every signal due up to and including `until_ms`, then move the
    /// clock there.
    pub fn run_until(&mut self, until_ms: u64) -> Result<usize> {
        let mut handled = 0;
        while let Some(fired) = self.timers.pop_due(until_ms) {
            trace!(at_ms = fired.at_ms, ?fired.payload, "signal due");
            self.dispatch(fired.payload.container, fired.payload.signal)?;
            handled += 1;
        }
        self.timers.advance_to(until_ms);
        Ok(handled)
    }

    pub fn advance_by(&mut self, delta_ms: u64) -> Result<usize> {
        self.run_until(self.now_ms().saturating_add(delta_ms))
    }

    /// Run until nothing is pending or `limit_ms` is reached.
    pub fn run_to_idle(&mut self, limit_ms: u64) -> Result<u64> {
        while let Some(due) = self.timers.next_due_ms() {
            if due > limit_ms {
                break;
            }
            self.run_until(due)?;
        }
        Ok(self.now_ms())
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = StageEvent> + '_ {
        self.events.drain(..)
    }

    fn dispatch(&mut self, container: usize, signal: Signal) -> Result<()> {
        let effects = self.containers[container].cycler.handle(signal)?;
        for effect in effects {
            self.apply(container, effect)?;
        }
        Ok(())
    }

    fn apply(&mut self, container: usize, effect: Effect) -> Result<()> {
        let at_ms = self.now_ms();
        match effect {
            Effect::PhaseChanged { word, from, to } => {
                let binding = &self.containers[container];
                let class = self.markers.class_list(to.markers());
                let text = binding
                    .cycler
                    .node(word)
                    .map(|n| n.text.clone())
                    .unwrap_or_default();
                self.document.set_class(binding.words[word], &class)?;
                self.events.push(StageEvent::Transition {
                    at_ms,
                    container,
                    word,
                    text,
                    from,
                    to,
                    class,
                });
                if to.is_animating() {
                    self.schedule_animation(container, word);
                }
            }
            Effect::ArmTimer {
                word,
                delay_ms,
                countdown,
            } => {
                self.timers.schedule(
                    delay_ms,
                    Pending {
                        container,
                        signal: Signal::TimerElapsed { word, countdown },
                    },
                );
            }
            Effect::Finished { shown } => {
                debug!(container, ?shown, at_ms, "container finished");
                self.events.push(StageEvent::Finished {
                    at_ms,
                    container,
                    shown,
                });
            }
        }
        Ok(())
    }

    /// Stand in for the styling layer when a simulated duration is set.
    fn schedule_animation(&mut self, container: usize, word: usize) {
        if let Some(animation_ms) = self.options.animation_ms {
            self.timers.schedule(
                animation_ms,
                Pending {
                    container,
                    signal: Signal::AnimationCompleted { word },
                },
            );
        }
    }
}
