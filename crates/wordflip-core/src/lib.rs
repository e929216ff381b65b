//! Word switching core: marker names, word splitting and the per-container
//! cycling state machine.
//!
//! # Architecture
//!
//! ```text
//! SwitcherOptions
//!   ├── MarkerSet (class names derived from a prefix)
//!   └── CycleOptions (delay, last-word policy)
//!
//! WordCycler (one per container)
//!   ├── WordNode[] (text + WordPhase, index-addressed)
//!   └── Signal -> Vec<Effect>
//!
//! TimerQueue (simulated clock shared by every cycler on a page)
//! ```
//!
//! Nothing here touches a document. Hosts translate [`Effect`]s into class
//! attribute updates and timer registrations, and feed [`Signal`]s back in.

pub mod cycler;
pub mod error;
pub mod markers;
pub mod options;
pub mod phase;
pub mod timer;
pub mod words;

pub use cycler::{Effect, Signal, WordCycler, WordNode};
pub use error::{CycleError, Result};
pub use markers::{Marker, MarkerSet};
pub use options::{CycleOptions, LastWordPolicy, SwitcherOptions};
pub use phase::WordPhase;
pub use timer::{Fired, TimerQueue};
pub use words::{join_words, split_words};
