//! Hosting word switchers in an HTML document.
//!
//! [`initialize`] rewrites every container element into word elements and
//! binds a [`wordflip_core::WordCycler`] to each. [`Stage`] wraps that with a
//! simulated clock, applies the cyclers' effects back onto class attributes
//! and records what happened.

pub mod document;
pub mod error;
pub mod setup;
pub mod stage;

pub use document::{Document, DomNode, ElementData};
pub use error::{DocumentError, Result};
pub use setup::{ContainerBinding, initialize};
pub use stage::{Stage, StageEvent};
