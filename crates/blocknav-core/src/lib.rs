//! Keyboard navigation for block flyouts.
//!
//! A flyout appends its items to one shared list each time it opens; only
//! the most recent run of items is navigable. `update` holds the pure
//! transitions over `NavState`, `tracker` applies their effects to items,
//! and `keys` routes directional keys between the tracker and the host UI.

pub mod config;
pub mod effects;
pub mod keys;
pub mod state;
pub mod toolbox;
pub mod tracker;
pub mod update;

pub use effects::NavEffect;
pub use keys::{KeyOutcome, KeyUpdate, NavKey, RunHost, SiblingDirection, dispatch};
pub use state::{Cursor, NavState, RunShape};
pub use tracker::{Item, SelectionTracker, SharedTracker};
