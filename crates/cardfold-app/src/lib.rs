//! Application layer for Cardfold
//!
//! The client-side projection engine of a collaborative estimation room: a
//! pure event reducer that folds the server's ordered event stream into a
//! local [`RoomState`] mirror plus a human-readable action log.
//!
//! # Components
//!
//! - [`Reducer`]: session guard, handler dispatch, log composition
//! - [`RoomState`] (with [`User`], [`Story`], [`LogEntry`]): the projection
//! - [`PreferenceStore`]: injected persistence for identity presets
//! - [`Environment`]: injected time and randomness for deterministic tests
//! - Entity indexers and card-config lookup as small pure helpers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cards;
mod dispatch;
mod env;
mod index;
mod log;
mod prefs;
mod reducer;
mod state;

pub use cards::{card_label, default_card_config};
pub use env::{Environment, SystemEnv};
pub use index::{index_estimations, index_stories, index_users};
pub use prefs::{MemoryPreferences, PreferenceStore};
pub use reducer::Reducer;
pub use state::{LogEntry, RoomState, Story, User};
