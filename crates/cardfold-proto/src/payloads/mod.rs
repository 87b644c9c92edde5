//! Per-kind event payload types.
//!
//! Payloads are plain serde structs grouped by concern: session membership
//! (join/leave/kick), user profile, stories, estimation rounds, and room
//! configuration. The envelope's `name` field decides which payload the
//! `payload` field carries; [`crate::EventPayload`] ties the two together so a
//! mismatched name/payload pair cannot be represented.

pub mod config;
pub mod estimation;
pub mod session;
pub mod story;
pub mod user;
