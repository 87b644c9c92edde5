//! Event model for Cardfold
//!
//! Typed representation of the server's room event stream. Every event arrives
//! as a JSON object with an envelope (`name`, `roomId`, `userId`,
//! `correlationId`) and a per-kind payload; this crate maps that shape onto
//! [`ServerEvent`] and the [`EventPayload`] enum so the reducer never touches
//! untyped JSON.
//!
//! # Components
//!
//! - [`ServerEvent`]: the envelope around a single event
//! - [`EventPayload`]: tagged union over the closed event catalogue
//! - [`EventKind`]: payload-free discriminator used for dispatch
//! - [`payloads`]: per-kind payload structs grouped by concern

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
pub mod payloads;

pub use error::ProtocolError;
pub use event::{EventKind, EventPayload, ServerEvent};
