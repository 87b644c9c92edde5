//! Protocol error types.

use thiserror::Error;

/// Errors from encoding or decoding the event stream.
///
/// Unrecognized event *names* are not errors: they decode to
/// [`crate::EventPayload::Unknown`] so a newer server cannot break an older
/// client. This type covers genuinely malformed input only.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Event JSON is malformed or missing required envelope fields.
    #[error("malformed event: {0}")]
    Decode(#[source] serde_json::Error),

    /// Event could not be serialized back to JSON.
    #[error("event encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}
