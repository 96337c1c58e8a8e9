//! Ledger message decoding.
//!
//! The decoder follows a layered structure:
//! - `layout`: byte widths and payload-type tags (source of truth)
//! - `reader`: safe sequential byte access over the raw buffer
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `model`: decoded message entities
//! - `error`: explicit, actionable errors
//!
//! A message envelope carries a network id, an ordered parent list, a
//! length-prefixed payload region, and a trailing 8-byte nonce. The payload
//! region dispatches on a 4-byte tag into one of three sub-formats
//! (transaction, milestone, index); unknown tags are an explicit error, and
//! the declared payload length is cross-checked against the actual region.
//!
//! Decoding is synchronous, stateless, and free of I/O; each call operates
//! on one message buffer and either returns a fully populated [`Message`]
//! or a single [`DecodeError`].

pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use model::Message;
pub use parser::{decode_message, payload_kind};
