//! Binary wire encoding for intents and outbound events.
//!
//! Frames are bincode (varint integers, little-endian) with a hard size
//! limit. Trailing bytes after a complete message are rejected, so a frame
//! decodes to exactly one message or fails.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::message::{Intent, Outbound};

/// Largest frame accepted or produced.
///
/// A full six-seat view with a long discard pile stays well under this.
pub const MAX_FRAME_SIZE: u64 = 64 * 1024;

/// Encoding or decoding failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode frame: {0}")]
    Encode(#[source] bincode::Error),

    #[error("malformed frame: {0}")]
    Decode(#[source] bincode::Error),
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_FRAME_SIZE)
        .reject_trailing_bytes()
}

/// Encode any wire message.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, CodecError> {
    options().serialize(message).map_err(CodecError::Encode)
}

/// Decode any wire message.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    options().deserialize(bytes).map_err(CodecError::Decode)
}

impl Intent {
    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Decode from the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode(bytes)
    }
}

impl Outbound {
    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Decode from the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode(bytes)
    }
}
