//! Transport-facing messages.
//!
//! The engine never touches sockets. A transport decodes client frames into
//! `Intent`s, hands them to the registry, and delivers the `Outbound`
//! events the registry pushes through its `Broadcaster`.

pub mod codec;
pub mod message;

pub use codec::{decode, encode, CodecError, MAX_FRAME_SIZE};
pub use message::{Intent, Outbound, RejectCode};
