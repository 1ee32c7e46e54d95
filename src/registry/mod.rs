//! Session registry and broadcast boundary.
//!
//! - `directory`: `SessionRegistry`, which owns every live session and
//!   routes intents to them
//! - `broadcast`: the `Broadcaster` push trait and an in-process
//!   channel implementation
//! - `error`: registry-level rejections

pub mod broadcast;
pub mod directory;
pub mod error;

pub use broadcast::{Broadcaster, ChannelBroadcaster};
pub use directory::{RegistryStats, SeatRef, SessionRegistry};
pub use error::RegistryError;
