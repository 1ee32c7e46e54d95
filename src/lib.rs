//! # uno-engine
//!
//! An authoritative, multi-session UNO engine.
//!
//! Clients send intents (create, join, start, play, draw, pass, call UNO,
//! reset, leave); the engine validates them against the rules, mutates the
//! one session they target, and pushes a privacy-filtered view of that
//! session to every seat. Transport, rendering, and authentication live
//! outside the crate.
//!
//! ## Design Principles
//!
//! 1. **Validate, then apply**: every rule operation checks everything
//!    before its first write. A rejected intent never changes state and is
//!    reported only to the connection that sent it.
//!
//! 2. **One lock per session**: sessions are independent. Intents for
//!    different sessions proceed in parallel; intents for one session are
//!    serialized.
//!
//! 3. **Views are projections**: a view is recomputed from state for each
//!    recipient on every broadcast. Other seats' cards and the draw pile
//!    are only ever counts.
//!
//! ## Architecture
//!
//! - **Persistent data structures**: hands, piles, and history are
//!   `im::Vector`s, so cloning a session before applying an intent is O(1).
//!   The registry commits the clone only on success.
//!
//! - **Deterministic randomness**: shuffles draw from a seeded ChaCha8
//!   stream per session, forked from the registry's root RNG. Shuffles take
//!   any `ShuffleSource`, so tests can script exact orders.
//!
//! ## Modules
//!
//! - `core`: ids, RNG, configuration, actions, session state
//! - `cards`: card model, deck composition, Fisher–Yates shuffle
//! - `zones`: draw and discard piles with reshuffle-on-exhaustion
//! - `rules`: legality checks and turn transitions
//! - `session`: session lifecycle and per-seat view projection
//! - `protocol`: intents, outbound events, bincode framing
//! - `registry`: session directory, routing, broadcast
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use uno_engine::{ChannelBroadcaster, ConnectionId, Intent, Outbound, RegistryConfig, SessionRegistry};
//!
//! let hub = Arc::new(ChannelBroadcaster::new());
//! let mut host_rx = hub.register(ConnectionId(1));
//! let registry = SessionRegistry::new(RegistryConfig::new().with_seed(1), Arc::clone(&hub));
//!
//! registry
//!     .handle(ConnectionId(1), Intent::CreateSession { player_name: "Ann".into() })
//!     .unwrap();
//!
//! let events: Vec<Outbound> = std::iter::from_fn(|| host_rx.try_recv().ok()).collect();
//! assert!(matches!(events[0], Outbound::SessionCreated { .. }));
//! assert!(events[1].view().is_some());
//! ```

pub mod cards;
pub mod core;
pub mod protocol;
pub mod registry;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, CardId, ConnectionId, ConfigError, Direction, ForcedDrawPolicy, GameRng,
    Phase, Player, PlayerId, RegistryConfig, RuleConfig, SessionCode, SessionState, ShuffleSource,
    HISTORY_LIMIT,
};

pub use crate::cards::{Card, CardKind, Color, Face, DECK_SIZE};

pub use crate::zones::Piles;

pub use crate::rules::{can_play, RuleError};

pub use crate::session::{GameSession, HandView, SeatView, SessionView, Transition};

pub use crate::protocol::{CodecError, Intent, Outbound, RejectCode};

pub use crate::registry::{
    Broadcaster, ChannelBroadcaster, RegistryError, RegistryStats, SeatRef, SessionRegistry,
};
