//! Core engine types: identifiers, RNG, configuration, actions, state.
//!
//! These are shared by every layer: the card model, the rules, the session
//! lifecycle, and the registry.

pub mod action;
pub mod config;
pub mod ids;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{ConfigError, ForcedDrawPolicy, RegistryConfig, RuleConfig};
pub use ids::{CardId, ConnectionId, InvalidSessionCode, PlayerId, SessionCode};
pub use rng::{GameRng, ShuffleSource};
pub use state::{Direction, Phase, Player, SessionState, HISTORY_LIMIT};
