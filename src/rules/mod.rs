//! UNO rule engine.
//!
//! Pure legality checks (`can_play`) and one transition function per turn
//! action. Transitions validate completely before writing, so a rejected
//! action never leaves a partial change behind.
//!
//! Lobby management (joining, leaving, resetting) lives in `session`; this
//! module only knows about dealt games.

pub mod engine;
pub mod error;

pub use engine::{
    apply_call_uno, apply_draw, apply_pass, apply_play, can_play, legal_cards, start_session,
    DrawOutcome, ForcedDraw, PlayOutcome,
};
pub use error::RuleError;
