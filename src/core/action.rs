//! Seat actions and the per-session action history.
//!
//! An `Action` is everything a seated player can ask of their session once
//! the session is known: start, play, draw, pass, call UNO, reset, leave.
//! Creating and joining sessions happen before a seat exists and are
//! handled by the registry (see `protocol::Intent`).

use serde::{Deserialize, Serialize};

use super::ids::{CardId, PlayerId};
use crate::cards::Color;

/// An action taken by a seated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Deal and flip the first discard.
    Start,
    /// Play a card from hand. `chosen_color` is read only for wild cards.
    Play {
        card: CardId,
        chosen_color: Option<Color>,
    },
    /// Draw one card, or the whole forced-draw debt if one is pending.
    Draw,
    /// End the turn without playing.
    Pass,
    /// Announce UNO while holding two cards.
    CallUno,
    /// Return the session to the lobby, keeping the roster.
    Reset,
    /// Leave the session (sent by the transport on disconnect).
    Leave,
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Play { .. } => "play",
            Action::Draw => "draw",
            Action::Pass => "pass",
            Action::CallUno => "call_uno",
            Action::Reset => "reset",
            Action::Leave => "leave",
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay and debugging. History stays server-side and is never
/// part of a player view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the session (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
