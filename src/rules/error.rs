//! Game-level rejections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CardId, PlayerId};

/// Why an action was refused.
///
/// Every variant is recoverable: the session is left exactly as it was and
/// only the offending connection is told.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleError {
    #[error("game is full ({max} seats)")]
    GameFull { max: usize },

    #[error("game already started")]
    GameAlreadyStarted,

    #[error("need at least {min} players to start")]
    NotEnoughPlayers { min: usize },

    #[error("not your turn")]
    NotYourTurn,

    #[error("{0} is not in your hand")]
    CardNotInHand(CardId),

    #[error("{0} does not match the discard pile")]
    IllegalPlay(CardId),

    #[error("{pending} cards are owed: stack a draw card or draw")]
    MustResolveForcedDraw { pending: u32 },

    #[error("game is over, reset to play again")]
    GameOver,

    #[error("player {0} is not seated in this session")]
    PlayerNotInSession(PlayerId),

    #[error("draw a card before passing")]
    MustDrawBeforePass,
}
