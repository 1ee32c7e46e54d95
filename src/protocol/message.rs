//! Inbound intents and outbound events.

use serde::{Deserialize, Serialize};

use crate::cards::Color;
use crate::core::{Action, CardId, PlayerId, SessionCode};
use crate::rules::RuleError;
use crate::session::SessionView;

/// A request from a client connection.
///
/// Everything except `CreateSession` and `JoinSession` names the target
/// session and the acting seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    CreateSession {
        player_name: String,
    },
    JoinSession {
        session: SessionCode,
        player_name: String,
    },
    StartSession {
        session: SessionCode,
        player: PlayerId,
    },
    PlayCard {
        session: SessionCode,
        player: PlayerId,
        card: CardId,
        chosen_color: Option<Color>,
    },
    DrawCard {
        session: SessionCode,
        player: PlayerId,
    },
    PassTurn {
        session: SessionCode,
        player: PlayerId,
    },
    CallUno {
        session: SessionCode,
        player: PlayerId,
    },
    ResetSession {
        session: SessionCode,
        player: PlayerId,
    },
    /// Sent by the transport when a connection drops.
    LeaveSession {
        session: SessionCode,
        player: PlayerId,
    },
}

impl Intent {
    /// Intent name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Intent::CreateSession { .. } => "create_session",
            Intent::JoinSession { .. } => "join_session",
            Intent::StartSession { .. } => "start_session",
            Intent::PlayCard { .. } => "play_card",
            Intent::DrawCard { .. } => "draw_card",
            Intent::PassTurn { .. } => "pass_turn",
            Intent::CallUno { .. } => "call_uno",
            Intent::ResetSession { .. } => "reset_session",
            Intent::LeaveSession { .. } => "leave_session",
        }
    }

    /// Split a seat intent into its session, seat, and action.
    ///
    /// Returns `None` for `CreateSession` and `JoinSession`, which act
    /// before a seat exists.
    #[must_use]
    pub fn seat_action(&self) -> Option<(&SessionCode, PlayerId, Action)> {
        let routed = match self {
            Intent::CreateSession { .. } | Intent::JoinSession { .. } => return None,
            Intent::StartSession { session, player } => (session, *player, Action::Start),
            Intent::PlayCard { session, player, card, chosen_color } => (
                session,
                *player,
                Action::Play { card: *card, chosen_color: *chosen_color },
            ),
            Intent::DrawCard { session, player } => (session, *player, Action::Draw),
            Intent::PassTurn { session, player } => (session, *player, Action::Pass),
            Intent::CallUno { session, player } => (session, *player, Action::CallUno),
            Intent::ResetSession { session, player } => (session, *player, Action::Reset),
            Intent::LeaveSession { session, player } => (session, *player, Action::Leave),
        };
        Some(routed)
    }
}

/// Machine-readable rejection reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectCode {
    SessionNotFound,
    GameFull,
    GameAlreadyStarted,
    NotEnoughPlayers,
    NotYourTurn,
    CardNotInHand,
    IllegalPlay,
    MustResolveForcedDraw,
    GameOver,
    PlayerNotInSession,
    MustDrawBeforePass,
    AlreadySeated,
    UnknownConnection,
    Malformed,
    Internal,
}

impl From<&RuleError> for RejectCode {
    fn from(err: &RuleError) -> Self {
        match err {
            RuleError::GameFull { .. } => RejectCode::GameFull,
            RuleError::GameAlreadyStarted => RejectCode::GameAlreadyStarted,
            RuleError::NotEnoughPlayers { .. } => RejectCode::NotEnoughPlayers,
            RuleError::NotYourTurn => RejectCode::NotYourTurn,
            RuleError::CardNotInHand(_) => RejectCode::CardNotInHand,
            RuleError::IllegalPlay(_) => RejectCode::IllegalPlay,
            RuleError::MustResolveForcedDraw { .. } => RejectCode::MustResolveForcedDraw,
            RuleError::GameOver => RejectCode::GameOver,
            RuleError::PlayerNotInSession(_) => RejectCode::PlayerNotInSession,
            RuleError::MustDrawBeforePass => RejectCode::MustDrawBeforePass,
        }
    }
}

/// An event pushed to a client connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outbound {
    /// Sent to the creator only.
    SessionCreated { session: SessionCode, player: PlayerId },
    /// Sent to the joiner only.
    SessionJoined { session: SessionCode, player: PlayerId },
    /// Fresh view after a mutation, projected for the recipient.
    StateUpdate { view: SessionView },
    /// Sent to the offending connection only.
    IntentRejected { code: RejectCode, reason: String },
}

impl Outbound {
    /// Build a rejection.
    #[must_use]
    pub fn rejected(code: RejectCode, reason: impl Into<String>) -> Self {
        Outbound::IntentRejected { code, reason: reason.into() }
    }

    /// The view carried by a `StateUpdate`.
    #[must_use]
    pub fn view(&self) -> Option<&SessionView> {
        match self {
            Outbound::StateUpdate { view } => Some(view),
            _ => None,
        }
    }

    /// The code carried by an `IntentRejected`.
    #[must_use]
    pub fn reject_code(&self) -> Option<RejectCode> {
        match self {
            Outbound::IntentRejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}
