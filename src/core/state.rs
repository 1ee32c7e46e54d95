//! Session state: seats, piles, turn bookkeeping.
//!
//! ## SessionState
//!
//! The complete record of one match:
//! - Seats in turn order, each with a private hand
//! - Draw and discard piles
//! - Turn pointer, direction, active color, forced-draw debt
//! - Lifecycle phase and winner
//! - Per-session RNG and action history
//!
//! Mutation goes through `rules` and `session`; this module only offers
//! bookkeeping helpers (seat lookup, seat arithmetic, history).
//!
//! ## Invariants (while `Active` or `Finished`)
//!
//! - Piles plus hands hold exactly the 108 deck cards, no duplicates.
//! - `current_player_index < players.len()` whenever seats exist.
//! - Under `ForcedDrawPolicy::Immediate`, `pending_draw == 0` between intents.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::RuleConfig;
use super::ids::{CardId, ConnectionId, PlayerId, SessionCode};
use super::rng::GameRng;
use crate::cards::{Card, Color};
use crate::zones::Piles;

/// Most action records a session keeps; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 256;

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Seats may join; no cards dealt.
    #[default]
    Lobby,
    /// Cards dealt, turns in progress.
    Active,
    /// A seat emptied its hand. Only reset/leave/call-uno are accepted.
    Finished,
}

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing seat index (+1).
    #[default]
    Clockwise,
    /// Decreasing seat index (-1).
    CounterClockwise,
}

impl Direction {
    /// Seat delta for one step.
    #[must_use]
    pub const fn step(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Globally unique id.
    pub id: PlayerId,

    /// Display name.
    pub name: String,

    /// Private hand, in the order cards were received.
    pub hand: Vector<Card>,

    /// Announced UNO while holding two cards.
    pub has_called_uno: bool,

    /// Transport handle used to address this seat's views.
    pub connection: ConnectionId,
}

impl Player {
    /// Create a player with an empty hand.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, connection: ConnectionId) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vector::new(),
            has_called_uno: false,
            connection,
        }
    }

    /// Number of cards in hand.
    #[must_use]
    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    /// Look up a card in hand.
    #[must_use]
    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card_id)
    }

    /// Remove a card from hand, keeping the order of the rest.
    pub fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c.id == card_id)?;
        Some(self.hand.remove(pos))
    }

    /// Add cards to the end of the hand.
    pub fn receive(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }
}

/// Complete state of one session.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Shareable session code.
    pub code: SessionCode,

    /// Table rules.
    pub rules: RuleConfig,

    /// Seats in turn order.
    pub players: Vec<Player>,

    /// Seat whose turn it is.
    pub current_player_index: usize,

    /// Direction of play.
    pub direction: Direction,

    /// Draw and discard piles.
    pub piles: Piles,

    /// Color the next play must match (always a suit once started).
    pub current_color: Color,

    /// Lifecycle phase.
    pub phase: Phase,

    /// Seat that emptied its hand.
    pub winner: Option<PlayerId>,

    /// Accumulated forced-draw debt.
    pub pending_draw: u32,

    /// The current seat drew during this turn.
    pub drawn_this_turn: bool,

    /// Human-readable description of the last accepted action.
    pub last_action: Option<String>,

    /// Turn counter (starts at 1 when the game starts).
    pub turn_number: u32,

    /// Recent accepted actions, oldest first, at most `HISTORY_LIMIT`.
    pub history: Vector<ActionRecord>,

    /// Shuffle source for this session.
    pub rng: GameRng,

    sequence: u32,
}

impl SessionState {
    /// Create an empty lobby.
    #[must_use]
    pub fn new(code: SessionCode, rules: RuleConfig, rng: GameRng) -> Self {
        let current_color = rules.fallback_color();
        Self {
            code,
            rules,
            players: Vec::new(),
            current_player_index: 0,
            direction: Direction::Clockwise,
            piles: Piles::new(),
            current_color,
            phase: Phase::Lobby,
            winner: None,
            pending_draw: 0,
            drawn_this_turn: false,
            last_action: None,
            turn_number: 0,
            history: Vector::new(),
            rng,
            sequence: 0,
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.players.len()
    }

    /// Have cards been dealt (active or finished)?
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != Phase::Lobby
    }

    /// Seat index of a player.
    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    /// Look up a seated player.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Top of the discard pile.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.piles.top_discard()
    }

    /// Seat `steps` positions from `from` in the current direction.
    ///
    /// Returns 0 when there are no seats.
    #[must_use]
    pub fn seat_after(&self, from: usize, steps: usize) -> usize {
        let len = self.players.len();
        if len == 0 {
            return 0;
        }
        let delta = self.direction.step() * (steps % len) as isize;
        (from as isize + delta).rem_euclid(len as isize) as usize
    }

    /// Hand the turn to `seat`, starting a new turn.
    pub fn set_turn(&mut self, seat: usize) {
        self.current_player_index = seat;
        self.drawn_this_turn = false;
        self.turn_number += 1;
    }

    /// Record an accepted action, dropping the oldest record past the limit.
    pub fn record(&mut self, player: PlayerId, action: Action) {
        let record = ActionRecord::new(player, action, self.turn_number, self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        self.history.push_back(record);
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    /// Cards across piles and hands.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.piles.total() + self.players.iter().map(Player::hand_len).sum::<usize>()
    }
}
