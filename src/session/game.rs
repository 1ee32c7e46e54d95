//! One match: roster management, lifecycle, and action dispatch.

use std::time::Instant;

use tracing::{debug, info};

use super::view::{project, SessionView};
use crate::cards::{Card, Color};
use crate::core::{
    Action, ActionRecord, CardId, ConnectionId, Direction, GameRng, Phase, Player, PlayerId,
    RuleConfig, SessionCode, SessionState,
};
use crate::rules::{self, RuleError};
use crate::zones::Piles;

/// Effect of an accepted action, used to decide what to broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Accepted but nothing visible changed (e.g. a repeated UNO call).
    Unchanged,
    /// State changed; every seat needs a fresh view.
    Changed,
    /// The action won the game.
    Won(PlayerId),
}

impl Transition {
    /// Does this transition need a broadcast?
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// A live session: the authoritative state of one match.
///
/// Cloning is cheap (hands, piles, and history are persistent vectors), so
/// callers can apply an action to a copy and keep the original on failure.
#[derive(Clone, Debug)]
pub struct GameSession {
    state: SessionState,
    last_activity: Instant,
}

impl GameSession {
    /// Open a lobby with its creator in seat 0.
    #[must_use]
    pub fn new(
        code: SessionCode,
        rules: RuleConfig,
        rng: GameRng,
        creator: PlayerId,
        name: impl Into<String>,
        connection: ConnectionId,
    ) -> Self {
        let mut state = SessionState::new(code, rules, rng);
        state.players.push(Player::new(creator, name, connection));
        info!(session = %state.code, player = %creator, "session created");
        Self { state, last_activity: Instant::now() }
    }

    /// Session code.
    #[must_use]
    pub fn code(&self) -> &SessionCode {
        &self.state.code
    }

    /// Read-only access to the full state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.state.seat_count()
    }

    /// No seats left. Empty sessions are evicted by the registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.players.is_empty()
    }

    /// Is `player` seated here?
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.state.seat_of(player).is_some()
    }

    /// Seated players and their connections, in seating order.
    pub fn connections(&self) -> impl Iterator<Item = (PlayerId, ConnectionId)> + '_ {
        self.state.players.iter().map(|p| (p.id, p.connection))
    }

    /// When the session last accepted an action.
    #[must_use]
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Privacy-filtered view for one seat.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> SessionView {
        project(&self.state, viewer)
    }

    /// Recent accepted actions since the last reset, oldest first.
    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.state.history
    }

    /// Cards `player` could legally play right now.
    #[must_use]
    pub fn legal_cards(&self, player: PlayerId) -> Vec<CardId> {
        rules::legal_cards(&self.state, player)
    }

    /// Seat a new player.
    ///
    /// A full table is reported before a started one, so a latecomer to a
    /// full running game hears `GameFull`.
    pub fn join(
        &mut self,
        player: PlayerId,
        name: impl Into<String>,
        connection: ConnectionId,
    ) -> Result<usize, RuleError> {
        let max = self.state.rules.max_seats();
        if self.state.seat_count() >= max {
            return Err(RuleError::GameFull { max });
        }
        if self.state.is_started() {
            return Err(RuleError::GameAlreadyStarted);
        }

        let seat = self.state.seat_count();
        let joined = Player::new(player, name, connection);
        self.state.last_action = Some(format!("{} joined", joined.name));
        self.state.players.push(joined);
        self.touch();
        info!(session = %self.state.code, player = %player, seat, "player joined");
        Ok(seat)
    }

    /// Remove a seat.
    ///
    /// The departing hand goes to the bottom of the draw pile. Later seats
    /// shift down one index. If the departing seat held the turn, the turn
    /// passes to the seat that would have played next.
    pub fn leave(&mut self, player: PlayerId) -> Result<Player, RuleError> {
        let seat = self
            .state
            .seat_of(player)
            .ok_or(RuleError::PlayerNotInSession(player))?;

        let departed = self.state.players.remove(seat);
        self.state.piles.return_to_bottom(departed.hand.iter().copied());

        let remaining = self.state.seat_count();
        let current = self.state.current_player_index;
        if remaining == 0 {
            self.state.current_player_index = 0;
        } else if seat < current {
            self.state.current_player_index = current - 1;
        } else if seat == current {
            let next = match self.state.direction {
                Direction::Clockwise => seat % remaining,
                Direction::CounterClockwise => (seat + remaining - 1) % remaining,
            };
            if self.state.phase == Phase::Active {
                self.state.set_turn(next);
            } else {
                self.state.current_player_index = next;
            }
        }

        self.state.last_action = Some(format!("{} left", departed.name));
        self.touch();
        info!(
            session = %self.state.code,
            player = %player,
            seat,
            remaining,
            returned = departed.hand_len(),
            "player left"
        );
        Ok(departed)
    }

    /// Deal and start the game.
    pub fn start(&mut self, player: PlayerId) -> Result<(), RuleError> {
        rules::start_session(&mut self.state, player)?;
        self.touch();
        info!(
            session = %self.state.code,
            seats = self.state.seat_count(),
            color = %self.state.current_color,
            "game started"
        );
        Ok(())
    }

    /// Return to the lobby, keeping the roster.
    ///
    /// Hands, piles, forced-draw debt, and the winner are cleared. Allowed
    /// from any phase.
    pub fn reset(&mut self, player: PlayerId) -> Result<(), RuleError> {
        let seat = self
            .state
            .seat_of(player)
            .ok_or(RuleError::PlayerNotInSession(player))?;

        let state = &mut self.state;
        for seated in &mut state.players {
            seated.hand = im::Vector::new();
            seated.has_called_uno = false;
        }
        state.piles = Piles::new();
        state.current_player_index = 0;
        state.direction = Direction::Clockwise;
        state.current_color = state.rules.fallback_color();
        state.phase = Phase::Lobby;
        state.winner = None;
        state.pending_draw = 0;
        state.drawn_this_turn = false;
        state.turn_number = 0;
        state.history = im::Vector::new();
        state.last_action = Some(format!("{} reset the game", state.players[seat].name));
        state.record(player, Action::Reset);
        self.touch();
        info!(session = %self.state.code, player = %player, "session reset");
        Ok(())
    }

    /// Apply one seat action.
    pub fn apply(&mut self, player: PlayerId, action: Action) -> Result<Transition, RuleError> {
        let transition = match action {
            Action::Start => {
                self.start(player)?;
                Transition::Changed
            }
            Action::Play { card, chosen_color } => self.play(player, card, chosen_color)?,
            Action::Draw => {
                rules::apply_draw(&mut self.state, player)?;
                Transition::Changed
            }
            Action::Pass => {
                rules::apply_pass(&mut self.state, player)?;
                Transition::Changed
            }
            Action::CallUno => {
                if rules::apply_call_uno(&mut self.state, player)? {
                    Transition::Changed
                } else {
                    Transition::Unchanged
                }
            }
            Action::Reset => {
                self.reset(player)?;
                Transition::Changed
            }
            Action::Leave => {
                self.leave(player)?;
                Transition::Changed
            }
        };
        if transition.is_visible() {
            self.touch();
        }
        debug!(session = %self.state.code, player = %player, action = action.name(), ?transition, "applied");
        Ok(transition)
    }

    fn play(
        &mut self,
        player: PlayerId,
        card: CardId,
        chosen_color: Option<Color>,
    ) -> Result<Transition, RuleError> {
        let outcome = rules::apply_play(&mut self.state, player, card, chosen_color)?;
        if let Some(forced) = outcome.forced {
            debug!(session = %self.state.code, victim = %forced.victim, cards = forced.cards, "forced draw delivered");
        }
        if outcome.won {
            info!(session = %self.state.code, winner = %player, card = %outcome.played, "game won");
            return Ok(Transition::Won(player));
        }
        Ok(Transition::Changed)
    }

    /// Cards across piles and hands (108 once dealt).
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.state.total_cards()
    }

    /// Top of the discard pile.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.state.top_discard()
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(seats: usize, rules: RuleConfig) -> (GameSession, Vec<PlayerId>) {
        let mut rng = GameRng::new(5);
        let ids: Vec<_> = (0..seats).map(|_| PlayerId::random(&mut rng)).collect();
        let code = SessionCode::parse("GAME01").unwrap();
        let mut session = GameSession::new(code, rules, rng.fork(), ids[0], "host", ConnectionId(0));
        for (i, id) in ids.iter().enumerate().skip(1) {
            session.join(*id, format!("p{i}"), ConnectionId(i as u64)).unwrap();
        }
        (session, ids)
    }

    #[test]
    fn test_join_until_full() {
        let (mut session, _) = session_with(6, RuleConfig::default());
        let extra = PlayerId::random(&mut GameRng::new(99));
        assert_eq!(
            session.join(extra, "late", ConnectionId(9)),
            Err(RuleError::GameFull { max: 6 })
        );
        assert_eq!(session.seat_count(), 6);
    }

    #[test]
    fn test_join_after_start_rejected() {
        let (mut session, ids) = session_with(2, RuleConfig::default());
        session.start(ids[0]).unwrap();
        let extra = PlayerId::random(&mut GameRng::new(99));
        assert_eq!(
            session.join(extra, "late", ConnectionId(9)),
            Err(RuleError::GameAlreadyStarted)
        );
    }

    #[test]
    fn test_full_reported_before_started() {
        let rules = RuleConfig::default().with_seats(2, 2);
        let (mut session, ids) = session_with(2, rules);
        session.start(ids[0]).unwrap();
        let extra = PlayerId::random(&mut GameRng::new(99));
        assert_eq!(
            session.join(extra, "late", ConnectionId(9)),
            Err(RuleError::GameFull { max: 2 })
        );
    }

    #[test]
    fn test_reset_keeps_roster() {
        let (mut session, ids) = session_with(3, RuleConfig::default());
        session.start(ids[1]).unwrap();
        session.apply(ids[0], Action::Draw).unwrap();

        session.reset(ids[2]).unwrap();
        let state = session.state();
        assert_eq!(state.phase, Phase::Lobby);
        assert_eq!(state.seat_count(), 3);
        assert!(state.players.iter().all(|p| p.hand.is_empty()));
        assert_eq!(state.total_cards(), 0);
        assert_eq!(state.pending_draw, 0);
        assert_eq!(state.winner, None);
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.last_action.as_deref(), Some("p2 reset the game"));

        // A new game can be dealt again.
        session.start(ids[0]).unwrap();
        assert_eq!(session.total_cards(), 108);
    }

    #[test]
    fn test_reset_requires_seat() {
        let (mut session, _) = session_with(2, RuleConfig::default());
        let stranger = PlayerId::random(&mut GameRng::new(99));
        assert_eq!(session.reset(stranger), Err(RuleError::PlayerNotInSession(stranger)));
    }

    #[test]
    fn test_leave_active_seat_mid_game() {
        let (mut session, ids) = session_with(4, RuleConfig::default());
        session.start(ids[0]).unwrap();
        session.apply(ids[0], Action::Pass).unwrap();
        session.apply(ids[1], Action::Pass).unwrap();
        session.apply(ids[2], Action::Pass).unwrap();
        session.apply(ids[3], Action::Draw).unwrap();
        assert_eq!(session.state().current_player_index, 3);

        let hands_before: Vec<_> = session.state().players[..3].iter().map(|p| p.hand.clone()).collect();
        let departed = session.leave(ids[3]).unwrap();

        let state = session.state();
        assert_eq!(departed.hand_len(), 8);
        assert_eq!(state.seat_count(), 3);
        assert_eq!(state.current_player_index, 0);
        let hands_after: Vec<_> = state.players.iter().map(|p| p.hand.clone()).collect();
        assert_eq!(hands_after, hands_before);
        assert_eq!(state.total_cards(), 108);
    }

    #[test]
    fn test_leave_active_seat_counter_clockwise() {
        let (mut session, ids) = session_with(4, RuleConfig::default());
        session.start(ids[0]).unwrap();
        session.apply(ids[0], Action::Pass).unwrap();
        session.state.direction = Direction::CounterClockwise;
        assert_eq!(session.state().current_player_index, 1);

        session.leave(ids[1]).unwrap();
        assert_eq!(session.state().current_player_index, 0);
        assert_eq!(session.state().players[0].id, ids[0]);
    }

    #[test]
    fn test_leave_earlier_seat_shifts_index() {
        let (mut session, ids) = session_with(3, RuleConfig::default());
        session.start(ids[0]).unwrap();
        session.apply(ids[0], Action::Pass).unwrap();
        session.apply(ids[1], Action::Pass).unwrap();

        session.leave(ids[0]).unwrap();
        let state = session.state();
        assert_eq!(state.current_player_index, 1);
        assert_eq!(state.current_player().map(|p| p.id), Some(ids[2]));
    }

    #[test]
    fn test_leave_last_seat_empties() {
        let (mut session, ids) = session_with(1, RuleConfig::default());
        session.leave(ids[0]).unwrap();
        assert!(session.is_empty());
        assert_eq!(session.leave(ids[0]), Err(RuleError::PlayerNotInSession(ids[0])));
    }

    #[test]
    fn test_repeated_uno_call_unchanged() {
        let (mut session, ids) = session_with(2, RuleConfig::default());
        session.start(ids[0]).unwrap();
        session.state.players[1].hand = session.state.players[1].hand.take(2);

        assert_eq!(session.apply(ids[1], Action::CallUno), Ok(Transition::Changed));
        assert_eq!(session.apply(ids[1], Action::CallUno), Ok(Transition::Unchanged));
        assert_eq!(session.apply(ids[0], Action::CallUno), Ok(Transition::Unchanged));
    }

    #[test]
    fn test_apply_rejects_without_side_effects() {
        let (mut session, ids) = session_with(2, RuleConfig::default());
        session.start(ids[0]).unwrap();
        let before = session.state().clone();

        assert_eq!(session.apply(ids[1], Action::Draw), Err(RuleError::NotYourTurn));
        assert_eq!(session.apply(ids[0], Action::Start), Err(RuleError::GameAlreadyStarted));
        assert_eq!(session.state().players, before.players);
        assert_eq!(session.state().piles, before.piles);
        assert_eq!(session.state().history.len(), before.history.len());
    }
}
