//! Legality checks and state transitions for every turn action.
//!
//! Each `apply_*` function validates completely before its first write, so
//! an `Err` always leaves the session untouched. On success the session is
//! mutated in place and a small outcome describing what happened is
//! returned for logging.

use tracing::debug;

use super::error::RuleError;
use crate::cards::{new_shuffled_deck, Card, CardKind, Color};
use crate::core::{Action, CardId, Direction, ForcedDrawPolicy, Phase, PlayerId, SessionState};
use crate::zones::Piles;

/// Can `card` be played onto `top` while `active_color` is in force?
///
/// - Wild cards are always legal (forced-draw gating happens elsewhere).
/// - Matching the active color is legal.
/// - Matching an action kind (skip on skip, reverse on reverse, draw-two on
///   draw-two) is legal.
/// - Matching a number value is legal.
#[must_use]
pub fn can_play(card: &Card, top: &Card, active_color: Color) -> bool {
    let kind = card.kind();
    if kind.is_wild() || card.color == active_color {
        return true;
    }
    match (card.value(), top.value()) {
        (Some(a), Some(b)) => a == b,
        (None, None) => kind == top.kind(),
        _ => false,
    }
}

/// A forced draw delivered as part of a play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForcedDraw {
    /// Seat that received the cards and lost its turn.
    pub victim: PlayerId,
    /// Cards actually delivered (fewer than owed if both piles ran dry).
    pub cards: usize,
}

/// Result of an accepted play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The card now on top of the discard pile.
    pub played: Card,
    /// The play emptied the hand.
    pub won: bool,
    /// Debt delivered immediately (`ForcedDrawPolicy::Immediate` only).
    pub forced: Option<ForcedDraw>,
}

/// Result of an accepted draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Cards actually drawn.
    pub drawn: usize,
    /// The draw settled a forced-draw debt and ended the turn.
    pub resolved_debt: bool,
}

/// Deal a fresh game.
///
/// Each seat receives `hand_size` cards from a newly shuffled deck in
/// seating order; the next card starts the discard pile. A wild flipped
/// first sets the active color to the fallback color.
pub fn start_session(state: &mut SessionState, player: PlayerId) -> Result<(), RuleError> {
    seated(state, player)?;
    if state.phase != Phase::Lobby {
        return Err(RuleError::GameAlreadyStarted);
    }
    if state.seat_count() < state.rules.min_seats() {
        return Err(RuleError::NotEnoughPlayers { min: state.rules.min_seats() });
    }

    let hand_size = state.rules.hand_size();
    let mut piles = Piles::from_deck(new_shuffled_deck(&mut state.rng));
    for seat in &mut state.players {
        seat.hand = piles.take(hand_size).into_iter().collect();
        seat.has_called_uno = false;
    }

    // Dealable seat/hand bounds are enforced by RuleConfig, so the pile
    // still holds cards here.
    if let Some(first) = piles.pop_draw() {
        state.current_color = if first.color.is_suit() {
            first.color
        } else {
            state.rules.fallback_color()
        };
        piles.push_discard(first);
    }

    state.piles = piles;
    state.phase = Phase::Active;
    state.direction = Direction::Clockwise;
    state.pending_draw = 0;
    state.winner = None;
    state.turn_number = 0;
    state.set_turn(0);
    state.record(player, Action::Start);
    state.last_action = Some("Game started".to_string());
    Ok(())
}

/// Play a card from the current seat's hand.
pub fn apply_play(
    state: &mut SessionState,
    player: PlayerId,
    card_id: CardId,
    chosen_color: Option<Color>,
) -> Result<PlayOutcome, RuleError> {
    let seat = turn_seat(state, player)?;
    let card = *state.players[seat]
        .card(card_id)
        .ok_or(RuleError::CardNotInHand(card_id))?;

    let legal = state
        .top_discard()
        .map_or(true, |top| can_play(&card, top, state.current_color));
    if !legal {
        return Err(RuleError::IllegalPlay(card_id));
    }
    if state.pending_draw > 0 && !card.kind().is_draw() {
        return Err(RuleError::MustResolveForcedDraw { pending: state.pending_draw });
    }

    // Validation done; everything below mutates.
    let hand = &mut state.players[seat];
    hand.remove_card(card_id);
    hand.has_called_uno = false;
    let name = hand.name.clone();
    let emptied = hand.hand.is_empty();

    let mut skip = false;
    let kind = card.kind();
    state.pending_draw += kind.draw_penalty();
    state.current_color = match kind {
        CardKind::Wild | CardKind::WildDrawFour => chosen_color
            .filter(|c| c.is_suit())
            .unwrap_or(state.rules.fallback_color()),
        _ => card.color,
    };
    match kind {
        CardKind::Skip => skip = true,
        CardKind::Reverse => {
            state.direction = state.direction.reversed();
            skip = state.rules.reverse_skips_in_heads_up() && state.seat_count() == 2;
        }
        _ => {}
    }

    state.record(player, Action::Play { card: card_id, chosen_color });
    state.last_action = Some(format!("{name} played {}", card.label()));

    if emptied {
        state.piles.push_discard(card);
        state.winner = Some(player);
        state.phase = Phase::Finished;
        state.pending_draw = 0;
        debug!(session = %state.code, player = %player, card = %card, "winning play");
        return Ok(PlayOutcome { played: card, won: true, forced: None });
    }

    let mut next = state.seat_after(seat, 1);
    let mut forced = None;
    if state.rules.forced_draw() == ForcedDrawPolicy::Immediate && state.pending_draw > 0 {
        let owed = state.pending_draw as usize;
        let drawn = state.piles.draw(owed, &mut state.rng);
        let victim = &mut state.players[next];
        forced = Some(ForcedDraw { victim: victim.id, cards: drawn.len() });
        victim.receive(drawn);
        state.pending_draw = 0;
        next = state.seat_after(next, 1);
    }
    if skip {
        next = state.seat_after(next, 1);
    }

    state.piles.push_discard(card);
    state.set_turn(next);
    debug!(session = %state.code, player = %player, card = %card, next, "play");
    Ok(PlayOutcome { played: card, won: false, forced })
}

/// Draw for the current seat.
///
/// With a pending debt the whole debt is drawn and the turn ends. Without
/// one, a single card is drawn and the seat keeps the turn: it may still
/// play, or pass.
pub fn apply_draw(state: &mut SessionState, player: PlayerId) -> Result<DrawOutcome, RuleError> {
    let seat = turn_seat(state, player)?;

    let resolved_debt = state.pending_draw > 0;
    let owed = if resolved_debt { state.pending_draw as usize } else { 1 };
    let drawn = state.piles.draw(owed, &mut state.rng);
    let count = drawn.len();

    let hand = &mut state.players[seat];
    hand.receive(drawn);
    let plural = if count == 1 { "" } else { "s" };
    state.last_action = Some(format!("{} drew {count} card{plural}", hand.name));
    state.drawn_this_turn = true;
    state.record(player, Action::Draw);

    if resolved_debt {
        state.pending_draw = 0;
        let next = state.seat_after(seat, 1);
        state.set_turn(next);
    }
    debug!(session = %state.code, player = %player, count, resolved_debt, "draw");
    Ok(DrawOutcome { drawn: count, resolved_debt })
}

/// End the current seat's turn without playing.
pub fn apply_pass(state: &mut SessionState, player: PlayerId) -> Result<(), RuleError> {
    let seat = turn_seat(state, player)?;
    if state.pending_draw > 0 {
        return Err(RuleError::MustResolveForcedDraw { pending: state.pending_draw });
    }
    if state.rules.must_draw_before_pass() && !state.drawn_this_turn {
        return Err(RuleError::MustDrawBeforePass);
    }

    state.last_action = Some(format!("{} passed", state.players[seat].name));
    state.record(player, Action::Pass);
    let next = state.seat_after(seat, 1);
    state.set_turn(next);
    Ok(())
}

/// Announce UNO.
///
/// Sets the flag only when the hand holds exactly two cards (announcing
/// before the play that leaves one). Returns whether anything changed.
pub fn apply_call_uno(state: &mut SessionState, player: PlayerId) -> Result<bool, RuleError> {
    let seat = seated(state, player)?;
    let caller = &mut state.players[seat];
    if caller.hand_len() != 2 || caller.has_called_uno {
        return Ok(false);
    }
    caller.has_called_uno = true;
    state.last_action = Some(format!("{} called UNO!", caller.name));
    state.record(player, Action::CallUno);
    Ok(true)
}

/// Cards the player could legally play right now.
///
/// Empty unless it is the player's turn in an active game.
#[must_use]
pub fn legal_cards(state: &SessionState, player: PlayerId) -> Vec<CardId> {
    let Ok(seat) = turn_seat(state, player) else {
        return Vec::new();
    };
    state.players[seat]
        .hand
        .iter()
        .filter(|card| {
            state
                .top_discard()
                .map_or(true, |top| can_play(card, top, state.current_color))
        })
        .filter(|card| state.pending_draw == 0 || card.kind().is_draw())
        .map(|card| card.id)
        .collect()
}

fn seated(state: &SessionState, player: PlayerId) -> Result<usize, RuleError> {
    state.seat_of(player).ok_or(RuleError::PlayerNotInSession(player))
}

/// Seat index of `player` if it is their turn in an active game.
fn turn_seat(state: &SessionState, player: PlayerId) -> Result<usize, RuleError> {
    let seat = seated(state, player)?;
    match state.phase {
        Phase::Lobby => Err(RuleError::NotYourTurn),
        Phase::Finished => Err(RuleError::GameOver),
        Phase::Active if seat != state.current_player_index => Err(RuleError::NotYourTurn),
        Phase::Active => Ok(seat),
    }
}
