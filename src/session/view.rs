//! Per-recipient view projection.
//!
//! `project` is the only way session state leaves the engine. It is a pure
//! function of the state and the viewer, recomputed for every recipient on
//! every broadcast:
//!
//! - The viewer's own hand is shown in full.
//! - Every other hand is reduced to a card count.
//! - The draw pile is reduced to a card count.
//! - The discard pile is public.
//!
//! History, the RNG, and connection handles never appear in a view.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Color};
use crate::core::{CardId, Direction, Phase, PlayerId, SessionCode, SessionState};
use crate::rules;

/// A hand as one viewer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandView {
    /// The viewer's own hand.
    Visible(Vec<Card>),
    /// Someone else's hand: only the size is known.
    Hidden { count: usize },
}

impl HandView {
    /// Number of cards, visible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            HandView::Visible(cards) => cards.len(),
            HandView::Hidden { count } => *count,
        }
    }

    /// Is the hand empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One seat as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub hand: HandView,
    pub has_called_uno: bool,
}

/// Everything one seat is allowed to know about its session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub code: SessionCode,
    /// The seat this view was projected for.
    pub viewer: PlayerId,
    pub seats: Vec<SeatView>,
    pub phase: Phase,
    pub current_player: Option<PlayerId>,
    pub direction: Direction,
    pub current_color: Color,
    pub discard_pile: Vec<Card>,
    pub draw_count: usize,
    pub pending_draw: u32,
    pub winner: Option<PlayerId>,
    pub last_action: Option<String>,
    /// Cards in the viewer's hand that would be accepted right now.
    pub playable: Vec<CardId>,
}

impl SessionView {
    /// The viewer's own hand (empty if the viewer is not seated).
    #[must_use]
    pub fn my_hand(&self) -> &[Card] {
        self.seats
            .iter()
            .find_map(|seat| match &seat.hand {
                HandView::Visible(cards) if seat.id == self.viewer => Some(cards.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Top of the discard pile.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.discard_pile.last()
    }
}

/// Project `state` for `viewer`.
#[must_use]
pub fn project(state: &SessionState, viewer: PlayerId) -> SessionView {
    let seats = state
        .players
        .iter()
        .map(|p| SeatView {
            id: p.id,
            name: p.name.clone(),
            hand: if p.id == viewer {
                HandView::Visible(p.hand.iter().copied().collect())
            } else {
                HandView::Hidden { count: p.hand_len() }
            },
            has_called_uno: p.has_called_uno,
        })
        .collect();

    let current_player = match state.phase {
        Phase::Active => state.current_player().map(|p| p.id),
        Phase::Lobby | Phase::Finished => None,
    };

    SessionView {
        code: state.code.clone(),
        viewer,
        seats,
        phase: state.phase,
        current_player,
        direction: state.direction,
        current_color: state.current_color,
        discard_pile: state.piles.discards().copied().collect(),
        draw_count: state.piles.draw_len(),
        pending_draw: state.pending_draw,
        winner: state.winner,
        last_action: state.last_action.clone(),
        playable: rules::legal_cards(state, viewer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConnectionId, GameRng, Player, RuleConfig};

    fn started(seats: usize) -> (SessionState, Vec<PlayerId>) {
        let mut rng = GameRng::new(21);
        let code = SessionCode::parse("VIEW").unwrap();
        let mut state = SessionState::new(code, RuleConfig::default(), rng.fork());
        let ids: Vec<_> = (0..seats).map(|_| PlayerId::random(&mut rng)).collect();
        for (i, id) in ids.iter().enumerate() {
            state.players.push(Player::new(*id, format!("p{i}"), ConnectionId(i as u64)));
        }
        rules::start_session(&mut state, ids[0]).unwrap();
        (state, ids)
    }

    #[test]
    fn test_own_hand_visible_others_hidden() {
        let (state, ids) = started(3);
        let view = project(&state, ids[1]);

        assert_eq!(view.viewer, ids[1]);
        assert_eq!(view.seats.len(), 3);
        for (seat, player) in view.seats.iter().zip(&state.players) {
            if seat.id == ids[1] {
                let expected: Vec<Card> = player.hand.iter().copied().collect();
                assert_eq!(seat.hand, HandView::Visible(expected));
            } else {
                assert_eq!(seat.hand, HandView::Hidden { count: 7 });
            }
        }
        assert_eq!(view.my_hand().len(), 7);
    }

    #[test]
    fn test_draw_pile_is_count_only() {
        let (state, ids) = started(2);
        let view = project(&state, ids[0]);

        assert_eq!(view.draw_count, 108 - 14 - 1);
        assert_eq!(view.discard_pile.len(), 1);
        assert_eq!(view.top_discard(), state.top_discard());
    }

    #[test]
    fn test_no_foreign_card_ids_leak() {
        let (state, ids) = started(4);
        let view = project(&state, ids[2]);
        let json = serde_json::to_string(&view).unwrap();

        let visible: Vec<CardId> = view
            .my_hand()
            .iter()
            .chain(view.discard_pile.iter())
            .map(|c| c.id)
            .collect();
        assert_eq!(visible.len(), 8);

        for player in state.players.iter().filter(|p| p.id != ids[2]) {
            for card in player.hand.iter() {
                assert!(!visible.contains(&card.id));
            }
        }
        assert!(!json.contains("\"draw_pile\""));
    }

    #[test]
    fn test_playable_only_for_current_seat() {
        let (state, ids) = started(2);
        let current = project(&state, ids[0]);
        let waiting = project(&state, ids[1]);

        assert!(waiting.playable.is_empty());
        for id in &current.playable {
            assert!(current.my_hand().iter().any(|c| c.id == *id));
        }
        assert_eq!(current.current_player, Some(ids[0]));
    }

    #[test]
    fn test_stranger_sees_no_hands() {
        let (state, _) = started(2);
        let stranger = PlayerId::random(&mut GameRng::new(77));
        let view = project(&state, stranger);

        assert!(view.my_hand().is_empty());
        assert!(view.seats.iter().all(|s| matches!(s.hand, HandView::Hidden { .. })));
    }

    #[test]
    fn test_lobby_view_has_no_current_player() {
        let mut rng = GameRng::new(3);
        let mut state = SessionState::new(SessionCode::parse("LOBBY").unwrap(), RuleConfig::default(), rng.fork());
        let id = PlayerId::random(&mut rng);
        state.players.push(Player::new(id, "solo", ConnectionId(1)));

        let view = project(&state, id);
        assert_eq!(view.phase, Phase::Lobby);
        assert_eq!(view.current_player, None);
        assert_eq!(view.draw_count, 0);
        assert!(view.discard_pile.is_empty());
    }
}
