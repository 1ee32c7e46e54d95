//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{fmt, EnvFilter};
use uno_engine::cards::standard_deck;
use uno_engine::{
    Card, ChannelBroadcaster, Color, ConnectionId, Face, GameRng, Outbound, Phase, Player, PlayerId,
    RegistryConfig, RuleConfig, SessionCode, SessionRegistry, SessionState, SessionView,
};
use uno_engine::zones::Piles;

static INIT: Once = Once::new();

/// Initialize structured logging for tests.
///
/// Idempotent. Level comes from `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Lobby state with `seats` players named `p0`, `p1`, ...
pub fn lobby(seats: usize, rules: RuleConfig, seed: u64) -> (SessionState, Vec<PlayerId>) {
    let mut rng = GameRng::new(seed);
    let code = SessionCode::parse("TABLE").expect("valid code");
    let mut state = SessionState::new(code, rules, rng.fork());
    let ids: Vec<_> = (0..seats).map(|_| PlayerId::random(&mut rng)).collect();
    for (i, id) in ids.iter().enumerate() {
        state.players.push(Player::new(*id, format!("p{i}"), ConnectionId(i as u64)));
    }
    (state, ids)
}

/// Active game with hand-picked hands and starting discard.
///
/// Cards are taken from a standard deck so ids stay unique; the remaining
/// deck, in composition order, becomes the draw pile. Seat 0 is to play.
pub fn rigged(
    hands: &[&[(Color, Face)]],
    top: (Color, Face),
    rules: RuleConfig,
) -> (SessionState, Vec<PlayerId>) {
    let (mut state, ids) = lobby(hands.len(), rules, 17);
    let mut deck = standard_deck();
    let mut pick = |(color, face): (Color, Face)| -> Card {
        let pos = deck
            .iter()
            .position(|c| c.color == color && c.face == face)
            .unwrap_or_else(|| panic!("no {color:?} {face:?} left in deck"));
        deck.remove(pos)
    };
    for (seat, hand) in hands.iter().enumerate() {
        let cards: Vec<Card> = hand.iter().map(|&spec| pick(spec)).collect();
        state.players[seat].receive(cards);
    }
    let top = pick(top);
    state.piles = Piles::from_deck(deck);
    state.piles.push_discard(top);
    state.current_color = if top.color.is_suit() { top.color } else { Color::Red };
    state.phase = Phase::Active;
    state.set_turn(0);
    (state, ids)
}

/// Check the invariants that hold for every dealt game.
pub fn assert_dealt_invariants(state: &SessionState) {
    assert_eq!(state.total_cards(), 108, "card conservation");
    let mut seen = [false; 108];
    let all = state
        .piles
        .draw_pile()
        .chain(state.piles.discards())
        .chain(state.players.iter().flat_map(|p| p.hand.iter()));
    for card in all {
        let idx = card.id.raw() as usize;
        assert!(!seen[idx], "duplicate {}", card.id);
        seen[idx] = true;
    }
    if !state.players.is_empty() {
        assert!(state.current_player_index < state.seat_count());
    }
    assert!(state.current_color.is_suit());
}

/// A registry wired to an in-process broadcaster, with one inbox per
/// connection.
pub struct Table {
    pub hub: Arc<ChannelBroadcaster>,
    pub registry: SessionRegistry<Arc<ChannelBroadcaster>>,
    inboxes: HashMap<ConnectionId, UnboundedReceiver<Outbound>>,
}

impl Table {
    pub fn new(config: RegistryConfig) -> Self {
        init_logging();
        let hub = Arc::new(ChannelBroadcaster::new());
        let registry = SessionRegistry::new(config, Arc::clone(&hub));
        Self { hub, registry, inboxes: HashMap::new() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RegistryConfig::new().with_seed(seed))
    }

    /// Open an inbox for a new connection.
    pub fn connect(&mut self, id: u64) -> ConnectionId {
        let conn = ConnectionId(id);
        self.inboxes.insert(conn, self.hub.register(conn));
        conn
    }

    /// Everything delivered to `conn` since the last drain.
    pub fn drain(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        self.inboxes
            .get_mut(&conn)
            .map(|rx| std::iter::from_fn(|| rx.try_recv().ok()).collect())
            .unwrap_or_default()
    }

    /// Drain every inbox.
    pub fn drain_all(&mut self) {
        for rx in self.inboxes.values_mut() {
            while rx.try_recv().is_ok() {}
        }
    }

    /// The most recent view delivered to `conn`, draining its inbox.
    pub fn last_view(&mut self, conn: ConnectionId) -> Option<SessionView> {
        self.drain(conn)
            .into_iter()
            .filter_map(|event| match event {
                Outbound::StateUpdate { view } => Some(view),
                _ => None,
            })
            .last()
    }
}
