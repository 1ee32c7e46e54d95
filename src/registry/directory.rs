//! The session registry: directory, connection table, routing.
//!
//! ## Locking
//!
//! - `sessions`: the directory, an `RwLock` over `code -> Arc<Mutex<GameSession>>`.
//!   Lookups take a brief read lock and clone the `Arc`; create and evict
//!   take the write lock.
//! - Each `GameSession` has its own `Mutex`. Intents on different sessions
//!   never wait on each other.
//! - `seats`: connection table, `ConnectionId -> SeatRef`. Always the
//!   innermost lock.
//! - `rng`: the root RNG. Never held while acquiring another lock.
//!
//! Order is directory, then session, then seats. Views are broadcast while
//! the session lock is held so every connection sees updates in mutation
//! order.
//!
//! ## Failure isolation
//!
//! Every seat action runs against a clone of the session inside
//! `catch_unwind`. The clone is committed only on success, so neither a
//! rejection nor a panic can leave a half-applied change behind, and a
//! panic never escapes into the transport's thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, error, info, warn};

use super::broadcast::Broadcaster;
use super::error::RegistryError;
use crate::core::{Action, ConnectionId, GameRng, PlayerId, RegistryConfig, SessionCode};
use crate::protocol::{Intent, Outbound};
use crate::rules::RuleError;
use crate::session::{GameSession, SessionView};

/// Attempts at drawing an unused session code before giving up.
const CODE_ATTEMPTS: usize = 64;

type SharedSession = Arc<Mutex<GameSession>>;

/// Where a connection is seated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeatRef {
    pub session: SessionCode,
    pub player: PlayerId,
}

/// Point-in-time registry counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Live sessions.
    pub sessions: usize,
    /// Connections holding a seat.
    pub connections: usize,
}

/// Maps session codes to live sessions and routes intents to them.
pub struct SessionRegistry<B: Broadcaster> {
    config: RegistryConfig,
    sessions: RwLock<FxHashMap<SessionCode, SharedSession>>,
    seats: RwLock<FxHashMap<ConnectionId, SeatRef>>,
    rng: Mutex<GameRng>,
    broadcaster: B,
}

impl<B: Broadcaster> SessionRegistry<B> {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig, broadcaster: B) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        info!(seed = rng.seed(), "session registry ready");
        Self {
            config,
            sessions: RwLock::new(FxHashMap::default()),
            seats: RwLock::new(FxHashMap::default()),
            rng: Mutex::new(rng),
            broadcaster,
        }
    }

    /// Registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The broadcaster events are pushed through.
    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    /// Handle one intent from `connection`.
    ///
    /// A rejection is sent to `connection` only and also returned.
    pub fn handle(&self, connection: ConnectionId, intent: Intent) -> Result<(), RegistryError> {
        let name = intent.name();
        let result = match intent {
            Intent::CreateSession { player_name } => {
                self.create(connection, player_name).map(|_| ())
            }
            Intent::JoinSession { session, player_name } => {
                self.join(connection, &session, player_name).map(|_| ())
            }
            seat_intent => match seat_intent.seat_action() {
                Some((session, player, action)) => self.route(connection, session, player, action),
                None => Err(RegistryError::Malformed { detail: format!("unroutable {name}") }),
            },
        };
        if let Err(err) = &result {
            self.reject(connection, name, err);
        }
        result
    }

    /// Decode and handle one wire frame.
    pub fn handle_bytes(&self, connection: ConnectionId, frame: &[u8]) -> Result<(), RegistryError> {
        match Intent::from_bytes(frame) {
            Ok(intent) => self.handle(connection, intent),
            Err(err) => {
                let err = RegistryError::Malformed { detail: err.to_string() };
                self.reject(connection, "frame", &err);
                Err(err)
            }
        }
    }

    /// Open a new lobby seating the creator.
    ///
    /// The creator receives `SessionCreated` followed by its first view.
    pub fn create(
        &self,
        connection: ConnectionId,
        player_name: impl Into<String>,
    ) -> Result<(SessionCode, PlayerId), RegistryError> {
        let player = self.mint_player();
        let shared = {
            let mut sessions = self.sessions.write();
            let code = self.unused_code(&sessions)?;
            let mut seats = self.seats.write();
            if seats.contains_key(&connection) {
                return Err(RegistryError::AlreadySeated(connection));
            }
            let rng = self.rng.lock().fork();
            let session = GameSession::new(
                code.clone(),
                self.config.rules.clone(),
                rng,
                player,
                player_name,
                connection,
            );
            let shared = Arc::new(Mutex::new(session));
            sessions.insert(code.clone(), Arc::clone(&shared));
            seats.insert(connection, SeatRef { session: code, player });
            shared
        };

        let session = shared.lock();
        let code = session.code().clone();
        self.broadcaster.send(
            connection,
            Outbound::SessionCreated { session: code.clone(), player },
        );
        self.broadcast(&session);
        Ok((code, player))
    }

    /// Seat a connection in an existing lobby.
    ///
    /// The joiner receives `SessionJoined`; every seat then receives a
    /// fresh view.
    pub fn join(
        &self,
        connection: ConnectionId,
        code: &SessionCode,
        player_name: impl Into<String>,
    ) -> Result<PlayerId, RegistryError> {
        let shared = self.lookup(code)?;
        let player = self.mint_player();

        let mut session = shared.lock();
        if session.is_empty() {
            // Evicted between lookup and lock.
            return Err(RegistryError::SessionNotFound(code.clone()));
        }
        {
            let mut seats = self.seats.write();
            if seats.contains_key(&connection) {
                return Err(RegistryError::AlreadySeated(connection));
            }
            session.join(player, player_name, connection)?;
            seats.insert(connection, SeatRef { session: code.clone(), player });
        }

        self.broadcaster.send(
            connection,
            Outbound::SessionJoined { session: code.clone(), player },
        );
        self.broadcast(&session);
        Ok(player)
    }

    /// Apply a seat action on behalf of `connection`.
    ///
    /// The connection must hold the seat named by `player` in `code`.
    pub fn route(
        &self,
        connection: ConnectionId,
        code: &SessionCode,
        player: PlayerId,
        action: Action,
    ) -> Result<(), RegistryError> {
        let shared = self.lookup(code)?;
        let mut session = shared.lock();
        if session.is_empty() {
            return Err(RegistryError::SessionNotFound(code.clone()));
        }
        self.check_seat(connection, code, player)?;

        let transition = apply_isolated(&mut session, action.name(), |draft| draft.apply(player, action))?;

        if action == Action::Leave {
            self.seats.write().remove(&connection);
        }
        if transition.is_visible() {
            self.broadcast(&session);
        }
        let empty = session.is_empty();
        drop(session);

        if empty {
            self.evict_if_empty(code);
        }
        Ok(())
    }

    /// Remove the seat held by a dropped connection.
    ///
    /// Remaining seats get a fresh view; a session left without seats is
    /// evicted.
    pub fn disconnect(&self, connection: ConnectionId) -> Result<(), RegistryError> {
        let seat = self
            .seats
            .read()
            .get(&connection)
            .cloned()
            .ok_or(RegistryError::UnknownConnection(connection))?;
        debug!(%connection, session = %seat.session, player = %seat.player, "connection dropped");

        match self.route(connection, &seat.session, seat.player, Action::Leave) {
            Err(RegistryError::SessionNotFound(_)) => {
                // Session already gone; just forget the connection.
                self.seats.write().remove(&connection);
                Ok(())
            }
            other => other,
        }
    }

    /// Reclaim orphaned sessions.
    ///
    /// Evicts sessions with no seats, sessions none of whose seats is still
    /// held by a connection, and (if configured) lobbies idle for longer
    /// than `lobby_idle_timeout`. Returns the number evicted.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write();
        let mut evicted = Vec::new();
        for (code, shared) in sessions.iter() {
            let session = shared.lock();
            let seats = self.seats.read();
            let connected = session.connections().any(|(player, conn)| {
                seats
                    .get(&conn)
                    .is_some_and(|seat| seat.session == *code && seat.player == player)
            });
            let idle = self.config.lobby_idle_timeout.is_some_and(|timeout| {
                !session.state().is_started()
                    && now.saturating_duration_since(session.last_activity()) > timeout
            });
            if !connected || idle {
                evicted.push(code.clone());
            }
        }

        for code in &evicted {
            if let Some(shared) = sessions.remove(code) {
                let session = shared.lock();
                let mut seats = self.seats.write();
                for (_, conn) in session.connections() {
                    if seats.get(&conn).is_some_and(|seat| seat.session == *code) {
                        seats.remove(&conn);
                    }
                }
                info!(session = %code, seats = session.seat_count(), "session swept");
            }
        }
        evicted.len()
    }

    /// Current counters.
    pub fn stats(&self) -> RegistryStats {
        let sessions = self.sessions.read().len();
        let connections = self.seats.read().len();
        RegistryStats { sessions, connections }
    }

    /// Where `connection` is seated.
    pub fn seat_of(&self, connection: ConnectionId) -> Option<SeatRef> {
        self.seats.read().get(&connection).cloned()
    }

    /// Is a session with this code live?
    pub fn contains(&self, code: &SessionCode) -> bool {
        self.sessions.read().contains_key(code)
    }

    /// Project a live session for `viewer`.
    pub fn view(&self, code: &SessionCode, viewer: PlayerId) -> Option<SessionView> {
        let shared = self.lookup(code).ok()?;
        let session = shared.lock();
        Some(session.view_for(viewer))
    }

    /// Clone of a live session, for inspection.
    pub fn snapshot(&self, code: &SessionCode) -> Option<GameSession> {
        let shared = self.lookup(code).ok()?;
        let session = shared.lock();
        Some(session.clone())
    }

    fn lookup(&self, code: &SessionCode) -> Result<SharedSession, RegistryError> {
        self.sessions
            .read()
            .get(code)
            .cloned()
            .ok_or_else(|| RegistryError::SessionNotFound(code.clone()))
    }

    fn check_seat(
        &self,
        connection: ConnectionId,
        code: &SessionCode,
        player: PlayerId,
    ) -> Result<(), RegistryError> {
        match self.seats.read().get(&connection) {
            None => Err(RegistryError::UnknownConnection(connection)),
            Some(seat) if seat.session == *code && seat.player == player => Ok(()),
            Some(_) => Err(RuleError::PlayerNotInSession(player).into()),
        }
    }

    fn mint_player(&self) -> PlayerId {
        PlayerId::random(&mut self.rng.lock())
    }

    fn unused_code(
        &self,
        sessions: &FxHashMap<SessionCode, SharedSession>,
    ) -> Result<SessionCode, RegistryError> {
        let mut rng = self.rng.lock();
        for _ in 0..CODE_ATTEMPTS {
            let code = SessionCode::random(&mut rng, self.config.code_length);
            if !sessions.contains_key(&code) {
                return Ok(code);
            }
        }
        error!(live = sessions.len(), "no unused session code found");
        Err(RegistryError::Internal { intent: "create_session" })
    }

    fn broadcast(&self, session: &GameSession) {
        for (player, connection) in session.connections() {
            let view = session.view_for(player);
            self.broadcaster.send(connection, Outbound::StateUpdate { view });
        }
    }

    fn reject(&self, connection: ConnectionId, intent: &'static str, err: &RegistryError) {
        warn!(%connection, intent, code = ?err.code(), reason = %err, "intent rejected");
        self.broadcaster
            .send(connection, Outbound::rejected(err.code(), err.to_string()));
    }

    fn evict_if_empty(&self, code: &SessionCode) {
        let mut sessions = self.sessions.write();
        let empty = sessions
            .get(code)
            .is_some_and(|shared| shared.lock().is_empty());
        if empty {
            sessions.remove(code);
            info!(session = %code, "session evicted");
        }
    }
}

/// Run `op` against a clone of `session`, committing only on success.
///
/// A panic inside `op` is logged and reported as `Internal`; the session
/// keeps its previous state.
fn apply_isolated<T>(
    session: &mut GameSession,
    intent: &'static str,
    op: impl FnOnce(&mut GameSession) -> Result<T, RuleError>,
) -> Result<T, RegistryError> {
    let mut draft = session.clone();
    match catch_unwind(AssertUnwindSafe(|| op(&mut draft))) {
        Ok(Ok(value)) => {
            *session = draft;
            Ok(value)
        }
        Ok(Err(err)) => Err(err.into()),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            let last_recorded = session.history().last().map(|r| r.action.name());
            error!(
                session = %session.code(),
                intent,
                last_recorded,
                panic = %message,
                "panic while applying intent"
            );
            Err(RegistryError::Internal { intent })
        }
    }
}
