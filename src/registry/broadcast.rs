//! Push boundary between the registry and the transport.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::ConnectionId;
use crate::protocol::Outbound;

/// Delivers outbound events to connections.
///
/// Called while a session lock is held, so implementations must not block
/// and must not call back into the registry. Events for unknown or closed
/// connections are dropped.
pub trait Broadcaster: Send + Sync {
    fn send(&self, connection: ConnectionId, event: Outbound);
}

impl<B: Broadcaster + ?Sized> Broadcaster for Arc<B> {
    fn send(&self, connection: ConnectionId, event: Outbound) {
        (**self).send(connection, event);
    }
}

/// In-process broadcaster backed by one unbounded channel per connection.
///
/// Sending never blocks and needs no runtime; the transport awaits the
/// receiving half with `recv().await` or drains it with `try_recv`.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    outboxes: Mutex<FxHashMap<ConnectionId, UnboundedSender<Outbound>>>,
}

impl ChannelBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an outbox for `connection`, replacing any previous one.
    pub fn register(&self, connection: ConnectionId) -> UnboundedReceiver<Outbound> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes.lock().insert(connection, tx);
        rx
    }

    /// Close the outbox for `connection`.
    pub fn unregister(&self, connection: ConnectionId) {
        self.outboxes.lock().remove(&connection);
    }

    /// Number of open outboxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outboxes.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send(&self, connection: ConnectionId, event: Outbound) {
        let mut outboxes = self.outboxes.lock();
        let Some(tx) = outboxes.get(&connection) else {
            return;
        };
        if tx.send(event).is_err() {
            // Receiver dropped: the connection is gone.
            outboxes.remove(&connection);
        }
    }
}
