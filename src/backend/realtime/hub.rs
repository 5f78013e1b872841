/**
 * Realtime Hub
 *
 * The hub owns the registry of live WebSocket connections and fans every
 * broadcast event out to each connection's bounded outbound queue.
 *
 * # Dispatch Loop
 *
 * A single task (`Dispatcher::run`) owns the `Registry` and handles one
 * request at a time, in the order the requests were sent:
 *
 * - `register` - add a connection
 * - `unregister` - remove a connection and close its queue (idempotent)
 * - `broadcast` - enqueue an event on every registered connection
 *
 * All three travel over one channel, so a broadcast sent before a register
 * never reaches the connection registered after it.
 *
 * # Slow Consumers
 *
 * Enqueueing uses `try_send`. A full queue means the connection is dead: it
 * is dropped from the registry, which drops the only queue sender, which in
 * turn makes the writer task send a close frame and exit. The dispatch loop
 * never waits on a client.
 *
 * # Diagnostics
 *
 * A copy of `{connection id -> user id}` is kept behind an `RwLock` and
 * refreshed after every membership change. `connection_count` and
 * `online_users` copy out of it and never touch the registry.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::shared::{EventKind, WsEvent};

/// Process-unique id of one WebSocket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered connection as the hub sees it
///
/// Holds the only sender of the connection's outbound queue. Dropping the
/// `Connection` closes the queue.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    /// Client-supplied identifier, not verified
    pub user_id: String,
    queue: mpsc::Sender<WsEvent>,
}

impl Connection {
    pub fn new(id: ConnectionId, user_id: impl Into<String>, queue: mpsc::Sender<WsEvent>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            queue,
        }
    }
}

/// Outcome of one fan-out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOut {
    /// Connections the event was enqueued on
    pub delivered: usize,
    /// Connections removed because their queue was full or closed
    pub dropped: Vec<ConnectionId>,
}

/// Set of live connections
///
/// Only the dispatch loop mutates it in production; it is public so its
/// bookkeeping can be exercised without a runtime.
#[derive(Debug, Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, replacing any entry with the same id
    pub fn insert(&mut self, connection: Connection) {
        self.connections.insert(connection.id, connection);
    }

    /// Remove a connection and close its queue. Returns false if absent.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.connections.remove(&id).is_some()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Enqueue `event` on every connection without waiting
    ///
    /// Connections whose queue is full or closed are removed. They receive
    /// neither this event nor any later one.
    pub fn fan_out(&mut self, event: &WsEvent) -> FanOut {
        let mut outcome = FanOut::default();

        for (id, connection) in &self.connections {
            match connection.queue.try_send(event.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                    outcome.dropped.push(*id)
                }
            }
        }

        for id in &outcome.dropped {
            self.connections.remove(id);
        }

        outcome
    }

    /// Copy of `{connection id -> user id}`
    pub fn snapshot(&self) -> HashMap<ConnectionId, String> {
        self.connections
            .iter()
            .map(|(id, c)| (*id, c.user_id.clone()))
            .collect()
    }
}

type Snapshot = Arc<RwLock<HashMap<ConnectionId, String>>>;

/// One unit of work for the dispatch loop
#[derive(Debug)]
enum Request {
    Register(Connection),
    Unregister(ConnectionId),
    Broadcast(WsEvent),
}

/// Handle to the realtime hub
///
/// Cheap to clone. The dispatch loop stops once every handle is dropped.
#[derive(Clone)]
pub struct Hub {
    requests: mpsc::UnboundedSender<Request>,
    snapshot: Snapshot,
    next_id: Arc<AtomicU64>,
    queue_capacity: usize,
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("connections", &self.connection_count())
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

impl Hub {
    /// Create a hub and spawn its dispatch loop on the current runtime
    ///
    /// `queue_capacity` bounds every connection's outbound queue; 0 is
    /// treated as 1.
    pub fn spawn(queue_capacity: usize) -> Self {
        let (hub, dispatcher) = Self::new(queue_capacity);
        tokio::spawn(dispatcher.run());
        hub
    }

    /// Create a hub and its not-yet-running dispatch loop
    pub fn new(queue_capacity: usize) -> (Self, Dispatcher) {
        let (requests, inbox) = mpsc::unbounded_channel();
        let snapshot: Snapshot = Arc::new(RwLock::new(HashMap::new()));

        let hub = Self {
            requests,
            snapshot: snapshot.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
            queue_capacity: queue_capacity.max(1),
        };
        let dispatcher = Dispatcher {
            registry: Registry::new(),
            inbox,
            snapshot,
        };
        (hub, dispatcher)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Allocate a connection id and its bounded outbound queue
    ///
    /// The returned `Connection` is not registered yet.
    pub fn open_connection(
        &self,
        user_id: impl Into<String>,
    ) -> (Connection, mpsc::Receiver<WsEvent>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        (Connection::new(id, user_id, tx), rx)
    }

    /// Add a connection to the registry
    pub fn register(&self, connection: Connection) {
        if self.requests.send(Request::Register(connection)).is_err() {
            tracing::warn!("[Hub] Dispatch loop stopped, register ignored");
        }
    }

    /// Remove a connection and close its queue; unknown ids are ignored
    pub fn unregister(&self, id: ConnectionId) {
        if self.requests.send(Request::Unregister(id)).is_err() {
            tracing::debug!(connection_id = %id, "[Hub] Dispatch loop stopped, unregister ignored");
        }
    }

    /// Queue an event for every registered connection. Never blocks.
    pub fn broadcast(&self, event: WsEvent) {
        if self.requests.send(Request::Broadcast(event)).is_err() {
            tracing::warn!("[Hub] Dispatch loop stopped, broadcast dropped");
        }
    }

    /// Build an event and broadcast it
    pub fn publish(&self, kind: impl Into<EventKind>, payload: serde_json::Value) {
        self.broadcast(WsEvent::new(kind, payload));
    }

    /// Number of registered connections at the last membership change
    pub fn connection_count(&self) -> usize {
        read_snapshot(&self.snapshot, |map| map.len())
    }

    /// Distinct user ids with at least one registered connection, sorted
    pub fn online_users(&self) -> Vec<String> {
        let users: HashSet<String> = read_snapshot(&self.snapshot, |map| {
            map.values().cloned().collect()
        });
        let mut users: Vec<String> = users.into_iter().collect();
        users.sort();
        users
    }
}

fn read_snapshot<T>(
    snapshot: &Snapshot,
    f: impl FnOnce(&HashMap<ConnectionId, String>) -> T,
) -> T {
    let guard = snapshot.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&guard)
}

/// The hub's dispatch loop
pub struct Dispatcher {
    registry: Registry,
    inbox: mpsc::UnboundedReceiver<Request>,
    snapshot: Snapshot,
}

impl Dispatcher {
    /// Run until every `Hub` handle is dropped
    pub async fn run(mut self) {
        tracing::info!("[Hub] Dispatch loop started");

        while let Some(request) = self.inbox.recv().await {
            self.handle(request);
        }

        tracing::info!("[Hub] Dispatch loop stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Register(connection) => {
                tracing::info!(
                    connection_id = %connection.id,
                    user_id = %connection.user_id,
                    "[Hub] Connection registered"
                );
                self.registry.insert(connection);
                self.refresh_snapshot();
            }
            Request::Unregister(id) => {
                if self.registry.remove(id) {
                    tracing::info!(connection_id = %id, "[Hub] Connection unregistered");
                    self.refresh_snapshot();
                }
            }
            Request::Broadcast(event) => {
                let outcome = self.registry.fan_out(&event);
                tracing::debug!(
                    kind = %event.kind,
                    delivered = outcome.delivered,
                    "[Hub] Event broadcast"
                );
                if !outcome.dropped.is_empty() {
                    for id in &outcome.dropped {
                        tracing::warn!(connection_id = %id, "[Hub] Outbound queue full, connection dropped");
                    }
                    self.refresh_snapshot();
                }
            }
        }
    }

    fn refresh_snapshot(&self) {
        let fresh = self.registry.snapshot();
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = fresh;
    }
}
