//! Property-based tests for the connection registry

use std::collections::{HashMap, HashSet};

use chatline::backend::realtime::{Connection, ConnectionId, Registry};
use chatline::shared::WsEvent;
use proptest::prelude::*;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
enum Op {
    Insert(u64),
    Remove(u64),
    Broadcast,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..8).prop_map(Op::Insert),
        (0u64..8).prop_map(Op::Remove),
        Just(Op::Broadcast),
    ]
}

fn event(n: usize) -> WsEvent {
    WsEvent::new("message", serde_json::json!({ "n": n }))
}

proptest! {
    /// With queues large enough, the registry behaves like a plain set and
    /// every broadcast reaches every member exactly once.
    #[test]
    fn test_registry_matches_set_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut registry = Registry::new();
        let mut model: HashSet<u64> = HashSet::new();
        let mut receivers: HashMap<u64, mpsc::Receiver<WsEvent>> = HashMap::new();
        let mut expected: HashMap<u64, usize> = HashMap::new();
        let mut broadcasts = 0;

        for op in ops {
            match op {
                Op::Insert(raw) => {
                    let (tx, rx) = mpsc::channel(128);
                    registry.insert(Connection::new(ConnectionId::new(raw), format!("user{raw}"), tx));
                    model.insert(raw);
                    receivers.insert(raw, rx);
                    expected.insert(raw, 0);
                }
                Op::Remove(raw) => {
                    prop_assert_eq!(registry.remove(ConnectionId::new(raw)), model.remove(&raw));
                }
                Op::Broadcast => {
                    let outcome = registry.fan_out(&event(broadcasts));
                    broadcasts += 1;
                    prop_assert_eq!(outcome.delivered, model.len());
                    prop_assert!(outcome.dropped.is_empty());
                    for raw in &model {
                        *expected.entry(*raw).or_default() += 1;
                    }
                }
            }
            prop_assert_eq!(registry.len(), model.len());
        }

        for raw in &model {
            prop_assert!(registry.contains(ConnectionId::new(*raw)));
            let rx = receivers.get_mut(raw).unwrap();
            let mut received = 0;
            while rx.try_recv().is_ok() {
                received += 1;
            }
            prop_assert_eq!(received, expected[raw]);
        }

        let snapshot = registry.snapshot();
        prop_assert_eq!(snapshot.len(), model.len());
    }

    /// An undrained connection survives exactly `capacity` broadcasts and is
    /// removed on the next one. Other connections are unaffected.
    #[test]
    fn test_full_queue_drops_only_that_connection(capacity in 1usize..8, extra in 1usize..8) {
        let mut registry = Registry::new();

        let (slow_tx, mut slow_rx) = mpsc::channel(capacity);
        let slow = ConnectionId::new(1);
        registry.insert(Connection::new(slow, "slow", slow_tx));

        let (fast_tx, mut fast_rx) = mpsc::channel(1);
        let fast = ConnectionId::new(2);
        registry.insert(Connection::new(fast, "fast", fast_tx));

        for n in 0..capacity + extra {
            let outcome = registry.fan_out(&event(n));
            prop_assert!(fast_rx.try_recv().is_ok());
            if n == capacity {
                prop_assert_eq!(outcome.dropped, vec![slow]);
            } else {
                prop_assert!(outcome.dropped.is_empty());
            }
        }

        prop_assert!(!registry.contains(slow));
        prop_assert!(registry.contains(fast));

        let mut received = 0;
        while slow_rx.try_recv().is_ok() {
            received += 1;
        }
        prop_assert_eq!(received, capacity);
        prop_assert!(slow_rx.is_closed());
    }
}
