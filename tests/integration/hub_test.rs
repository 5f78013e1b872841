//! Hub integration tests through the public `Hub` handle

use std::time::Duration;

use chatline::backend::realtime::Hub;
use chatline::shared::{EventKind, WsEvent};
use serde_json::json;
use tokio::time::timeout;

/// Poll until `check` holds, the snapshot trails the dispatch loop
async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_every_connection_receives_each_event_once() {
    let hub = Hub::spawn(16);

    let (a, mut rx_a) = hub.open_connection("maria");
    let (b, mut rx_b) = hub.open_connection("luigi");
    hub.register(a);
    hub.register(b);
    eventually(|| hub.connection_count() == 2).await;

    hub.publish(EventKind::Message, json!({ "text": "hi" }));

    for rx in [&mut rx_a, &mut rx_b] {
        let event = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.payload["text"], "hi");
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test]
async fn test_events_keep_publish_order() {
    let hub = Hub::spawn(16);
    let (conn, mut rx) = hub.open_connection("maria");
    hub.register(conn);

    for n in 0..10 {
        hub.broadcast(WsEvent::new("counter", json!({ "n": n })));
    }

    for n in 0..10 {
        let event = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.kind.as_str(), "counter");
        assert_eq!(event.payload["n"], n);
    }
}

#[tokio::test]
async fn test_slow_connection_is_dropped_without_blocking_others() {
    let hub = Hub::spawn(1);

    let (slow, mut slow_rx) = hub.open_connection("slow");
    let (fast, mut fast_rx) = hub.open_connection("fast");
    hub.register(slow);
    hub.register(fast);
    eventually(|| hub.connection_count() == 2).await;

    for n in 0..3 {
        hub.publish(EventKind::Message, json!({ "n": n }));
        let event = timeout(Duration::from_secs(1), fast_rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.payload["n"], n);
    }

    eventually(|| hub.connection_count() == 1).await;
    assert_eq!(hub.online_users(), vec!["fast".to_string()]);

    // the slow queue got the first event, then was closed
    assert_eq!(slow_rx.recv().await.unwrap().payload["n"], 0);
    assert!(slow_rx.recv().await.is_none());
}

#[tokio::test]
async fn test_unregister_closes_queue() {
    let hub = Hub::spawn(4);
    let (conn, mut rx) = hub.open_connection("maria");
    let id = conn.id;
    hub.register(conn);
    hub.unregister(id);
    hub.unregister(id);

    assert!(timeout(Duration::from_secs(1), rx.recv()).await.unwrap().is_none());
    eventually(|| hub.connection_count() == 0).await;
}

#[tokio::test]
async fn test_idle_connection_has_nothing_queued() {
    let hub = Hub::spawn(4);
    let (conn, mut rx) = hub.open_connection("maria");
    hub.register(conn);
    eventually(|| hub.connection_count() == 1).await;

    let mut recv = tokio_test::task::spawn(rx.recv());
    tokio_test::assert_pending!(recv.poll());
}
