//! WebSocket end-to-end tests
//!
//! The router is served on a real loopback listener so `tokio-tungstenite`
//! clients can connect. HTTP calls go through `axum-test` on the same
//! router, which shares the hub.

use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use axum_test::TestServer;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use chatline::backend::routes::create_router;
use chatline::backend::server::{build_state, AppState};
use chatline::shared::{AppConfig, EventKind};

use crate::common::{authorized, create_test_pool};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct LiveApp {
    addr: SocketAddr,
    state: AppState,
    http: TestServer,
}

impl LiveApp {
    async fn start() -> Self {
        let state = build_state(create_test_pool().await, AppConfig::default());
        let router = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = router.clone();
        tokio::spawn(async move {
            axum::serve(listener, served).await.unwrap();
        });

        let http = TestServer::new(router).unwrap();
        Self { addr, state, http }
    }

    async fn connect(&self, user_id: &str) -> WsClient {
        let url = format!("ws://{}/ws?userId={}", self.addr, user_id);
        let (ws, _) = connect_async(url).await.expect("websocket handshake");
        ws
    }

    async fn wait_for_connections(&self, count: usize) {
        for _ in 0..200 {
            if self.state.hub.connection_count() == count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {count} connections, have {}",
            self.state.hub.connection_count()
        );
    }

    async fn login(&self, name: &str) -> String {
        let body: Value = self.http.post("/session").json(&json!({ "name": name })).await.json();
        body["identifier"].as_str().unwrap().to_string()
    }
}

/// Next JSON text frame
async fn next_event(ws: &mut WsClient) -> Value {
    loop {
        let frame = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Skip frames until one of `kind` arrives
async fn next_of_kind(ws: &mut WsClient, kind: &str) -> Value {
    loop {
        let event = next_event(ws).await;
        if event["kind"] == kind {
            return event;
        }
    }
}

#[tokio::test]
async fn test_upgrade_without_user_id_is_rejected() {
    let app = LiveApp::start().await;

    let result = connect_async(format!("ws://{}/ws", app.addr)).await;
    assert_matches!(result, Err(WsError::Http(response)) if response.status() == 400);
}

#[tokio::test]
async fn test_published_event_reaches_every_client() {
    let app = LiveApp::start().await;
    let mut maria = app.connect("maria").await;
    let mut luigi = app.connect("luigi").await;
    app.wait_for_connections(2).await;

    app.state
        .hub
        .publish(EventKind::ConversationUpdated, json!({ "conversationId": "c1" }));

    for ws in [&mut maria, &mut luigi] {
        let event = next_event(ws).await;
        assert_eq!(event["kind"], "conversation_updated");
        assert_eq!(event["payload"]["conversationId"], "c1");
    }
}

#[tokio::test]
async fn test_typing_is_relayed_as_user_typing() {
    let app = LiveApp::start().await;
    let mut maria = app.connect("maria").await;
    let mut luigi = app.connect("luigi").await;
    app.wait_for_connections(2).await;

    let frame = json!({ "type": "typing_start", "payload": { "conversationId": "c1" } });
    maria.send(Message::Text(frame.to_string().into())).await.unwrap();

    let event = next_of_kind(&mut luigi, "user_typing").await;
    assert_eq!(event["payload"]["userId"], "maria");
    assert_eq!(event["payload"]["typing"], true);
    assert_eq!(event["payload"]["conversationId"], "c1");
}

#[tokio::test]
async fn test_rest_message_is_pushed_to_clients() {
    let app = LiveApp::start().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;

    let mut ws = app.connect(&luigi).await;
    app.wait_for_connections(1).await;

    let conversation: Value = authorized(
        app.http.post(&format!("/users/{maria}/conversations")),
        &maria,
    )
    .json(&json!({ "participants": [luigi] }))
    .await
    .json();
    let cid = conversation["id"].as_str().unwrap();

    let updated = next_of_kind(&mut ws, "conversation_updated").await;
    assert_eq!(updated["payload"]["conversationId"], cid);

    authorized(
        app.http.post(&format!("/users/{maria}/conversations/{cid}/messages")),
        &maria,
    )
    .json(&json!({ "content": "over the wire" }))
    .await;

    let event = next_of_kind(&mut ws, "message").await;
    assert_eq!(event["payload"]["text"], "over the wire");
    assert_eq!(event["payload"]["conversationId"], cid);
    assert_eq!(event["payload"]["senderUsername"], "maria");
}

#[tokio::test]
async fn test_closing_client_unregisters() {
    let app = LiveApp::start().await;
    let mut maria = app.connect("maria").await;
    let _luigi = app.connect("luigi").await;
    app.wait_for_connections(2).await;

    let mut online = app.state.hub.online_users();
    online.sort();
    assert_eq!(online, vec!["luigi".to_string(), "maria".to_string()]);

    maria.close(None).await.unwrap();
    app.wait_for_connections(1).await;
    assert_eq!(app.state.hub.online_users(), vec!["luigi".to_string()]);
}

#[tokio::test]
async fn test_malformed_frame_ends_only_that_connection() {
    let app = LiveApp::start().await;
    let mut maria = app.connect("maria").await;
    let mut luigi = app.connect("luigi").await;
    app.wait_for_connections(2).await;

    maria.send(Message::Text("not json".into())).await.unwrap();
    app.wait_for_connections(1).await;

    app.state.hub.publish(EventKind::Message, json!({ "text": "still here" }));
    let event = next_of_kind(&mut luigi, "message").await;
    assert_eq!(event["payload"]["text"], "still here");
}

#[tokio::test]
async fn test_connecting_marks_user_active() {
    let app = LiveApp::start().await;
    let maria = app.login("maria").await;
    app.login("luigi").await;

    let stats: Value = app.http.get("/admin/stats").await.json();
    assert_eq!(stats["activeUsers"], 0);

    let _ws = app.connect(&maria).await;
    app.wait_for_connections(1).await;

    let stats: Value = app.http.get("/admin/stats").await.json();
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["activeUsers"], 1);
    assert_eq!(stats["activeConnections"], 1);
}
