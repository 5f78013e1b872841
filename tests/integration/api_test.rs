//! REST API integration tests
//!
//! Every test runs the full router against its own in-memory database.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chatline::shared::messaging::{Conversation, ConversationDetail};

use crate::common::{authorized, conversation_path, TestApp};

#[tokio::test]
async fn test_api_root_and_liveness() {
    let app = TestApp::new().await;

    let response = app.server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "running");
    assert!(body["name"].is_string());

    let response = app.server.get("/liveness").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;

    let response = app.server.get("/no/such/route").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_login_registers_then_returns_same_identifier() {
    let app = TestApp::new().await;

    let first = app.login("maria").await;
    let second = app.login("  maria ").await;
    assert_eq!(first, second);
    assert!(uuid::Uuid::parse_str(&first).is_ok());
}

#[tokio::test]
async fn test_login_rejects_bad_names() {
    let app = TestApp::new().await;

    for name in ["ab", "", "seventeen_chars__"] {
        let response = app.server.post("/session").json(&json!({ "name": name })).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "name {name:?}");
    }
}

#[tokio::test]
async fn test_authentication_errors() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;

    // no header
    let response = app.server.get(&format!("/users/{maria}/conversations")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // not a uuid
    let response = authorized(app.server.get(&format!("/users/{maria}/conversations")), "nope").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // well-formed but unknown
    let stranger = uuid::Uuid::new_v4().to_string();
    let response = app.get(&stranger, &format!("/users/{stranger}/conversations")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // someone else's path
    let response = app.get(&luigi, &format!("/users/{maria}/conversations")).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.get(&maria, &format!("/users/{maria}/conversations")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_search_is_public() {
    let app = TestApp::new().await;
    app.login("maria").await;
    app.login("mario").await;
    app.login("luigi").await;

    let response = app.server.get("/users").add_query_param("username", "MAR").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let users: Vec<Value> = response.json();
    let names: Vec<&str> = users.iter().filter_map(|u| u["username"].as_str()).collect();
    assert_eq!(names, vec!["maria", "mario"]);

    let everyone: Vec<Value> = app.server.get("/users").await.json();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn test_rename_and_photo() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    app.login("luigi").await;

    let response = app.put(&maria, &format!("/users/{maria}")).json(&json!("luigi")).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app.put(&maria, &format!("/users/{maria}")).json(&json!("x")).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.put(&maria, &format!("/users/{maria}")).json(&json!("peach")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let user: Value = response.json();
    assert_eq!(user["username"], "peach");

    let response = app
        .put(&maria, &format!("/users/{maria}/photo"))
        .json(&json!("https://example.org/p.png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let user: Value = response.json();
    assert_eq!(user["picture"], "https://example.org/p.png");

    // logging in under the new name returns the same identity
    assert_eq!(app.login("peach").await, maria);
}

#[tokio::test]
async fn test_direct_conversation_is_reused() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;

    let first = app.create_conversation(&maria, &[&luigi], None).await;
    let again = app.create_conversation(&luigi, &[&maria], None).await;
    assert_eq!(first["id"], again["id"]);
    assert_eq!(first["isGroup"], false);
    assert_eq!(first["participants"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_conversation_validation() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;

    let path = format!("/users/{maria}/conversations");

    let response = app.post(&maria, &path).json(&json!({ "participants": [] })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.post(&maria, &path).json(&json!({ "participants": [maria] })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let ghost = uuid::Uuid::new_v4().to_string();
    let response = app.post(&maria, &path).json(&json!({ "participants": [ghost] })).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_messages_unread_and_read_flow() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;

    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();

    app.send_text(&maria, cid, "first").await;
    app.send_text(&maria, cid, "second").await;

    let list: Vec<Conversation> = app
        .get(&luigi, &format!("/users/{luigi}/conversations"))
        .await
        .json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].unread_count, 2);
    assert_eq!(list[0].last_message.as_ref().map(|m| m.text.as_str()), Some("second"));

    let detail: ConversationDetail = app.get(&luigi, &conversation_path(&luigi, cid)).await.json();
    let texts: Vec<&str> = detail.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(detail.conversation.unread_count, 0);
    assert!(detail.messages.iter().all(|m| m.read_by.contains(&luigi)));

    let list: Vec<Conversation> = app
        .get(&luigi, &format!("/users/{luigi}/conversations"))
        .await
        .json();
    assert_eq!(list[0].unread_count, 0);

    let messages: Vec<Value> = app
        .get(&maria, &format!("{}/messages", conversation_path(&maria, cid)))
        .await
        .json();
    assert_eq!(messages.len(), 2);
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();

    let response = app
        .post(&maria, &format!("{}/messages", conversation_path(&maria, cid)))
        .json(&json!({ "content": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .post(&maria, &format!("{}/messages", conversation_path(&maria, cid)))
        .json(&json!({ "imageUrl": "https://example.org/cat.png" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let toad = app.login("toad").await;

    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();

    let response = app.get(&toad, &conversation_path(&toad, cid)).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .post(&toad, &format!("{}/messages", conversation_path(&toad, cid)))
        .json(&json!({ "content": "hi" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let missing = uuid::Uuid::new_v4().to_string();
    let response = app.get(&toad, &conversation_path(&toad, &missing)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_sender_deletes_message() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();
    let mid = app.send_text(&maria, cid, "oops").await;

    let response = app
        .delete(&luigi, &format!("{}/messages/{mid}", conversation_path(&luigi, cid)))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .delete(&maria, &format!("{}/messages/{mid}", conversation_path(&maria, cid)))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app
        .delete(&maria, &format!("{}/messages/{mid}", conversation_path(&maria, cid)))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reaction_toggle_and_delete() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();
    let mid = app.send_text(&maria, cid, "react to me").await;
    let reaction = format!("{}/messages/{mid}/reaction", conversation_path(&luigi, cid));

    let response = app.post(&luigi, &reaction).json(&json!({ "emoji": "👍" })).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["active"], true);

    let response = app.post(&luigi, &reaction).json(&json!({ "emoji": "👍" })).await;
    assert_eq!(response.json::<Value>()["active"], false);

    app.post(&luigi, &reaction).json(&json!({ "emoji": "🎉" })).await;
    let messages: Vec<Value> = app
        .get(&luigi, &format!("{}/messages", conversation_path(&luigi, cid)))
        .await
        .json();
    assert_eq!(messages[0]["reactions"], json!([{ "userId": luigi, "emoji": "🎉" }]));

    // 🎉, percent-encoded for the path
    let response = app.delete(&luigi, &format!("{reaction}/%F0%9F%8E%89")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let messages: Vec<Value> = app
        .get(&luigi, &format!("{}/messages", conversation_path(&luigi, cid)))
        .await
        .json();
    assert_eq!(messages[0]["reactions"], json!([]));
}

#[tokio::test]
async fn test_comments_author_only_delete() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = conversation["id"].as_str().unwrap();
    let mid = app.send_text(&maria, cid, "comment on me").await;
    let comments = format!("{}/messages/{mid}/comments", conversation_path(&luigi, cid));

    let response = app.post(&luigi, &comments).json(&json!({ "comment": "  " })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.post(&luigi, &comments).json(&json!({ "comment": "nice" })).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let comment_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let maria_path = format!(
        "{}/messages/{mid}/comments/{comment_id}",
        conversation_path(&maria, cid)
    );
    let response = app.delete(&maria, &maria_path).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.delete(&luigi, &format!("{comments}/{comment_id}")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.delete(&luigi, &format!("{comments}/{comment_id}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forward_requires_both_memberships() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let toad = app.login("toad").await;

    let source = app.create_conversation(&maria, &[&luigi], None).await;
    let target = app.create_conversation(&maria, &[&toad], None).await;
    let other = app.create_conversation(&luigi, &[&toad], None).await;
    let source_id = source["id"].as_str().unwrap();
    let target_id = target["id"].as_str().unwrap();
    let other_id = other["id"].as_str().unwrap();

    let mid = app.send_text(&luigi, source_id, "pass it on").await;
    let forward = format!("{}/messages/{mid}/forward", conversation_path(&maria, source_id));

    let response = app.post(&maria, &forward).json(&json!({ "conversationId": other_id })).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.post(&maria, &forward).json(&json!({ "conversationId": target_id })).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let messages: Vec<Value> = app
        .get(&toad, &format!("{}/messages", conversation_path(&toad, target_id)))
        .await
        .json();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "pass it on");
    assert_eq!(messages[0]["forwarded"], true);
    assert_eq!(messages[0]["senderId"], maria.as_str());
}

#[tokio::test]
async fn test_group_lifecycle() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let toad = app.login("toad").await;

    let group = app.create_conversation(&maria, &[&luigi], Some("kart club")).await;
    assert_eq!(group["isGroup"], true);
    assert_eq!(group["name"], "kart club");
    let gid = group["id"].as_str().unwrap();

    let response = app
        .post(&maria, &format!("{}/members", conversation_path(&maria, gid)))
        .json(&json!({ "userId": toad }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["participants"].as_array().map(Vec::len), Some(3));

    let response = app
        .put(&toad, &format!("{}/name", conversation_path(&toad, gid)))
        .json(&json!("racers"))
        .await;
    assert_eq!(response.json::<Value>()["name"], "racers");

    let response = app
        .put(&toad, &format!("{}/photo", conversation_path(&toad, gid)))
        .json(&json!("https://example.org/g.png"))
        .await;
    assert_eq!(response.json::<Value>()["picture"], "https://example.org/g.png");

    for user in [&maria, &luigi] {
        let response = app.delete(user, &format!("{}/members", conversation_path(user, gid))).await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    }

    let response = app.get(&maria, &conversation_path(&maria, gid)).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.delete(&toad, &format!("{}/members", conversation_path(&toad, gid))).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // last member gone, conversation gone
    let response = app.get(&toad, &conversation_path(&toad, gid)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_operations_rejected_on_direct() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let direct = app.create_conversation(&maria, &[&luigi], None).await;
    let cid = direct["id"].as_str().unwrap();

    let response = app
        .put(&maria, &format!("{}/name", conversation_path(&maria, cid)))
        .json(&json!("nope"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.delete(&maria, &format!("{}/members", conversation_path(&maria, cid))).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contacts_flow() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let bowser = app.login("bowser").await;
    let contacts = format!("/users/{maria}/contacts");

    let response = app.post(&maria, &contacts).json(&json!({ "contactUserId": maria })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let ghost = uuid::Uuid::new_v4().to_string();
    let response = app.post(&maria, &contacts).json(&json!({ "contactUserId": ghost })).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    for id in [&luigi, &bowser] {
        let response = app.post(&maria, &contacts).json(&json!({ "contactUserId": id })).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = app.post(&maria, &contacts).json(&json!({ "contactUserId": luigi })).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let list: Vec<Value> = app.get(&maria, &contacts).await.json();
    let names: Vec<&str> = list.iter().filter_map(|u| u["username"].as_str()).collect();
    assert_eq!(names, vec!["bowser", "luigi"]);

    let response = app.delete(&maria, &format!("{contacts}/{bowser}")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.delete(&maria, &format!("{contacts}/{bowser}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_endpoints() {
    let app = TestApp::new().await;
    let maria = app.login("maria").await;
    let luigi = app.login("luigi").await;
    let conversation = app.create_conversation(&maria, &[&luigi], None).await;
    app.send_text(&maria, conversation["id"].as_str().unwrap(), "hello").await;

    let stats: Value = app.server.get("/admin/stats").await.json();
    assert_eq!(
        stats,
        json!({
            "totalUsers": 2,
            "activeUsers": 0,
            "totalConversations": 1,
            "totalMessages": 1,
            "activeConnections": 0,
        })
    );

    let health: Value = app.server.get("/admin/health").await.json();
    assert_eq!(health["database"], "Healthy");
    assert_eq!(health["websocket"], "Idle");
    assert_eq!(health["api"], "Running");
    assert_eq!(health["uptime"], "Less than a minute");

    let online: Vec<String> = app.server.get("/admin/online").await.json();
    assert!(online.is_empty());
}
