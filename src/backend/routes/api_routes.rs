/**
 * API Route Handlers
 *
 * # Public
 * - `POST /session` - login or register by name
 * - `GET /users?username=` - user search
 *
 * # Authenticated (`Authorization: Bearer <id>`, id must match `{id}`)
 * - `PUT /users/{id}`, `PUT /users/{id}/photo`
 * - `/users/{id}/conversations/…` - conversations, members, messages,
 *   reactions, comments
 * - `/users/{id}/contacts/…`
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{login, search_users, set_photo, set_username};
use crate::backend::messaging::{
    add_comment, add_contact, add_member, create_conversation, delete_comment, delete_message,
    forward_message, get_conversation, get_messages, leave_group, list_contacts,
    list_conversations, react_to_message, remove_contact, remove_reaction, send_message,
    set_group_name, set_group_photo,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

const CONVERSATION: &str = "/users/{id}/conversations/{conversation_id}";
const MESSAGE: &str = "/users/{id}/conversations/{conversation_id}/messages/{message_id}";

/// Configure API routes
///
/// Everything under `/users/{id}` is wrapped with `auth_middleware` via
/// `route_layer`, so unmatched paths still fall through to the 404 fallback
/// instead of answering 401.
pub fn configure_api_routes(router: Router<AppState>, state: AppState) -> Router<AppState> {
    let user_scoped = Router::new()
        .route("/users/{id}", put(set_username))
        .route("/users/{id}/photo", put(set_photo))
        .route(
            "/users/{id}/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(CONVERSATION, get(get_conversation))
        .route(
            &format!("{CONVERSATION}/members"),
            post(add_member).delete(leave_group),
        )
        .route(&format!("{CONVERSATION}/name"), put(set_group_name))
        .route(&format!("{CONVERSATION}/photo"), put(set_group_photo))
        .route(
            &format!("{CONVERSATION}/messages"),
            get(get_messages).post(send_message),
        )
        .route(MESSAGE, delete(delete_message))
        .route(&format!("{MESSAGE}/forward"), post(forward_message))
        .route(&format!("{MESSAGE}/reaction"), post(react_to_message))
        .route(&format!("{MESSAGE}/reaction/{{emoji}}"), delete(remove_reaction))
        .route(&format!("{MESSAGE}/comments"), post(add_comment))
        .route(&format!("{MESSAGE}/comments/{{comment_id}}"), delete(delete_comment))
        .route("/users/{id}/contacts", get(list_contacts).post(add_contact))
        .route("/users/{id}/contacts/{contact_id}", delete(remove_contact))
        .route_layer(from_fn_with_state(state, auth_middleware));

    router
        .route("/session", post(login))
        .route("/users", get(search_users))
        .merge(user_scoped)
}
