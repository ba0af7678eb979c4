//! API endpoints.

mod addresses;
mod auth;
mod categories;
mod chat_interactions;
mod contacts;
mod files;
mod login_histories;
mod note_analyses;
mod note_entities;
mod note_history;
mod note_recommendations;
mod note_suggestions;
mod note_tags;
mod notes;
mod notification_types;
mod notifications;
mod reviews;
mod search_logs;
mod sharings;
mod subjects;
mod user_interactions;
mod users;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::middleware::AppState;

/// Create the API router, to be nested under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/login-histories", login_histories::router())
        .nest("/addresses", addresses::router())
        .nest("/contacts", contacts::router())
        .nest("/notes", notes::router())
        .nest("/categories", categories::router())
        .nest("/subjects", subjects::router())
        .nest("/files", files::router())
        .nest("/sharings", sharings::router())
        .nest("/notifications", notifications::router())
        .nest("/notification-types", notification_types::router())
        .nest("/reviews", reviews::router())
        .nest("/note-analyses", note_analyses::router())
        .nest("/note-suggestions", note_suggestions::router())
        .nest("/chat-interactions", chat_interactions::router())
        .nest("/note-recommendations", note_recommendations::router())
        .nest("/search-logs", search_logs::router())
        .nest("/note-tags", note_tags::router())
        .nest("/note-entities", note_entities::router())
        .nest("/user-interactions", user_interactions::router())
        .nest("/note-history", note_history::router())
}

/// Liveness probe.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Routes served outside `/api`.
pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
