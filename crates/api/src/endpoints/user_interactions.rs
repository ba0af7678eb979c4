//! User interaction endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tasknote_db::entities::user_interaction::InteractionType;
use tasknote_common::AppResult;
use tasknote_core::{UserInteractionInput, UserInteractionPatch};
use tasknote_db::Page;
use tasknote_db::entities::user_interaction;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct UserInteractionResponse {
    pub id: String,
    pub user: String,
    pub note: String,
    pub interaction_type: InteractionType,
    pub metadata: Option<Value>,
    pub timestamp: String,
}

impl From<user_interaction::Model> for UserInteractionResponse {
    fn from(i: user_interaction::Model) -> Self {
        Self {
            id: i.id,
            user: i.user_id,
            note: i.note_id,
            interaction_type: i.interaction_type,
            metadata: i.metadata,
            timestamp: timestamp(&i.timestamp),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<UserInteractionResponse>>> {
    let rows = state.user_interaction_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInteractionInput>,
) -> AppResult<Created<UserInteractionResponse>> {
    let row = state.user_interaction_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInteractionResponse>> {
    let row = state.user_interaction_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UserInteractionInput>,
) -> AppResult<Json<UserInteractionResponse>> {
    let row = state.user_interaction_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UserInteractionPatch>,
) -> AppResult<Json<UserInteractionResponse>> {
    let row = state.user_interaction_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.user_interaction_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
