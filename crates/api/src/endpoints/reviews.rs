//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{ReviewInput, ReviewPatch, ReviewWithReviewer};
use tasknote_db::Page;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

/// The reviewer is shown by username and is null once their account is gone.
#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub note: String,
    pub reviewer: Option<String>,
    pub rating: i16,
    pub comment: String,
    pub created_at: String,
}

impl From<ReviewWithReviewer> for ReviewResponse {
    fn from((r, reviewer): ReviewWithReviewer) -> Self {
        Self {
            id: r.id,
            note: r.note_id,
            reviewer,
            rating: r.rating,
            comment: r.comment,
            created_at: timestamp(&r.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<ReviewResponse>>> {
    let rows = state.review_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> AppResult<Created<ReviewResponse>> {
    let row = state.review_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReviewResponse>> {
    let row = state.review_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> AppResult<Json<ReviewResponse>> {
    let row = state.review_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ReviewPatch>,
) -> AppResult<Json<ReviewResponse>> {
    let row = state.review_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.review_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
