//! Subject endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{SubjectInput, SubjectPatch};
use tasknote_db::Page;
use tasknote_db::entities::subject;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct SubjectResponse {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(s: subject::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
        }
    }
}

async fn list(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<SubjectResponse>>> {
    let rows = state.subject_service.list(page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> AppResult<Created<SubjectResponse>> {
    let row = state.subject_service.create(input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubjectResponse>> {
    let row = state.subject_service.get(&id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> AppResult<Json<SubjectResponse>> {
    let row = state.subject_service.replace(&id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SubjectPatch>,
) -> AppResult<Json<SubjectResponse>> {
    let row = state.subject_service.update(&id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.subject_service.delete(&id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
