//! Category endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{CategoryInput, CategoryPatch};
use tasknote_db::Page;
use tasknote_db::entities::category;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

async fn list(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let rows = state.category_service.list(page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<Created<CategoryResponse>> {
    let row = state.category_service.create(input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryResponse>> {
    let row = state.category_service.get(&id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<Json<CategoryResponse>> {
    let row = state.category_service.replace(&id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> AppResult<Json<CategoryResponse>> {
    let row = state.category_service.update(&id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.category_service.delete(&id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
