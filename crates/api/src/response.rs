//! API response helpers.

use axum::{Json, http::StatusCode};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tasknote_common::AppResult;

/// `201 Created` with a JSON body.
pub type Created<T> = (StatusCode, Json<T>);

/// Wrap a freshly created resource.
pub const fn created<T: Serialize>(body: T) -> Created<T> {
    (StatusCode::CREATED, Json(body))
}

/// Empty `204 No Content` response for deletes.
pub fn no_content(result: AppResult<()>) -> AppResult<StatusCode> {
    result.map(|()| StatusCode::NO_CONTENT)
}

/// Timestamps go over the wire as RFC 3339.
#[must_use]
pub fn timestamp(t: &DateTimeWithTimeZone) -> String {
    t.to_rfc3339()
}

/// Project every element of a list.
pub fn project<M, R: From<M>>(rows: Vec<M>) -> Json<Vec<R>> {
    Json(rows.into_iter().map(R::from).collect())
}
