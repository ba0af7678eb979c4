//! HTTP API layer for tasknote.
//!
//! - **Endpoints**: one CRUD handler set per resource under `/api`, plus
//!   token obtain/refresh/verify and a liveness probe
//! - **Extractors**: authenticated caller, JSON bodies, client address
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{health_router, router};
pub use middleware::{AppState, auth_middleware};

use axum::Router;

/// The full application: `/api` behind the auth middleware, and `/health`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .merge(health_router())
        .with_state(state)
}
