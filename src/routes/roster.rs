//! Roster routes over the state container. Mounted under /api/v1 by the server.

use crate::handlers::{courses, filters, students};
use crate::state::SharedState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

const BODY_LIMIT_BYTES: usize = 64 * 1024;

pub fn roster_routes(state: SharedState) -> Router {
    Router::new()
        .route("/students", get(students::snapshot).post(students::create))
        .route("/students/refresh", post(students::refresh))
        .route(
            "/students/:id",
            patch(students::update).delete(students::delete),
        )
        .route("/selection", put(students::select))
        .route("/filters", get(filters::get).patch(filters::patch))
        .route("/filters/reset", post(filters::reset))
        .route("/courses", get(courses::list))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// Common routes at the root plus roster routes under /api/v1.
pub fn app_router(state: SharedState) -> Router {
    Router::new()
        .merge(crate::routes::common_routes(state.clone()))
        .nest("/api/v1", roster_routes(state))
}
