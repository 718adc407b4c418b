//! Filter handlers. All are local to the container; none touch the store.

use crate::model::FiltersPatch;
use crate::response::success_one_ok;
use crate::state::SharedState;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn get(State(state): State<SharedState>) -> impl IntoResponse {
    success_one_ok(state.filters())
}

pub async fn patch(
    State(state): State<SharedState>,
    Json(patch): Json<FiltersPatch>,
) -> impl IntoResponse {
    state.set_filters(patch);
    success_one_ok(state.filters())
}

pub async fn reset(State(state): State<SharedState>) -> impl IntoResponse {
    state.reset_filters();
    success_one_ok(state.filters())
}
