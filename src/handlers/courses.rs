//! Course catalog (read-only).

use crate::error::AppError;
use crate::response::success_many;
use crate::state::SharedState;
use axum::{extract::State, response::IntoResponse};

pub async fn list(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let courses = state.courses().await?;
    Ok(success_many(courses))
}
