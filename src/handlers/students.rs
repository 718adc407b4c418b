//! Student handlers: snapshot, refresh, create, update, delete, selection.

use crate::error::AppError;
use crate::model::{NewStudent, StudentId, StudentPatch};
use crate::response::{success_one, success_one_ok};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

fn parse_id(id_str: &str) -> Result<StudentId, AppError> {
    uuid::Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest("invalid uuid".into()))
}

#[derive(Serialize)]
struct Created {
    id: StudentId,
}

#[derive(Deserialize)]
pub struct SelectionBody {
    #[serde(default)]
    pub id: Option<StudentId>,
}

pub async fn snapshot(State(state): State<SharedState>) -> impl IntoResponse {
    success_one_ok(state.snapshot())
}

/// Errors from the refresh are reported through the snapshot's `error` field.
pub async fn refresh(State(state): State<SharedState>) -> impl IntoResponse {
    state.fetch_students().await;
    success_one_ok(state.snapshot())
}

pub async fn create(
    State(state): State<SharedState>,
    Json(body): Json<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.add_student(body).await?;
    Ok(success_one(Created { id }))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id_str): Path<String>,
    Json(patch): Json<StudentPatch>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.update_student(id, patch).await?;
    Ok(success_one_ok(state.snapshot()))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select(
    State(state): State<SharedState>,
    Json(body): Json<SelectionBody>,
) -> impl IntoResponse {
    state.select_student(body.id);
    success_one_ok(state.selected_student())
}
