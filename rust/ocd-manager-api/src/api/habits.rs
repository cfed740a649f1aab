//! Habit endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::database::HabitRepository;
use crate::domain::{Habit, HabitPatch, HabitToggle, HabitToggleResult, NewHabit, RecordId, Validate};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{AuthenticatedUser, SuccessResponse};
use crate::AppState;

/// Create the habits router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/habits", get(list_habits).post(create_habit))
        .route(
            "/api/habits/{id}",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/api/habits/{id}/toggle", post(toggle_habit))
}

/// `{habits}` envelope.
#[derive(Debug, Serialize)]
pub struct HabitsResponse {
    pub habits: Vec<Habit>,
}

/// `{habit}` envelope.
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub habit: Habit,
}

async fn list_habits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<HabitsResponse>> {
    let habits = state.store.list_habits(user.user_id).await?;
    tracing::debug!(user_id = user.user_id, count = habits.len(), "Listed habits");
    Ok(Json(HabitsResponse { habits }))
}

async fn get_habit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<HabitResponse>> {
    let Path(id) = id?;
    let habit = state
        .store
        .get_habit(user.user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(HabitResponse { habit }))
}

async fn create_habit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NewHabit>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HabitResponse>)> {
    let Json(new) = payload?;
    new.validate()?;

    let habit = state.store.create_habit(user.user_id, &new).await?;
    tracing::info!(user_id = user.user_id, habit_id = habit.id, "Habit created");
    Ok((StatusCode::CREATED, Json(HabitResponse { habit })))
}

async fn update_habit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<HabitPatch>, JsonRejection>,
) -> ApiResult<Json<HabitResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;

    let habit = state
        .store
        .update_habit(user.user_id, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(user_id = user.user_id, habit_id = id, "Habit updated");
    Ok(Json(HabitResponse { habit }))
}

async fn delete_habit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(id) = id?;
    if !state.store.delete_habit(user.user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(user_id = user.user_id, habit_id = id, "Habit deleted");
    Ok(Json(SuccessResponse::OK))
}

async fn toggle_habit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<HabitToggle>, JsonRejection>,
) -> ApiResult<Json<HabitToggleResult>> {
    let Path(id) = id?;
    let Json(toggle) = payload?;
    let date = toggle.date.unwrap_or_else(|| Utc::now().date_naive());

    let completed_today = state
        .store
        .set_habit_completion(user.user_id, id, date, toggle.completed)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(
        user_id = user.user_id,
        habit_id = id,
        date = %date,
        completed = completed_today,
        "Habit completion set"
    );
    Ok(Json(HabitToggleResult {
        habit_id: id,
        date,
        completed_today,
    }))
}
