//! Exposure exercise endpoints.
//!
//! Reads see owned, unowned and system exercises; writes only reach rows the
//! caller owns, so anything else answers 404.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;

use crate::database::ExerciseRepository;
use crate::domain::{Exercise, ExercisePatch, NewExercise, RecordId, Validate};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{AuthenticatedUser, SuccessResponse};
use crate::AppState;

/// Create the exercises router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/api/exercises/{id}",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
}

#[derive(Debug, Serialize)]
pub struct ExercisesResponse {
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub exercise: Exercise,
}

async fn list_exercises(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ExercisesResponse>> {
    let exercises = state.store.list_exercises(user.user_id).await?;
    tracing::debug!(user_id = user.user_id, count = exercises.len(), "Listed exercises");
    Ok(Json(ExercisesResponse { exercises }))
}

async fn get_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<ExerciseResponse>> {
    let Path(id) = id?;
    let exercise = state
        .store
        .get_exercise(user.user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ExerciseResponse { exercise }))
}

async fn create_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NewExercise>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ExerciseResponse>)> {
    let Json(new) = payload?;
    new.validate()?;

    let exercise = state.store.create_exercise(user.user_id, &new).await?;
    tracing::info!(user_id = user.user_id, exercise_id = exercise.id, "Exercise created");
    Ok((StatusCode::CREATED, Json(ExerciseResponse { exercise })))
}

async fn update_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<ExercisePatch>, JsonRejection>,
) -> ApiResult<Json<ExerciseResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;

    let exercise = state
        .store
        .update_exercise(user.user_id, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(user_id = user.user_id, exercise_id = id, "Exercise updated");
    Ok(Json(ExerciseResponse { exercise }))
}

async fn delete_exercise(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(id) = id?;
    if !state.store.delete_exercise(user.user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(user_id = user.user_id, exercise_id = id, "Exercise deleted");
    Ok(Json(SuccessResponse::OK))
}
