//! Progress log endpoints and period statistics.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::database::{ExerciseRepository, HabitRepository, ProgressRepository, SymptomRepository};
use crate::domain::{
    NewProgressLog, ProgressLog, ProgressLogPatch, RecordId, Rule, Validate, ValidationError,
};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{AuthenticatedUser, SuccessResponse};
use crate::insights::{progress_stats, window_start, ProgressStats, StatsInput, SYMPTOM_TREND_LEN};
use crate::AppState;

/// Default lookback for the statistics endpoint.
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// Longest accepted lookback (about ten years).
pub const MAX_STATS_DAYS: i64 = 3650;

/// Create the progress router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/progress", get(list_logs).post(create_log))
        .route("/api/progress/stats", get(stats))
        .route(
            "/api/progress/{id}",
            get(get_log).put(update_log).delete(delete_log),
        )
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ProgressLog>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub log: ProgressLog,
}

/// `?days=N` for the statistics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

impl StatsQuery {
    fn days(&self) -> i64 {
        self.days.unwrap_or(DEFAULT_STATS_DAYS)
    }
}

impl Validate for StatsQuery {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![Rule::Range {
            field: "days",
            value: self.days(),
            min: 1,
            max: MAX_STATS_DAYS,
            message: "Days must be between 1 and 3650",
        }]
    }
}

/// A log may only point at a habit the caller owns and an exercise the
/// caller can see.
async fn check_references(
    state: &AppState,
    user_id: RecordId,
    habit_id: Option<RecordId>,
    exercise_id: Option<RecordId>,
) -> ApiResult<()> {
    if let Some(habit_id) = habit_id {
        if state.store.get_habit(user_id, habit_id).await?.is_none() {
            return Err(ValidationError {
                field: "habitId",
                message: "Habit not found".to_string(),
            }
            .into());
        }
    }
    if let Some(exercise_id) = exercise_id {
        if state.store.get_exercise(user_id, exercise_id).await?.is_none() {
            return Err(ValidationError {
                field: "exerciseId",
                message: "Exercise not found".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

async fn list_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<LogsResponse>> {
    let logs = state.store.list_logs(user.user_id).await?;
    tracing::debug!(user_id = user.user_id, count = logs.len(), "Listed progress logs");
    Ok(Json(LogsResponse { logs }))
}

async fn get_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<LogResponse>> {
    let Path(id) = id?;
    let log = state
        .store
        .get_log(user.user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(LogResponse { log }))
}

async fn create_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NewProgressLog>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LogResponse>)> {
    let Json(new) = payload?;
    new.validate()?;
    check_references(&state, user.user_id, new.habit_id, new.exercise_id).await?;

    let log = state.store.create_log(user.user_id, &new).await?;
    tracing::info!(
        user_id = user.user_id,
        log_id = log.id,
        habit_id = ?log.habit_id,
        exercise_id = ?log.exercise_id,
        "Progress logged"
    );
    Ok((StatusCode::CREATED, Json(LogResponse { log })))
}

async fn update_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<ProgressLogPatch>, JsonRejection>,
) -> ApiResult<Json<LogResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;
    check_references(&state, user.user_id, patch.habit_id, patch.exercise_id).await?;

    let log = state
        .store
        .update_log(user.user_id, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(user_id = user.user_id, log_id = id, "Progress log updated");
    Ok(Json(LogResponse { log }))
}

async fn delete_log(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(id) = id?;
    if !state.store.delete_log(user.user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(user_id = user.user_id, log_id = id, "Progress log deleted");
    Ok(Json(SuccessResponse::OK))
}

/// Period statistics plus the anxiety and habit trends.
async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult<Json<ProgressStats>> {
    let Query(query) = query?;
    query.validate()?;
    let days = u32::try_from(query.days()).map_err(anyhow::Error::from)?;

    let since = window_start(Utc::now().date_naive(), days);
    let user_id = user.user_id;
    let symptoms = state.store.symptoms_since(user_id, since).await?;
    let logs = state.store.logs_since(user_id, since).await?;
    let active_habits = state.store.list_active_habits(user_id).await?;
    let recent_symptoms = state.store.recent_symptoms(user_id, SYMPTOM_TREND_LEN).await?;

    let result = progress_stats(&StatsInput {
        since,
        symptoms: &symptoms,
        logs: &logs,
        active_habits: active_habits.len(),
        recent_symptoms: &recent_symptoms,
    });

    tracing::debug!(
        user_id,
        days,
        symptom_entries = result.stats.symptom_entries,
        "Computed progress stats"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_query_defaults_to_thirty_days() {
        let query = StatsQuery::default();
        assert_eq!(query.days(), 30);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_stats_query_bounds() {
        for bad in [0, -5, MAX_STATS_DAYS + 1] {
            let err = StatsQuery { days: Some(bad) }.validate().unwrap_err();
            assert_eq!(err.field, "days");
        }
        assert!(StatsQuery { days: Some(MAX_STATS_DAYS) }.validate().is_ok());
    }
}
