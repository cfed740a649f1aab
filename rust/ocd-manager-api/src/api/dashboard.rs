//! Dashboard endpoint: today's snapshot and the recent activity feed.

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::database::{HabitRepository, ProgressRepository, SymptomRepository};
use crate::error::ApiResult;
use crate::gateway::AuthenticatedUser;
use crate::insights::{recent_activity, today_snapshot, Activity, TodaySnapshot, ACTIVITY_SOURCE_LEN};
use crate::AppState;

/// Create the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub today: TodaySnapshot,
    pub recent_activity: Vec<Activity>,
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<DashboardResponse>> {
    let today = Utc::now().date_naive();
    let user_id = user.user_id;

    let todays_symptoms = state.store.symptoms_since(user_id, today).await?;
    let todays_logs = state.store.logs_since(user_id, today).await?;
    let active_habits = state.store.list_active_habits(user_id).await?;
    let recent_symptoms = state.store.recent_symptoms(user_id, ACTIVITY_SOURCE_LEN).await?;
    let recent_logs = state.store.recent_logs(user_id, ACTIVITY_SOURCE_LEN).await?;

    let snapshot = today_snapshot(today, &todays_symptoms, &active_habits, &todays_logs);
    tracing::debug!(
        user_id,
        needs_checkin = snapshot.needs_checkin,
        habits = snapshot.habits.len(),
        "Built dashboard"
    );

    Ok(Json(DashboardResponse {
        today: snapshot,
        recent_activity: recent_activity(&recent_symptoms, &recent_logs),
    }))
}
