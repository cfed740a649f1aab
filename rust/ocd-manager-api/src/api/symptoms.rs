//! Symptom log endpoints.

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

use crate::database::SymptomRepository;
use crate::domain::{NewSymptom, RecordId, Symptom, SymptomPatch, Validate};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{AuthenticatedUser, SuccessResponse};
use crate::AppState;

/// Create the symptoms router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/symptoms", get(list_symptoms).post(create_symptom))
        .route(
            "/api/symptoms/{id}",
            get(get_symptom).put(update_symptom).delete(delete_symptom),
        )
}

#[derive(Debug, Serialize)]
pub struct SymptomsResponse {
    pub symptoms: Vec<Symptom>,
}

#[derive(Debug, Serialize)]
pub struct SymptomResponse {
    pub symptom: Symptom,
}

async fn list_symptoms(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<SymptomsResponse>> {
    let symptoms = state.store.list_symptoms(user.user_id).await?;
    tracing::debug!(user_id = user.user_id, count = symptoms.len(), "Listed symptoms");
    Ok(Json(SymptomsResponse { symptoms }))
}

async fn get_symptom(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<SymptomResponse>> {
    let Path(id) = id?;
    let symptom = state
        .store
        .get_symptom(user.user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(SymptomResponse { symptom }))
}

async fn create_symptom(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<NewSymptom>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SymptomResponse>)> {
    let Json(new) = payload?;
    new.validate()?;

    let symptom = state.store.create_symptom(user.user_id, &new).await?;
    tracing::info!(
        user_id = user.user_id,
        symptom_id = symptom.id,
        date = %symptom.date,
        "Symptom logged"
    );
    Ok((StatusCode::CREATED, Json(SymptomResponse { symptom })))
}

async fn update_symptom(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<SymptomPatch>, JsonRejection>,
) -> ApiResult<Json<SymptomResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    patch.validate()?;

    let symptom = state
        .store
        .update_symptom(user.user_id, id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(user_id = user.user_id, symptom_id = id, "Symptom updated");
    Ok(Json(SymptomResponse { symptom }))
}

async fn delete_symptom(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<RecordId>, PathRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Path(id) = id?;
    if !state.store.delete_symptom(user.user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(user_id = user.user_id, symptom_id = id, "Symptom deleted");
    Ok(Json(SuccessResponse::OK))
}
