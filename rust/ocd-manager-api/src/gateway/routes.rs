//! Account endpoints: register, login, logout, current user.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::auth::{generate_jwt, removal_cookie, session_cookie, AuthenticatedUser};
use super::password::{hash_password, verify_password};
use crate::database::UserRepository;
use crate::domain::{normalize_email, LoginRequest, PublicUser, RegisterRequest, User, Validate};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Routes reachable without a session.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// Routes that require a session.
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me))
}

/// `{user}` envelope.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

/// `{success: true}` body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

fn start_session(state: &AppState, jar: CookieJar, user: &User) -> ApiResult<CookieJar> {
    let auth = &state.config.auth;
    let token = generate_jwt(user.id, &user.email, auth.secret(), auth.session_days)?;
    Ok(jar.add(session_cookie(token, auth)))
}

/// Create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<UserResponse>)> {
    let Json(mut body) = payload?;
    body.email = normalize_email(&body.email);
    body.validate()?;
    state.credential_limiter.check(&body.email)?;

    let password_hash = hash_password(&body.password).await?;
    let user = state
        .store
        .create_user(&body.email, body.name.trim(), &password_hash)
        .await?
        .ok_or_else(|| {
            tracing::warn!("⚠️  Registration rejected: email already registered");
            ApiError::Conflict("Email already registered".to_string())
        })?;

    tracing::info!(user_id = user.id, "User registered");
    let jar = start_session(&state, jar, &user)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(UserResponse {
            user: PublicUser::from(&user),
        }),
    ))
}

/// Check credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    let Json(mut body) = payload?;
    body.email = normalize_email(&body.email);
    body.validate()?;
    state.credential_limiter.check(&body.email)?;

    let Some(user) = state.store.find_user_by_email(&body.email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&body.password, &user.password_hash).await? {
        tracing::debug!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, "User logged in");
    let jar = start_session(&state, jar, &user)?;
    Ok((
        jar,
        Json(UserResponse {
            user: PublicUser::from(&user),
        }),
    ))
}

/// End the session by expiring the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(removal_cookie(&state.config.auth));
    (jar, Json(SuccessResponse::OK))
}

/// The account behind the current session.
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .store
        .get_user(caller.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse {
        user: PublicUser::from(&user),
    }))
}
