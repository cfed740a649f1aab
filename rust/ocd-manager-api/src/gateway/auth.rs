//! Session tokens and the authentication middleware.
//!
//! A session is an HS256 JWT carried in an HTTP-only cookie. Anything wrong
//! with it (missing, malformed, bad signature, expired) means "no session";
//! the reason is logged at debug level and never returned to the client.

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::RecordId;
use crate::error::ApiError;
use crate::AppState;

const SECONDS_PER_DAY: i64 = 86_400;

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Claims for a session starting now and lasting `lifetime_days`.
    pub fn new(user_id: RecordId, email: &str, lifetime_days: i64) -> Result<Self> {
        let now = Utc::now();
        let expires_at = Duration::try_days(lifetime_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .with_context(|| format!("Session lifetime of {lifetime_days} days is out of range"))?;

        Ok(Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

/// Identity of the caller, attached to the request by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: RecordId,
    pub email: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = anyhow::Error;

    fn try_from(claims: Claims) -> Result<Self> {
        let user_id = claims
            .sub
            .parse()
            .with_context(|| format!("Token subject '{}' is not a user id", claims.sub))?;
        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}

/// Sign a session token.
pub fn generate_jwt(
    user_id: RecordId,
    email: &str,
    secret: &str,
    lifetime_days: i64,
) -> Result<String> {
    let claims = Claims::new(user_id, email, lifetime_days)?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// Verify signature and expiry of a session token.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to validate JWT token")?;

    Ok(token_data.claims)
}

/// Resolve the session cookie in `jar`, if any, to an identity.
pub fn session_user(jar: &CookieJar, auth: &AuthConfig) -> Option<AuthenticatedUser> {
    let token = jar.get(&auth.cookie_name)?.value();

    match validate_jwt(token, auth.secret()).and_then(AuthenticatedUser::try_from) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session cookie");
            None
        }
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.secure_cookies)
        .path("/")
        .max_age(time::Duration::seconds(
            auth.session_days.saturating_mul(SECONDS_PER_DAY),
        ))
        .build()
}

/// Cookie matching the session cookie's name and path, for removal.
pub fn removal_cookie(auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), "")).path("/").build()
}

/// Reject requests without a valid session; otherwise attach an
/// [`AuthenticatedUser`] to the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = session_user(&jar, &state.config.auth).ok_or(ApiError::Unauthorized)?;

    tracing::debug!(user_id = user.user_id, path = %req.uri().path(), "Session accepted");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
