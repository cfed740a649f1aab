//! HTTP server setup and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::database::SqliteStore;
use crate::gateway::{self, CredentialLimiter};
use crate::logging::OpTimer;
use crate::{log_banner, log_init_step, log_init_warning, log_success, AppState};

/// OCD Manager API version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open the configured store and create the application.
pub async fn create_app(config: AppConfig) -> anyhow::Result<Router> {
    let timer = OpTimer::new("server", "database");
    let store = SqliteStore::open(&config.database.path).await;
    timer.finish_with_result(store.as_ref());
    Ok(create_app_with_store(config, store?))
}

/// Create the application with all routes and middleware around `store`.
pub fn create_app_with_store(config: AppConfig, store: SqliteStore) -> Router {
    let overall_timer = OpTimer::new("server", "create_app");

    log_banner!(
        format!("🚀 OCD Manager API v{VERSION}"),
        format!("Database: {}", store.path().display())
    );

    // [1/4] Store
    log_init_step!(1, 4, "Database", format!("🗄️  {}", store.path().display()));

    // [2/4] Credential throttling
    let step_timer = OpTimer::new("server", "credential_limiter");
    let per_minute = config.auth.login_attempts_per_minute;
    let credential_limiter = Arc::new(CredentialLimiter::new(per_minute));
    log_init_step!(2, 4, "Credential Limiter", format!("🔒 {per_minute} attempts/min per email"));
    step_timer.finish();

    if !config.auth.secure_cookies {
        log_init_warning!("Session cookies are not marked Secure; enable auth.secure_cookies behind TLS");
    }

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        credential_limiter,
    };

    // [3/4] Routes
    let step_timer = OpTimer::new("server", "routes");
    let protected = Router::new()
        .merge(gateway::routes::protected_router())
        .merge(api::protected_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gateway::auth_middleware,
        ));

    let mut router = Router::new()
        .merge(gateway::routes::public_router())
        .merge(api::public_router())
        .merge(protected);

    let static_info = match &config.server.static_dir {
        Some(dir) => {
            router = router.fallback_service(ServeDir::new(dir));
            format!("📁 Static pages from {dir}")
        }
        None => "📁 No static pages".to_string(),
    };
    log_init_step!(3, 4, "Routes", static_info);
    step_timer.finish();

    // [4/4] Middleware
    let step_timer = OpTimer::new("server", "middleware");
    let mut router = router.layer(middleware::from_fn_with_state(
        state.clone(),
        gateway::pages::page_guard,
    ));
    let cors_info = match cors_layer(&config.server.cors_origins) {
        Some(cors) => {
            router = router.layer(cors);
            format!("{} allowed origin(s)", config.server.cors_origins.len())
        }
        None => "same-origin only".to_string(),
    };
    let app = router
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    log_init_step!(
        4,
        4,
        "Middleware",
        format!("🌐 Page guard + timeout + tracing, CORS {cors_info}")
    );
    step_timer.finish();

    overall_timer.finish();
    log_success!("OCD Manager API server created successfully");

    app
}

/// Credentialed CORS for the configured origins. Browsers never send cookies
/// to a wildcard origin, so there is no wildcard fallback.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
