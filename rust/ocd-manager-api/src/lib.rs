//! OCD Manager API - self-tracking service for OCD recovery
//!
//! Registered users keep their own habits, daily symptom logs, exposure
//! exercises and progress logs, and read back a dashboard and period
//! statistics derived from them.
//!
//! # Architecture
//!
//! - [`config`]: Configuration management and environment loading
//! - [`gateway`]: Sessions, password hashing, throttling and the page guard
//! - [`domain`]: Entity types, payloads and validation
//! - [`database`]: SQLite store and repository traits
//! - [`insights`]: Dashboard and statistics computed from stored rows
//! - [`api`]: HTTP API endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use ocd_manager_api::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod insights;
pub mod logging;
pub mod server;

use std::sync::Arc;

use config::AppConfig;
use database::SqliteStore;
use gateway::CredentialLimiter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Persistent store for every user-owned record.
    pub store: SqliteStore,
    /// Throttle for the login and registration endpoints.
    pub credential_limiter: Arc<CredentialLimiter>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store.path())
            .field("credential_limiter", &self.credential_limiter)
            .finish()
    }
}
