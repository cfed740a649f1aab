//! Gateway functionality: sessions, credentials, throttling and page guarding.
//!
//! - JWT session cookies and the auth middleware
//! - Argon2 password hashing
//! - Per-email throttling of the credential endpoints
//! - Redirects between the login pages and the protected pages

pub mod auth;
pub mod pages;
pub mod password;
pub mod rate_limit;
pub mod routes;

pub use auth::{auth_middleware, AuthenticatedUser};
pub use rate_limit::CredentialLimiter;
pub use routes::{SuccessResponse, UserResponse};
