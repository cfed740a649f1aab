//! User accounts and the credential payloads that create or unlock them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Rule, Validate};
use super::RecordId;

/// A stored account, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The part of a user that is returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: RecordId,
    pub email: String,
    pub name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::Email {
                field: "email",
                value: &self.email,
                message: "Invalid email address",
            },
            Rule::MinLength {
                field: "name",
                value: self.name.trim(),
                min: 2,
                message: "Name must be at least 2 characters",
            },
            Rule::MinLength {
                field: "password",
                value: &self.password,
                min: 8,
                message: "Password must be at least 8 characters",
            },
        ]
    }
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::Email {
                field: "email",
                value: &self.email,
                message: "Invalid email address",
            },
            Rule::MinLength {
                field: "password",
                value: &self.password,
                min: 1,
                message: "Password is required",
            },
        ]
    }
}
