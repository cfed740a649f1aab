//! User account storage.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use super::repository::UserRepository;
use super::store::SqliteStore;
use super::is_constraint_violation;
use crate::domain::{RecordId, User};

const USER_COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn create_user(&self, email: &str, name: &str, password_hash: &str) -> Result<Option<User>> {
        let email = email.to_string();
        let name = name.to_string();
        let password_hash = password_hash.to_string();
        let now = Utc::now();

        self.call(move |conn| {
            let inserted = conn.query_row(
                &format!(
                    "INSERT INTO users (email, name, password_hash, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     RETURNING {USER_COLUMNS}"
                ),
                params![email, name, password_hash, now],
                user_from_row,
            );

            match inserted {
                Ok(user) => Ok(Some(user)),
                Err(e) if is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                    params![email],
                    user_from_row,
                )
                .optional()?)
        })
        .await
    }

    async fn get_user(&self, id: RecordId) -> Result<Option<User>> {
        self.call(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    params![id],
                    user_from_row,
                )
                .optional()?)
        })
        .await
    }
}
