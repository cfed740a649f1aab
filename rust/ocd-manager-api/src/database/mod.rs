//! Persistence layer.
//!
//! [`SqliteStore`] is the only backend. It implements one repository trait per
//! record kind; handlers depend on the traits, tests can open the store in
//! memory.

pub mod exercises;
pub mod habits;
pub mod progress;
pub mod repository;
pub mod schema;
pub mod store;
pub mod symptoms;
pub mod users;

pub use repository::{
    ExerciseRepository, HabitRepository, ProgressRepository, SymptomRepository, UserRepository,
};
pub use store::{IN_MEMORY, SqliteStore};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{ExerciseCategory, Mood, TargetFrequency, ThoughtFrequency};

/// Store string enums as their wire spelling.
macro_rules! text_column {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e: String| FromSqlError::Other(e.into()))
                }
            }
        )+
    };
}

text_column!(TargetFrequency, ThoughtFrequency, Mood, ExerciseCategory);

/// Whether `err` is a UNIQUE or other constraint failure.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Clamp a caller-supplied limit to what SQLite accepts.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{SqliteStore, UserRepository};
    use crate::domain::RecordId;

    /// Fresh in-memory store with one registered user.
    pub async fn store_with_user(email: &str) -> (SqliteStore, RecordId) {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let user = store
            .create_user(email, "Test User", "$argon2id$placeholder")
            .await
            .unwrap()
            .unwrap();
        (store, user.id)
    }

    /// Register another user in an existing store.
    pub async fn add_user(store: &SqliteStore, email: &str) -> RecordId {
        store
            .create_user(email, "Other User", "$argon2id$placeholder")
            .await
            .unwrap()
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_enum_columns_round_trip_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT)").unwrap();
        conn.execute("INSERT INTO t (v) VALUES (?1)", [ExerciseCategory::IntrusiveThoughts])
            .unwrap();

        let raw: String = conn.query_row("SELECT v FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(raw, "intrusive-thoughts");

        let parsed: ExerciseCategory = conn.query_row("SELECT v FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(parsed, ExerciseCategory::IntrusiveThoughts);
    }

    #[test]
    fn test_unknown_enum_text_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<Mood> = conn.query_row("SELECT 'ecstatic'", [], |r| r.get(0));
        assert!(result.is_err());
    }
}
