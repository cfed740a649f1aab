//! Progress log storage.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::repository::ProgressRepository;
use super::sql_limit;
use super::store::SqliteStore;
use crate::domain::{NewProgressLog, ProgressLog, ProgressLogPatch, RecordId};

const LOG_COLUMNS: &str = "id, user_id, habit_id, exercise_id, date, completed, \
     anxiety_before, anxiety_after, duration_minutes, notes, created_at";

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<ProgressLog> {
    Ok(ProgressLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        habit_id: row.get(2)?,
        exercise_id: row.get(3)?,
        date: row.get(4)?,
        completed: row.get(5)?,
        anxiety_before: row.get(6)?,
        anxiety_after: row.get(7)?,
        duration_minutes: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn select_owned(conn: &Connection, user_id: RecordId, id: RecordId) -> Result<Option<ProgressLog>> {
    Ok(conn
        .query_row(
            &format!("SELECT {LOG_COLUMNS} FROM progress_logs WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            log_from_row,
        )
        .optional()?)
}

fn select_many(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ProgressLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM progress_logs WHERE {filter}"
    ))?;
    let logs = stmt
        .query_map(params, log_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(logs)
}

#[async_trait]
impl ProgressRepository for SqliteStore {
    async fn list_logs(&self, user_id: RecordId) -> Result<Vec<ProgressLog>> {
        self.call(move |conn| {
            select_many(conn, "user_id = ?1 ORDER BY date DESC, id DESC", params![user_id])
        })
        .await
    }

    async fn recent_logs(&self, user_id: RecordId, limit: usize) -> Result<Vec<ProgressLog>> {
        let limit = sql_limit(limit);
        self.call(move |conn| {
            select_many(
                conn,
                "user_id = ?1 ORDER BY date DESC, id DESC LIMIT ?2",
                params![user_id, limit],
            )
        })
        .await
    }

    async fn logs_since(&self, user_id: RecordId, since: NaiveDate) -> Result<Vec<ProgressLog>> {
        self.call(move |conn| {
            select_many(
                conn,
                "user_id = ?1 AND date >= ?2 ORDER BY date ASC, id ASC",
                params![user_id, since],
            )
        })
        .await
    }

    async fn get_log(&self, user_id: RecordId, id: RecordId) -> Result<Option<ProgressLog>> {
        self.call(move |conn| select_owned(conn, user_id, id)).await
    }

    async fn create_log(&self, user_id: RecordId, log: &NewProgressLog) -> Result<ProgressLog> {
        let log = log.clone();
        let now = Utc::now();

        self.call(move |conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO progress_logs (user_id, habit_id, exercise_id, date, completed,
                         anxiety_before, anxiety_after, duration_minutes, notes, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                     RETURNING {LOG_COLUMNS}"
                ),
                params![
                    user_id,
                    log.habit_id,
                    log.exercise_id,
                    log.date,
                    log.completed,
                    log.anxiety_before,
                    log.anxiety_after,
                    log.duration_minutes,
                    log.notes,
                    now
                ],
                log_from_row,
            )?)
        })
        .await
    }

    async fn update_log(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &ProgressLogPatch,
    ) -> Result<Option<ProgressLog>> {
        let patch = patch.clone();

        self.call(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut log) = select_owned(&tx, user_id, id)? else {
                return Ok(None);
            };
            if patch.is_empty() {
                return Ok(Some(log));
            }

            patch.apply(&mut log);
            tx.execute(
                "UPDATE progress_logs
                 SET habit_id = ?1, exercise_id = ?2, date = ?3, completed = ?4,
                     anxiety_before = ?5, anxiety_after = ?6, duration_minutes = ?7, notes = ?8
                 WHERE id = ?9 AND user_id = ?10",
                params![
                    log.habit_id,
                    log.exercise_id,
                    log.date,
                    log.completed,
                    log.anxiety_before,
                    log.anxiety_after,
                    log.duration_minutes,
                    log.notes,
                    id,
                    user_id
                ],
            )?;
            tx.commit()?;
            Ok(Some(log))
        })
        .await
    }

    async fn delete_log(&self, user_id: RecordId, id: RecordId) -> Result<bool> {
        self.call(move |conn| {
            let count = conn.execute(
                "DELETE FROM progress_logs WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count > 0)
        })
        .await
    }
}
