//! Habit storage and the per-day completion toggle.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};

use super::repository::HabitRepository;
use super::store::SqliteStore;
use crate::domain::{Habit, HabitPatch, NewHabit, RecordId};

const HABIT_COLUMNS: &str =
    "id, user_id, name, description, category, target_frequency, is_active, created_at";

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        target_frequency: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn select_owned(conn: &Connection, user_id: RecordId, id: RecordId) -> Result<Option<Habit>> {
    Ok(conn
        .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            habit_from_row,
        )
        .optional()?)
}

#[async_trait]
impl HabitRepository for SqliteStore {
    async fn list_habits(&self, user_id: RecordId) -> Result<Vec<Habit>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let habits = stmt
                .query_map(params![user_id], habit_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(habits)
        })
        .await
    }

    async fn list_active_habits(&self, user_id: RecordId) -> Result<Vec<Habit>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ?1 AND is_active = 1
                 ORDER BY created_at ASC, id ASC"
            ))?;
            let habits = stmt
                .query_map(params![user_id], habit_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(habits)
        })
        .await
    }

    async fn get_habit(&self, user_id: RecordId, id: RecordId) -> Result<Option<Habit>> {
        self.call(move |conn| select_owned(conn, user_id, id)).await
    }

    async fn create_habit(&self, user_id: RecordId, habit: &NewHabit) -> Result<Habit> {
        let habit = habit.clone();
        let now = Utc::now();

        self.call(move |conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO habits (user_id, name, description, category, target_frequency, is_active, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     RETURNING {HABIT_COLUMNS}"
                ),
                params![
                    user_id,
                    habit.name.trim(),
                    habit.description,
                    habit.category,
                    habit.target_frequency,
                    habit.is_active,
                    now
                ],
                habit_from_row,
            )?)
        })
        .await
    }

    async fn update_habit(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &HabitPatch,
    ) -> Result<Option<Habit>> {
        let patch = patch.clone();

        self.call(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut habit) = select_owned(&tx, user_id, id)? else {
                return Ok(None);
            };
            if patch.is_empty() {
                return Ok(Some(habit));
            }

            patch.apply(&mut habit);
            habit.name = habit.name.trim().to_string();
            tx.execute(
                "UPDATE habits
                 SET name = ?1, description = ?2, category = ?3, target_frequency = ?4, is_active = ?5
                 WHERE id = ?6 AND user_id = ?7",
                params![
                    habit.name,
                    habit.description,
                    habit.category,
                    habit.target_frequency,
                    habit.is_active,
                    id,
                    user_id
                ],
            )?;
            tx.commit()?;
            Ok(Some(habit))
        })
        .await
    }

    async fn delete_habit(&self, user_id: RecordId, id: RecordId) -> Result<bool> {
        self.call(move |conn| {
            let count = conn.execute(
                "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count > 0)
        })
        .await
    }

    async fn set_habit_completion(
        &self,
        user_id: RecordId,
        id: RecordId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<Option<bool>> {
        let now = Utc::now();

        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let owned: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1 AND user_id = ?2)",
                params![id, user_id],
                |row| row.get(0),
            )?;
            if !owned {
                return Ok(None);
            }

            if completed {
                let already: bool = tx.query_row(
                    "SELECT EXISTS(
                         SELECT 1 FROM progress_logs
                         WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3 AND completed = 1
                     )",
                    params![user_id, id, date],
                    |row| row.get(0),
                )?;
                if !already {
                    tx.execute(
                        "INSERT INTO progress_logs (user_id, habit_id, date, completed, created_at)
                         VALUES (?1, ?2, ?3, 1, ?4)",
                        params![user_id, id, date, now],
                    )?;
                }
            } else {
                tx.execute(
                    "DELETE FROM progress_logs
                     WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3 AND completed = 1",
                    params![user_id, id, date],
                )?;
            }

            tx.commit()?;
            Ok(Some(completed))
        })
        .await
    }
}
