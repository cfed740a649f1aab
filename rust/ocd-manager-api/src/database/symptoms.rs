//! Symptom log storage.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::repository::SymptomRepository;
use super::sql_limit;
use super::store::SqliteStore;
use crate::domain::{NewSymptom, RecordId, Symptom, SymptomPatch};

const SYMPTOM_COLUMNS: &str = "id, user_id, date, anxiety_level, compulsion_count, \
     compulsion_duration, intrusive_thought_frequency, resistance_level, mood, notes, created_at";

/// Most recent day first; entries on the same day by insertion.
const NEWEST_FIRST: &str = "ORDER BY date DESC, id DESC";

fn symptom_from_row(row: &Row<'_>) -> rusqlite::Result<Symptom> {
    Ok(Symptom {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        anxiety_level: row.get(3)?,
        compulsion_count: row.get(4)?,
        compulsion_duration: row.get(5)?,
        intrusive_thought_frequency: row.get(6)?,
        resistance_level: row.get(7)?,
        mood: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn select_owned(conn: &Connection, user_id: RecordId, id: RecordId) -> Result<Option<Symptom>> {
    Ok(conn
        .query_row(
            &format!("SELECT {SYMPTOM_COLUMNS} FROM symptoms WHERE id = ?1 AND user_id = ?2"),
            params![id, user_id],
            symptom_from_row,
        )
        .optional()?)
}

fn select_many(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Symptom>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SYMPTOM_COLUMNS} FROM symptoms WHERE {filter}"
    ))?;
    let symptoms = stmt
        .query_map(params, symptom_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(symptoms)
}

#[async_trait]
impl SymptomRepository for SqliteStore {
    async fn list_symptoms(&self, user_id: RecordId) -> Result<Vec<Symptom>> {
        self.call(move |conn| {
            select_many(conn, &format!("user_id = ?1 {NEWEST_FIRST}"), params![user_id])
        })
        .await
    }

    async fn recent_symptoms(&self, user_id: RecordId, limit: usize) -> Result<Vec<Symptom>> {
        let limit = sql_limit(limit);
        self.call(move |conn| {
            select_many(
                conn,
                &format!("user_id = ?1 {NEWEST_FIRST} LIMIT ?2"),
                params![user_id, limit],
            )
        })
        .await
    }

    async fn symptoms_since(&self, user_id: RecordId, since: NaiveDate) -> Result<Vec<Symptom>> {
        self.call(move |conn| {
            select_many(
                conn,
                &format!("user_id = ?1 AND date >= ?2 {NEWEST_FIRST}"),
                params![user_id, since],
            )
        })
        .await
    }

    async fn get_symptom(&self, user_id: RecordId, id: RecordId) -> Result<Option<Symptom>> {
        self.call(move |conn| select_owned(conn, user_id, id)).await
    }

    async fn create_symptom(&self, user_id: RecordId, symptom: &NewSymptom) -> Result<Symptom> {
        let s = symptom.clone();
        let now = Utc::now();

        self.call(move |conn| {
            Ok(conn.query_row(
                &format!(
                    "INSERT INTO symptoms (user_id, date, anxiety_level, compulsion_count,
                         compulsion_duration, intrusive_thought_frequency, resistance_level,
                         mood, notes, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                     RETURNING {SYMPTOM_COLUMNS}"
                ),
                params![
                    user_id,
                    s.date,
                    s.anxiety_level,
                    s.compulsion_count,
                    s.compulsion_duration,
                    s.intrusive_thought_frequency,
                    s.resistance_level,
                    s.mood,
                    s.notes,
                    now
                ],
                symptom_from_row,
            )?)
        })
        .await
    }

    async fn update_symptom(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &SymptomPatch,
    ) -> Result<Option<Symptom>> {
        let patch = patch.clone();

        self.call(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut s) = select_owned(&tx, user_id, id)? else {
                return Ok(None);
            };
            if patch.is_empty() {
                return Ok(Some(s));
            }

            patch.apply(&mut s);
            tx.execute(
                "UPDATE symptoms
                 SET date = ?1, anxiety_level = ?2, compulsion_count = ?3, compulsion_duration = ?4,
                     intrusive_thought_frequency = ?5, resistance_level = ?6, mood = ?7, notes = ?8
                 WHERE id = ?9 AND user_id = ?10",
                params![
                    s.date,
                    s.anxiety_level,
                    s.compulsion_count,
                    s.compulsion_duration,
                    s.intrusive_thought_frequency,
                    s.resistance_level,
                    s.mood,
                    s.notes,
                    id,
                    user_id
                ],
            )?;
            tx.commit()?;
            Ok(Some(s))
        })
        .await
    }

    async fn delete_symptom(&self, user_id: RecordId, id: RecordId) -> Result<bool> {
        self.call(move |conn| {
            let count = conn.execute(
                "DELETE FROM symptoms WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count > 0)
        })
        .await
    }
}
