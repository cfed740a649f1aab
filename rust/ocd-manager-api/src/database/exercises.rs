//! Exercise storage.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::repository::ExerciseRepository;
use super::store::SqliteStore;
use crate::domain::{Exercise, ExercisePatch, NewExercise, RecordId};

const EXERCISE_COLUMNS: &str = "id, user_id, title, description, category, difficulty, \
     estimated_minutes, instructions, is_system_exercise, created_at";

/// Rows readable by `?1`.
const VISIBLE_TO: &str = "(user_id = ?1 OR user_id IS NULL OR is_system_exercise = 1)";

/// Rows writable by `?1`.
const WRITABLE_BY: &str = "user_id = ?1 AND is_system_exercise = 0";

fn exercise_from_row(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        difficulty: row.get(5)?,
        estimated_minutes: row.get(6)?,
        instructions: row.get(7)?,
        is_system_exercise: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn select_one(
    conn: &Connection,
    scope: &str,
    user_id: RecordId,
    id: RecordId,
) -> Result<Option<Exercise>> {
    Ok(conn
        .query_row(
            &format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE {scope} AND id = ?2"),
            params![user_id, id],
            exercise_from_row,
        )
        .optional()?)
}

fn insert(
    conn: &Connection,
    owner: Option<RecordId>,
    system: bool,
    e: &NewExercise,
) -> Result<Exercise> {
    Ok(conn.query_row(
        &format!(
            "INSERT INTO exercises (user_id, title, description, category, difficulty,
                 estimated_minutes, instructions, is_system_exercise, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {EXERCISE_COLUMNS}"
        ),
        params![
            owner,
            e.title.trim(),
            e.description.trim(),
            e.category,
            e.difficulty,
            e.estimated_minutes,
            e.instructions,
            system,
            Utc::now()
        ],
        exercise_from_row,
    )?)
}

#[async_trait]
impl ExerciseRepository for SqliteStore {
    async fn list_exercises(&self, user_id: RecordId) -> Result<Vec<Exercise>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE {VISIBLE_TO}
                 ORDER BY is_system_exercise DESC, difficulty ASC, id ASC"
            ))?;
            let exercises = stmt
                .query_map(params![user_id], exercise_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
    }

    async fn get_exercise(&self, user_id: RecordId, id: RecordId) -> Result<Option<Exercise>> {
        self.call(move |conn| select_one(conn, VISIBLE_TO, user_id, id)).await
    }

    async fn create_exercise(&self, user_id: RecordId, exercise: &NewExercise) -> Result<Exercise> {
        let exercise = exercise.clone();
        self.call(move |conn| insert(conn, Some(user_id), false, &exercise)).await
    }

    async fn create_system_exercise(&self, exercise: &NewExercise) -> Result<Exercise> {
        let exercise = exercise.clone();
        self.call(move |conn| insert(conn, None, true, &exercise)).await
    }

    async fn update_exercise(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &ExercisePatch,
    ) -> Result<Option<Exercise>> {
        let patch = patch.clone();

        self.call(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut e) = select_one(&tx, WRITABLE_BY, user_id, id)? else {
                return Ok(None);
            };
            if patch.is_empty() {
                return Ok(Some(e));
            }

            patch.apply(&mut e);
            e.title = e.title.trim().to_string();
            e.description = e.description.trim().to_string();
            tx.execute(
                &format!(
                    "UPDATE exercises
                     SET title = ?3, description = ?4, category = ?5, difficulty = ?6,
                         estimated_minutes = ?7, instructions = ?8
                     WHERE {WRITABLE_BY} AND id = ?2"
                ),
                params![
                    user_id,
                    id,
                    e.title,
                    e.description,
                    e.category,
                    e.difficulty,
                    e.estimated_minutes,
                    e.instructions
                ],
            )?;
            tx.commit()?;
            Ok(Some(e))
        })
        .await
    }

    async fn delete_exercise(&self, user_id: RecordId, id: RecordId) -> Result<bool> {
        self.call(move |conn| {
            let count = conn.execute(
                &format!("DELETE FROM exercises WHERE {WRITABLE_BY} AND id = ?2"),
                params![user_id, id],
            )?;
            Ok(count > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{add_user, store_with_user};
    use crate::domain::ExerciseCategory;

    fn new_exercise(title: &str) -> NewExercise {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "description": "Sit with the discomfort",
            "category": "checking",
            "difficulty": 2
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_visibility_rules() {
        let (store, alice) = store_with_user("alice@example.com").await;
        let bob = add_user(&store, "bob@example.com").await;

        let system = store.create_system_exercise(&new_exercise("Shared")).await.unwrap();
        let mine = store.create_exercise(alice, &new_exercise("Mine")).await.unwrap();

        assert!(system.is_system_exercise);
        assert_eq!(system.user_id, None);
        assert!(!mine.is_system_exercise);
        assert_eq!(mine.user_id, Some(alice));
        assert_eq!(mine.category, ExerciseCategory::Checking);

        let alice_titles: Vec<String> = store
            .list_exercises(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(alice_titles, vec!["Shared", "Mine"]);

        let bob_list = store.list_exercises(bob).await.unwrap();
        assert_eq!(bob_list.len(), 1);
        assert!(store.get_exercise(bob, mine.id).await.unwrap().is_none());
        assert!(store.get_exercise(bob, system.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_system_exercises_are_read_only() {
        let (store, alice) = store_with_user("alice@example.com").await;
        let system = store.create_system_exercise(&new_exercise("Shared")).await.unwrap();

        let patch = ExercisePatch {
            title: Some("Mine now".into()),
            ..ExercisePatch::default()
        };
        assert!(store.update_exercise(alice, system.id, &patch).await.unwrap().is_none());
        assert!(!store.delete_exercise(alice, system.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_updates_and_deletes() {
        let (store, alice) = store_with_user("alice@example.com").await;
        let bob = add_user(&store, "bob@example.com").await;
        let mine = store.create_exercise(alice, &new_exercise("Mine")).await.unwrap();

        let patch = ExercisePatch {
            difficulty: Some(4),
            ..ExercisePatch::default()
        };
        assert!(store.update_exercise(bob, mine.id, &patch).await.unwrap().is_none());

        let updated = store.update_exercise(alice, mine.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.difficulty, 4);
        assert_eq!(updated.title, "Mine");

        assert!(!store.delete_exercise(bob, mine.id).await.unwrap());
        assert!(store.delete_exercise(alice, mine.id).await.unwrap());
        assert!(store.get_exercise(alice, mine.id).await.unwrap().is_none());
    }
}
