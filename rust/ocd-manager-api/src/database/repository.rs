//! Repository traits.
//!
//! Every method that touches user-owned rows takes the caller's id explicitly.
//! A row owned by someone else behaves exactly like a missing row: `None` from
//! reads and updates, `false` from deletes.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Exercise, ExercisePatch, Habit, HabitPatch, NewExercise, NewHabit, NewProgressLog,
    NewSymptom, ProgressLog, ProgressLogPatch, RecordId, Symptom, SymptomPatch, User,
};

/// Repository trait for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Returns `None` when the email is already registered.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>>;

    /// Look up a user by normalized email.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Look up a user by id.
    async fn get_user(&self, id: RecordId) -> anyhow::Result<Option<User>>;
}

/// Repository trait for habits.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// All habits of a user, newest first.
    async fn list_habits(&self, user_id: RecordId) -> anyhow::Result<Vec<Habit>>;

    /// Active habits of a user, oldest first.
    async fn list_active_habits(&self, user_id: RecordId) -> anyhow::Result<Vec<Habit>>;

    async fn get_habit(&self, user_id: RecordId, id: RecordId) -> anyhow::Result<Option<Habit>>;

    async fn create_habit(&self, user_id: RecordId, habit: &NewHabit) -> anyhow::Result<Habit>;

    async fn update_habit(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &HabitPatch,
    ) -> anyhow::Result<Option<Habit>>;

    async fn delete_habit(&self, user_id: RecordId, id: RecordId) -> anyhow::Result<bool>;

    /// Mark a habit done or not done on `date`.
    ///
    /// Marking done inserts a completed habit log unless one already exists for
    /// that day; marking not done removes that day's completed habit logs. The
    /// check and the write happen in one transaction. Returns the resulting
    /// completion state, or `None` when the habit is not the caller's.
    async fn set_habit_completion(
        &self,
        user_id: RecordId,
        id: RecordId,
        date: NaiveDate,
        completed: bool,
    ) -> anyhow::Result<Option<bool>>;
}

/// Repository trait for symptom logs.
#[async_trait]
pub trait SymptomRepository: Send + Sync {
    /// All symptom logs of a user, most recent date first.
    async fn list_symptoms(&self, user_id: RecordId) -> anyhow::Result<Vec<Symptom>>;

    /// The `limit` most recent symptom logs, most recent first.
    async fn recent_symptoms(&self, user_id: RecordId, limit: usize)
    -> anyhow::Result<Vec<Symptom>>;

    /// Symptom logs dated on or after `since`, most recent first.
    async fn symptoms_since(
        &self,
        user_id: RecordId,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<Symptom>>;

    async fn get_symptom(&self, user_id: RecordId, id: RecordId)
    -> anyhow::Result<Option<Symptom>>;

    async fn create_symptom(&self, user_id: RecordId, symptom: &NewSymptom)
    -> anyhow::Result<Symptom>;

    async fn update_symptom(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &SymptomPatch,
    ) -> anyhow::Result<Option<Symptom>>;

    async fn delete_symptom(&self, user_id: RecordId, id: RecordId) -> anyhow::Result<bool>;
}

/// Repository trait for exercises.
///
/// Reads cover every exercise visible to the caller (owned, unowned or
/// system). Writes only ever touch exercises the caller owns.
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn list_exercises(&self, user_id: RecordId) -> anyhow::Result<Vec<Exercise>>;

    async fn get_exercise(&self, user_id: RecordId, id: RecordId)
    -> anyhow::Result<Option<Exercise>>;

    async fn create_exercise(
        &self,
        user_id: RecordId,
        exercise: &NewExercise,
    ) -> anyhow::Result<Exercise>;

    /// Insert a shared exercise visible to every user.
    async fn create_system_exercise(&self, exercise: &NewExercise) -> anyhow::Result<Exercise>;

    async fn update_exercise(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &ExercisePatch,
    ) -> anyhow::Result<Option<Exercise>>;

    async fn delete_exercise(&self, user_id: RecordId, id: RecordId) -> anyhow::Result<bool>;
}

/// Repository trait for progress logs.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// All progress logs of a user, most recent date first.
    async fn list_logs(&self, user_id: RecordId) -> anyhow::Result<Vec<ProgressLog>>;

    /// The `limit` most recent progress logs, most recent first.
    async fn recent_logs(&self, user_id: RecordId, limit: usize)
    -> anyhow::Result<Vec<ProgressLog>>;

    /// Progress logs dated on or after `since`, oldest first.
    async fn logs_since(
        &self,
        user_id: RecordId,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<ProgressLog>>;

    async fn get_log(&self, user_id: RecordId, id: RecordId)
    -> anyhow::Result<Option<ProgressLog>>;

    async fn create_log(&self, user_id: RecordId, log: &NewProgressLog)
    -> anyhow::Result<ProgressLog>;

    async fn update_log(
        &self,
        user_id: RecordId,
        id: RecordId,
        patch: &ProgressLogPatch,
    ) -> anyhow::Result<Option<ProgressLog>>;

    async fn delete_log(&self, user_id: RecordId, id: RecordId) -> anyhow::Result<bool>;
}
