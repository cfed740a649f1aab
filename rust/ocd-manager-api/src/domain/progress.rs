//! Progress logs: a completion record for a habit or an exercise on a day.
//!
//! `habit_id` and `exercise_id` are weak references. Deleting the referenced
//! row nulls the column instead of removing the log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Rule, Validate};
use super::RecordId;

/// A stored progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub id: RecordId,
    pub user_id: RecordId,
    pub habit_id: Option<RecordId>,
    pub exercise_id: Option<RecordId>,
    pub date: NaiveDate,
    pub completed: bool,
    pub anxiety_before: Option<i64>,
    pub anxiety_after: Option<i64>,
    pub duration_minutes: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProgressLog {
    /// Anxiety drop across the session when both ratings are present.
    pub fn anxiety_reduction(&self) -> Option<i64> {
        Some(self.anxiety_before? - self.anxiety_after?)
    }
}

/// Create payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressLog {
    #[serde(default)]
    pub habit_id: Option<RecordId>,
    #[serde(default)]
    pub exercise_id: Option<RecordId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub anxiety_before: Option<i64>,
    #[serde(default)]
    pub anxiety_after: Option<i64>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewProgressLog {
    /// A completed log for `habit_id` on `date` with nothing else recorded.
    pub fn habit_completion(habit_id: RecordId, date: NaiveDate) -> Self {
        Self {
            habit_id: Some(habit_id),
            exercise_id: None,
            date,
            completed: true,
            anxiety_before: None,
            anxiety_after: None,
            duration_minutes: None,
            notes: None,
        }
    }
}

fn before_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "anxietyBefore",
        value,
        min: 0,
        max: 10,
        message: "Anxiety before must be between 0 and 10",
    }
}

fn after_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "anxietyAfter",
        value,
        min: 0,
        max: 10,
        message: "Anxiety after must be between 0 and 10",
    }
}

fn duration_rule(value: f64) -> Rule<'static> {
    Rule::AtLeast {
        field: "durationMinutes",
        value,
        min: 0.0,
        message: "Duration cannot be negative",
    }
}

fn collect_rules(
    before: Option<i64>,
    after: Option<i64>,
    duration: Option<f64>,
) -> Vec<Rule<'static>> {
    [
        before.map(before_rule),
        after.map(after_rule),
        duration.map(duration_rule),
    ]
    .into_iter()
    .flatten()
    .collect()
}

impl Validate for NewProgressLog {
    fn rules(&self) -> Vec<Rule<'_>> {
        collect_rules(self.anxiety_before, self.anxiety_after, self.duration_minutes)
    }
}

/// Partial update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLogPatch {
    pub habit_id: Option<RecordId>,
    pub exercise_id: Option<RecordId>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub anxiety_before: Option<i64>,
    pub anxiety_after: Option<i64>,
    pub duration_minutes: Option<f64>,
    pub notes: Option<String>,
}

impl ProgressLogPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.habit_id.is_none()
            && self.exercise_id.is_none()
            && self.date.is_none()
            && self.completed.is_none()
            && self.anxiety_before.is_none()
            && self.anxiety_after.is_none()
            && self.duration_minutes.is_none()
            && self.notes.is_none()
    }

    /// Overwrite the fields of `log` that this patch sets.
    pub fn apply(&self, log: &mut ProgressLog) {
        if self.habit_id.is_some() {
            log.habit_id = self.habit_id;
        }
        if self.exercise_id.is_some() {
            log.exercise_id = self.exercise_id;
        }
        if let Some(date) = self.date {
            log.date = date;
        }
        if let Some(completed) = self.completed {
            log.completed = completed;
        }
        if self.anxiety_before.is_some() {
            log.anxiety_before = self.anxiety_before;
        }
        if self.anxiety_after.is_some() {
            log.anxiety_after = self.anxiety_after;
        }
        if self.duration_minutes.is_some() {
            log.duration_minutes = self.duration_minutes;
        }
        if let Some(notes) = &self.notes {
            log.notes = Some(notes.clone());
        }
    }
}

impl Validate for ProgressLogPatch {
    fn rules(&self) -> Vec<Rule<'_>> {
        collect_rules(self.anxiety_before, self.anxiety_after, self.duration_minutes)
    }
}
