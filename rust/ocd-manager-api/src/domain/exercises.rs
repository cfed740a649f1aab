//! Exposure and response prevention (ERP) exercise definitions.
//!
//! An exercise is either owned by a user or shared: `user_id` is `None` or
//! `is_system_exercise` is set. Shared exercises are readable by everyone and
//! writable by no one through the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Rule, Validate};
use super::RecordId;

string_enum! {
    /// Symptom theme an exercise targets.
    pub enum ExerciseCategory {
        Contamination => "contamination",
        Checking => "checking",
        Symmetry => "symmetry",
        IntrusiveThoughts => "intrusive-thoughts",
        General => "general",
    }
}

/// A stored exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: RecordId,
    pub user_id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub category: ExerciseCategory,
    pub difficulty: i64,
    pub estimated_minutes: i64,
    pub instructions: Option<String>,
    pub is_system_exercise: bool,
    pub created_at: DateTime<Utc>,
}

/// Create payload. `isSystemExercise` is never taken from the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ExerciseCategory,
    #[serde(default = "default_difficulty")]
    pub difficulty: i64,
    #[serde(default = "default_minutes")]
    pub estimated_minutes: i64,
    #[serde(default)]
    pub instructions: Option<String>,
}

fn default_difficulty() -> i64 {
    1
}

fn default_minutes() -> i64 {
    15
}

fn difficulty_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "difficulty",
        value,
        min: 1,
        max: 5,
        message: "Difficulty must be between 1 and 5",
    }
}

fn minutes_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "estimatedMinutes",
        value,
        min: 1,
        max: i64::MAX,
        message: "Estimated minutes must be at least 1",
    }
}

fn title_rule(value: &str) -> Rule<'_> {
    Rule::Required {
        field: "title",
        value,
        message: "Title is required",
    }
}

fn description_rule(value: &str) -> Rule<'_> {
    Rule::Required {
        field: "description",
        value,
        message: "Description is required",
    }
}

impl Validate for NewExercise {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            title_rule(&self.title),
            description_rule(&self.description),
            difficulty_rule(self.difficulty),
            minutes_rule(self.estimated_minutes),
        ]
    }
}

/// Partial update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ExerciseCategory>,
    pub difficulty: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub instructions: Option<String>,
}

impl ExercisePatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.difficulty.is_none()
            && self.estimated_minutes.is_none()
            && self.instructions.is_none()
    }

    /// Overwrite the fields of `exercise` that this patch sets.
    pub fn apply(&self, exercise: &mut Exercise) {
        if let Some(title) = &self.title {
            exercise.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            exercise.description.clone_from(description);
        }
        if let Some(category) = self.category {
            exercise.category = category;
        }
        if let Some(difficulty) = self.difficulty {
            exercise.difficulty = difficulty;
        }
        if let Some(minutes) = self.estimated_minutes {
            exercise.estimated_minutes = minutes;
        }
        if let Some(instructions) = &self.instructions {
            exercise.instructions = Some(instructions.clone());
        }
    }
}

impl Validate for ExercisePatch {
    fn rules(&self) -> Vec<Rule<'_>> {
        [
            self.title.as_deref().map(title_rule),
            self.description.as_deref().map(description_rule),
            self.difficulty.map(difficulty_rule),
            self.estimated_minutes.map(minutes_rule),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_title_first() {
        let new: NewExercise =
            serde_json::from_str(r#"{"category":"checking","difficulty":9}"#).unwrap();
        assert_eq!(new.validate().unwrap_err().message, "Title is required");
    }

    #[test]
    fn test_difficulty_bounds() {
        let new: NewExercise = serde_json::from_str(
            r#"{"title":"t","description":"d","category":"symmetry","difficulty":6}"#,
        )
        .unwrap();
        assert_eq!(new.validate().unwrap_err().field, "difficulty");

        let new: NewExercise = serde_json::from_str(
            r#"{"title":"t","description":"d","category":"symmetry","difficulty":5}"#,
        )
        .unwrap();
        assert!(new.validate().is_ok());
        assert_eq!(new.estimated_minutes, 15);
    }

    #[test]
    fn test_client_cannot_claim_system_exercise() {
        // Unknown to the payload type, so silently dropped.
        let new: NewExercise = serde_json::from_str(
            r#"{"title":"t","description":"d","category":"general","isSystemExercise":true}"#,
        )
        .unwrap();
        assert!(new.validate().is_ok());
    }
}
