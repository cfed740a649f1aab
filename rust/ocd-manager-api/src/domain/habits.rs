//! Habits: recurring behavior goals tracked through progress logs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Rule, Validate};
use super::RecordId;

string_enum! {
    /// How often a habit is meant to be practiced.
    #[derive(Default)]
    pub enum TargetFrequency {
        #[default]
        Daily => "daily",
        Weekly => "weekly",
        AsNeeded => "as-needed",
    }
}

/// A stored habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub target_frequency: TargetFrequency,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Server-side fields (`id`, `userId`, `createdAt`) are not
/// accepted from the client and are ignored if present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub target_frequency: TargetFrequency,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_true() -> bool {
    true
}

impl Validate for NewHabit {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![Rule::Required {
            field: "name",
            value: &self.name,
            message: "Name is required",
        }]
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_frequency: Option<TargetFrequency>,
    pub is_active: Option<bool>,
}

impl HabitPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.target_frequency.is_none()
            && self.is_active.is_none()
    }

    /// Overwrite the fields of `habit` that this patch sets.
    pub fn apply(&self, habit: &mut Habit) {
        if let Some(name) = &self.name {
            habit.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            habit.description = Some(description.clone());
        }
        if let Some(category) = &self.category {
            habit.category.clone_from(category);
        }
        if let Some(frequency) = self.target_frequency {
            habit.target_frequency = frequency;
        }
        if let Some(active) = self.is_active {
            habit.is_active = active;
        }
    }
}

impl Validate for HabitPatch {
    fn rules(&self) -> Vec<Rule<'_>> {
        let mut rules = Vec::new();
        if let Some(name) = &self.name {
            rules.push(Rule::Required {
                field: "name",
                value: name,
                message: "Name is required",
            });
        }
        rules
    }
}

/// Request to mark a habit done (or not) for a day.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitToggle {
    /// Day to toggle; defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

/// Outcome of a habit toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitToggleResult {
    pub habit_id: RecordId,
    pub date: NaiveDate,
    pub completed_today: bool,
}
