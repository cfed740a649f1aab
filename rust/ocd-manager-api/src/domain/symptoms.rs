//! Daily symptom self-reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{Rule, Validate};
use super::RecordId;

string_enum! {
    /// How often intrusive thoughts occurred.
    #[derive(Default)]
    pub enum ThoughtFrequency {
        #[default]
        None => "none",
        Rare => "rare",
        Occasional => "occasional",
        Frequent => "frequent",
        Constant => "constant",
    }
}

string_enum! {
    /// Self-reported mood.
    #[derive(Default)]
    pub enum Mood {
        Great => "great",
        Good => "good",
        #[default]
        Neutral => "neutral",
        Bad => "bad",
        Terrible => "terrible",
    }
}

/// A stored symptom log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: RecordId,
    pub user_id: RecordId,
    pub date: NaiveDate,
    pub anxiety_level: i64,
    pub compulsion_count: i64,
    /// Minutes spent on compulsions.
    pub compulsion_duration: i64,
    pub intrusive_thought_frequency: ThoughtFrequency,
    pub resistance_level: i64,
    pub mood: Mood,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptom {
    pub date: NaiveDate,
    pub anxiety_level: i64,
    #[serde(default)]
    pub compulsion_count: i64,
    #[serde(default)]
    pub compulsion_duration: i64,
    #[serde(default)]
    pub intrusive_thought_frequency: ThoughtFrequency,
    #[serde(default = "default_resistance")]
    pub resistance_level: i64,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_resistance() -> i64 {
    5
}

fn anxiety_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "anxietyLevel",
        value,
        min: 0,
        max: 10,
        message: "Anxiety level must be between 0 and 10",
    }
}

fn compulsion_count_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "compulsionCount",
        value,
        min: 0,
        max: i64::MAX,
        message: "Compulsion count cannot be negative",
    }
}

fn compulsion_duration_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "compulsionDuration",
        value,
        min: 0,
        max: i64::MAX,
        message: "Compulsion duration cannot be negative",
    }
}

fn resistance_rule(value: i64) -> Rule<'static> {
    Rule::Range {
        field: "resistanceLevel",
        value,
        min: 0,
        max: 10,
        message: "Resistance level must be between 0 and 10",
    }
}

impl Validate for NewSymptom {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            anxiety_rule(self.anxiety_level),
            compulsion_count_rule(self.compulsion_count),
            compulsion_duration_rule(self.compulsion_duration),
            resistance_rule(self.resistance_level),
        ]
    }
}

/// Partial update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomPatch {
    pub date: Option<NaiveDate>,
    pub anxiety_level: Option<i64>,
    pub compulsion_count: Option<i64>,
    pub compulsion_duration: Option<i64>,
    pub intrusive_thought_frequency: Option<ThoughtFrequency>,
    pub resistance_level: Option<i64>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
}

impl SymptomPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.anxiety_level.is_none()
            && self.compulsion_count.is_none()
            && self.compulsion_duration.is_none()
            && self.intrusive_thought_frequency.is_none()
            && self.resistance_level.is_none()
            && self.mood.is_none()
            && self.notes.is_none()
    }

    /// Overwrite the fields of `symptom` that this patch sets.
    pub fn apply(&self, symptom: &mut Symptom) {
        if let Some(date) = self.date {
            symptom.date = date;
        }
        if let Some(level) = self.anxiety_level {
            symptom.anxiety_level = level;
        }
        if let Some(count) = self.compulsion_count {
            symptom.compulsion_count = count;
        }
        if let Some(duration) = self.compulsion_duration {
            symptom.compulsion_duration = duration;
        }
        if let Some(frequency) = self.intrusive_thought_frequency {
            symptom.intrusive_thought_frequency = frequency;
        }
        if let Some(level) = self.resistance_level {
            symptom.resistance_level = level;
        }
        if let Some(mood) = self.mood {
            symptom.mood = mood;
        }
        if let Some(notes) = &self.notes {
            symptom.notes = Some(notes.clone());
        }
    }
}

impl Validate for SymptomPatch {
    fn rules(&self) -> Vec<Rule<'_>> {
        [
            self.anxiety_level.map(anxiety_rule),
            self.compulsion_count.map(compulsion_count_rule),
            self.compulsion_duration.map(compulsion_duration_rule),
            self.resistance_level.map(resistance_rule),
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
    fn test_defaults_applied() {
        let symptom: NewSymptom =
            serde_json::from_str(r#"{"date":"2026-10-01","anxietyLevel":4}"#).unwrap();
        assert_eq!(symptom.compulsion_count, 0);
        assert_eq!(symptom.resistance_level, 5);
        assert_eq!(symptom.mood, Mood::Neutral);
        assert_eq!(symptom.intrusive_thought_frequency, ThoughtFrequency::None);
        assert!(symptom.validate().is_ok());
    }

    #[test]
    fn test_anxiety_out_of_range() {
        for level in [-1, 11, 100] {
            let symptom: NewSymptom = serde_json::from_str(&format!(
                r#"{{"date":"2026-10-01","anxietyLevel":{level}}}"#
            ))
            .unwrap();
            let err = symptom.validate().unwrap_err();
            assert_eq!(err.field, "anxietyLevel");
        }
    }

    #[test]
    fn test_malformed_date_rejected() {
        let result =
            serde_json::from_str::<NewSymptom>(r#"{"date":"yesterday","anxietyLevel":4}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        let patch: SymptomPatch = serde_json::from_str(r#"{"mood":"good"}"#).unwrap();
        assert!(patch.validate().is_ok());

        let patch: SymptomPatch = serde_json::from_str(r#"{"resistanceLevel":12}"#).unwrap();
        assert_eq!(patch.validate().unwrap_err().field, "resistanceLevel");
    }
}
