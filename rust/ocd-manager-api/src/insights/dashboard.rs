//! Today snapshot and the recent activity feed.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Habit, Mood, ProgressLog, RecordId, Symptom};

/// How many rows of each kind feed the activity list.
pub const ACTIVITY_SOURCE_LEN: usize = 3;

/// Length of the merged activity list.
pub const ACTIVITY_FEED_LEN: usize = 5;

/// An active habit and whether it was completed today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatus {
    pub id: RecordId,
    pub name: String,
    pub completed_today: bool,
}

/// What today looks like so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub date: NaiveDate,
    pub symptom: Option<Symptom>,
    pub anxiety_level: Option<i64>,
    pub compulsion_count: i64,
    pub mood: Option<Mood>,
    pub habits: Vec<HabitStatus>,
    pub exercises_completed: usize,
    /// No symptom has been logged today.
    pub needs_checkin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Symptom,
    Exercise,
    Habit,
}

/// One entry of the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub date: NaiveDate,
}

/// Build today's snapshot.
///
/// `symptoms` and `logs` may contain rows from other days; only those dated
/// `today` are considered.
pub fn today_snapshot(
    today: NaiveDate,
    symptoms: &[Symptom],
    active_habits: &[Habit],
    logs: &[ProgressLog],
) -> TodaySnapshot {
    let symptom = symptoms
        .iter()
        .filter(|s| s.date == today)
        .max_by_key(|s| (s.created_at, s.id))
        .cloned();

    let done_today: Vec<&ProgressLog> = logs
        .iter()
        .filter(|l| l.date == today && l.completed)
        .collect();
    let completed_habits: HashSet<RecordId> = done_today.iter().filter_map(|l| l.habit_id).collect();

    let habits = active_habits
        .iter()
        .filter(|h| h.is_active)
        .map(|h| HabitStatus {
            id: h.id,
            name: h.name.clone(),
            completed_today: completed_habits.contains(&h.id),
        })
        .collect();

    TodaySnapshot {
        date: today,
        anxiety_level: symptom.as_ref().map(|s| s.anxiety_level),
        compulsion_count: symptom.as_ref().map_or(0, |s| s.compulsion_count),
        mood: symptom.as_ref().map(|s| s.mood),
        needs_checkin: symptom.is_none(),
        symptom,
        habits,
        exercises_completed: done_today.iter().filter(|l| l.exercise_id.is_some()).count(),
    }
}

/// Merge the most recent symptoms and progress logs into one feed.
///
/// Both inputs are expected newest first; at most [`ACTIVITY_SOURCE_LEN`] of
/// each are used. Symptoms sort ahead of logs on the same day.
pub fn recent_activity(symptoms: &[Symptom], logs: &[ProgressLog]) -> Vec<Activity> {
    let from_symptoms = symptoms.iter().take(ACTIVITY_SOURCE_LEN).map(|s| Activity {
        id: s.id,
        kind: ActivityKind::Symptom,
        description: format!("Anxiety: {}/10, Mood: {}", s.anxiety_level, s.mood),
        date: s.date,
    });

    let from_logs = logs.iter().take(ACTIVITY_SOURCE_LEN).map(|l| Activity {
        id: l.id,
        kind: if l.exercise_id.is_some() {
            ActivityKind::Exercise
        } else {
            ActivityKind::Habit
        },
        description: if l.completed { "Completed" } else { "In progress" }.to_string(),
        date: l.date,
    });

    let mut feed: Vec<Activity> = from_symptoms.chain(from_logs).collect();
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(ACTIVITY_FEED_LEN);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::domain::{TargetFrequency, ThoughtFrequency};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn symptom(id: i64, date: NaiveDate, anxiety: i64, mood: Mood) -> Symptom {
        Symptom {
            id,
            user_id: 1,
            date,
            anxiety_level: anxiety,
            compulsion_count: 3,
            compulsion_duration: 0,
            intrusive_thought_frequency: ThoughtFrequency::None,
            resistance_level: 5,
            mood,
            notes: None,
            created_at: Utc::now() + Duration::seconds(id),
        }
    }

    fn habit(id: i64, name: &str) -> Habit {
        Habit {
            id,
            user_id: 1,
            name: name.into(),
            description: None,
            category: "general".into(),
            target_frequency: TargetFrequency::Daily,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn log(id: i64, date: NaiveDate, habit_id: Option<i64>, exercise_id: Option<i64>) -> ProgressLog {
        ProgressLog {
            id,
            user_id: 1,
            habit_id,
            exercise_id,
            date,
            completed: true,
            anxiety_before: None,
            anxiety_after: None,
            duration_minutes: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_day_needs_checkin() {
        let snapshot = today_snapshot(day(5), &[], &[habit(1, "Walk")], &[]);
        assert!(snapshot.needs_checkin);
        assert_eq!(snapshot.anxiety_level, None);
        assert_eq!(snapshot.compulsion_count, 0);
        assert_eq!(snapshot.exercises_completed, 0);
        assert_eq!(
            snapshot.habits,
            vec![HabitStatus { id: 1, name: "Walk".into(), completed_today: false }]
        );
    }

    #[test]
    fn test_snapshot_uses_latest_symptom_of_today() {
        let symptoms = [
            symptom(1, day(4), 9, Mood::Bad),
            symptom(2, day(5), 6, Mood::Neutral),
            symptom(3, day(5), 4, Mood::Good),
        ];
        let logs = [
            log(1, day(5), Some(1), None),
            log(2, day(5), None, Some(9)),
            log(3, day(4), None, Some(9)),
        ];
        let snapshot = today_snapshot(day(5), &symptoms, &[habit(1, "Walk"), habit(2, "Read")], &logs);

        assert!(!snapshot.needs_checkin);
        assert_eq!(snapshot.anxiety_level, Some(4));
        assert_eq!(snapshot.mood, Some(Mood::Good));
        assert_eq!(snapshot.compulsion_count, 3);
        assert_eq!(snapshot.exercises_completed, 1);
        assert!(snapshot.habits[0].completed_today);
        assert!(!snapshot.habits[1].completed_today);
    }

    #[test]
    fn test_incomplete_logs_do_not_count() {
        let mut pending = log(1, day(5), Some(1), None);
        pending.completed = false;
        let snapshot = today_snapshot(day(5), &[], &[habit(1, "Walk")], &[pending]);
        assert!(!snapshot.habits[0].completed_today);
    }

    #[test]
    fn test_activity_feed_merges_and_truncates() {
        let symptoms = [
            symptom(10, day(9), 6, Mood::Neutral),
            symptom(11, day(7), 5, Mood::Good),
            symptom(12, day(3), 8, Mood::Bad),
            symptom(13, day(1), 8, Mood::Bad),
        ];
        let mut in_progress = log(21, day(8), Some(1), None);
        in_progress.completed = false;
        let logs = [log(20, day(9), None, Some(4)), in_progress, log(22, day(2), Some(1), None)];

        let feed = recent_activity(&symptoms, &logs);
        assert_eq!(feed.len(), ACTIVITY_FEED_LEN);

        assert_eq!(feed[0].kind, ActivityKind::Symptom);
        assert_eq!(feed[0].description, "Anxiety: 6/10, Mood: neutral");
        assert_eq!(feed[1].kind, ActivityKind::Exercise);
        assert_eq!(feed[1].description, "Completed");
        assert_eq!(feed[2].kind, ActivityKind::Habit);
        assert_eq!(feed[2].description, "In progress");
        assert_eq!(feed[4].date, day(3));

        let json = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(json["type"], "symptom");
    }
}
