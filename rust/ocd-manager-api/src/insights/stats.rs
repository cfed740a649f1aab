//! Period statistics and trend series for the progress charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::round1;
use crate::domain::{Mood, ProgressLog, Symptom};

/// Number of symptom entries in the anxiety trend.
pub const SYMPTOM_TREND_LEN: usize = 14;

/// Headline numbers for a lookback window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub avg_anxiety: f64,
    pub symptom_entries: usize,
    pub exercises_completed: usize,
    pub avg_anxiety_reduction: f64,
    pub active_habits: usize,
    pub habit_completions: usize,
}

/// One point of the anxiety trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomTrendPoint {
    pub date: NaiveDate,
    pub anxiety_level: i64,
    pub mood: Mood,
    pub compulsion_count: i64,
}

/// Habit-linked logs on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitTrendPoint {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
}

/// Response of the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub stats: PeriodStats,
    pub symptom_trend: Vec<SymptomTrendPoint>,
    pub habit_trend: Vec<HabitTrendPoint>,
}

/// Rows the statistics are computed from.
#[derive(Debug, Clone, Copy)]
pub struct StatsInput<'a> {
    /// First day of the window (inclusive).
    pub since: NaiveDate,
    /// Symptom logs; rows dated before `since` are ignored.
    pub symptoms: &'a [Symptom],
    /// Progress logs; rows dated before `since` are ignored.
    pub logs: &'a [ProgressLog],
    /// Number of active habits.
    pub active_habits: usize,
    /// Most recent symptom logs regardless of window, newest first.
    pub recent_symptoms: &'a [Symptom],
}

/// First day of a lookback window of `days` days ending at `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - chrono::Days::new(u64::from(days))
}

/// Mean of `values`, rounded to one decimal, or 0 when there are none.
fn rounded_mean(values: impl Iterator<Item = i64>) -> f64 {
    let (sum, count) = values.fold((0i64, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss, reason = "sums of 0-10 ratings stay far below 2^52")]
    let sum = sum as f64;
    round1(sum / f64::from(count))
}

/// Compute the period statistics and both trend series.
pub fn progress_stats(input: &StatsInput<'_>) -> ProgressStats {
    let since = input.since;
    let symptoms: Vec<&Symptom> = input.symptoms.iter().filter(|s| s.date >= since).collect();
    let logs: Vec<&ProgressLog> = input.logs.iter().filter(|l| l.date >= since).collect();
    let completed: Vec<&&ProgressLog> = logs.iter().filter(|l| l.completed).collect();

    let stats = PeriodStats {
        avg_anxiety: rounded_mean(symptoms.iter().map(|s| s.anxiety_level)),
        symptom_entries: symptoms.len(),
        exercises_completed: completed.len(),
        avg_anxiety_reduction: rounded_mean(completed.iter().filter_map(|l| l.anxiety_reduction())),
        active_habits: input.active_habits,
        habit_completions: completed.iter().filter(|l| l.habit_id.is_some()).count(),
    };

    let mut symptom_trend: Vec<SymptomTrendPoint> = input
        .recent_symptoms
        .iter()
        .take(SYMPTOM_TREND_LEN)
        .map(|s| SymptomTrendPoint {
            date: s.date,
            anxiety_level: s.anxiety_level,
            mood: s.mood,
            compulsion_count: s.compulsion_count,
        })
        .collect();
    symptom_trend.reverse();

    let mut by_day: BTreeMap<NaiveDate, HabitTrendPoint> = BTreeMap::new();
    for log in logs.iter().filter(|l| l.habit_id.is_some()) {
        let point = by_day.entry(log.date).or_insert(HabitTrendPoint {
            date: log.date,
            completed: 0,
            total: 0,
        });
        point.total += 1;
        if log.completed {
            point.completed += 1;
        }
    }

    ProgressStats {
        stats,
        symptom_trend,
        habit_trend: by_day.into_values().collect(),
    }
}
