//! Derived views over a user's rows.
//!
//! Everything here is a pure function of rows already fetched for one user
//! plus a reference date; the HTTP layer does the fetching.

pub mod dashboard;
pub mod stats;

pub use dashboard::{
    recent_activity, today_snapshot, Activity, ActivityKind, HabitStatus, TodaySnapshot,
    ACTIVITY_SOURCE_LEN,
};
pub use stats::{
    progress_stats, window_start, HabitTrendPoint, PeriodStats, ProgressStats, StatsInput,
    SymptomTrendPoint, SYMPTOM_TREND_LEN,
};

/// Round to one decimal place, halves towards positive infinity.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::round1;

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.666), 3.7);
        assert_eq!(round1(6.0), 6.0);
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(-0.25), -0.2);
    }
}
