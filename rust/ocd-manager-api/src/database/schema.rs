//! SQLite schema for the record store.
//!
//! Ownership is enforced per query, not by the schema. The foreign keys only
//! express lifecycle: rows owned by a user go away with the user, and progress
//! logs survive deletion of the habit or exercise they point at.

/// Idempotent DDL applied when the store is opened.
pub const SQLITE_SCHEMA: &str = r"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Habits table
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    category TEXT NOT NULL DEFAULT 'general',
    target_frequency TEXT NOT NULL DEFAULT 'daily',
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);

-- Symptoms table
CREATE TABLE IF NOT EXISTS symptoms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    anxiety_level INTEGER NOT NULL CHECK (anxiety_level BETWEEN 0 AND 10),
    compulsion_count INTEGER NOT NULL DEFAULT 0,
    compulsion_duration INTEGER NOT NULL DEFAULT 0,
    intrusive_thought_frequency TEXT NOT NULL DEFAULT 'none',
    resistance_level INTEGER NOT NULL DEFAULT 5,
    mood TEXT NOT NULL DEFAULT 'neutral',
    notes TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_symptoms_user_date ON symptoms(user_id, date DESC);

-- Exercises table (user_id NULL for shared exercises)
CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty INTEGER NOT NULL DEFAULT 1 CHECK (difficulty BETWEEN 1 AND 5),
    estimated_minutes INTEGER NOT NULL DEFAULT 15,
    instructions TEXT,
    is_system_exercise INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_exercises_user ON exercises(user_id);

-- Progress logs table
CREATE TABLE IF NOT EXISTS progress_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    habit_id INTEGER REFERENCES habits(id) ON DELETE SET NULL,
    exercise_id INTEGER REFERENCES exercises(id) ON DELETE SET NULL,
    date TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    anxiety_before INTEGER CHECK (anxiety_before BETWEEN 0 AND 10),
    anxiety_after INTEGER CHECK (anxiety_after BETWEEN 0 AND 10),
    duration_minutes REAL,
    notes TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_progress_user_date ON progress_logs(user_id, date DESC);
CREATE INDEX IF NOT EXISTS idx_progress_habit ON progress_logs(habit_id) WHERE habit_id IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_progress_exercise ON progress_logs(exercise_id) WHERE exercise_id IS NOT NULL;
";
