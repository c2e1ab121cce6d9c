// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wod_tracker::config::Config;
use wod_tracker::db::{FirestoreDb, FitnessStore};
use wod_tracker::error::AppError;
use wod_tracker::middleware::auth::create_jwt;
use wod_tracker::models::{
    ActivityKind, CompletedSession, Exercise, PersonalRecord, UserId, Workout,
};
use wod_tracker::routes::create_router;
use wod_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with an offline database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: FirestoreDb::new_mock(),
    });

    (create_router(state.clone()), state)
}

/// Session token accepted by the test app.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str) -> String {
    let config = Config::test_default();
    create_jwt(user_id, &config.jwt_secret, &config.jwt_audience).unwrap()
}

// ─── In-memory store ─────────────────────────────────────────

/// Fixture-backed store. Rows are returned in the order given, capped at
/// `limit`; sources listed in `failing` return a database error.
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryStore {
    pub prs: Vec<PersonalRecord>,
    pub sessions: Vec<CompletedSession>,
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
    pub failing: HashSet<ActivityKind>,
    pub reads: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn failing(mut self, kind: ActivityKind) -> Self {
        self.failing.insert(kind);
        self
    }

    fn read<T: Clone>(
        &self,
        kind: ActivityKind,
        rows: &[T],
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&kind) {
            return Err(AppError::Database(format!("{} unavailable", kind)));
        }
        let take = limit.map_or(rows.len(), |l| l as usize);
        Ok(rows.iter().take(take).cloned().collect())
    }
}

impl FitnessStore for MemoryStore {
    async fn list_recent_prs(
        &self,
        _user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<PersonalRecord>, AppError> {
        self.read(ActivityKind::Pr, &self.prs, Some(limit))
    }

    async fn list_recent_completed_sessions(
        &self,
        _user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<CompletedSession>, AppError> {
        self.read(ActivityKind::Workout, &self.sessions, Some(limit))
    }

    async fn list_recent_created_workouts(
        &self,
        _user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Workout>, AppError> {
        self.read(ActivityKind::CreatedWorkout, &self.workouts, Some(limit))
    }

    async fn list_recent_created_exercises(
        &self,
        _user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Exercise>, AppError> {
        self.read(ActivityKind::CreatedExercise, &self.exercises, Some(limit))
    }

    async fn list_workouts_for_user(&self, _user_id: &UserId) -> Result<Vec<Workout>, AppError> {
        self.read(ActivityKind::CreatedWorkout, &self.workouts, None)
    }

    async fn list_prs_for_user(&self, _user_id: &UserId) -> Result<Vec<PersonalRecord>, AppError> {
        self.read(ActivityKind::Pr, &self.prs, None)
    }
}

// ─── Fixture builders ────────────────────────────────────────

#[allow(dead_code)]
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[allow(dead_code)]
pub fn pr(
    id: &str,
    exercise_id: Option<&str>,
    value: f64,
    date: Option<(i32, u32, u32)>,
    notes: Option<&str>,
) -> PersonalRecord {
    PersonalRecord {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        exercise_id: exercise_id.map(String::from),
        value: Some(value),
        unit: Some("kg".to_string()),
        date_achieved: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        notes: notes.map(String::from),
    }
}

#[allow(dead_code)]
pub fn session(
    id: &str,
    completed: Option<DateTime<Utc>>,
    score: Option<f64>,
    notes: &str,
) -> CompletedSession {
    CompletedSession {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        workout_id: None,
        date_completed: completed,
        performance_score: score,
        notes: Some(notes.to_string()),
    }
}

#[allow(dead_code)]
pub fn workout(
    id: &str,
    name: &str,
    date: Option<(i32, u32, u32)>,
    duration_minutes: Option<u32>,
    created_at: Option<DateTime<Utc>>,
) -> Workout {
    Workout {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        name: name.to_string(),
        description: None,
        date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        duration_minutes,
        created_at,
    }
}

#[allow(dead_code)]
pub fn exercise(id: &str, name: &str, created_at: Option<DateTime<Utc>>) -> Exercise {
    Exercise {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        name: name.to_string(),
        exercise_type: None,
        description: None,
        created_at,
    }
}

#[allow(dead_code)]
pub fn user() -> UserId {
    UserId::new("user-1").unwrap()
}
