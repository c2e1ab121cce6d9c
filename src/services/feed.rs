// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity feed aggregation.
//!
//! Handles the dashboard feed workflow:
//! 1. Read the four feed sources concurrently (PRs, completed sessions,
//!    created workouts, created exercises)
//! 2. Normalize each row into an [`ActivityEvent`]
//! 3. Merge, order newest first, and truncate
//!
//! A failing source contributes no events and a [`SourceWarning`]; the feed
//! only fails when every source fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::db::FitnessStore;
use crate::error::{AppError, Result};
use crate::models::{
    ActivityEvent, ActivityFeed, ActivityKind, CompletedSession, Exercise, PersonalRecord,
    SourceWarning, UserId, Workout,
};
use crate::time_utils::date_at_midnight;

/// Characters of an exercise description shown in the feed.
const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// Bounds for one feed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLimits {
    /// Rows read from each source
    pub per_source: u32,
    /// Events kept after merging
    pub total: u32,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            per_source: 3,
            total: 6,
        }
    }
}

/// Build the activity feed for `user_id`.
///
/// The four reads run concurrently and are all awaited; a failed read is
/// reported in `warnings`. Returns [`AppError::TotalFailure`] only if all
/// four fail.
pub async fn build_activity_feed<S: FitnessStore>(
    store: &S,
    user_id: &UserId,
    limits: FeedLimits,
) -> Result<ActivityFeed> {
    tracing::debug!(
        user_id = %user_id,
        per_source = limits.per_source,
        total = limits.total,
        "Building activity feed"
    );

    let (prs, sessions, workouts, exercises) = tokio::join!(
        store.list_recent_prs(user_id, limits.per_source),
        store.list_recent_completed_sessions(user_id, limits.per_source),
        store.list_recent_created_workouts(user_id, limits.per_source),
        store.list_recent_created_exercises(user_id, limits.per_source),
    );

    let mut collector = Collector::default();
    collector.add(ActivityKind::Pr, prs, pr_event);
    collector.add(ActivityKind::Workout, sessions, session_event);
    collector.add(ActivityKind::CreatedWorkout, workouts, created_workout_event);
    collector.add(ActivityKind::CreatedExercise, exercises, created_exercise_event);

    if collector.warnings.len() == SOURCE_COUNT {
        let detail = collector
            .warnings
            .iter()
            .map(|w| format!("{}: {}", w.source, w.message))
            .collect::<Vec<_>>()
            .join("; ");
        tracing::error!(user_id = %user_id, "Every activity feed source failed");
        return Err(AppError::TotalFailure(detail));
    }

    let events = merge_events(collector.events, limits.total as usize);

    tracing::debug!(
        user_id = %user_id,
        events = events.len(),
        warnings = collector.warnings.len(),
        "Activity feed built"
    );

    Ok(ActivityFeed {
        events,
        warnings: collector.warnings,
    })
}

const SOURCE_COUNT: usize = 4;

/// Accumulates events in source-fetch order and records failed sources.
#[derive(Default)]
struct Collector {
    events: Vec<ActivityEvent>,
    warnings: Vec<SourceWarning>,
}

impl Collector {
    fn add<T>(
        &mut self,
        source: ActivityKind,
        result: Result<Vec<T>>,
        normalize: fn(&T) -> ActivityEvent,
    ) {
        match result {
            Ok(rows) => self.events.extend(rows.iter().map(normalize)),
            Err(e) => {
                tracing::warn!(%source, error = %e, "Activity feed source unavailable");
                self.warnings.push(SourceWarning {
                    source,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Order events newest first and keep at most `total`.
///
/// Events without a timestamp sort as if they happened at the Unix epoch.
/// The sort is stable, so equal timestamps keep source-fetch order.
pub fn merge_events(mut events: Vec<ActivityEvent>, total: usize) -> Vec<ActivityEvent> {
    events.sort_by_key(|e| Reverse(e.occurred_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)));
    events.truncate(total);
    events
}

fn event(kind: ActivityKind, detail: String, occurred_at: Option<DateTime<Utc>>) -> ActivityEvent {
    ActivityEvent {
        kind,
        title: kind.title().to_string(),
        detail,
        occurred_at,
    }
}

/// "100 kg (Sin notas)"
pub fn pr_event(pr: &PersonalRecord) -> ActivityEvent {
    let notes = pr
        .notes
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("Sin notas");
    event(
        ActivityKind::Pr,
        format!("{} ({})", pr.display_value(), notes),
        pr.date_achieved.map(date_at_midnight),
    )
}

/// "85 pts · Fran unbroken"; the score prefix is dropped when absent or zero.
pub fn session_event(session: &CompletedSession) -> ActivityEvent {
    let mut detail = String::new();
    if let Some(score) = session.performance_score.filter(|s| *s != 0.0) {
        detail.push_str(&format!("{} pts · ", score));
    }
    if let Some(notes) = &session.notes {
        detail.push_str(notes);
    }
    event(ActivityKind::Workout, detail, session.date_completed)
}

pub fn created_workout_event(workout: &Workout) -> ActivityEvent {
    event(
        ActivityKind::CreatedWorkout,
        workout.name.clone(),
        workout.created_at,
    )
}

/// "Back Squat - {first 50 chars}..."; the ellipsis only when truncated.
pub fn created_exercise_event(exercise: &Exercise) -> ActivityEvent {
    let detail = match exercise.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => {
            let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            let truncated = description.chars().count() > DESCRIPTION_PREVIEW_CHARS;
            format!(
                "{} - {}{}",
                exercise.name,
                preview,
                if truncated { "..." } else { "" }
            )
        }
        None => exercise.name.clone(),
    };
    event(ActivityKind::CreatedExercise, detail, exercise.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn exercise(description: Option<&str>) -> Exercise {
        Exercise {
            id: "ex-1".to_string(),
            user_id: Some("u1".to_string()),
            name: "Back Squat".to_string(),
            exercise_type: Some("Fuerza".to_string()),
            description: description.map(String::from),
            created_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()),
        }
    }

    fn at(day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap())
    }

    fn plain(detail: &str, occurred_at: Option<DateTime<Utc>>) -> ActivityEvent {
        event(ActivityKind::CreatedWorkout, detail.to_string(), occurred_at)
    }

    #[test]
    fn test_pr_event_with_unit_and_notes() {
        let pr = PersonalRecord {
            id: "pr-1".to_string(),
            user_id: Some("u1".to_string()),
            exercise_id: Some("ex-1".to_string()),
            value: Some(120.0),
            unit: Some("kg".to_string()),
            date_achieved: NaiveDate::from_ymd_opt(2024, 3, 1),
            notes: Some("belt".to_string()),
        };
        let e = pr_event(&pr);
        assert_eq!(e.title, "Nuevo PR");
        assert_eq!(e.detail, "120 kg (belt)");
        assert_eq!(
            e.occurred_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_pr_event_without_notes() {
        let pr = PersonalRecord {
            id: "pr-2".to_string(),
            user_id: None,
            exercise_id: None,
            value: Some(42.5),
            unit: None,
            date_achieved: None,
            notes: Some(String::new()),
        };
        let e = pr_event(&pr);
        assert_eq!(e.detail, "42.5 (Sin notas)");
        assert_eq!(e.occurred_at, None);
    }

    #[test]
    fn test_session_event_detail() {
        let mut session = CompletedSession {
            id: "s1".to_string(),
            user_id: Some("u1".to_string()),
            workout_id: None,
            date_completed: at(2),
            performance_score: Some(85.0),
            notes: Some("Fran unbroken".to_string()),
        };
        assert_eq!(session_event(&session).detail, "85 pts · Fran unbroken");

        session.performance_score = Some(0.0);
        assert_eq!(session_event(&session).detail, "Fran unbroken");

        session.performance_score = None;
        session.notes = None;
        assert_eq!(session_event(&session).detail, "");
        assert_eq!(session_event(&session).title, "WOD completado");
    }

    #[test]
    fn test_created_exercise_short_description() {
        let e = created_exercise_event(&exercise(Some("Sentadilla trasera")));
        assert_eq!(e.title, "Ejercicio creado");
        assert_eq!(e.detail, "Back Squat - Sentadilla trasera");
    }

    #[test]
    fn test_created_exercise_truncates_at_fifty_chars() {
        let exact = "a".repeat(50);
        let e = created_exercise_event(&exercise(Some(&exact)));
        assert_eq!(e.detail, format!("Back Squat - {}", exact));

        let long = format!("{}bcd", "a".repeat(50));
        let e = created_exercise_event(&exercise(Some(&long)));
        assert_eq!(e.detail, format!("Back Squat - {}...", "a".repeat(50)));
    }

    #[test]
    fn test_created_exercise_truncation_counts_chars() {
        let accented = "é".repeat(60);
        let e = created_exercise_event(&exercise(Some(&accented)));
        assert_eq!(e.detail, format!("Back Squat - {}...", "é".repeat(50)));
    }

    #[test]
    fn test_created_exercise_without_description() {
        assert_eq!(created_exercise_event(&exercise(None)).detail, "Back Squat");
        assert_eq!(created_exercise_event(&exercise(Some(""))).detail, "Back Squat");
    }

    #[test]
    fn test_merge_orders_newest_first_and_truncates() {
        let events = vec![plain("a", at(1)), plain("b", at(5)), plain("c", at(3))];
        let merged = merge_events(events, 2);
        let details: Vec<_> = merged.iter().map(|e| e.detail.as_str()).collect();
        assert_eq!(details, vec!["b", "c"]);
    }

    #[test]
    fn test_merge_missing_timestamp_sorts_last() {
        let events = vec![plain("undated", None), plain("dated", at(1))];
        let merged = merge_events(events, 6);
        assert_eq!(merged[0].detail, "dated");
        assert_eq!(merged[1].detail, "undated");
    }

    #[test]
    fn test_merge_ties_keep_source_order() {
        let events = vec![
            plain("first", at(2)),
            plain("second", at(2)),
            plain("third", at(2)),
        ];
        let merged = merge_events(events, 6);
        let details: Vec<_> = merged.iter().map(|e| e.detail.as_str()).collect();
        assert_eq!(details, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_merge_zero_total() {
        assert!(merge_events(vec![plain("a", at(1))], 0).is_empty());
    }
}
