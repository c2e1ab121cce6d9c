// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity feed records (derived, never persisted).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which feed source an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// New personal record
    Pr,
    /// Completed session
    Workout,
    CreatedWorkout,
    CreatedExercise,
}

impl ActivityKind {
    /// Fixed, user-facing title for events of this kind.
    pub fn title(self) -> &'static str {
        match self {
            ActivityKind::Pr => "Nuevo PR",
            ActivityKind::Workout => "WOD completado",
            ActivityKind::CreatedWorkout => "Entrenamiento creado",
            ActivityKind::CreatedExercise => "Ejercicio creado",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Pr => "prs",
            ActivityKind::Workout => "completed_sessions",
            ActivityKind::CreatedWorkout => "created_workouts",
            ActivityKind::CreatedExercise => "created_exercises",
        };
        f.write_str(name)
    }
}

/// One normalized entry in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub title: String,
    pub detail: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// A feed source that failed; its events are missing from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SourceWarning {
    pub source: ActivityKind,
    pub message: String,
}

/// Merged, newest-first feed plus warnings for sources that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityFeed {
    pub events: Vec<ActivityEvent>,
    pub warnings: Vec<SourceWarning>,
}

impl ActivityFeed {
    /// True when there is nothing to show ("no activity yet").
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
