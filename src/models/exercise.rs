// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Exercise catalog entry. `user_id` is `None` for shared/global exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    /// Document ID
    pub id: String,
    /// Owner, or `None` for the shared catalog
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    /// Free-form type tag (e.g. "Fuerza", "Cardio")
    #[serde(default, rename = "type")]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update payload for an exercise.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExerciseInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default, rename = "type")]
    #[validate(length(max = 60))]
    pub exercise_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
