// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A personal record for one exercise.
///
/// `value` is only comparable across records sharing a unit; that is not
/// enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub date_achieved: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PersonalRecord {
    /// "102.5 kg", "15", or "-" when no value was recorded.
    pub fn display_value(&self) -> String {
        let value = self
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", value, unit),
            _ => value,
        }
    }
}

/// Name and type of the exercise a record refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseRef {
    pub name: String,
    #[serde(default, rename = "type")]
    pub exercise_type: Option<String>,
}

/// A personal record joined with its exercise, if it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalRecordWithExercise {
    #[serde(flatten)]
    pub record: PersonalRecord,
    pub exercise: Option<ExerciseRef>,
}

impl PersonalRecordWithExercise {
    pub fn exercise_name(&self) -> Option<&str> {
        self.exercise.as_ref().map(|e| e.name.as_str())
    }
}

/// Create payload for a personal record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonalRecordInput {
    #[validate(length(min = 1, max = 64))]
    pub exercise_id: String,
    #[validate(range(min = 0.0))]
    pub value: f64,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    #[serde(default)]
    pub date_achieved: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}
