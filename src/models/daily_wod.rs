// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily WOD log entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Accepted result types for a logged WOD.
pub const RESULT_TYPES: [&str; 6] = [
    "For Time",
    "AMRAP",
    "Weight",
    "Rounds+Reps",
    "Distance",
    "Reps",
];

/// A logged daily WOD result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyWod {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub workout_id: Option<String>,
    pub result_type: String,
    pub score: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for logging a WOD.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DailyWodInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub workout_id: Option<String>,
    #[validate(custom(function = "validate_result_type"))]
    pub result_type: String,
    #[validate(length(min = 1, max = 100, message = "score must not be empty"))]
    pub score: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn validate_result_type(value: &str) -> Result<(), ValidationError> {
    if RESULT_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_result_type"))
    }
}
