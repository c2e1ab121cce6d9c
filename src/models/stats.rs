//! Derived dashboard statistics.
//!
//! These are computed per request from fetched snapshots and never stored.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{PersonalRecord, Workout};

/// Month-over-month session comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyProgress {
    pub sessions_this_month: u32,
    pub sessions_last_month: u32,
    /// Signed change vs. last month; 100 when last month had none
    pub progress_percent: i64,
    pub average_duration_minutes: u32,
}

/// Overview of a user's personal records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PrSummary {
    pub total_count: u32,
    /// Distinct non-null exercise references
    pub unique_exercise_count: u32,
    /// Record with the latest achieved date, if any has one
    pub most_recent: Option<PersonalRecord>,
}

/// PR counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthCount {
    /// "YYYY-MM"
    pub month: String,
    pub count: u32,
}

/// Time-based PR analytics for the PR overview page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PrInsights {
    pub summary: PrSummary,
    pub this_year_count: u32,
    /// Achieved within the last three months
    pub recent_count: u32,
    /// Jan..Dec counts for the reference year
    pub per_month_this_year: Vec<u32>,
    /// Chronological counts over the last six months
    pub trend: Vec<MonthCount>,
    /// Years with at least one PR, most recent first
    pub available_years: Vec<i32>,
}

/// Everything the dashboard stat cards need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardSummary {
    /// Workout with the latest scheduled date
    pub today_wod: Option<Workout>,
    pub monthly: MonthlyProgress,
    pub prs: PrSummary,
}

/// One point in an exercise's PR history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressPoint {
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub date: Option<chrono::NaiveDate>,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// PR history of one exercise, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseProgress {
    pub exercise: String,
    pub points: Vec<ProgressPoint>,
}
