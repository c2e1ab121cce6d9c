// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod daily_wod;
pub mod exercise;
pub mod feed;
pub mod pr;
pub mod stats;
pub mod user;
pub mod workout;

pub use daily_wod::{DailyWod, DailyWodInput};
pub use exercise::{Exercise, ExerciseInput};
pub use feed::{ActivityEvent, ActivityFeed, ActivityKind, SourceWarning};
pub use pr::{ExerciseRef, PersonalRecord, PersonalRecordInput, PersonalRecordWithExercise};
pub use stats::{
    DashboardSummary, ExerciseProgress, MonthCount, MonthlyProgress, PrInsights, PrSummary,
    ProgressPoint,
};
pub use user::UserId;
pub use workout::{CompletedSession, Workout, WorkoutInput};
