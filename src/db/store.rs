// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read contract used by the activity aggregator.
//!
//! Every method is scoped to one user. An empty result is an empty `Vec`;
//! failures are transport or authorization errors from the backing store.

use std::future::Future;

use crate::error::AppError;
use crate::models::{CompletedSession, Exercise, PersonalRecord, UserId, Workout};

pub trait FitnessStore: Send + Sync {
    /// Most recent PRs, by achieved date descending (undated last).
    fn list_recent_prs(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<PersonalRecord>, AppError>> + Send;

    /// Most recent completed sessions, by completion date descending
    /// (undated last).
    fn list_recent_completed_sessions(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CompletedSession>, AppError>> + Send;

    /// Most recently created workouts owned by the user.
    fn list_recent_created_workouts(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Workout>, AppError>> + Send;

    /// Most recently created exercises owned by the user.
    fn list_recent_created_exercises(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Exercise>, AppError>> + Send;

    /// All of the user's workouts, in any order.
    fn list_workouts_for_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Workout>, AppError>> + Send;

    /// All of the user's PRs, in any order.
    fn list_prs_for_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<PersonalRecord>, AppError>> + Send;
}
