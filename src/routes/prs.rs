// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal record routes.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{
    ExerciseProgress, PersonalRecord, PersonalRecordInput, PersonalRecordWithExercise,
    PrInsights,
};
use crate::services::pr_insights;
use crate::services::stats::{exercise_progress, filter_and_sort_prs, PrQuery};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Longest accepted search string.
const MAX_SEARCH_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/prs", get(list_prs).post(create_pr))
        .route("/api/prs/insights", get(get_insights))
        .route("/api/prs/{id}", delete(delete_pr))
}

/// Filtered and sorted PR table.
async fn list_prs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PrQuery>,
) -> Result<Json<Vec<PersonalRecordWithExercise>>> {
    if query
        .search
        .as_deref()
        .is_some_and(|s| s.chars().count() > MAX_SEARCH_LEN)
    {
        return Err(crate::error::AppError::BadRequest(format!(
            "'search' must be at most {} characters",
            MAX_SEARCH_LEN
        )));
    }

    let prs = state.db.list_prs_with_exercises(&user.user_id).await?;
    Ok(Json(filter_and_sort_prs(prs, &query)))
}

/// PR insights response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PrInsightsResponse {
    #[serde(flatten)]
    pub insights: PrInsights,
    /// Per-exercise history, for exercises with more than one PR
    pub progress: Vec<ExerciseProgress>,
}

async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PrInsightsResponse>> {
    let joined = state.db.list_prs_with_exercises(&user.user_id).await?;
    let records: Vec<PersonalRecord> = joined.iter().map(|p| p.record.clone()).collect();

    Ok(Json(PrInsightsResponse {
        insights: pr_insights(&records, chrono::Utc::now()),
        progress: exercise_progress(&joined),
    }))
}

async fn create_pr(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<PersonalRecordInput>,
) -> Result<(StatusCode, Json<PersonalRecord>)> {
    input.validate()?;
    let record = state.db.create_pr(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_pr(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_pr(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
