// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard API routes for authenticated users.

use crate::db::FitnessStore;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{ActivityFeed, DashboardSummary};
use crate::services::{build_activity_feed, dashboard_summary};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Dashboard routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/dashboard/feed", get(get_feed))
        .route("/api/dashboard/summary", get(get_summary))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: Option<String>,
}

/// Identity of the session holder, straight from the verified token.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        user_id: user.user_id.to_string(),
        email: user.email,
    })
}

// ─── Activity Feed ───────────────────────────────────────────

/// Recent activity across PRs, sessions, workouts and exercises.
///
/// Partial source failures are reported in `warnings`; only a total failure
/// is an error (503).
async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ActivityFeed>> {
    let feed = build_activity_feed(&state.db, &user.user_id, state.config.feed_limits).await?;

    if !feed.warnings.is_empty() {
        tracing::warn!(
            user_id = %user.user_id,
            failed_sources = feed.warnings.len(),
            "Serving partial activity feed"
        );
    }

    Ok(Json(feed))
}

// ─── Stat Cards ──────────────────────────────────────────────

/// Today's WOD, month-over-month progress and PR overview.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardSummary>> {
    let (workouts, prs) = tokio::try_join!(
        state.db.list_workouts_for_user(&user.user_id),
        state.db.list_prs_for_user(&user.user_id),
    )?;

    let now = chrono::Utc::now();
    tracing::debug!(
        user_id = %user.user_id,
        workouts = workouts.len(),
        prs = prs.len(),
        now = %format_utc_rfc3339(now),
        "Computing dashboard summary"
    );

    Ok(Json(dashboard_summary(&workouts, &prs, now)))
}
