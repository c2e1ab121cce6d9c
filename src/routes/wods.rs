// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily WOD log routes.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{DailyWod, DailyWodInput};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/wods", get(list_wods).post(log_wod))
}

async fn list_wods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DailyWod>>> {
    Ok(Json(state.db.list_daily_wods(&user.user_id).await?))
}

/// Log today's (or any day's) WOD result.
async fn log_wod(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<DailyWodInput>,
) -> Result<(StatusCode, Json<DailyWod>)> {
    input.validate()?;
    let wod = state.db.log_daily_wod(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(wod)))
}
