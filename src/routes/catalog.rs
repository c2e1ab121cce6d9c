// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise catalog and workout routes.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{Exercise, ExerciseInput, Workout, WorkoutInput};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/api/exercises/{id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            put(update_workout).delete(delete_workout),
        )
}

// ─── Exercises ───────────────────────────────────────────────

/// Shared catalog plus the user's own exercises, by name.
async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.db.list_exercises(&user.user_id).await?))
}

async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    Ok(Json(state.db.get_exercise(&user.user_id, &id).await?))
}

async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ExerciseInput>,
) -> Result<(StatusCode, Json<Exercise>)> {
    input.validate()?;
    let exercise = state.db.create_exercise(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<ExerciseInput>,
) -> Result<Json<Exercise>> {
    input.validate()?;
    Ok(Json(
        state.db.update_exercise(&user.user_id, &id, input).await?,
    ))
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_exercise(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Workouts ────────────────────────────────────────────────

/// The user's workouts, most recently scheduled first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Workout>>> {
    Ok(Json(state.db.list_workouts(&user.user_id).await?))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<WorkoutInput>,
) -> Result<(StatusCode, Json<Workout>)> {
    input.validate()?;
    let workout = state.db.create_workout(&user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<WorkoutInput>,
) -> Result<Json<Workout>> {
    input.validate()?;
    Ok(Json(state.db.update_workout(&user.user_id, &id, input).await?))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_workout(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
