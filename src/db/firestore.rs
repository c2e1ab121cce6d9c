// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Exercises (shared catalog plus user-owned entries)
//! - Workouts (templates and scheduled workouts)
//! - PRs (personal records)
//! - User workouts (completed sessions)
//! - Daily WODs (logged results)

use std::collections::{HashMap, HashSet};

use futures_util::{stream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::collections;
use crate::db::FitnessStore;
use crate::error::AppError;
use crate::models::{
    CompletedSession, DailyWod, DailyWodInput, Exercise, ExerciseInput, ExerciseRef,
    PersonalRecord, PersonalRecordInput, PersonalRecordWithExercise, UserId, Workout,
    WorkoutInput,
};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Descending sort on one field for user-scoped listings.
#[derive(Clone, Copy)]
enum Order {
    Desc(&'static str),
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Emulator: use an unauthenticated connection so no local
        // credentials are picked up.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Helpers ───────────────────────────────────────────

    /// Query documents owned by `user_id`, decoding one document at a time.
    async fn query_for_user<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        user_id: &UserId,
        order: Option<Order>,
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        let uid = user_id.as_str();
        let mut query = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(|q| q.for_all([q.field("user_id").eq(uid)]));

        // Nulls sort lowest, so descending puts undated rows last.
        if let Some(Order::Desc(field)) = order {
            query = query.order_by([(field, firestore::FirestoreQueryDirection::Descending)]);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let docs = query
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(decode_rows(collection, &docs))
    }

    async fn get_by_id<T: DeserializeOwned + Send>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put<T: Serialize + DeserializeOwned + Send + Sync>(
        &self,
        collection: &'static str,
        id: &str,
        object: &T,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, collection: &'static str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Exercises visible to the user: their own plus the shared catalog,
    /// ordered by name.
    pub async fn list_exercises(&self, user_id: &UserId) -> Result<Vec<Exercise>, AppError> {
        let client = self.get_client()?;

        let shared = async {
            client
                .fluent()
                .select()
                .from(collections::EXERCISES)
                .filter(|q| q.for_all([q.field("user_id").is_null()]))
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        };
        let own = self.query_for_user::<Exercise>(collections::EXERCISES, user_id, None, None);

        let (shared_docs, mut exercises) = tokio::try_join!(shared, own)?;
        exercises.extend(decode_rows::<Exercise>(collections::EXERCISES, &shared_docs));
        exercises.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(exercises)
    }

    /// A single exercise, if it is shared or owned by the user.
    pub async fn get_exercise(
        &self,
        user_id: &UserId,
        exercise_id: &str,
    ) -> Result<Exercise, AppError> {
        match self
            .get_by_id::<Exercise>(collections::EXERCISES, exercise_id)
            .await?
        {
            Some(e) if is_visible_to(e.user_id.as_deref(), user_id) => Ok(e),
            _ => Err(AppError::NotFound(format!(
                "Exercise {} not found",
                exercise_id
            ))),
        }
    }

    pub async fn create_exercise(
        &self,
        user_id: &UserId,
        input: ExerciseInput,
    ) -> Result<Exercise, AppError> {
        let exercise = Exercise {
            id: new_document_id(),
            user_id: Some(user_id.to_string()),
            name: input.name.trim().to_string(),
            exercise_type: non_blank(input.exercise_type),
            description: non_blank(input.description),
            created_at: Some(chrono::Utc::now()),
        };
        self.put(collections::EXERCISES, &exercise.id, &exercise)
            .await?;
        tracing::info!(user_id = %user_id, exercise_id = %exercise.id, "Exercise created");
        Ok(exercise)
    }

    /// Update an exercise the user owns. Shared exercises are read-only.
    pub async fn update_exercise(
        &self,
        user_id: &UserId,
        exercise_id: &str,
        input: ExerciseInput,
    ) -> Result<Exercise, AppError> {
        let mut exercise: Exercise = self
            .get_owned(collections::EXERCISES, exercise_id, user_id, |e: &Exercise| {
                e.user_id.as_deref()
            })
            .await?;

        exercise.name = input.name.trim().to_string();
        exercise.exercise_type = non_blank(input.exercise_type);
        exercise.description = non_blank(input.description);

        self.put(collections::EXERCISES, &exercise.id, &exercise)
            .await?;
        Ok(exercise)
    }

    pub async fn delete_exercise(&self, user_id: &UserId, exercise_id: &str) -> Result<(), AppError> {
        let _: Exercise = self
            .get_owned(collections::EXERCISES, exercise_id, user_id, |e: &Exercise| {
                e.user_id.as_deref()
            })
            .await?;
        self.remove(collections::EXERCISES, exercise_id).await?;
        tracing::info!(user_id = %user_id, exercise_id, "Exercise deleted");
        Ok(())
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// The user's workouts, by scheduled date descending (unscheduled last).
    pub async fn list_workouts(&self, user_id: &UserId) -> Result<Vec<Workout>, AppError> {
        self.query_for_user(
            collections::WORKOUTS,
            user_id,
            Some(Order::Desc("date")),
            None,
        )
        .await
    }

    /// A single workout, if it is shared or owned by the user.
    pub async fn get_workout(
        &self,
        user_id: &UserId,
        workout_id: &str,
    ) -> Result<Workout, AppError> {
        match self
            .get_by_id::<Workout>(collections::WORKOUTS, workout_id)
            .await?
        {
            Some(w) if is_visible_to(w.user_id.as_deref(), user_id) => Ok(w),
            _ => Err(AppError::NotFound(format!(
                "Workout {} not found",
                workout_id
            ))),
        }
    }

    pub async fn create_workout(
        &self,
        user_id: &UserId,
        input: WorkoutInput,
    ) -> Result<Workout, AppError> {
        let workout = Workout {
            id: new_document_id(),
            user_id: Some(user_id.to_string()),
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            date: input.date,
            duration_minutes: input.duration_minutes,
            created_at: Some(chrono::Utc::now()),
        };
        self.put(collections::WORKOUTS, &workout.id, &workout).await?;
        tracing::info!(user_id = %user_id, workout_id = %workout.id, "Workout created");
        Ok(workout)
    }

    pub async fn update_workout(
        &self,
        user_id: &UserId,
        workout_id: &str,
        input: WorkoutInput,
    ) -> Result<Workout, AppError> {
        let mut workout: Workout = self
            .get_owned(collections::WORKOUTS, workout_id, user_id, |w: &Workout| {
                w.user_id.as_deref()
            })
            .await?;

        workout.name = input.name.trim().to_string();
        workout.description = non_blank(input.description);
        workout.date = input.date;
        workout.duration_minutes = input.duration_minutes;

        self.put(collections::WORKOUTS, &workout.id, &workout).await?;
        Ok(workout)
    }

    pub async fn delete_workout(&self, user_id: &UserId, workout_id: &str) -> Result<(), AppError> {
        let _: Workout = self
            .get_owned(collections::WORKOUTS, workout_id, user_id, |w: &Workout| {
                w.user_id.as_deref()
            })
            .await?;
        self.remove(collections::WORKOUTS, workout_id).await?;
        tracing::info!(user_id = %user_id, workout_id, "Workout deleted");
        Ok(())
    }

    // ─── PR Operations ───────────────────────────────────────────

    /// The user's PRs (newest first) joined with their exercise name/type.
    ///
    /// Exercises are fetched concurrently by ID; a PR whose exercise no
    /// longer exists gets `exercise: None`.
    pub async fn list_prs_with_exercises(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PersonalRecordWithExercise>, AppError> {
        let prs: Vec<PersonalRecord> = self
            .query_for_user(
                collections::PRS,
                user_id,
                Some(Order::Desc("date_achieved")),
                None,
            )
            .await?;

        let exercise_ids: HashSet<String> =
            prs.iter().filter_map(|pr| pr.exercise_id.clone()).collect();

        let exercises: HashMap<String, ExerciseRef> = stream::iter(exercise_ids)
            .map(|id| async move {
                let exercise: Option<Exercise> =
                    self.get_by_id(collections::EXERCISES, &id).await?;
                Ok::<_, AppError>(exercise.map(|e| {
                    (
                        id,
                        ExerciseRef {
                            name: e.name,
                            exercise_type: e.exercise_type,
                        },
                    )
                }))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<_, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, AppError>>()?
            .into_iter()
            .flatten()
            .collect();

        Ok(prs
            .into_iter()
            .map(|record| {
                let exercise = record
                    .exercise_id
                    .as_ref()
                    .and_then(|id| exercises.get(id).cloned());
                PersonalRecordWithExercise { record, exercise }
            })
            .collect())
    }

    pub async fn create_pr(
        &self,
        user_id: &UserId,
        input: PersonalRecordInput,
    ) -> Result<PersonalRecord, AppError> {
        // PRs may only reference exercises the user can see
        self.get_exercise(user_id, &input.exercise_id).await?;

        let record = PersonalRecord {
            id: new_document_id(),
            user_id: Some(user_id.to_string()),
            exercise_id: Some(input.exercise_id),
            value: Some(input.value),
            unit: non_blank(input.unit),
            date_achieved: input.date_achieved,
            notes: non_blank(input.notes),
        };
        self.put(collections::PRS, &record.id, &record).await?;
        tracing::info!(user_id = %user_id, pr_id = %record.id, "PR recorded");
        Ok(record)
    }

    pub async fn delete_pr(&self, user_id: &UserId, pr_id: &str) -> Result<(), AppError> {
        let _: PersonalRecord = self
            .get_owned(collections::PRS, pr_id, user_id, |pr: &PersonalRecord| {
                pr.user_id.as_deref()
            })
            .await?;
        self.remove(collections::PRS, pr_id).await?;
        tracing::info!(user_id = %user_id, pr_id, "PR deleted");
        Ok(())
    }

    // ─── Daily WOD Operations ────────────────────────────────────

    pub async fn log_daily_wod(
        &self,
        user_id: &UserId,
        input: DailyWodInput,
    ) -> Result<DailyWod, AppError> {
        let workout_id = non_blank(input.workout_id);
        if let Some(workout_id) = &workout_id {
            self.get_workout(user_id, workout_id).await?;
        }

        let wod = DailyWod {
            id: new_document_id(),
            user_id: user_id.to_string(),
            date: input.date,
            workout_id,
            result_type: input.result_type,
            score: input.score.trim().to_string(),
            notes: non_blank(input.notes),
            created_at: chrono::Utc::now(),
        };
        self.put(collections::DAILY_WODS, &wod.id, &wod).await?;
        tracing::info!(user_id = %user_id, wod_id = %wod.id, date = %wod.date, "Daily WOD logged");
        Ok(wod)
    }

    /// Logged WODs, most recent first.
    pub async fn list_daily_wods(&self, user_id: &UserId) -> Result<Vec<DailyWod>, AppError> {
        self.query_for_user(
            collections::DAILY_WODS,
            user_id,
            Some(Order::Desc("date")),
            None,
        )
        .await
    }

    /// Fetch a document and check that `user_id` owns it.
    ///
    /// Documents owned by someone else (or shared) are reported as missing.
    async fn get_owned<T, F>(
        &self,
        collection: &'static str,
        id: &str,
        user_id: &UserId,
        owner: F,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send,
        F: Fn(&T) -> Option<&str>,
    {
        match self.get_by_id::<T>(collection, id).await? {
            Some(doc) if owner(&doc) == Some(user_id.as_str()) => Ok(doc),
            Some(_) => {
                tracing::warn!(user_id = %user_id, collection, id, "Rejected access to unowned document");
                Err(AppError::NotFound(format!("{} not found", id)))
            }
            None => Err(AppError::NotFound(format!("{} not found", id))),
        }
    }
}

impl FitnessStore for FirestoreDb {
    async fn list_recent_prs(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<PersonalRecord>, AppError> {
        self.query_for_user(
            collections::PRS,
            user_id,
            Some(Order::Desc("date_achieved")),
            Some(limit),
        )
        .await
    }

    async fn list_recent_completed_sessions(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<CompletedSession>, AppError> {
        self.query_for_user(
            collections::USER_WORKOUTS,
            user_id,
            Some(Order::Desc("date_completed")),
            Some(limit),
        )
        .await
    }

    async fn list_recent_created_workouts(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Workout>, AppError> {
        self.query_for_user(
            collections::WORKOUTS,
            user_id,
            Some(Order::Desc("created_at")),
            Some(limit),
        )
        .await
    }

    async fn list_recent_created_exercises(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Exercise>, AppError> {
        self.query_for_user(
            collections::EXERCISES,
            user_id,
            Some(Order::Desc("created_at")),
            Some(limit),
        )
        .await
    }

    async fn list_workouts_for_user(&self, user_id: &UserId) -> Result<Vec<Workout>, AppError> {
        self.query_for_user(collections::WORKOUTS, user_id, None, None)
            .await
    }

    async fn list_prs_for_user(&self, user_id: &UserId) -> Result<Vec<PersonalRecord>, AppError> {
        self.query_for_user(collections::PRS, user_id, None, None)
            .await
    }
}

/// Decode documents into typed rows, skipping (and logging) any that are
/// missing required fields.
fn decode_rows<T: DeserializeOwned>(
    collection: &str,
    docs: &[firestore::FirestoreDocument],
) -> Vec<T> {
    docs.iter()
        .filter_map(
            |doc| match firestore::FirestoreDb::deserialize_doc_to::<T>(doc) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!(
                        collection,
                        document = %doc.name,
                        error = %e,
                        "Skipping malformed document"
                    );
                    None
                }
            },
        )
        .collect()
}

/// Shared catalog entries have no owner.
fn is_visible_to(owner: Option<&str>, user_id: &UserId) -> bool {
    match owner {
        None => true,
        Some(owner) => owner == user_id.as_str(),
    }
}

fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Treat blank optional text as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
