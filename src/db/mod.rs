//! Database layer (Firestore).

pub mod firestore;
pub mod store;

pub use firestore::FirestoreDb;
pub use store::FitnessStore;

/// Collection names as constants.
pub mod collections {
    pub const EXERCISES: &str = "exercises";
    pub const WORKOUTS: &str = "workouts";
    pub const PRS: &str = "prs";
    /// Completed sessions
    pub const USER_WORKOUTS: &str = "user_workouts";
    pub const DAILY_WODS: &str = "daily_wods";
}
