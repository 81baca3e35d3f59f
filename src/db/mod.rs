//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::AppError;
use crate::models::ActivityRecord;
use std::future::Future;

/// Collection names as constants.
pub mod collections {
    /// Activity records (keyed by subject_id)
    pub const ACTIVITY: &str = "activity";
}

/// Read side of the central activity store, as seen by the sweep.
pub trait ActivityStore: Send + Sync {
    /// Every tracked record, in one pass.
    fn list_activity_records(
        &self,
    ) -> impl Future<Output = Result<Vec<ActivityRecord>, AppError>> + Send;
}
