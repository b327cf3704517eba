use async_trait::async_trait;

use super::errors::AssignmentError;
use super::models::Assignment;
use super::models::AssignmentUpdate;
use super::models::ClientId;
use crate::domain::identity::models::IdentityId;

/// Persistence operations for case assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync + 'static {
    /// Persist a fresh assignment for the pair.
    ///
    /// The check for an existing pair and the insert are one atomic step.
    ///
    /// # Errors
    /// * `ClientNotFound` - Client does not exist
    /// * `CaseWorkerNotFound` - Case worker does not exist
    /// * `AlreadyExists` - The pair is already assigned
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Assignment, AssignmentError>;

    /// Apply a partial update to the pair's assignment in one step.
    ///
    /// # Errors
    /// * `NotFound` - No assignment exists for the pair
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
        update: AssignmentUpdate,
    ) -> Result<Assignment, AssignmentError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Option<Assignment>, AssignmentError>;

    /// All assignments of a client, ordered by case worker id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_client(&self, client_id: ClientId)
        -> Result<Vec<Assignment>, AssignmentError>;
}
