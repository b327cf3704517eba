use std::sync::Arc;

use super::errors::AssignmentError;
use super::models::Assignment;
use super::models::AssignmentUpdate;
use super::models::ClientId;
use super::ports::AssignmentRepository;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;

/// Case assignment use cases.
pub struct AssignmentService<AR, IR>
where
    AR: AssignmentRepository,
    IR: IdentityRepository,
{
    assignments: Arc<AR>,
    identities: Arc<IR>,
}

impl<AR, IR> AssignmentService<AR, IR>
where
    AR: AssignmentRepository,
    IR: IdentityRepository,
{
    pub fn new(assignments: Arc<AR>, identities: Arc<IR>) -> Self {
        Self {
            assignments,
            identities,
        }
    }

    /// Assign a client to a case worker with every service off.
    ///
    /// # Errors
    /// * `CaseWorkerNotFound` - No identity with that id
    /// * `ClientNotFound` - No client with that id
    /// * `AlreadyExists` - The pair is already assigned
    /// * `DatabaseError` - Database operation failed
    pub async fn create(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Assignment, AssignmentError> {
        if self.identities.find_by_id(case_worker_id).await?.is_none() {
            return Err(AssignmentError::CaseWorkerNotFound(case_worker_id));
        }

        let assignment = self.assignments.create(client_id, case_worker_id).await?;

        tracing::info!(
            client_id = %client_id,
            case_worker_id = %case_worker_id,
            "Case assigned"
        );

        Ok(assignment)
    }

    /// Update services and success rate of an existing assignment.
    ///
    /// Fields absent from `update` keep their stored value.
    ///
    /// # Errors
    /// * `NotFound` - No assignment exists for the pair
    /// * `DatabaseError` - Database operation failed
    pub async fn update(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
        update: AssignmentUpdate,
    ) -> Result<Assignment, AssignmentError> {
        // Nothing to write: answer from storage without touching `updated_at`.
        if update.is_empty() {
            return self
                .assignments
                .find(client_id, case_worker_id)
                .await?
                .ok_or(AssignmentError::NotFound {
                    client_id,
                    case_worker_id,
                });
        }

        let assignment = self
            .assignments
            .update(client_id, case_worker_id, update)
            .await?;

        tracing::info!(
            client_id = %client_id,
            case_worker_id = %case_worker_id,
            success_rate = assignment.success_rate.value(),
            "Case services updated"
        );

        Ok(assignment)
    }

    /// # Errors
    /// * `NoAssignmentsForClient` - The client has no assignment
    /// * `DatabaseError` - Database operation failed
    pub async fn list_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let assignments = self.assignments.find_by_client(client_id).await?;

        if assignments.is_empty() {
            return Err(AssignmentError::NoAssignmentsForClient(client_id));
        }

        Ok(assignments)
    }
}
