use thiserror::Error;

use super::models::ClientId;
use crate::domain::errors::ErrorKind;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::IdentityId;

/// Error for SuccessRate validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuccessRateError {
    #[error("Success rate must be between 0 and 100, got {0}")]
    OutOfRange(i64),
}

/// Top-level error for case assignment operations
#[derive(Debug, Clone, Error)]
pub enum AssignmentError {
    #[error("Invalid success rate: {0}")]
    InvalidSuccessRate(#[from] SuccessRateError),

    #[error("Client with id {0} not found")]
    ClientNotFound(ClientId),

    #[error("Case worker with id {0} not found")]
    CaseWorkerNotFound(IdentityId),

    #[error("No case found for client {client_id} with case worker {case_worker_id}")]
    NotFound {
        client_id: ClientId,
        case_worker_id: IdentityId,
    },

    #[error("No services found for client with id {0}")]
    NoAssignmentsForClient(ClientId),

    #[error("Client {client_id} already has a case assigned to case worker {case_worker_id}")]
    AlreadyExists {
        client_id: ClientId,
        case_worker_id: IdentityId,
    },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AssignmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignmentError::InvalidSuccessRate(_) => ErrorKind::Validation,
            AssignmentError::ClientNotFound(_)
            | AssignmentError::CaseWorkerNotFound(_)
            | AssignmentError::NotFound { .. }
            | AssignmentError::NoAssignmentsForClient(_) => ErrorKind::NotFound,
            AssignmentError::AlreadyExists { .. } => ErrorKind::Conflict,
            AssignmentError::Identity(err) => err.kind(),
            AssignmentError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}
