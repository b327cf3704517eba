use thiserror::Error;

use crate::domain::errors::ErrorKind;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Role;

/// Error for authentication and authorization operations.
///
/// Credential and token failures are deliberately coarse: callers learn that
/// access was refused, not why. The precise cause is logged where it occurs.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Role '{required}' is required for this operation")]
    Forbidden { required: Role, actual: Role },

    #[error("Token generation failed: {0}")]
    TokenIssue(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::Forbidden { .. } => ErrorKind::Forbidden,
            AuthError::TokenIssue(_) => ErrorKind::Internal,
            AuthError::Identity(err) => err.kind(),
        }
    }
}
