use std::sync::Arc;

use auth::TokenService;

use super::errors::AuthError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

/// Resolves bearer tokens to identities and enforces role requirements.
///
/// Fails closed: any token problem, or a subject that no longer resolves to
/// an identity, is reported as `Unauthorized`.
pub struct AuthorizationGate<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    tokens: Arc<TokenService>,
}

impl<IR> AuthorizationGate<IR>
where
    IR: IdentityRepository,
{
    pub fn new(repository: Arc<IR>, tokens: Arc<TokenService>) -> Self {
        Self { repository, tokens }
    }

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, malformed, or its subject is gone
    /// * `Identity` - Storage failure while loading the identity
    pub async fn resolve_identity(&self, token: &str) -> Result<Identity, AuthError> {
        let subject = self.tokens.validate(token).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected");
            AuthError::Unauthorized
        })?;

        let username = Username::new(subject).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a valid username");
            AuthError::Unauthorized
        })?;

        self.repository
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Token subject no longer resolves to an identity");
                AuthError::Unauthorized
            })
    }

    /// Require an exact role. An admin does not satisfy a case worker check.
    ///
    /// # Errors
    /// * `Forbidden` - The identity holds a different role
    pub fn require_role(&self, identity: &Identity, required: Role) -> Result<(), AuthError> {
        if identity.role == required {
            Ok(())
        } else {
            tracing::warn!(
                username = %identity.username,
                role = %identity.role,
                required = %required,
                "Insufficient role"
            );
            Err(AuthError::Forbidden {
                required,
                actual: identity.role,
            })
        }
    }
}
