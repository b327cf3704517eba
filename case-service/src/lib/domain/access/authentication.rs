use std::sync::Arc;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenService;

use super::errors::AuthError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::NewIdentityRecord;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

// Verified in place of a real hash when the username is unknown, so both
// failure paths cost one Argon2 run.
const TIMING_EQUALIZER_PASSWORD: &str = "timing-equalizer-not-a-credential";

/// Bearer credential handed to a client after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Credential checks, identity creation and token issuing.
pub struct AuthenticationService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    password_hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    dummy_hash: String,
}

impl<IR> AuthenticationService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Errors
    /// * `HashingFailed` - The timing-equalizer hash could not be computed
    pub fn new(
        repository: Arc<IR>,
        password_hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = password_hasher.hash(TIMING_EQUALIZER_PASSWORD)?;

        Ok(Self {
            repository,
            password_hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames, malformed usernames and wrong passwords all return
    /// `InvalidCredentials`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No identity matches the credentials
    /// * `Identity` - Storage failure while looking the identity up
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = match Username::new(username.to_string()) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let stored_hash = identity
            .as_ref()
            .map(|identity| identity.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let verified = self.verify_password(password, stored_hash).await?;

        match identity {
            Some(identity) if verified => {
                tracing::info!(identity_id = %identity.id, username = %identity.username, "Authenticated");
                Ok(identity)
            }
            Some(identity) => {
                tracing::warn!(username = %identity.username, "Authentication failed: password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                tracing::warn!(username = %username, "Authentication failed: unknown username");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Create a new identity.
    ///
    /// The username and email lookups only improve the error for the common
    /// case; the repository insert is what enforces uniqueness, so a
    /// concurrent duplicate still comes back as a conflict.
    ///
    /// # Errors
    /// * `InvalidPassword` - Empty password
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn create_identity(&self, command: NewIdentity) -> Result<Identity, IdentityError> {
        if command.password.is_empty() {
            return Err(IdentityError::InvalidPassword(
                "password must not be empty".to_string(),
            ));
        }

        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(IdentityError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(IdentityError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let identity = self
            .repository
            .create(NewIdentityRecord {
                username: command.username,
                email: command.email,
                password_hash,
                role: command.role,
            })
            .await?;

        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            role = %identity.role,
            "Identity created"
        );

        Ok(identity)
    }

    /// Create the identity unless its username is already registered.
    ///
    /// Returns `None` when an identity with that username exists, including
    /// when it was inserted concurrently.
    pub async fn ensure_identity(
        &self,
        command: NewIdentity,
    ) -> Result<Option<Identity>, IdentityError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let username = command.username.clone();

        match self.create_identity(command).await {
            Ok(identity) => Ok(Some(identity)),
            Err(IdentityError::UsernameAlreadyExists(_)) => Ok(None),
            // A concurrent creation of the same identity can trip the email check first.
            Err(err @ IdentityError::EmailAlreadyExists(_)) => {
                match self.repository.find_by_username(&username).await? {
                    Some(_) => Ok(None),
                    None => Err(err),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Issue a bearer token whose subject is the identity's username.
    ///
    /// # Errors
    /// * `TokenIssue` - Token encoding failed
    pub fn issue_token(&self, identity: &Identity) -> Result<AccessToken, AuthError> {
        let access_token = self
            .tokens
            .issue(identity.username.as_str())
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    async fn hash_password(&self, password: String) -> Result<String, IdentityError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| IdentityError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(IdentityError::from)
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, IdentityError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                IdentityError::Unknown(format!("Password verification task failed: {}", e))
            })
    }
}
