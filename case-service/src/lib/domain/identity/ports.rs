use async_trait::async_trait;

use super::errors::IdentityError;
use super::models::EmailAddress;
use super::models::Identity;
use super::models::IdentityId;
use super::models::NewIdentityRecord;
use super::models::Username;

/// Persistence operations for identity records.
///
/// Implementations must enforce uniqueness of username and of email
/// atomically with the insert; callers treat any lookup done beforehand as
/// advisory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity and assign its id.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: NewIdentityRecord) -> Result<Identity, IdentityError>;

    /// Retrieve identity by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by exact (case-sensitive) username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError>;
}
