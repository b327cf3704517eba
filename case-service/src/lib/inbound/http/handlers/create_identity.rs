use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::RoleError;
use crate::domain::identity::errors::UsernameError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

pub async fn create_identity<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    ApiJson(body): ApiJson<CreateIdentityRequest>,
) -> Result<ApiSuccess<CreateIdentityResponseData>, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    state
        .authentication
        .create_identity(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for creating an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateIdentityRequest {
    username: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateIdentityRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl CreateIdentityRequest {
    fn try_into_command(self) -> Result<NewIdentity, ParseCreateIdentityRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let role = self.role.parse::<Role>()?;
        Ok(NewIdentity::new(username, email, self.password, role))
    }
}

impl From<ParseCreateIdentityRequestError> for ApiError {
    fn from(err: ParseCreateIdentityRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIdentityResponseData {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&Identity> for CreateIdentityResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role,
        }
    }
}
