use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::access::authentication::AccessToken;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

/// Exchange a username/password form for a bearer token.
///
/// The body is returned unwrapped so standard OAuth2 password-flow clients
/// can read it.
pub async fn login<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<AccessTokenResponse>, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    let identity = state
        .authentication
        .authenticate(&form.username, &form.password)
        .await?;

    state
        .authentication
        .issue_token(&identity)
        .map_err(ApiError::from)
        .map(|token| Json(token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
        }
    }
}
