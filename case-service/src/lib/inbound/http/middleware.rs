use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::access::errors::AuthError;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

/// Identity resolved from the bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

/// Resolve the bearer token to an identity and attach it to the request.
pub async fn authenticate<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    let token = extract_bearer_token(&req)?.to_string();
    let identity = state.gate.resolve_identity(&token).await?;

    req.extensions_mut().insert(CurrentIdentity(identity));

    Ok(next.run(req).await)
}

/// Reject the request unless the resolved identity is an admin.
///
/// Must run after [`authenticate`].
pub async fn require_admin<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    let CurrentIdentity(identity) = req
        .extensions()
        .get::<CurrentIdentity>()
        .ok_or(AuthError::Unauthorized)?;

    state.gate.require_role(identity, Role::Admin)?;

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            AuthError::Unauthorized
        })?
        .to_str()
        .map_err(|_| {
            tracing::warn!("Authorization header is not valid ASCII");
            AuthError::Unauthorized
        })?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => {
            tracing::warn!("Authorization header is not a bearer credential");
            Err(AuthError::Unauthorized.into())
        }
    }
}
