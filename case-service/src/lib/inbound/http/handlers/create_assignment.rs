use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::assignment::models::Assignment;
use crate::domain::assignment::models::ClientId;
use crate::domain::assignment::models::ServiceFlags;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

pub async fn create_assignment<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    Path(client_id): Path<i64>,
    Query(query): Query<CaseAssignmentQuery>,
) -> Result<ApiSuccess<AssignmentData>, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    state
        .assignments
        .create(ClientId(client_id), IdentityId(query.case_worker_id))
        .await
        .map_err(ApiError::from)
        .map(|ref assignment| ApiSuccess::new(StatusCode::CREATED, assignment.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseAssignmentQuery {
    case_worker_id: i64,
}

/// Assignment as exposed over HTTP, shared by the assignment handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentData {
    pub client_id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub services: ServiceFlags,
    pub success_rate: u8,
}

impl From<&Assignment> for AssignmentData {
    fn from(assignment: &Assignment) -> Self {
        Self {
            client_id: assignment.client_id.0,
            user_id: assignment.case_worker_id.0,
            services: assignment.services,
            success_rate: assignment.success_rate.value(),
        }
    }
}
