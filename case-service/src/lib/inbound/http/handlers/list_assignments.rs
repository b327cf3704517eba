use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::create_assignment::AssignmentData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::assignment::models::ClientId;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

pub async fn list_assignments<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    Path(client_id): Path<i64>,
) -> Result<ApiSuccess<Vec<AssignmentData>>, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    state
        .assignments
        .list_for_client(ClientId(client_id))
        .await
        .map_err(ApiError::from)
        .map(|assignments| {
            ApiSuccess::new(
                StatusCode::OK,
                assignments.iter().map(AssignmentData::from).collect(),
            )
        })
}
