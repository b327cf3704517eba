use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_assignment::AssignmentData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::assignment::errors::AssignmentError;
use crate::domain::assignment::models::AssignmentUpdate;
use crate::domain::assignment::models::ClientId;
use crate::domain::assignment::models::SuccessRate;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating an assignment (raw JSON, every field optional)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServicesRequest {
    pub employment_assistance: Option<bool>,
    pub life_stabilization: Option<bool>,
    pub retention_services: Option<bool>,
    pub specialized_services: Option<bool>,
    pub employment_related_financial_supports: Option<bool>,
    pub employer_financial_supports: Option<bool>,
    pub enhanced_referrals: Option<bool>,
    pub success_rate: Option<i64>,
}

impl UpdateServicesRequest {
    fn try_into_update(self) -> Result<AssignmentUpdate, AssignmentError> {
        let success_rate = self.success_rate.map(SuccessRate::new).transpose()?;

        Ok(AssignmentUpdate {
            employment_assistance: self.employment_assistance,
            life_stabilization: self.life_stabilization,
            retention_services: self.retention_services,
            specialized_services: self.specialized_services,
            employment_related_financial_supports: self.employment_related_financial_supports,
            employer_financial_supports: self.employer_financial_supports,
            enhanced_referrals: self.enhanced_referrals,
            success_rate,
        })
    }
}

pub async fn update_assignment<IR, AR>(
    State(state): State<AppState<IR, AR>>,
    Path((client_id, user_id)): Path<(i64, i64)>,
    ApiJson(req): ApiJson<UpdateServicesRequest>,
) -> Result<ApiSuccess<AssignmentData>, ApiError>
where
    IR: IdentityRepository,
    AR: AssignmentRepository,
{
    let update = req.try_into_update()?;

    state
        .assignments
        .update(ClientId(client_id), IdentityId(user_id), update)
        .await
        .map_err(ApiError::from)
        .map(|ref assignment| ApiSuccess::new(StatusCode::OK, assignment.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_success_rate_is_rejected() {
        let req = UpdateServicesRequest {
            success_rate: Some(150),
            ..Default::default()
        };

        assert!(matches!(
            req.try_into_update(),
            Err(AssignmentError::InvalidSuccessRate(_))
        ));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let req: UpdateServicesRequest =
            serde_json::from_str(r#"{"life_stabilization": true, "success_rate": 20}"#).unwrap();

        let update = req.try_into_update().unwrap();

        assert_eq!(update.life_stabilization, Some(true));
        assert_eq!(update.employment_assistance, None);
        assert_eq!(update.success_rate, Some(SuccessRate::new(20).unwrap()));
    }
}
