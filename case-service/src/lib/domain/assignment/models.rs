use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::errors::SuccessRateError;
use crate::domain::identity::models::IdentityId;

/// Client (assignment subject) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Case assignment linking a client to the case worker handling it.
///
/// At most one assignment exists per (client, case worker) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub client_id: ClientId,
    pub case_worker_id: IdentityId,
    pub services: ServiceFlags,
    pub success_rate: SuccessRate,
}

impl Assignment {
    /// Fresh assignment: every service off, success rate 0.
    pub fn new(client_id: ClientId, case_worker_id: IdentityId) -> Self {
        Self {
            client_id,
            case_worker_id,
            services: ServiceFlags::default(),
            success_rate: SuccessRate::default(),
        }
    }
}

/// Services provided to the client under an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFlags {
    pub employment_assistance: bool,
    pub life_stabilization: bool,
    pub retention_services: bool,
    pub specialized_services: bool,
    pub employment_related_financial_supports: bool,
    pub employer_financial_supports: bool,
    pub enhanced_referrals: bool,
}

/// Percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SuccessRate(u8);

impl SuccessRate {
    const MAX: i64 = 100;

    /// # Errors
    /// * `OutOfRange` - Value below 0 or above 100
    pub fn new(value: i64) -> Result<Self, SuccessRateError> {
        if (0..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SuccessRateError::OutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Partial update of an assignment. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentUpdate {
    pub employment_assistance: Option<bool>,
    pub life_stabilization: Option<bool>,
    pub retention_services: Option<bool>,
    pub specialized_services: Option<bool>,
    pub employment_related_financial_supports: Option<bool>,
    pub employer_financial_supports: Option<bool>,
    pub enhanced_referrals: Option<bool>,
    pub success_rate: Option<SuccessRate>,
}

impl AssignmentUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the supplied fields to `assignment`.
    pub fn apply_to(&self, assignment: &mut Assignment) {
        let services = &mut assignment.services;
        let fields = [
            (self.employment_assistance, &mut services.employment_assistance),
            (self.life_stabilization, &mut services.life_stabilization),
            (self.retention_services, &mut services.retention_services),
            (self.specialized_services, &mut services.specialized_services),
            (
                self.employment_related_financial_supports,
                &mut services.employment_related_financial_supports,
            ),
            (
                self.employer_financial_supports,
                &mut services.employer_financial_supports,
            ),
            (self.enhanced_referrals, &mut services.enhanced_referrals),
        ];

        for (update, target) in fields {
            if let Some(value) = update {
                *target = value;
            }
        }

        if let Some(rate) = self.success_rate {
            assignment.success_rate = rate;
        }
    }
}
