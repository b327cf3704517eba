use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::assignment::errors::AssignmentError;
use crate::domain::assignment::models::Assignment;
use crate::domain::assignment::models::AssignmentUpdate;
use crate::domain::assignment::models::ClientId;
use crate::domain::assignment::models::ServiceFlags;
use crate::domain::assignment::models::SuccessRate;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::models::IdentityId;

pub struct PostgresAssignmentRepository {
    pool: PgPool,
}

impl PostgresAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_assignment(row: PgRow) -> Result<Assignment, AssignmentError> {
        let success_rate: i32 = row.get("success_rate");

        Ok(Assignment {
            client_id: ClientId(row.get("client_id")),
            case_worker_id: IdentityId(row.get("user_id")),
            services: ServiceFlags {
                employment_assistance: row.get("employment_assistance"),
                life_stabilization: row.get("life_stabilization"),
                retention_services: row.get("retention_services"),
                specialized_services: row.get("specialized_services"),
                employment_related_financial_supports: row
                    .get("employment_related_financial_supports"),
                employer_financial_supports: row.get("employer_financial_supports"),
                enhanced_referrals: row.get("enhanced_referrals"),
            },
            success_rate: SuccessRate::new(i64::from(success_rate))?,
        })
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn create(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Assignment, AssignmentError> {
        let row = sqlx::query(
            r#"
            INSERT INTO client_cases (client_id, user_id)
            VALUES ($1, $2)
            RETURNING client_id, user_id, employment_assistance, life_stabilization,
                      retention_services, specialized_services,
                      employment_related_financial_supports, employer_financial_supports,
                      enhanced_referrals, success_rate
            "#,
        )
        .bind(client_id.0)
        .bind(case_worker_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("client_cases_client_id_user_id_key")
                {
                    return AssignmentError::AlreadyExists {
                        client_id,
                        case_worker_id,
                    };
                }
                if db_err.is_foreign_key_violation() {
                    if db_err.constraint() == Some("client_cases_client_id_fkey") {
                        return AssignmentError::ClientNotFound(client_id);
                    }
                    if db_err.constraint() == Some("client_cases_user_id_fkey") {
                        return AssignmentError::CaseWorkerNotFound(case_worker_id);
                    }
                }
            }
            AssignmentError::DatabaseError(e.to_string())
        })?;

        Self::row_to_assignment(row)
    }

    async fn update(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
        update: AssignmentUpdate,
    ) -> Result<Assignment, AssignmentError> {
        let row = sqlx::query(
            r#"
            UPDATE client_cases
            SET employment_assistance = COALESCE($3, employment_assistance),
                life_stabilization = COALESCE($4, life_stabilization),
                retention_services = COALESCE($5, retention_services),
                specialized_services = COALESCE($6, specialized_services),
                employment_related_financial_supports =
                    COALESCE($7, employment_related_financial_supports),
                employer_financial_supports = COALESCE($8, employer_financial_supports),
                enhanced_referrals = COALESCE($9, enhanced_referrals),
                success_rate = COALESCE($10, success_rate),
                updated_at = NOW()
            WHERE client_id = $1 AND user_id = $2
            RETURNING client_id, user_id, employment_assistance, life_stabilization,
                      retention_services, specialized_services,
                      employment_related_financial_supports, employer_financial_supports,
                      enhanced_referrals, success_rate
            "#,
        )
        .bind(client_id.0)
        .bind(case_worker_id.0)
        .bind(update.employment_assistance)
        .bind(update.life_stabilization)
        .bind(update.retention_services)
        .bind(update.specialized_services)
        .bind(update.employment_related_financial_supports)
        .bind(update.employer_financial_supports)
        .bind(update.enhanced_referrals)
        .bind(update.success_rate.map(|rate| i32::from(rate.value())))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AssignmentError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Self::row_to_assignment(row),
            None => Err(AssignmentError::NotFound {
                client_id,
                case_worker_id,
            }),
        }
    }

    async fn find(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Option<Assignment>, AssignmentError> {
        let row = sqlx::query(
            r#"
            SELECT client_id, user_id, employment_assistance, life_stabilization,
                   retention_services, specialized_services,
                   employment_related_financial_supports, employer_financial_supports,
                   enhanced_referrals, success_rate
            FROM client_cases
            WHERE client_id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id.0)
        .bind(case_worker_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AssignmentError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_assignment).transpose()
    }

    async fn find_by_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        let rows = sqlx::query(
            r#"
            SELECT client_id, user_id, employment_assistance, life_stabilization,
                   retention_services, specialized_services,
                   employment_related_financial_supports, employer_financial_supports,
                   enhanced_referrals, success_rate
            FROM client_cases
            WHERE client_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(client_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AssignmentError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_assignment).collect()
    }
}
