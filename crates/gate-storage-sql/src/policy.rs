//! `PostgreSQL` implementation of the policy storage provider.

use async_trait::async_trait;
use chrono::Utc;
use gate_model::Policy;
use gate_storage::error::StorageResult;
use gate_storage::{PolicyProvider, StorageError, assign_id};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::entities::{PolicyRow, policies_from_rows};
use crate::error::{from_insert_error, from_sqlx_error};

/// Inserts a policy and returns the stored row.
pub(crate) async fn insert_policy<'e, E>(executor: E, policy: &Policy) -> StorageResult<Policy>
where
    E: PgExecutor<'e>,
{
    let id = assign_id(&policy.id);

    let row: PolicyRow = sqlx::query_as(
        r"INSERT INTO policies (
            id, description, subjects, effect, resources, actions, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *",
    )
    .bind(&id)
    .bind(&policy.description)
    .bind(Json(&policy.subjects))
    .bind(policy.effect.as_str())
    .bind(Json(&policy.resources))
    .bind(Json(&policy.actions))
    .bind(Utc::now())
    .fetch_one(executor)
    .await
    .map_err(|e| from_insert_error(e, "Policy", &id))?;

    Policy::try_from(row)
}

/// `PostgreSQL` policy storage provider.
#[derive(Clone)]
pub struct PgPolicyProvider {
    pool: PgPool,
}

impl PgPolicyProvider {
    /// Creates a new `PostgreSQL` policy provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyProvider for PgPolicyProvider {
    async fn create(&self, policy: &Policy) -> StorageResult<Policy> {
        insert_policy(&self.pool, policy).await
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Policy>> {
        let row: Option<PolicyRow> = sqlx::query_as("SELECT * FROM policies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        row.map(Policy::try_from).transpose()
    }

    async fn list(&self) -> StorageResult<Vec<Policy>> {
        let rows: Vec<PolicyRow> = sqlx::query_as("SELECT * FROM policies ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        policies_from_rows(rows)
    }

    async fn find_by_subject(&self, subject: &str) -> StorageResult<Vec<Policy>> {
        let rows: Vec<PolicyRow> =
            sqlx::query_as("SELECT * FROM policies WHERE subjects @> $1 ORDER BY id")
                .bind(Json([subject]))
                .fetch_all(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        policies_from_rows(rows)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM policies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Policy", id));
        }

        Ok(())
    }
}
