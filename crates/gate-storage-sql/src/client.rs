//! `PostgreSQL` implementation of the client storage provider.

use async_trait::async_trait;
use chrono::Utc;
use gate_model::Client;
use gate_storage::error::StorageResult;
use gate_storage::{ClientProvider, StorageError, assign_id};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::entities::ClientRow;
use crate::error::{from_insert_error, from_sqlx_error};

/// Inserts a client and returns the stored row.
pub(crate) async fn insert_client<'e, E>(executor: E, client: &Client) -> StorageResult<Client>
where
    E: PgExecutor<'e>,
{
    let id = assign_id(&client.id);
    let now = Utc::now();

    let row: ClientRow = sqlx::query_as(
        r"INSERT INTO clients (
            id, name, secret, response_types, grant_types, scope,
            redirect_uris, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING *",
    )
    .bind(&id)
    .bind(&client.name)
    .bind(&client.secret)
    .bind(Json(&client.response_types))
    .bind(Json(&client.grant_types))
    .bind(&client.scope)
    .bind(Json(&client.redirect_uris))
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(|e| from_insert_error(e, "Client", &id))?;

    Ok(Client::from(row))
}

/// Counts clients.
pub(crate) async fn count_clients<'e, E>(executor: E) -> StorageResult<u64>
where
    E: PgExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(executor)
        .await
        .map_err(from_sqlx_error)?;

    u64::try_from(count).map_err(|_| StorageError::InvalidData(format!("client count {count}")))
}

/// Lists clients in ID order.
pub(crate) async fn list_clients<'e, E>(executor: E) -> StorageResult<Vec<Client>>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<ClientRow> = sqlx::query_as("SELECT * FROM clients ORDER BY id")
        .fetch_all(executor)
        .await
        .map_err(from_sqlx_error)?;

    Ok(rows.into_iter().map(Client::from).collect())
}

/// `PostgreSQL` client storage provider.
#[derive(Clone)]
pub struct PgClientProvider {
    pool: PgPool,
}

impl PgClientProvider {
    /// Creates a new `PostgreSQL` client provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientProvider for PgClientProvider {
    async fn create(&self, client: &Client) -> StorageResult<Client> {
        insert_client(&self.pool, client).await
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(Client::from))
    }

    async fn list(&self) -> StorageResult<Vec<Client>> {
        list_clients(&self.pool).await
    }

    async fn count(&self) -> StorageResult<u64> {
        count_clients(&self.pool).await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Client", id));
        }

        Ok(())
    }

    async fn validate_secret(&self, id: &str, secret: &str) -> StorageResult<bool> {
        let stored: Option<(String,)> = sqlx::query_as("SELECT secret FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(stored.is_some_and(|(s,)| s == secret))
    }
}
