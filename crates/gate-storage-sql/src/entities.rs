//! Database row types and their conversion to domain models.

use chrono::{DateTime, Utc};
use gate_model::{Client, Effect, Policy};
use gate_storage::StorageError;
use sqlx::FromRow;
use sqlx::types::Json;

/// Database row for clients.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub secret: String,
    pub response_types: Json<Vec<String>>,
    pub grant_types: Json<Vec<String>>,
    pub scope: String,
    pub redirect_uris: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            secret: row.secret,
            response_types: row.response_types.0.into_iter().collect(),
            grant_types: row.grant_types.0.into_iter().collect(),
            scope: row.scope,
            redirect_uris: row.redirect_uris.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for policies.
#[derive(Debug, Clone, FromRow)]
pub struct PolicyRow {
    pub id: String,
    pub description: String,
    pub subjects: Json<Vec<String>>,
    pub effect: String,
    pub resources: Json<Vec<String>>,
    pub actions: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for Policy {
    type Error = StorageError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        let effect = Effect::parse(&row.effect).ok_or_else(|| {
            StorageError::InvalidData(format!(
                "policy '{}' has unknown effect '{}'",
                row.id, row.effect
            ))
        })?;

        Ok(Self {
            id: row.id,
            description: row.description,
            subjects: row.subjects.0,
            effect,
            resources: row.resources.0,
            actions: row.actions.0,
            created_at: row.created_at,
        })
    }
}

/// Converts policy rows, failing on the first unreadable one.
pub fn policies_from_rows(rows: Vec<PolicyRow>) -> Result<Vec<Policy>, StorageError> {
    rows.into_iter().map(Policy::try_from).collect()
}
