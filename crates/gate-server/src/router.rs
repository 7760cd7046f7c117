//! Router configuration.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::{AppState, BootstrapStatus};

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    bootstrap: BootstrapStatus,
}

/// Basic health check.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        bootstrap: (*state.bootstrap).clone(),
    })
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe. Ready once the store answers and a root identity exists.
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store.count_clients().await {
        Ok(count) if count > 0 => StatusCode::OK,
        Ok(_) => StatusCode::SERVICE_UNAVAILABLE,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check could not reach the store");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use gate_bootstrap::{
        BootstrapConfig, BootstrapInitializer, BootstrapOutcome, DisclosureMode, SkipReason,
    };
    use gate_model::{Client, PolicyTemplate};
    use gate_storage::{
        BootstrapStore, GrantError, MemoryStore, RootGrant, StorageError, StorageResult,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    struct DownStore;

    #[async_trait]
    impl BootstrapStore for DownStore {
        async fn list_clients(&self) -> StorageResult<Vec<Client>> {
            Err(StorageError::Connection("refused".to_string()))
        }

        async fn grant_root(
            &self,
            _client: &Client,
            _policy: &PolicyTemplate,
        ) -> Result<Option<RootGrant>, GrantError> {
            Err(GrantError::ClientCheck(StorageError::Connection(
                "refused".to_string(),
            )))
        }
    }

    /// Counts without ever handing out client rows.
    struct CountingStore(u64);

    #[async_trait]
    impl BootstrapStore for CountingStore {
        async fn list_clients(&self) -> StorageResult<Vec<Client>> {
            Err(StorageError::Internal("client rows must not be loaded".to_string()))
        }

        async fn count_clients(&self) -> StorageResult<u64> {
            Ok(self.0)
        }

        async fn grant_root(
            &self,
            _client: &Client,
            _policy: &PolicyTemplate,
        ) -> Result<Option<RootGrant>, GrantError> {
            Ok(None)
        }
    }

    async fn bootstrapped() -> AppState {
        let store = Arc::new(MemoryStore::new());
        let config = BootstrapConfig::default().with_disclosure(DisclosureMode::None);
        let outcome = BootstrapInitializer::new(store.clone(), config)
            .run()
            .await
            .unwrap();
        AppState::new(store, &outcome)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn health_reports_bootstrap_without_secret() {
        let state = bootstrapped().await;
        let root_id = state.bootstrap.root_client_id.clone().unwrap();

        let (status, body) = get(create_router(state), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["bootstrap"]["rootClientCreated"], true);
        assert_eq!(json["bootstrap"]["rootClientId"], root_id.as_str());
        assert!(!String::from_utf8(body).unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn ready_after_bootstrap() {
        let (status, _) = get(create_router(bootstrapped().await), "/health/ready").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn not_ready_without_clients() {
        let outcome = BootstrapOutcome::Skipped(SkipReason::ConcurrentBootstrap);
        let state = AppState::new(Arc::new(MemoryStore::new()), &outcome);

        let (status, _) = get(create_router(state), "/health/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn not_ready_when_store_is_down() {
        let outcome = BootstrapOutcome::Skipped(SkipReason::ClientsExist(1));
        let app = create_router(AppState::new(Arc::new(DownStore), &outcome));

        let (ready, _) = get(app.clone(), "/health/ready").await;
        let (live, _) = get(app, "/health/live").await;

        assert_eq!(ready, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(live, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_counts_instead_of_listing() {
        let outcome = BootstrapOutcome::Skipped(SkipReason::ClientsExist(2));

        let (ready, _) = get(
            create_router(AppState::new(Arc::new(CountingStore(2)), &outcome)),
            "/health/ready",
        )
        .await;
        let (empty, _) = get(
            create_router(AppState::new(Arc::new(CountingStore(0)), &outcome)),
            "/health/ready",
        )
        .await;

        assert_eq!(ready, StatusCode::OK);
        assert_eq!(empty, StatusCode::SERVICE_UNAVAILABLE);
    }
}
