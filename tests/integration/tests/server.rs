//! Server startup against `PostgreSQL`.

use gate_storage::ClientProvider;
use gate_storage_sql::PgClientProvider;
use reqwest::StatusCode;

use crate::common::{RunningServer, TestEnv};

/// The server bootstraps a fresh database before it serves.
#[tokio::test]
async fn test_server_bootstraps_before_serving() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut config = env.server_config()?;
    config.bootstrap.force_root_credentials = Some("admin:s3cret".to_string());

    let server = RunningServer::start(config).await?;

    let health: serde_json::Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["bootstrap"]["rootClientCreated"], true);
    assert_eq!(health["bootstrap"]["rootClientId"], "admin");
    assert!(!health.to_string().contains("s3cret"));

    let ready = server.client.get(server.url("/health/ready")).send().await?;
    assert_eq!(ready.status(), StatusCode::OK);

    assert!(
        PgClientProvider::new(env.pool.clone())
            .validate_secret("admin", "s3cret")
            .await?
    );

    Ok(())
}

/// A restarted server finds the root client and skips the bootstrap.
#[tokio::test]
async fn test_restart_skips_bootstrap() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let first = RunningServer::start(env.server_config()?).await?;
    drop(first);
    let second = RunningServer::start(env.server_config()?).await?;

    let health: serde_json::Value = second
        .client
        .get(second.url("/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["bootstrap"]["rootClientCreated"], false);
    assert_eq!(health["bootstrap"]["skipped"], "clients exist");
    assert_eq!(env.count("clients").await?, 1);

    Ok(())
}
