//! Root client bootstrap against `PostgreSQL`.

use std::sync::Arc;

use futures::future::join_all;
use gate_bootstrap::root::{admin_resource_pattern, root_client, root_policy_template};
use gate_bootstrap::{
    BootstrapConfig, BootstrapError, BootstrapInitializer, BootstrapOutcome, CredentialSource,
    DisclosureMode, RootCredentials, SkipReason,
};
use gate_model::{Client, Effect};
use gate_storage::{BootstrapStore, ClientProvider, ComposedStore, GrantError, PolicyProvider};
use gate_storage_sql::{PgBootstrapStore, PgClientProvider, PgPolicyProvider};

use crate::common::TestEnv;

fn quiet() -> BootstrapConfig {
    BootstrapConfig::default().with_disclosure(DisclosureMode::None)
}

fn initializer(env: &TestEnv, config: BootstrapConfig) -> BootstrapInitializer {
    BootstrapInitializer::new(Arc::new(PgBootstrapStore::new(env.pool.clone())), config)
}

/// An empty database gets a root client and a policy naming it.
#[tokio::test]
async fn test_bootstrap_creates_root_client() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let outcome = initializer(&env, quiet()).run().await?;

    let report = outcome.report().expect("root client created");
    assert_eq!(report.source, CredentialSource::Generated);
    assert_eq!(report.credentials.secret.len(), 16);

    let clients = PgClientProvider::new(env.pool.clone());
    let stored = clients.get(&report.client.id).await?.expect("client stored");
    assert_eq!(stored.scope, "gate openid offline");
    assert!(stored.has_grant_type("client_credentials"));
    assert!(stored.has_response_type("id_token"));
    assert!(
        clients
            .validate_secret(&report.client.id, &report.credentials.secret)
            .await?
    );

    let policies = PgPolicyProvider::new(env.pool.clone())
        .find_by_subject(&report.client.id)
        .await?;
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].effect, Effect::Allow);
    assert_eq!(policies[0].resources, vec![admin_resource_pattern("gate")]);
    assert_eq!(policies[0].actions, vec!["<.*>".to_string()]);

    Ok(())
}

/// Running again on the same database writes nothing.
#[tokio::test]
async fn test_bootstrap_is_idempotent() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    assert!(initializer(&env, quiet()).run().await?.is_created());
    let second = initializer(&env, quiet()).run().await?;

    assert!(matches!(
        second,
        BootstrapOutcome::Skipped(SkipReason::ClientsExist(1))
    ));
    assert_eq!(env.count("clients").await?, 1);
    assert_eq!(env.count("policies").await?, 1);
    assert_eq!(
        PgBootstrapStore::new(env.pool.clone()).count_clients().await?,
        1
    );

    Ok(())
}

/// Any pre-existing client prevents the bootstrap.
#[tokio::test]
async fn test_existing_client_skips_bootstrap() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    PgClientProvider::new(env.pool.clone())
        .create(&Client::new("existing").with_secret("x"))
        .await?;

    let outcome = initializer(&env, quiet()).run().await?;

    assert!(!outcome.is_created());
    assert_eq!(env.count("policies").await?, 0);

    Ok(())
}

/// Operator-supplied credentials are stored verbatim.
#[tokio::test]
async fn test_override_credentials() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let outcome = initializer(&env, quiet().with_override("myid:mysecret"))
        .run()
        .await?;

    let report = outcome.report().expect("root client created");
    assert_eq!(report.source, CredentialSource::Override);
    assert_eq!(report.client.id, "myid");
    assert!(
        PgClientProvider::new(env.pool.clone())
            .validate_secret("myid", "mysecret")
            .await?
    );

    Ok(())
}

/// A malformed override falls back to an assigned id and a generated secret.
#[tokio::test]
async fn test_malformed_override_falls_back() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let outcome = initializer(&env, quiet().with_override("a:b:c")).run().await?;

    let report = outcome.report().expect("root client created");
    assert!(report.override_rejected);
    assert_eq!(report.source, CredentialSource::Generated);
    assert_ne!(report.client.id, "a");
    assert!(!report.client.id.is_empty());

    Ok(())
}

/// Concurrent grants on one database create exactly one root client.
#[tokio::test]
async fn test_concurrent_grants_create_one_root() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let template = root_policy_template("gate");

    let grants = join_all((0..8).map(|i| {
        let store = PgBootstrapStore::new(env.pool.clone());
        let client = root_client(
            &RootCredentials {
                id: String::new(),
                secret: format!("secret-{i}"),
            },
            "gate",
        );
        let template = template.clone();
        async move { store.grant_root(&client, &template).await }
    }))
    .await;

    let created = grants
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .count();
    assert_eq!(created, 1);
    assert_eq!(env.count("clients").await?, 1);
    assert_eq!(env.count("policies").await?, 1);

    Ok(())
}

/// A failed policy insert rolls the client back with it.
#[tokio::test]
async fn test_policy_failure_rolls_back_client() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    sqlx::query("DROP TABLE policies").execute(&env.pool).await?;

    let err = initializer(&env, quiet()).run().await.unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::CreatePolicy {
            rolled_back: true,
            ..
        }
    ));
    assert_eq!(err.operation(), "create policy");
    assert!(!err.left_orphan_client());
    assert_eq!(env.count("clients").await?, 0);

    Ok(())
}

/// The composed store works over the SQL providers too.
#[tokio::test]
async fn test_composed_store_over_sql_providers() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let store = ComposedStore::new(
        Arc::new(PgClientProvider::new(env.pool.clone())),
        Arc::new(PgPolicyProvider::new(env.pool.clone())),
    );
    let client = root_client(
        &RootCredentials {
            id: "root".to_string(),
            secret: "s".to_string(),
        },
        "gate",
    );

    let grant = store
        .grant_root(&client, &root_policy_template("gate"))
        .await?
        .expect("store was empty");
    let again = store
        .grant_root(&client, &root_policy_template("gate"))
        .await?;

    assert_eq!(grant.policy.subjects, vec!["root".to_string()]);
    assert!(again.is_none());

    Ok(())
}

/// Inserting a client with a taken id is reported as a duplicate.
#[tokio::test]
async fn test_duplicate_client_id() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let clients = PgClientProvider::new(env.pool.clone());
    clients.create(&Client::new("dup").with_secret("a")).await?;

    let err = clients
        .create(&Client::new("dup").with_secret("b"))
        .await
        .unwrap_err();

    assert!(err.is_duplicate());

    Ok(())
}

/// An unreachable database fails at the client check, before any write.
#[tokio::test]
async fn test_closed_pool_fails_client_check() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let store = PgBootstrapStore::new(env.pool.clone());
    env.pool.close().await;

    let err = store
        .grant_root(&Client::new(""), &root_policy_template("gate"))
        .await
        .unwrap_err();

    assert!(matches!(err, GrantError::ClientCheck(_)));

    Ok(())
}
