//! Embedded PostgreSQL databases for the Diesel adapter tests.
//!
//! Each test receives a fresh database cloned from a template that already
//! carries the embedded migrations. When no cluster can be started the
//! tests are skipped, unless `REQUIRE_TEST_CLUSTER` is set, in which case
//! they fail.

use std::sync::{Mutex, OnceLock};

use payroll_backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static SKIP_NOTICE: OnceLock<Mutex<bool>> = OnceLock::new();

fn template_name() -> Result<String, String> {
    let migrations = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    Ok(format!("payroll_template_{}", hash.get(..8).unwrap_or(&hash)))
}

async fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        run_pending_migrations(cluster.connection().database_url(&name))
            .await
            .map_err(|err| err.to_string())?;
    }
    Ok(name)
}

async fn provision() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let template = ensure_template(cluster).await?;
    cluster
        .temporary_database_from_template(format!("test_{}", Uuid::new_v4()).as_str(), template.as_str())
        .map_err(|err| format!("clone template: {err:?}"))
}

/// A migrated database, or `None` when the cluster is unavailable and not
/// required.
///
/// # Panics
///
/// When provisioning fails and `REQUIRE_TEST_CLUSTER` is set.
pub async fn test_database() -> Option<TemporaryDatabase> {
    match provision().await {
        Ok(database) => Some(database),
        Err(reason) if std::env::var_os("REQUIRE_TEST_CLUSTER").is_some() => {
            panic!("embedded PostgreSQL is required but unavailable: {reason}")
        }
        Err(reason) => {
            let mut noticed = SKIP_NOTICE
                .get_or_init(|| Mutex::new(false))
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if !*noticed {
                eprintln!("SKIP-TEST-CLUSTER: {reason}");
                *noticed = true;
            }
            None
        }
    }
}
