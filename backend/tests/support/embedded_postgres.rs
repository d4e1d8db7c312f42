//! Embedded PostgreSQL harness for the Diesel repository suites.
//!
//! Each suite gets its own database on a throwaway cluster from
//! `pg-embedded-setup-unpriv`. The database is dropped and recreated before
//! the schema migrations run, and seed rows without a repository port
//! (profiles and roles) are written through a plain `postgres` client.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip the suites where the cluster cannot
//! start.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use mess_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Attempts after the first when the binary download fails transiently.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Cluster, database and pool for one test.
pub struct PgContext {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub url: String,
    _cluster: TestCluster,
}

impl PgContext {
    /// Start a cluster and provision a freshly migrated database `name`.
    pub fn new(name: &str) -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = test_cluster()?;
        let admin_url = cluster.connection().database_url("postgres");
        reset_database(&admin_url, name)?;
        let url = cluster.connection().database_url(name);

        let pool = runtime.block_on(async {
            run_migrations(&url).await.map_err(|err| err.to_string())?;
            let config = PoolConfig::new(url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1));
            DbPool::new(config).await.map_err(|err| err.to_string())
        })?;

        Ok(Self {
            runtime,
            pool,
            url,
            _cluster: cluster,
        })
    }

    /// Open a synchronous client for seeding and raw assertions.
    pub fn client(&self) -> Client {
        Client::connect(&self.url, NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)))
    }

    /// Insert a profile with its role, optionally already running `mess`.
    pub fn seed_account(&self, id: Uuid, name: &str, role: &str, mess: Option<Uuid>) {
        let email = format!("{}-{id}@example.com", name.to_lowercase());
        let mut client = self.client();
        client
            .execute(
                "INSERT INTO profiles (id, name, email, temp_password) VALUES ($1, $2, $3, 'welcome1')",
                &[&id, &name, &email],
            )
            .unwrap_or_else(|err| panic!("seed profile: {}", format_postgres_error(&err)));
        client
            .execute(
                "INSERT INTO user_roles (user_id, role, mess_id) VALUES ($1, $2, $3)",
                &[&id, &role, &mess],
            )
            .unwrap_or_else(|err| panic!("seed role: {}", format_postgres_error(&err)));
    }

    /// Insert a listed mess with no owner.
    pub fn seed_mess(&self, id: Uuid, name: &str) {
        self.client()
            .execute(
                "INSERT INTO messes (id, name) VALUES ($1, $2)",
                &[&id, &name],
            )
            .unwrap_or_else(|err| panic!("seed mess: {}", format_postgres_error(&err)));
    }

    /// Count rows matching a single-parameter `WHERE` clause on `table`.
    pub fn count_where(&self, table: &str, clause: &str, value: &Uuid) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {clause}");
        self.client()
            .query_one(sql.as_str(), &[value])
            .unwrap_or_else(|err| panic!("count {table}: {}", format_postgres_error(&err)))
            .get(0)
    }
}

/// Render a `postgres` error with its SQLSTATE, detail and hint.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, fail loudly otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if skip {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn reset_database(admin_url: &str, name: &str) -> Result<(), String> {
    let mut client = Client::connect(admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let escaped = name.replace('"', "\"\"");
    client
        .batch_execute(&format!(
            r#"DROP DATABASE IF EXISTS "{escaped}" WITH (FORCE); CREATE DATABASE "{escaped}";"#
        ))
        .map_err(|err| format_postgres_error(&err))
}

fn pg_embed_dirs() -> Result<(String, String), std::io::Error> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("bootstrap-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

fn is_transient(error: &str) -> bool {
    let error = error.to_lowercase();
    [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "temporarily unavailable",
        "dns error",
    ]
    .iter()
    .any(|pattern| error.contains(pattern))
}

/// Bootstrap a cluster under the target directory unless `PG_RUNTIME_DIR`
/// and `PG_DATA_DIR` are both set, retrying transient download failures.
fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = pg_embed_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == MAX_RETRIES || !is_transient(&last_error) {
                    break;
                }
                std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS << attempt));
            }
        }
    }
    Err(last_error)
}
