use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use migration::MigratorTrait;
use tracing::info;

use common::retry::{retry_with_policy, RetryPolicy};

pub use configs::DatabaseConfig;

/// Open a connection pool using the pool settings from `cfg`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(cfg.connect_timeout())
        .acquire_timeout(cfg.acquire_timeout())
        .idle_timeout(cfg.idle_timeout())
        .max_lifetime(cfg.max_lifetime())
        .sqlx_logging(cfg.sqlx_logging);
    Database::connect(opts).await
}

/// Connect, retrying `cfg.connect_retries` times with a fixed
/// `cfg.retry_delay()` pause. Exhausting the attempts is an error the
/// caller should treat as fatal.
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let policy = RetryPolicy::fixed(cfg.connect_retries, cfg.retry_delay());
    info!(
        event = "db_connect",
        db = %cfg.redacted_target(),
        max_attempts = policy.max_attempts(),
        "connecting to database"
    );
    let db = retry_with_policy(&policy, || connect_with_config(cfg))
        .await
        .map_err(|e| anyhow::anyhow!("database unreachable after {} attempts: {e}", policy.max_attempts()))?;
    info!(event = "db_connected", "database connection established");
    Ok(db)
}

/// Apply pending migrations. Safe to run on every start.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migration::Migrator::up(db, None).await?;
    info!(event = "db_migrated", "schema is up to date");
    Ok(())
}

/// Round-trip a trivial query.
pub async fn ping(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    db.execute(stmt).await?;
    Ok(())
}
