#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, migrate, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
        connect_timeout_secs: 3,
        acquire_timeout_secs: 10,
        ..DatabaseConfig::default()
    })
}

/// A migrated test database, or `None` when `DATABASE_URL` is missing,
/// `SKIP_DB_TESTS` is set or the server cannot be reached.
pub async fn get_db() -> Option<DatabaseConnection> {
    let cfg = test_config()?;

    // Run migrations exactly once, with a throwaway connection
    let ready = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&cfg).await {
                Ok(db) => match migrate(&db).await {
                    Ok(()) => true,
                    Err(e) => {
                        eprintln!("skip: migrate up failed: {}", e);
                        false
                    }
                },
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }

    // Return a fresh connection for the current test's runtime
    match connect_with_config(&cfg).await {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            None
        }
    }
}
