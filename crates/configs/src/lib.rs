use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Postgres settings. Either `url` is given, or it is assembled from the
/// host/port/user/password/name parts.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            connect_retries: default_connect_retries(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_db_host() -> String { "localhost".into() }
fn default_db_port() -> u16 { 5432 }
fn default_db_user() -> String { "postgres".into() }
fn default_db_name() -> String { "subscriptions".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_connect_retries() -> u32 { 10 }
fn default_retry_delay() -> u64 { 2 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Read the config file when it exists, otherwise start from defaults.
/// A file that exists but does not parse is an error.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_path();
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

impl AppConfig {
    /// File (or defaults), then environment overrides, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_or_default()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style variables. `lookup` is
    /// usually `std::env::var`; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("APP_HOST") { self.server.host = v; }
        if let Some(v) = non_empty("APP_PORT").and_then(|p| p.trim().parse().ok()) { self.server.port = v; }
        if let Some(v) = non_empty("TOKIO_WORKER_THREADS").and_then(|p| p.trim().parse().ok()) {
            self.server.worker_threads = Some(v);
        }

        let db = &mut self.database;
        if let Some(v) = non_empty("DATABASE_URL") { db.url = v; }
        if let Some(v) = non_empty("DB_HOST") { db.host = v; }
        if let Some(v) = non_empty("DB_PORT").and_then(|p| p.trim().parse().ok()) { db.port = v; }
        if let Some(v) = non_empty("DB_USER") { db.user = v; }
        if let Some(v) = lookup("DB_PASSWORD") { db.password = v; }
        if let Some(v) = non_empty("DB_NAME") { db.name = v; }
        if let Some(v) = non_empty("DB_CONNECT_RETRIES").and_then(|p| p.trim().parse().ok()) { db.connect_retries = v; }
        if let Some(v) = non_empty("DB_RETRY_DELAY_SECS").and_then(|p| p.trim().parse().ok()) { db.retry_delay_secs = v; }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill `url` from the individual parts when it was not given directly.
    /// User and password are percent-encoded into the userinfo.
    pub fn normalize(&mut self) -> Result<()> {
        if !self.url.trim().is_empty() {
            return Ok(());
        }
        let mut url = Url::parse(&format!("postgres://{}:{}/{}", self.host, self.port, self.name))
            .map_err(|e| anyhow!("cannot build database url from DB_* parts: {e}"))?;
        url.set_username(&self.user)
            .map_err(|_| anyhow!("database.user cannot be placed in a url"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| anyhow!("database.password cannot be placed in a url"))?;
        }
        self.url = url.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DB_* variables"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        if self.connect_retries == 0 {
            return Err(anyhow!("database.connect_retries must be >= 1"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
    pub fn acquire_timeout(&self) -> Duration { Duration::from_secs(self.acquire_timeout_secs) }
    pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout_secs) }
    pub fn max_lifetime(&self) -> Duration { Duration::from_secs(self.max_lifetime_secs) }
    pub fn retry_delay(&self) -> Duration { Duration::from_secs(self.retry_delay_secs) }

    /// Connection target without credentials, safe to log.
    pub fn redacted_target(&self) -> String {
        match self.url.rsplit_once('@') {
            Some((_, target)) => target.to_string(),
            None => self.url.clone(),
        }
    }
}
