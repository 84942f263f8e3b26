use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub storage: StorageConfig,
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

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Deployment metadata reported by the health endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    #[serde(default)]
    pub environment: Option<String>,
}

/// Which persistence backing holds the guest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Database,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Some(Self::File),
            "database" | "db" | "postgres" => Some(Self::Database),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_file_path")]
    pub file_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::File, file_path: default_file_path() }
    }
}

fn default_file_path() -> String { "data/guests.json".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self { Self::with_url("") }
}

impl DatabaseConfig {
    /// Settings for a given URL with every pool knob at its default.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Read `CONFIG_PATH` (default `config.toml`) when present, otherwise build
/// everything from environment variables.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Fill the settings the file left at their defaults from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").or_else(|| lookup("SERVER_PORT")).and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok()) {
            self.server.worker_threads = Some(w);
        }
        if self.app.environment.is_none() {
            self.app.environment = lookup("APP_ENV");
        }
        if let Some(backend) = lookup("STORAGE_BACKEND").as_deref().and_then(StorageBackend::parse) {
            self.storage.backend = backend;
        }
        if let Some(path) = lookup("GUESTS_FILE") {
            self.storage.file_path = path;
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        match self.storage.backend {
            StorageBackend::File => {
                if self.storage.file_path.trim().is_empty() {
                    return Err(anyhow!("storage.file_path must not be empty"));
                }
            }
            StorageBackend::Database => self.database.validate()?,
        }
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
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_use_file_backend() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::File);
        assert_eq!(cfg.storage.file_path, "data/guests.json");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn parses_full_toml() {
        let cfg = from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [app]
            environment = "staging"

            [storage]
            backend = "database"

            [database]
            url = "postgres://u:p@localhost/rsvp"
            max_connections = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.app.environment.as_deref(), Some("staging"));
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.storage.file_path, "data/guests.json");
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 1);
    }

    #[test]
    fn partial_server_section_uses_defaults() {
        let mut cfg = from_toml_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);

        let cfg2 = from_toml_str("[server]\nhost = \"127.0.0.1\"\n").unwrap();
        assert_eq!(cfg2.server.port, 3000);

        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn database_backend_requires_url() {
        let mut cfg = from_toml_str("[storage]\nbackend = \"database\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn database_url_scheme_checked() {
        assert!(DatabaseConfig::with_url("mysql://x").validate().is_err());
        assert!(DatabaseConfig::with_url("postgres://x").validate().is_ok());
        assert!(DatabaseConfig::with_url("sqlite::memory:").validate().is_ok());
    }

    #[test]
    fn env_fills_settings() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_from(env(&[
            ("PORT", "4000"),
            ("APP_ENV", "production"),
            ("STORAGE_BACKEND", "database"),
            ("DATABASE_URL", "postgres://db/rsvp"),
            ("GUESTS_FILE", "/tmp/g.json"),
        ]));
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.app.environment.as_deref(), Some("production"));
        assert_eq!(cfg.storage.backend, StorageBackend::Database);
        assert_eq!(cfg.storage.file_path, "/tmp/g.json");
        assert_eq!(cfg.database.url, "postgres://db/rsvp");
    }

    #[test]
    fn file_url_wins_over_env() {
        let mut cfg = from_toml_str("[database]\nurl = \"postgres://file/rsvp\"\n").unwrap();
        cfg.apply_env_from(env(&[("DATABASE_URL", "postgres://env/rsvp")]));
        assert_eq!(cfg.database.url, "postgres://file/rsvp");
    }

    #[test]
    fn unknown_backend_name_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_from(env(&[("STORAGE_BACKEND", "redis")]));
        assert_eq!(cfg.storage.backend, StorageBackend::File);
    }

    #[test]
    fn env_only_database_gets_pool_defaults() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_from(env(&[("STORAGE_BACKEND", "postgres"), ("DATABASE_URL", "postgres://db/rsvp")]));
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.database.min_connections, 1);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn zero_port_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
