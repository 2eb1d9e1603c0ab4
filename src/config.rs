use std::time::Duration;

use anyhow::Context;
use crate::users::gateway::UpdateMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        }
    }
}

/// Pieces of a Postgres DSN, used when `DATABASE_URL` is not set.
#[derive(Debug, Clone)]
pub struct PostgresParts {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db: String,
    pub ssl: String,
}

impl PostgresParts {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.db, self.ssl
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub store_timeout: Duration,
    pub update_mode: UpdateMode,
    pub backend: StoreBackend,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => postgres_parts_from_env()?.url(),
        };
        let update_mode = match std::env::var("UPDATE_MODE") {
            Ok(v) => UpdateMode::parse(&v).context("parse UPDATE_MODE")?,
            Err(_) => UpdateMode::default(),
        };
        let backend = match std::env::var("STORE_BACKEND") {
            Ok(v) => StoreBackend::parse(&v)?,
            Err(_) => StoreBackend::Postgres,
        };

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            store_timeout: Duration::from_secs(env_or("STORE_TIMEOUT_SECS", 5)),
            update_mode,
            backend,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn postgres_parts_from_env() -> anyhow::Result<PostgresParts> {
    Ok(PostgresParts {
        host: std::env::var("POSTGRES_HOST").context("DATABASE_URL or POSTGRES_HOST must be set")?,
        port: env_or("POSTGRES_PORT", 5432),
        user: std::env::var("POSTGRES_USER").context("POSTGRES_USER must be set")?,
        password: std::env::var("POSTGRES_PASSWORD").unwrap_or_default(),
        db: std::env::var("POSTGRES_DB").context("POSTGRES_DB must be set")?,
        ssl: std::env::var("POSTGRES_SSL").unwrap_or_else(|_| "disable".into()),
    })
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_parts_compose_dsn() {
        let parts = PostgresParts {
            host: "db".into(),
            port: 5433,
            user: "app".into(),
            password: "secret".into(),
            db: "users".into(),
            ssl: "disable".into(),
        };
        assert_eq!(
            parts.url(),
            "postgres://app:secret@db:5433/users?sslmode=disable"
        );
    }

    #[test]
    fn store_backend_parses_known_names() {
        assert_eq!(StoreBackend::parse("Postgres").unwrap(), StoreBackend::Postgres);
        assert_eq!(StoreBackend::parse(" memory ").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("mysql").is_err());
    }
}
