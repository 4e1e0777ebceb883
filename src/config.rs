use std::str::FromStr;

use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND {other:?} (expected postgres or memory)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub seed_on_startup: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=postgres");
        }

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "APP_PORT", 8080)?;
        let api_prefix = normalize_prefix(&lookup("API_PREFIX").unwrap_or_else(|| "/api".into()));
        let seed_on_startup = match lookup("SEED_ON_STARTUP") {
            Some(v) => parse_flag(&v).with_context(|| format!("SEED_ON_STARTUP={v:?}"))?,
            None => true,
        };

        Ok(Self {
            store_backend,
            database_url,
            db_max_connections,
            host,
            port,
            api_prefix,
            seed_on_startup,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid {key}={v:?}")),
        None => Ok(default),
    }
}

fn parse_flag(v: &str) -> anyhow::Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}

// "" and "/" both mean "mount at the root"; otherwise a leading slash and no trailing one.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_for_memory_backend() {
        let c = cfg(&[("STORE_BACKEND", "memory")]).unwrap();
        assert_eq!(c.store_backend, StoreBackend::Memory);
        assert_eq!(c.listen_addr(), "0.0.0.0:8080");
        assert_eq!(c.api_prefix, "/api");
        assert_eq!(c.db_max_connections, 10);
        assert!(c.seed_on_startup);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(cfg(&[]).is_err());
        let c = cfg(&[("DATABASE_URL", "postgres://localhost/rony")]).unwrap();
        assert_eq!(c.store_backend, StoreBackend::Postgres);
        assert_eq!(c.database_url.as_deref(), Some("postgres://localhost/rony"));
    }

    #[test]
    fn prefix_is_normalized() {
        let c = cfg(&[("STORE_BACKEND", "memory"), ("API_PREFIX", "v2/")]).unwrap();
        assert_eq!(c.api_prefix, "/v2");
        let c = cfg(&[("STORE_BACKEND", "memory"), ("API_PREFIX", "/")]).unwrap();
        assert_eq!(c.api_prefix, "");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(cfg(&[("STORE_BACKEND", "mongo")]).is_err());
        assert!(cfg(&[("STORE_BACKEND", "memory"), ("APP_PORT", "eighty")]).is_err());
        assert!(cfg(&[("STORE_BACKEND", "memory"), ("SEED_ON_STARTUP", "maybe")]).is_err());
        let c = cfg(&[("STORE_BACKEND", "memory"), ("SEED_ON_STARTUP", "off")]).unwrap();
        assert!(!c.seed_on_startup);
    }
}
