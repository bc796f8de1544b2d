use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use pawfectly_db::DEFAULT_READER_POOL_SIZE;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub db_readers: usize,
    pub jwt_secret: String,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("PAWFECTLY_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("PAWFECTLY_JWT_SECRET is unset or still a placeholder");
        }

        let host = var("PAWFECTLY_HOST", "0.0.0.0");
        let port: u16 = var("PAWFECTLY_PORT", "8082")
            .parse()
            .context("PAWFECTLY_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        let db_readers: usize = var("PAWFECTLY_DB_READERS", &DEFAULT_READER_POOL_SIZE.to_string())
            .parse()
            .context("PAWFECTLY_DB_READERS must be a positive integer")?;
        if db_readers == 0 {
            bail!("PAWFECTLY_DB_READERS must be at least 1");
        }

        Ok(Self {
            addr,
            db_path: var("PAWFECTLY_DB_PATH", "pawfectly.db").into(),
            db_readers,
            jwt_secret,
            cors_origin: var("PAWFECTLY_CORS_ORIGIN", "http://localhost:3000"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("PAWFECTLY_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:8082".parse().unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("pawfectly.db"));
        assert_eq!(cfg.db_readers, DEFAULT_READER_POOL_SIZE);
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn rejects_missing_or_placeholder_secret() {
        assert!(config(&[]).is_err());
        assert!(config(&[("PAWFECTLY_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn rejects_bad_numbers() {
        let secret = ("PAWFECTLY_JWT_SECRET", "s3cret");
        assert!(config(&[secret, ("PAWFECTLY_PORT", "eighty")]).is_err());
        assert!(config(&[secret, ("PAWFECTLY_DB_READERS", "0")]).is_err());

        let cfg = config(&[secret, ("PAWFECTLY_HOST", "127.0.0.1"), ("PAWFECTLY_PORT", "9000")]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:9000".parse().unwrap());
    }
}
