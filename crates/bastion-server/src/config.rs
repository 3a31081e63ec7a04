use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

/// Secrets that ship in sample files and must never sign real sessions.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "secret-key",
    "change-me",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const MIN_SECRET_LEN: usize = 32;

/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 8760;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Signed token in the cookie.
    Token,
    /// Server-side table in process memory.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub session_secret: String,
    pub session_backend: SessionBackend,
    pub session_ttl_hours: i64,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_secret = lookup("BASTION_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("BASTION_SESSION_SECRET is unset or still a placeholder; set it in .env or the environment");
        }
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("BASTION_SESSION_SECRET must be at least {} bytes", MIN_SECRET_LEN);
        }

        let session_backend = match lookup("BASTION_SESSION_BACKEND").as_deref() {
            None | Some("token") => SessionBackend::Token,
            Some("memory") => SessionBackend::Memory,
            Some(other) => bail!("BASTION_SESSION_BACKEND must be 'token' or 'memory', got '{}'", other),
        };

        let session_ttl_hours: i64 = lookup("BASTION_SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .map_err(|e| anyhow!("BASTION_SESSION_TTL_HOURS: {}", e))?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            bail!("BASTION_SESSION_TTL_HOURS must be between 1 and {}", MAX_SESSION_TTL_HOURS);
        }

        let db_path = lookup("BASTION_DB_PATH").unwrap_or_else(|| "bastion.db".into()).into();
        let host = lookup("BASTION_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port: u16 = lookup("BASTION_PORT")
            .unwrap_or_else(|| "5001".into())
            .parse()
            .map_err(|e| anyhow!("BASTION_PORT: {}", e))?;

        Ok(Self {
            session_secret,
            session_backend,
            session_ttl_hours,
            db_path,
            host,
            port,
        })
    }
}
