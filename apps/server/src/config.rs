use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Base URL of the REST document store; `None` selects the in-memory store.
    pub store_url: Option<String>,
    pub store_token: Option<String>,
    pub store_timeout: Duration,
    /// When set, only this uid is treated as signed in.
    pub admin_user_id: Option<String>,
    pub provision_missing: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store_url: None,
            store_token: None,
            store_timeout: Duration::from_millis(30000),
            admin_user_id: None,
            provision_missing: false,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr: SocketAddr = var("CMS_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid CMS_LISTEN_ADDR")?;
        let cors_allow = var("CMS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let store_timeout_ms: u64 = var("CMS_STORE_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .trim()
            .parse()
            .context("Invalid CMS_STORE_TIMEOUT_MS")?;
        let timeout_ms: u64 = var("CMS_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .trim()
            .parse()
            .context("Invalid CMS_REQUEST_TIMEOUT_MS")?;
        let provision_missing = var("CMS_PROVISION_MISSING")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            store_url: non_empty("CMS_STORE_URL"),
            store_token: non_empty("CMS_STORE_TOKEN"),
            store_timeout: Duration::from_millis(store_timeout_ms),
            admin_user_id: non_empty("CMS_ADMIN_USER_ID"),
            provision_missing,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
