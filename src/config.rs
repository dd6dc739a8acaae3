// src/config.rs

//! Typed application settings read from the environment (and `.env`).

use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const DEFAULT_DATABASE_PATH: &str = "commission_desk.sqlite3";
pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be set when {because} is set")]
    MissingValue {
        key: &'static str,
        because: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub publishable_key: String,
    pub connect_client_id: String,
    /// Base URL of the backend serving `/api/stripe/*`.
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub database_path: String,
    /// Public origin of this app, used to build OAuth redirect targets.
    pub site_origin: String,
    pub supabase: SupabaseConfig,
    pub stripe: StripeConfig,
    /// Serve the sample contracts from memory instead of the hosted table.
    pub demo_contracts: bool,
    pub session_ttl_secs: i64,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Build from process environment variables.
    ///
    /// All keys are optional:
    /// - `BIND_ADDR` (127.0.0.1:3000), `MAX_WORKERS` (8), `DATABASE_PATH`
    /// - `SITE_ORIGIN`: defaults to `http://{BIND_ADDR}`
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`
    /// - `STRIPE_PUBLISHABLE_KEY`, `STRIPE_CONNECT_CLIENT_ID`, `PAYMENTS_API_BASE`
    ///   (`PAYMENTS_API_BASE` falls back to `SITE_ORIGIN` only while
    ///   `STRIPE_CONNECT_CLIENT_ID` is unset)
    /// - `DEMO_CONTRACTS` (`true`/`1`), `SESSION_TTL_SECS`, `HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let max_workers = parse_or(&get, "MAX_WORKERS", DEFAULT_MAX_WORKERS)?;
        if max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_WORKERS",
                value: "0".into(),
            });
        }

        let site_origin = get("SITE_ORIGIN")
            .unwrap_or_else(|| format!("http://{bind_addr}"))
            .trim_end_matches('/')
            .to_string();

        let supabase = SupabaseConfig {
            url: get("SUPABASE_URL")
                .unwrap_or_else(|| "https://your-project.supabase.co".into())
                .trim_end_matches('/')
                .to_string(),
            anon_key: get("SUPABASE_ANON_KEY").unwrap_or_else(|| "your-anon-key".into()),
        };

        let connect_client_id = get("STRIPE_CONNECT_CLIENT_ID");
        let api_base = match (get("PAYMENTS_API_BASE"), &connect_client_id) {
            (Some(base), _) => base,
            (None, Some(_)) => {
                return Err(ConfigError::MissingValue {
                    key: "PAYMENTS_API_BASE",
                    because: "STRIPE_CONNECT_CLIENT_ID",
                })
            }
            (None, None) => site_origin.clone(),
        };

        let stripe = StripeConfig {
            publishable_key: get("STRIPE_PUBLISHABLE_KEY")
                .unwrap_or_else(|| "pk_test_your_key_here".into()),
            connect_client_id: connect_client_id.unwrap_or_else(|| "ca_your_client_id".into()),
            api_base: api_base.trim_end_matches('/').to_string(),
        };

        let demo_contracts = match get("DEMO_CONTRACTS").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "DEMO_CONTRACTS",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            max_workers,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into()),
            site_origin,
            supabase,
            stripe,
            demo_contracts,
            session_ttl_secs: parse_or(&get, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            http_timeout_secs: parse_or(&get, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
