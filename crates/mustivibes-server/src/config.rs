use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use mustivibes_backend::BackendConfig;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

/// Everything the console reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub utc_offset_minutes: i32,
    /// Browser origin allowed by CORS; any origin when unset.
    pub allowed_origin: Option<String>,
    pub backend: BackendConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let defaults = BackendConfig::default();

        let config = ServerConfig {
            host: text("MUSTIVIBES_HOST", "0.0.0.0"),
            port: parse(&lookup, "MUSTIVIBES_PORT", 4100)?,
            db_path: text("MUSTIVIBES_DB_PATH", "mustivibes-console.db").into(),
            jwt_secret: lookup("MUSTIVIBES_JWT_SECRET").unwrap_or_default(),
            session_ttl_hours: parse(&lookup, "MUSTIVIBES_SESSION_TTL_HOURS", 12)?,
            utc_offset_minutes: parse(&lookup, "MUSTIVIBES_UTC_OFFSET_MINUTES", 0)?,
            allowed_origin: lookup("MUSTIVIBES_ALLOWED_ORIGIN").filter(|v| !v.trim().is_empty()),
            backend: BackendConfig {
                core_url: text("MUSTIVIBES_CORE_API_URL", &defaults.core_url),
                social_url: text("MUSTIVIBES_SOCIAL_API_URL", &defaults.social_url),
                timeout: Duration::from_secs(parse(&lookup, "MUSTIVIBES_HTTP_TIMEOUT_SECS", 15)?),
                bulk_concurrency: parse(&lookup, "MUSTIVIBES_BULK_CONCURRENCY", defaults.bulk_concurrency)?,
            },
        };

        if config.session_ttl_hours <= 0 {
            bail!("MUSTIVIBES_SESSION_TTL_HOURS must be positive");
        }
        if config.utc_offset_minutes.abs() >= 24 * 60 {
            bail!("MUSTIVIBES_UTC_OFFSET_MINUTES must be within a day");
        }
        Ok(config)
    }

    /// Unset or still one of the sample values from `.env.example`.
    pub fn has_placeholder_secret(&self) -> bool {
        self.jwt_secret.trim().is_empty() || PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
