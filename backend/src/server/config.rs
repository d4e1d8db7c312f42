//! Server settings loaded via OrthoConfig and the derived server config.
//!
//! Settings come from CLI flags, `MESS_*` environment variables and config
//! files. Optional values fall back to the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

use mess_backend::domain::{EXPIRING_SOON_DAYS, LocalCalendar};
use mess_backend::outbound::identity::IdentityKeys;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

/// Raw settings before validation.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MESS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark the session cookie `Secure`; defaults to on.
    pub cookie_secure: Option<bool>,
    /// Base URL of the hosted identity service.
    pub identity_url: Option<String>,
    /// Public API key sent with every identity request.
    pub identity_public_key: Option<String>,
    /// Service key used for admin password updates.
    pub identity_service_key: Option<String>,
    /// Identity request timeout in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Days ahead a membership counts as expiring on the dashboard.
    pub expiring_window_days: Option<i64>,
    /// Offset of the messes' local time east of UTC, in minutes.
    pub utc_offset_minutes: Option<i32>,
}

/// Reasons settings cannot be turned into a running configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid identity url `{value}`: {source}")]
    IdentityUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("expiring window must be between 0 and {max} days, got {days}")]
    WindowOutOfRange { days: i64, max: i64 },
    #[error("utc offset must be within a day, got {0} minutes")]
    UtcOffset(i32),
    #[error("failed to read session key at {path}: {source}")]
    SessionKey {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing(name))
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(&self.database_url, "database_url")
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn identity_url(&self) -> Result<Url, SettingsError> {
        let value = required(&self.identity_url, "identity_url")?;
        Url::parse(value).map_err(|source| SettingsError::IdentityUrl {
            value: value.to_owned(),
            source,
        })
    }

    pub fn identity_keys(&self) -> Result<IdentityKeys, SettingsError> {
        Ok(IdentityKeys {
            public_key: required(&self.identity_public_key, "identity_public_key")?.to_owned(),
            service_key: required(&self.identity_service_key, "identity_service_key")?.to_owned(),
        })
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn expiring_window_days(&self) -> Result<i64, SettingsError> {
        match self.expiring_window_days.unwrap_or(EXPIRING_SOON_DAYS) {
            days if (0..=EXPIRING_SOON_DAYS).contains(&days) => Ok(days),
            days => Err(SettingsError::WindowOutOfRange {
                days,
                max: EXPIRING_SOON_DAYS,
            }),
        }
    }

    /// Calendar used to decide the current day; UTC unless configured.
    pub fn calendar(&self) -> Result<LocalCalendar, SettingsError> {
        let minutes = self.utc_offset_minutes.unwrap_or(0);
        LocalCalendar::from_offset_minutes(minutes).ok_or(SettingsError::UtcOffset(minutes))
    }

    /// Read the session key, or generate one in debug builds and when
    /// ephemeral keys are explicitly allowed.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(source)
                if cfg!(debug_assertions) || self.session_allow_ephemeral.unwrap_or(false) =>
            {
                warn!(path = %path.display(), error = %source, "using temporary session key (dev only)");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::SessionKey { path, source }),
        }
    }
}

/// Validated inputs for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) expiring_window_days: i64,
    pub(crate) calendar: LocalCalendar,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            expiring_window_days: EXPIRING_SOON_DAYS,
            calendar: LocalCalendar::default(),
        }
    }

    /// Override the dashboard expiring window.
    #[must_use]
    pub fn with_expiring_window(mut self, days: i64) -> Self {
        self.expiring_window_days = days;
        self
    }

    /// Judge the current day on `calendar`.
    #[must_use]
    pub fn with_calendar(mut self, calendar: LocalCalendar) -> Self {
        self.calendar = calendar;
        self
    }
}
