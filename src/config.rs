//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Serialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TABLE: &str = "canvases";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Document store settings handed to the browser by `/api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSettings {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` when `SUPABASE_URL` or `SUPABASE_ANON_KEY` is unset.
    pub store: Option<StoreSettings>,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SUPABASE_URL` + `SUPABASE_ANON_KEY`: the store stays unconfigured
    ///   unless both are set
    /// - `CANVAS_TABLE`: default `canvases`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a port number or
    /// `SUPABASE_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let store = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                let url = url.trim_end_matches('/').to_owned();
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidUrl { var: "SUPABASE_URL", value: url });
                }
                let table = get("CANVAS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_owned());
                Some(StoreSettings { url, anon_key, table })
            }
            _ => None,
        };

        Ok(Self { port, store })
    }
}
