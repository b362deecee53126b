//! Document store contract shared by the landing page and the editor.
//!
//! SYSTEM CONTEXT
//! ==============
//! A document is one row in the remote `canvases` table: an opaque id plus a
//! nullable serialized scene. Callers talk to the store only through
//! [`DocumentStore`]; the browser build installs a [`SupabaseStore`] once at
//! startup via [`init_store`] and every page reaches it through [`store`].
//!
//! ERROR HANDLING
//! ==============
//! "Not found" is not an error for loads: a missing row or a `NULL` payload
//! both come back as `Ok(None)`. Everything else is a [`StoreError`], which
//! pages turn into user-facing messages.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::supabase::SupabaseStore;
use canvas::doc::Blob;

/// Default remote table holding canvas documents.
pub const DEFAULT_TABLE: &str = "canvases";

/// Boxed future for store calls. No `Send` bound; the browser is single-threaded.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Opaque, URL-safe document identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document store is not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("store responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("document {0} does not exist")]
    Missing(DocumentId),
    #[error("unexpected store response: {0}")]
    Decode(String),
}

/// Persistence operations on canvas documents.
pub trait DocumentStore {
    /// Insert a new row with an empty payload and return its id.
    fn create_document(&self) -> BoxFuture<'_, Result<DocumentId, StoreError>>;

    /// Overwrite the whole payload of an existing row.
    fn save_document<'a>(&'a self, id: &'a DocumentId, payload: Blob) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Fetch the payload of a row. `Ok(None)` when the row is absent or blank.
    fn load_document<'a>(&'a self, id: &'a DocumentId) -> BoxFuture<'a, Result<Option<Blob>, StoreError>>;
}

/// Connection settings for the remote store, as served by `/api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key.
    pub anon_key: String,
    /// Table name.
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_owned()
}

/// Rejected store configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("store url must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),
    #[error("store api key is empty")]
    MissingKey,
    #[error("store table name is empty")]
    MissingTable,
}

impl StoreConfig {
    /// Check the settings and normalize the URL (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid field.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let url = self.url.trim().trim_end_matches('/').to_owned();
        let host = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"));
        if host.is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidUrl(self.url));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::MissingTable);
        }
        self.url = url;
        Ok(self)
    }
}

static STORE: OnceLock<SupabaseStore> = OnceLock::new();

/// Install the process-wide store client. Later calls keep the first client.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is invalid.
pub fn init_store(config: StoreConfig) -> Result<(), ConfigError> {
    let config = config.validated()?;
    if STORE.set(SupabaseStore::new(config)).is_err() {
        log::warn!("document store already initialized; keeping the existing client");
    }
    Ok(())
}

/// The process-wide store client.
///
/// # Errors
///
/// Returns [`StoreError::NotConfigured`] before [`init_store`] succeeds.
pub fn store() -> Result<&'static SupabaseStore, StoreError> {
    STORE.get().ok_or(StoreError::NotConfigured)
}
