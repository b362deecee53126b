//! REST helpers for talking to this app's own server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since these endpoints
//! are only meaningful in the browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::store::{self, StoreConfig, StoreError};
use super::supabase::SupabaseStore;

/// Path of the endpoint serving the document store settings.
pub const CONFIG_ENDPOINT: &str = "/api/config";

#[cfg(any(test, feature = "hydrate"))]
fn config_request_failed_message(status: u16) -> String {
    format!("config request failed: {status}")
}

/// Fetch the document store settings from [`CONFIG_ENDPOINT`].
///
/// # Errors
///
/// Returns an error string if the request fails, the server has no store
/// configured, or the body is not a [`StoreConfig`].
pub async fn fetch_store_config() -> Result<StoreConfig, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(CONFIG_ENDPOINT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(config_request_failed_message(resp.status()));
        }
        resp.json::<StoreConfig>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Fetch the store settings and install the store client.
///
/// # Errors
///
/// Returns an error string if fetching or validating the settings fails.
pub async fn bootstrap_store() -> Result<(), String> {
    if store::store().is_ok() {
        return Ok(());
    }
    let config = fetch_store_config().await?;
    store::init_store(config).map_err(|e| e.to_string())?;
    if let Ok(client) = store::store() {
        log::info!("document store ready (table {})", client.config().table);
    }
    Ok(())
}

/// The store client, fetching its settings first if needed.
///
/// # Errors
///
/// Returns [`StoreError::NotConfigured`] when the settings can't be loaded.
pub async fn connected_store() -> Result<&'static SupabaseStore, StoreError> {
    if let Err(e) = bootstrap_store().await {
        log::error!("document store unavailable: {e}");
    }
    store::store()
}
