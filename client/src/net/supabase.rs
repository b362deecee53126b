//! `DocumentStore` over the Supabase (PostgREST) REST interface.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call fails with a transport error since the store
//! is only reached from the browser.
//!
//! Request construction (endpoint, query, headers, bodies) and response
//! interpretation are plain functions so they can be tested natively.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

#[cfg(any(test, feature = "hydrate"))]
use serde_json::{Value, json};

use super::store::{BoxFuture, DocumentId, DocumentStore, StoreConfig, StoreError};
use canvas::doc::Blob;

/// PostgREST error code for "no rows" on a single-object request.
#[cfg(any(test, feature = "hydrate"))]
const NO_ROWS_CODE: &str = "PGRST116";
/// HTTP status PostgREST answers single-object requests with when no row matches.
#[cfg(any(test, feature = "hydrate"))]
const NO_ROWS_STATUS: u16 = 406;
#[cfg(any(test, feature = "hydrate"))]
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
#[cfg(any(test, feature = "hydrate"))]
const RETURN_REPRESENTATION: &str = "return=representation";

/// Store client bound to one project and table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    config: StoreConfig,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    /// Headers for one call. `single_object` asks for a bare row instead of
    /// an array; `return_rows` asks the store to echo written rows.
    #[cfg(any(test, feature = "hydrate"))]
    fn headers(&self, single_object: bool, return_rows: bool) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("apikey", self.config.anon_key.clone()),
            ("Authorization", format!("Bearer {}", self.config.anon_key)),
            ("Content-Type", "application/json".to_owned()),
        ];
        if single_object {
            headers.push(("Accept", SINGLE_OBJECT.to_owned()));
        }
        if return_rows {
            headers.push(("Prefer", RETURN_REPRESENTATION.to_owned()));
        }
        headers
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn row_query(id: &DocumentId) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{id}"))]
}

#[cfg(any(test, feature = "hydrate"))]
fn load_query(id: &DocumentId) -> Vec<(&'static str, String)> {
    let mut query = row_query(id);
    query.push(("select", "canvas_data".to_owned()));
    query
}

#[cfg(any(test, feature = "hydrate"))]
fn create_body(now: &str) -> Value {
    json!({ "canvas_data": null, "created_at": now, "updated_at": now })
}

#[cfg(any(test, feature = "hydrate"))]
fn save_body(payload: Blob, now: &str) -> Value {
    json!({ "canvas_data": payload, "updated_at": now })
}

/// Whether a failed single-object response means "no such row".
#[cfg(any(test, feature = "hydrate"))]
fn is_not_found(status: u16, body: &str) -> bool {
    status == NO_ROWS_STATUS
        || serde_json::from_str::<Value>(body)
            .is_ok_and(|v| v.get("code").and_then(Value::as_str) == Some(NO_ROWS_CODE))
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_created_id(body: &Value) -> Result<DocumentId, StoreError> {
    match body.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Ok(DocumentId::new(s.clone())),
        Some(Value::Number(n)) => Ok(DocumentId::new(n.to_string())),
        _ => Err(StoreError::Decode("created row has no id".to_owned())),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_saved_rows(body: &Value, id: &DocumentId) -> Result<(), StoreError> {
    match body.as_array() {
        Some(rows) if rows.is_empty() => Err(StoreError::Missing(id.clone())),
        Some(_) => Ok(()),
        None => Err(StoreError::Decode("expected an array of updated rows".to_owned())),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_loaded(body: Value) -> Result<Option<Blob>, StoreError> {
    match body {
        Value::Object(mut row) => Ok(row.remove("canvas_data").filter(|v| !v.is_null())),
        other => Err(StoreError::Decode(format!("expected a row object, got {other}"))),
    }
}

impl DocumentStore for SupabaseStore {
    fn create_document(&self) -> BoxFuture<'_, Result<DocumentId, StoreError>> {
        Box::pin(async move {
            #[cfg(feature = "hydrate")]
            {
                http::create(self).await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                Err(server_unavailable())
            }
        })
    }

    fn save_document<'a>(&'a self, id: &'a DocumentId, payload: Blob) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            #[cfg(feature = "hydrate")]
            {
                http::save(self, id, payload).await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (id, payload);
                Err(server_unavailable())
            }
        })
    }

    fn load_document<'a>(&'a self, id: &'a DocumentId) -> BoxFuture<'a, Result<Option<Blob>, StoreError>> {
        Box::pin(async move {
            #[cfg(feature = "hydrate")]
            {
                http::load(self, id).await
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = id;
                Err(server_unavailable())
            }
        })
    }
}

#[cfg(not(feature = "hydrate"))]
fn server_unavailable() -> StoreError {
    StoreError::Transport("not available on server".to_owned())
}

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{Request, RequestBuilder, Response};

    use super::*;

    fn with_headers(builder: RequestBuilder, headers: &[(&'static str, String)]) -> RequestBuilder {
        headers.iter().fold(builder, |b, (k, v)| b.header(k, v))
    }

    fn transport(e: gloo_net::Error) -> StoreError {
        StoreError::Transport(e.to_string())
    }

    fn now_iso() -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }

    async fn failure(resp: Response) -> StoreError {
        let status = resp.status();
        let message = resp.text().await.unwrap_or_else(|_| resp.status_text());
        StoreError::Status { status, message }
    }

    async fn json_body(resp: Response) -> Result<Value, StoreError> {
        resp.json::<Value>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    pub(super) async fn create(store: &SupabaseStore) -> Result<DocumentId, StoreError> {
        let request = with_headers(Request::post(&store.table_url()), &store.headers(true, true))
            .json(&create_body(&now_iso()))
            .map_err(transport)?;
        let resp = request.send().await.map_err(transport)?;
        if !resp.ok() {
            let err = failure(resp).await;
            log::error!("creating canvas failed: {err}");
            return Err(err);
        }
        let id = parse_created_id(&json_body(resp).await?)?;
        log::info!("created canvas {id}");
        Ok(id)
    }

    pub(super) async fn save(store: &SupabaseStore, id: &DocumentId, payload: Blob) -> Result<(), StoreError> {
        let request = with_headers(Request::patch(&store.table_url()), &store.headers(false, true))
            .query(row_query(id).iter().map(|(k, v)| (*k, v)))
            .json(&save_body(payload, &now_iso()))
            .map_err(transport)?;
        let resp = request.send().await.map_err(transport)?;
        if !resp.ok() {
            let err = failure(resp).await;
            log::error!("saving canvas {id} failed: {err}");
            return Err(err);
        }
        parse_saved_rows(&json_body(resp).await?, id)?;
        log::info!("canvas saved successfully: {id}");
        Ok(())
    }

    pub(super) async fn load(store: &SupabaseStore, id: &DocumentId) -> Result<Option<Blob>, StoreError> {
        let resp = with_headers(Request::get(&store.table_url()), &store.headers(true, false))
            .query(load_query(id).iter().map(|(k, v)| (*k, v)))
            .send()
            .await
            .map_err(transport)?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if is_not_found(status, &body) {
                log::warn!("canvas {id} not found; starting blank");
                return Ok(None);
            }
            let err = StoreError::Status { status, message: body };
            log::error!("loading canvas {id} failed: {err}");
            return Err(err);
        }
        let payload = parse_loaded(json_body(resp).await?)?;
        if payload.is_none() {
            log::info!("canvas {id} has no saved data yet");
        }
        Ok(payload)
    }
}
