//! Networking modules for the document store and the app server.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` defines the document store contract and its process-wide client,
//! `supabase` implements it over the remote REST interface, `memory` keeps
//! rows in process for tests, and `api` fetches the store settings from this
//! app's server at startup.

pub mod api;
pub mod memory;
pub mod store;
pub mod supabase;
