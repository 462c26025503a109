//! Spyglass Web - Stremio addon JSON server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Serves the Stremio addon surface: manifest, AI-driven catalogs, and the
//! settings-sealing endpoint. Every catalog response is remembered in app
//! state and served as-is while its TTL lasts.

pub mod handlers;
pub mod server;
pub mod stremio;

// Re-export main types
pub use server::{AppState, CatalogBackend, LiveBackend, router, run_server};
