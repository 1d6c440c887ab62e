//! Quran Proxy - a caching proxy for the Quran Foundation content API
//!
//! Sits between the web front end and the OAuth-protected content API,
//! caching upstream payloads in independent TTL-partitioned categories and
//! assembling the merged chapter-detail record the front end consumes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
