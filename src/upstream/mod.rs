//! Upstream access
//!
//! Token management and authenticated HTTP access to the content API.

mod client;
mod token;

pub use client::{Upstream, UpstreamClient};
pub use token::{AccessToken, TokenManager};
