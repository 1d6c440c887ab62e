//! Ordered candidate fallback
//!
//! Several upstream resources are interchangeable for our purposes (e.g.
//! alternative translation editions), but availability per chapter varies.
//! This combinator tries an ordered candidate list and takes the first
//! non-empty result, swallowing and logging per-candidate failures.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::Result;

/// Tries `fetch` for each candidate in order; returns the first candidate id
/// together with its non-empty result set.
///
/// A candidate that fails or returns an empty set is skipped; later
/// candidates are never probed once one succeeds. Returns `None` when the
/// whole list is exhausted.
pub async fn first_non_empty<T, F, Fut>(candidates: &[u32], mut fetch: F) -> Option<(u32, Vec<T>)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    for &candidate in candidates {
        match fetch(candidate).await {
            Ok(items) if !items.is_empty() => return Some((candidate, items)),
            Ok(_) => {
                debug!(resource = candidate, "Candidate returned no items, trying next");
            }
            Err(err) => {
                warn!(resource = candidate, error = %err, "Candidate fetch failed, trying next");
            }
        }
    }
    None
}
