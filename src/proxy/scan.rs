//! Bounded pagination scan
//!
//! The upstream API has no direct "chapters in this juz" endpoint, so the
//! grouping operation scans the juz's paginated verse listing and accumulates
//! distinct chapter ids. The scan trades completeness guarantees for bounded
//! latency: several independent stopping predicates guarantee termination
//! even against a pathological upstream.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::Result;

// == Scan Page ==
/// What the caller's page fetcher reports for one page.
#[derive(Debug, Clone)]
pub struct ScanPage {
    /// Chapter ids seen on the page, in any order, duplicates allowed
    pub chapter_ids: Vec<u32>,
    /// Whether upstream reports a further page
    pub has_next: bool,
}

// == Scan Budget ==
/// Stopping predicates for one scan. All are checked independently; the
/// first to trigger ends the scan.
#[derive(Debug, Clone)]
pub struct ScanBudget {
    /// Stop after this many consecutive pages with no new chapter id
    pub stall_pages: usize,
    /// Hard ceiling on pages fetched
    pub max_pages: usize,
    /// Wall-clock budget for the whole scan
    pub time_budget: Duration,
    /// Stop once this many distinct ids have been accumulated
    pub target_size: usize,
}

impl Default for ScanBudget {
    fn default() -> Self {
        Self {
            stall_pages: 2,
            max_pages: 20,
            time_budget: Duration::from_secs(10),
            // There are 114 chapters in total; no juz can contain more.
            target_size: 114,
        }
    }
}

// == Scan Stop ==
/// Why a scan ended. These are normal terminations, not failures; a scan
/// stopped early still yields a valid (possibly partial) accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// No new chapter id for `stall_pages` consecutive pages
    Stalled,
    /// Page ceiling reached
    PageCeiling,
    /// Wall-clock budget elapsed
    TimeBudget,
    /// Accumulated the full target set
    TargetReached,
    /// Upstream reported no further pages
    Exhausted,
}

// == Accumulating Scan ==
/// Fetches pages starting at 1 until a stopping predicate triggers,
/// accumulating distinct chapter ids.
///
/// Page fetch failures propagate and abort the scan; only the stopping
/// predicates produce partial results.
pub async fn accumulate_chapter_ids<F, Fut>(
    budget: &ScanBudget,
    mut fetch_page: F,
) -> Result<(BTreeSet<u32>, ScanStop)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<ScanPage>>,
{
    let started = Instant::now();
    let mut seen = BTreeSet::new();
    let mut stalled = 0usize;
    let mut page = 1u32;

    loop {
        if page as usize > budget.max_pages {
            return Ok((seen, ScanStop::PageCeiling));
        }
        if started.elapsed() >= budget.time_budget {
            return Ok((seen, ScanStop::TimeBudget));
        }

        let fetched = fetch_page(page).await?;

        let mut new_ids = 0usize;
        for id in fetched.chapter_ids {
            if seen.insert(id) {
                new_ids += 1;
            }
        }

        if seen.len() >= budget.target_size {
            return Ok((seen, ScanStop::TargetReached));
        }

        if new_ids == 0 {
            stalled += 1;
            if stalled >= budget.stall_pages {
                return Ok((seen, ScanStop::Stalled));
            }
        } else {
            stalled = 0;
        }

        if !fetched.has_next {
            return Ok((seen, ScanStop::Exhausted));
        }

        page += 1;
    }
}
