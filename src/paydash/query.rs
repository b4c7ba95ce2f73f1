//! # Query Cache
//!
//! A small request cache in front of the data access layer. Reads are issued
//! under a [`QueryKey`]; the cache memoizes the last good result per key and
//! hands it out until a mutation marks the key stale.
//!
//! ## Entry lifecycle
//!
//! ```text
//!   empty ──fetch──▶ in flight ──ok──▶ fresh ──invalidate──▶ stale
//!                       ▲  │                                  │
//!                       │  └──err──▶ (unchanged, retry next)  │
//!                       └─────────────────fetch───────────────┘
//! ```
//!
//! - **Fresh** entries are served without touching the fetcher.
//! - **In flight**: while one fetch for a key is outstanding, every other
//!   reader awaits the same shared future instead of starting a new fetch.
//! - **Invalidation** bumps the key's generation and detaches any in-flight
//!   fetch. A fetch that finishes under an older generation still answers the
//!   readers that were waiting on it, but its value is not memoized; the next
//!   reader starts a new fetch and so observes every write made before it.
//!
//! Failed fetches are never memoized. The last good value of a stale key stays
//! available through [`QueryClient::peek`] as placeholder data.

use crate::error::{DashError, Result};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub type QueryKey = &'static str;

/// The "all customers" read.
pub const CUSTOMERS_KEY: QueryKey = "customers";

type SharedFetch<T> = Shared<BoxFuture<'static, std::result::Result<T, Arc<DashError>>>>;

struct Entry<T> {
    data: Option<T>,
    stale: bool,
    generation: u64,
    in_flight: Option<SharedFetch<T>>,
    updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            data: None,
            stale: true,
            generation: 0,
            in_flight: None,
            updated_at: None,
        }
    }
}

/// Snapshot of a key's cache state, for loading indicators and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStatus {
    pub has_data: bool,
    pub is_stale: bool,
    pub is_fetching: bool,
    pub generation: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

pub struct QueryClient<T> {
    entries: Arc<Mutex<HashMap<QueryKey, Entry<T>>>>,
}

impl<T> Clone for QueryClient<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryClient<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> QueryClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized value for `key`, or runs `fetcher` to produce it.
    ///
    /// `fetcher` is only called when the key is neither fresh nor already being
    /// fetched. It is called with the cache locked, so it must only build the
    /// future and not call back into this client.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (pending, generation) = {
            let mut entries = self.lock();
            let entry = entries.entry(key).or_default();

            if !entry.stale {
                if let Some(data) = &entry.data {
                    debug!(key, "query cache hit");
                    return Ok(data.clone());
                }
            }

            match &entry.in_flight {
                Some(pending) => {
                    debug!(key, "joining in-flight query");
                    (pending.clone(), entry.generation)
                }
                None => {
                    debug!(key, generation = entry.generation, "starting query");
                    let pending = fetcher().map(|r| r.map_err(Arc::new)).boxed().shared();
                    entry.in_flight = Some(pending.clone());
                    (pending, entry.generation)
                }
            }
        };

        let outcome = pending.await;

        {
            let mut entries = self.lock();
            if let Some(entry) = entries.get_mut(key) {
                if entry.generation == generation {
                    entry.in_flight = None;
                    if let Ok(data) = &outcome {
                        entry.data = Some(data.clone());
                        entry.stale = false;
                        entry.updated_at = Some(Utc::now());
                    }
                } else {
                    debug!(key, generation, "discarding result of superseded query");
                }
            }
        }

        outcome.map_err(DashError::unshare)
    }

    /// Marks `key` stale so the next [`fetch`](Self::fetch) goes to the source.
    pub fn invalidate(&self, key: QueryKey) {
        let mut entries = self.lock();
        let entry = entries.entry(key).or_default();
        entry.stale = true;
        entry.generation += 1;
        entry.in_flight = None;
        debug!(key, generation = entry.generation, "query invalidated");
    }

    /// Last successfully fetched value, fresh or stale.
    pub fn peek(&self, key: QueryKey) -> Option<T> {
        self.lock().get(key).and_then(|e| e.data.clone())
    }

    pub fn status(&self, key: QueryKey) -> QueryStatus {
        let entries = self.lock();
        match entries.get(key) {
            Some(entry) => QueryStatus {
                has_data: entry.data.is_some(),
                is_stale: entry.stale,
                is_fetching: entry.in_flight.is_some(),
                generation: entry.generation,
                updated_at: entry.updated_at,
            },
            None => QueryStatus {
                has_data: false,
                is_stale: true,
                is_fetching: false,
                generation: 0,
                updated_at: None,
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
