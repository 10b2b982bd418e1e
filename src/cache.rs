//! Model list cache with an optional time-to-live

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{TokemonError, TokemonResult};

// Global cache statistics for easier access
static CACHE_HITS: AtomicUsize = AtomicUsize::new(0);
static CACHE_MISSES: AtomicUsize = AtomicUsize::new(0);

/// Shared, immutable snapshot of a provider's model names
pub type ModelList = Arc<[String]>;

/// Statistics for model list caches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl CacheStats {
    /// Get global cache statistics
    pub fn global() -> Self {
        Self {
            hits: CACHE_HITS.load(Ordering::Relaxed),
            misses: CACHE_MISSES.load(Ordering::Relaxed),
        }
    }
}

/// Cached model list and the moment it was fetched
#[derive(Debug)]
struct CacheEntry {
    models: ModelList,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.fetched_at.elapsed() < ttl,
            None => true,
        }
    }
}

/// Single-slot cache for a provider's model list
///
/// A `None` time-to-live keeps the first snapshot for the lifetime of the
/// cache. Replacing an entry swaps the whole list, so readers never see a
/// partially updated sequence.
#[derive(Debug)]
pub struct ModelCache {
    ttl: Option<Duration>,
    entry: Mutex<Option<CacheEntry>>,
    local_hits: AtomicUsize,
    local_misses: AtomicUsize,
}

impl ModelCache {
    /// Create an empty cache
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
            local_hits: AtomicUsize::new(0),
            local_misses: AtomicUsize::new(0),
        }
    }

    /// Time-to-live of cached lists
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Get the cached list if it has not expired
    pub fn get(&self) -> TokemonResult<Option<ModelList>> {
        let entry = self.entry.lock().map_err(|_| TokemonError::CacheLockError)?;
        let result = entry
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.models.clone());

        self.record(result.is_some());
        Ok(result)
    }

    /// Replace the cached list
    pub fn store(&self, models: Vec<String>) -> TokemonResult<ModelList> {
        let models: ModelList = models.into();
        let mut entry = self.entry.lock().map_err(|_| TokemonError::CacheLockError)?;
        *entry = Some(CacheEntry {
            models: models.clone(),
            fetched_at: Instant::now(),
        });

        Ok(models)
    }

    /// Get the cached list, fetching and storing a new one when missing or
    /// expired. The lock is released while fetching, so readers never wait
    /// on the vendor. When concurrent misses race, the first list stored
    /// while still fresh wins.
    pub fn get_or_try_fetch<F>(&self, fetch: F) -> TokemonResult<ModelList>
    where
        F: FnOnce() -> TokemonResult<Vec<String>>,
    {
        if let Some(models) = self.get()? {
            return Ok(models);
        }

        let fetched: ModelList = fetch()?.into();
        let mut entry = self.entry.lock().map_err(|_| TokemonError::CacheLockError)?;
        if let Some(current) = entry.as_ref().filter(|entry| entry.is_fresh(self.ttl)) {
            return Ok(current.models.clone());
        }

        *entry = Some(CacheEntry {
            models: fetched.clone(),
            fetched_at: Instant::now(),
        });
        Ok(fetched)
    }

    /// Drop the cached list so the next read fetches again
    pub fn invalidate(&self) -> TokemonResult<()> {
        let mut entry = self.entry.lock().map_err(|_| TokemonError::CacheLockError)?;
        *entry = None;
        Ok(())
    }

    /// Get cache statistics
    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.local_hits.load(Ordering::Relaxed),
            misses: self.local_misses.load(Ordering::Relaxed),
        }
    }

    fn record(&self, hit: bool) {
        tracing::debug!(hit, "model cache lookup");
        if hit {
            self.local_hits.fetch_add(1, Ordering::Relaxed);
            CACHE_HITS.fetch_add(1, Ordering::Relaxed);
        } else {
            self.local_misses.fetch_add(1, Ordering::Relaxed);
            CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
        }
    }
}
