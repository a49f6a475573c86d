//! In-memory key/value cache with per-entry time-to-live.
//!
//! Fronts every outbound metadata fetch. Each `set` schedules its own
//! eviction; overwriting a key cancels the previous timer, and `clear` cancels
//! all of them. Reads also check the deadline, so an entry is never returned
//! after it expires even if its timer has not run yet.

pub mod scheduler;

pub use scheduler::{Clock, Scheduler, TimerHandle, TokioClock, TokioScheduler};

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    /// Distinguishes this write from earlier writes to the same key.
    generation: u64,
    timer: Option<TimerHandle>,
}

impl<V> CacheEntry<V> {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

struct Inner<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    next_generation: AtomicU64,
}

impl<V> Inner<V> {
    /// Remove `key` only if it still holds the write identified by `generation`.
    fn evict(&self, key: &str, generation: u64) -> Option<CacheEntry<V>> {
        self.entries
            .remove_if(key, |_, entry| entry.generation == generation)
            .map(|(_, entry)| entry)
    }
}

/// Thread-safe TTL cache. Cloning shares the underlying store.
pub struct ExpiringCache<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache driven by tokio's clock and timers.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(TokioClock), Arc::new(TokioScheduler))
    }

    /// Create a cache with an explicit clock and scheduler.
    pub fn with_clock(clock: Arc<dyn Clock>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                clock,
                scheduler,
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Store `value` under `key`, evicting it after `ttl`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let expires_at = self.inner.clock.now() + ttl;

        let entry = CacheEntry {
            value,
            expires_at,
            generation,
            timer: None,
        };

        // The entry must exist before its timer can fire.
        if let Some(mut previous) = self.inner.entries.insert(key.clone(), entry) {
            previous.cancel_timer();
        }

        let weak: Weak<Inner<V>> = Arc::downgrade(&self.inner);
        let timer_key = key.clone();
        let timer = self.inner.scheduler.schedule(
            ttl,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if inner.evict(&timer_key, generation).is_some() {
                        tracing::trace!(key = %timer_key, "Cache entry expired");
                    }
                }
            }),
        );

        match self.inner.entries.get_mut(&key) {
            Some(mut current) if current.generation == generation => {
                current.timer = Some(timer);
            }
            // Already evicted or overwritten by a newer write.
            _ => timer.cancel(),
        }
    }

    /// Return the value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.inner.entries.get(key)?;
        if self.inner.clock.now() < entry.expires_at {
            return Some(entry.value.clone());
        }

        let generation = entry.generation;
        drop(entry);
        if let Some(mut stale) = self.inner.evict(key, generation) {
            stale.cancel_timer();
            tracing::trace!(key = %key, "Cache entry expired on read");
        }
        None
    }

    /// Remove a single entry, cancelling its timer.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.entries.remove(key).map(|(_, mut entry)| {
            entry.cancel_timer();
            entry.value
        })
    }

    /// Evict every entry and cancel all pending timers.
    pub fn clear(&self) {
        let mut cleared = 0usize;
        self.inner.entries.retain(|_, entry| {
            entry.cancel_timer();
            cleared += 1;
            false
        });
        tracing::debug!(entries = cleared, "Cache cleared");
    }

    /// Number of entries currently stored, including any awaiting eviction.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl<V> Default for ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
