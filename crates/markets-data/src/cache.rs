//! Memoization of warehouse fetches.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identity of a memoized call: the function plus its argument tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    function: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    /// Create a key for a function with no arguments yet.
    pub fn new(function: &'static str) -> Self {
        Self {
            function,
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Function part of the key.
    pub fn function(&self) -> &'static str {
        self.function
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.args.join(", "))
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Explicit memo cache for fetch results.
///
/// Values are stored behind `Arc` so every reader shares one immutable
/// snapshot. Entries live until invalidated or, when a TTL is set, until they
/// are older than the TTL. Each invalidation starts a new generation.
#[derive(Debug)]
pub struct MemoCache<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    ttl: Option<Duration>,
    generation: u64,
    stats: CacheStats,
}

impl<V> MemoCache<V> {
    /// Create a cache; `None` keeps entries until invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Get a live entry.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Store a value, replacing any previous entry.
    pub fn insert(&mut self, key: CacheKey, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CacheEntry {
                value: Arc::clone(&value),
                inserted_at: Instant::now(),
            },
        );
        value
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// A miss first evicts every expired entry. A failed computation stores
    /// nothing.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: CacheKey, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            self.stats.hits += 1;
            return Ok(value);
        }

        self.stats.misses += 1;
        self.clear_expired();
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.generation += 1;
        }
        removed
    }

    /// Drop every entry.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Remove expired entries.
    pub fn clear_expired(&mut self) {
        let Some(ttl) = self.ttl else {
            return;
        };
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < ttl);
    }

    /// Current generation, bumped on every invalidation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache stores nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted_at.elapsed() >= ttl,
            None => false,
        }
    }
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new(None)
    }
}
