//! Cache store abstraction and key scheme
//!
//! Two logical namespaces live in one store: fully-computed pages under
//! `{url}:page:{page}:{limit}:{filter}` and per-URL row totals under
//! `{url}:total`. Both use the same configured TTL but expire on independent
//! clocks; a page can legitimately outlive the total it was derived from.
//!
//! Store handles are acquired once per request via [`CacheProvider`] and
//! released when dropped, on every exit path.

use crate::config::RedisConfig;
use crate::error::{PagerError, Result};
use crate::models::PageRequest;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Placeholder standing in for an absent filter in page keys
const NO_FILTER_PLACEHOLDER: &str = "none";

/// Build the composite cache key for a fully-computed page
///
/// Plain field concatenation; two requests differing in any of url, page,
/// limit or filter never share an entry.
pub fn page_key(request: &PageRequest) -> String {
    format!(
        "{}:page:{}:{}:{}",
        request.url,
        request.page,
        request.limit,
        request.filter.as_deref().unwrap_or(NO_FILTER_PLACEHOLDER)
    )
}

/// Build the cache key for a URL's total data-row count
pub fn total_key(url: &str) -> String {
    format!("{}:total", url)
}

/// A per-request handle on the key-value store
///
/// `get`/`set` failures are reported as `PagerError::Cache`; callers treat a
/// failed read as a miss and a failed write as non-fatal. Dropping the handle
/// releases the underlying connection.
#[async_trait]
pub trait CacheStore: Send {
    /// Look up a string value by key
    async fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// Store a string value under a key with the given TTL in seconds
    async fn set(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

/// Hands out one [`CacheStore`] handle per inbound request
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Acquire a store handle scoped to the current request
    async fn acquire(&self) -> Result<Box<dyn CacheStore>>;
}

/// Redis-backed provider
pub struct RedisProvider {
    client: redis::Client,
}

impl RedisProvider {
    /// Create a provider for the configured Redis instance
    ///
    /// Connections are established lazily, one per acquired handle.
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url())
            .map_err(|e| PagerError::Cache(format!("invalid redis config: {}", e)))?;
        Ok(RedisProvider { client })
    }
}

#[async_trait]
impl CacheProvider for RedisProvider {
    async fn acquire(&self) -> Result<Box<dyn CacheStore>> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PagerError::Cache(format!("redis connect failed: {}", e)))?;
        Ok(Box::new(RedisStore { conn }))
    }
}

/// Redis-backed store handle
struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .get(key)
            .await
            .map_err(|e| PagerError::Cache(format!("redis get failed for {}: {}", key, e)))?;
        debug!(
            "Cache get key={} hit={}",
            key,
            if value.is_some() { "yes" } else { "no" }
        );
        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let _: () = self
            .conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e| PagerError::Cache(format!("redis set failed for {}: {}", key, e)))?;
        debug!("Cache set key={} ttl={}s", key, ttl_secs);
        Ok(())
    }
}

/// Entry in the in-memory store
#[derive(Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory provider with per-entry expiry
///
/// Used by tests and available as a single-process fallback; honors the same
/// TTL semantics as the Redis store.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

impl MemoryProvider {
    /// Create an empty in-memory provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    /// Whether the store holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheProvider for MemoryProvider {
    async fn acquire(&self) -> Result<Box<dyn CacheStore>> {
        Ok(Box::new(MemoryStore {
            entries: Arc::clone(&self.entries),
        }))
    }
}

/// Handle on the shared in-memory map
struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PagerError::Cache("memory store poisoned".to_string()))?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&mut self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PagerError::Cache("memory store poisoned".to_string()))?;

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }
}

/// Store that holds nothing
///
/// Stands in when acquiring a real store fails, so a request still completes
/// with the cache degraded to permanent misses.
pub struct NullStore;

#[async_trait]
impl CacheStore for NullStore {
    async fn get(&mut self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&mut self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Ok(())
    }
}
