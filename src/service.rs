//! End-to-end orchestration of the paginated-read flow
//!
//! Sequencing for a request: validate, look up the composite page key, and on
//! a hit return the cached page verbatim without touching the fetcher,
//! estimator or parser. On a miss: estimate the unfiltered row total
//! (cache-backed), stream the remote file through the windowed parse, check
//! for the empty and missing-header conditions, derive the page count, write
//! the assembled page through, and respond.
//!
//! One cache store handle is acquired per request and released when it drops,
//! on every exit path. Cache read failures degrade to misses and write
//! failures are logged and ignored; the cache never decides correctness.
//!
//! Nothing serializes concurrent misses on the same key: two identical
//! requests racing past the cache both fetch and parse independently.

use crate::cache::{page_key, CacheProvider, CacheStore, NullStore};
use crate::config::PagerConfig;
use crate::csv_window::read_window;
use crate::error::{PagerError, Result};
use crate::fetcher::RemoteFetcher;
use crate::metrics::PagerMetrics;
use crate::models::PageResponse;
use crate::pagination::page_count;
use crate::row_counter::RowCountEstimator;
use crate::validator::{RawPageRequest, RequestValidator, Surface};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The request-handling engine behind the read endpoint
pub struct PagerService {
    config: Arc<PagerConfig>,
    validator: RequestValidator,
    fetcher: RemoteFetcher,
    estimator: RowCountEstimator,
    cache: Arc<dyn CacheProvider>,
    metrics: PagerMetrics,
}

impl PagerService {
    /// Create a new PagerService over the given cache provider
    pub fn new(
        config: Arc<PagerConfig>,
        cache: Arc<dyn CacheProvider>,
        metrics: PagerMetrics,
    ) -> Result<Self> {
        let fetcher = RemoteFetcher::new(Duration::from_millis(config.fetch_timeout_ms))?;
        let estimator = RowCountEstimator::new(config.cache_ttl, metrics.clone());
        let validator = RequestValidator::new(Arc::clone(&config));

        Ok(PagerService {
            config,
            validator,
            fetcher,
            estimator,
            cache,
            metrics,
        })
    }

    /// Access the service's metrics collector
    pub fn metrics(&self) -> &PagerMetrics {
        &self.metrics
    }

    /// Handle one paginated-read request end to end
    pub async fn handle(&self, raw: RawPageRequest, surface: Surface) -> Result<PageResponse> {
        let surface_label = match surface {
            Surface::Query => "query",
            Surface::Body => "body",
        };
        self.metrics.record_request(surface_label);

        let result = self.handle_inner(raw, surface).await;

        if let Err(e) = &result {
            let outcome = match e {
                PagerError::Validation(_) => "validation_error",
                PagerError::NotFound => "not_found",
                PagerError::SchemaError => "schema_error",
                _ => "upstream_error",
            };
            self.metrics.record_outcome(outcome);
        }

        result
    }

    async fn handle_inner(
        &self,
        raw: RawPageRequest,
        surface: Surface,
    ) -> Result<PageResponse> {
        let request = self.validator.validate(raw, surface)?;

        // One store handle for the whole request; released on drop. A failed
        // acquisition degrades the cache to permanent misses instead of
        // failing the read.
        let mut store: Box<dyn CacheStore> = match self.cache.acquire().await {
            Ok(store) => store,
            Err(e) => {
                warn!("Cache unavailable, serving without it: {}", e);
                Box::new(NullStore)
            }
        };

        let key = page_key(&request);
        match store.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<PageResponse>(&cached) {
                Ok(page) => {
                    debug!("Page cache hit key={}", key);
                    self.metrics.record_cache_hit("page");
                    self.metrics.record_outcome("hit");
                    return Ok(page);
                }
                Err(e) => {
                    warn!("Page cache entry for key={} is corrupt, recomputing: {}", key, e);
                }
            },
            Ok(None) => {
                debug!("Page cache miss key={}", key);
            }
            Err(e) => {
                warn!("Page cache read failed, treating as miss: {}", e);
            }
        }
        self.metrics.record_cache_miss("page");

        let total = self
            .estimator
            .estimate(&self.fetcher, store.as_mut(), &request.url)
            .await?;

        let stream = self.fetcher.fetch_stream(&request.url).await?;
        self.metrics.record_fetch("streamed");

        let results = read_window(stream, request.window(), request.filter.as_deref()).await?;

        // Empty window (or nothing surviving the filter) is the 404 condition
        // and is never cached; the header check only applies to non-empty
        // results.
        if results.is_empty() {
            return Err(PagerError::NotFound);
        }
        if !results[0].has_mandatory_headers() {
            return Err(PagerError::SchemaError);
        }

        let response = PageResponse {
            results,
            // Derived from the unfiltered total: with a filter active this
            // can overstate the number of pages that contain matches.
            page_count: page_count(total, request.limit),
        };

        match serde_json::to_string(&response) {
            Ok(encoded) => {
                if let Err(e) = store.set(&key, &encoded, self.config.cache_ttl).await {
                    warn!("Page cache write failed, continuing: {}", e);
                }
            }
            Err(e) => {
                warn!("Failed to encode page for caching, continuing: {}", e);
            }
        }

        info!(
            "Computed page url={} page={} limit={} results={} pageCount={}",
            request.url,
            request.page,
            request.limit,
            response.results.len(),
            response.page_count
        );
        self.metrics.record_outcome("computed");

        Ok(response)
    }
}
