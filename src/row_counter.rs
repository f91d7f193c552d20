//! Total-row-count estimation for remote CSV files
//!
//! The total feeds the page count only. It is filter-independent and is
//! memoized per URL, so the expensive whole-file read happens at most once
//! per URL per TTL window.

use crate::cache::{total_key, CacheStore};
use crate::error::Result;
use crate::fetcher::RemoteFetcher;
use crate::metrics::PagerMetrics;
use tracing::{debug, info, warn};

/// Count data rows in a raw CSV body
///
/// Newline-delimited lines minus one for the header. Deliberately an
/// approximation of "records": trailing blank lines and embedded newlines
/// inside quoted fields are not corrected for.
pub fn count_data_rows(body: &str) -> u64 {
    (body.split('\n').count() as u64).saturating_sub(1)
}

/// Cache-backed estimator for a URL's total data-row count
pub struct RowCountEstimator {
    ttl_secs: u64,
    metrics: PagerMetrics,
}

impl RowCountEstimator {
    /// Create an estimator writing totals with the given TTL
    pub fn new(ttl_secs: u64, metrics: PagerMetrics) -> Self {
        RowCountEstimator { ttl_secs, metrics }
    }

    /// Estimate the total data-row count for a URL
    ///
    /// Returns the cached total when present. On a miss, fetches the entire
    /// remote body, counts rows, writes the total through with the TTL and
    /// returns it. A failed cache read degrades to a miss; a failed cache
    /// write is logged and ignored. Fetch failures propagate.
    pub async fn estimate(
        &self,
        fetcher: &RemoteFetcher,
        store: &mut dyn CacheStore,
        url: &str,
    ) -> Result<u64> {
        let key = total_key(url);

        match store.get(&key).await {
            Ok(Some(cached)) => match cached.parse::<u64>() {
                Ok(total) => {
                    debug!("Row total cache hit url={} total={}", url, total);
                    self.metrics.record_cache_hit("total");
                    return Ok(total);
                }
                Err(_) => {
                    warn!(
                        "Row total cache entry for url={} is not an integer ('{}'), recomputing",
                        url, cached
                    );
                }
            },
            Ok(None) => {
                debug!("Row total cache miss url={}", url);
            }
            Err(e) => {
                warn!("Row total cache read failed, treating as miss: {}", e);
            }
        }
        self.metrics.record_cache_miss("total");

        let body = fetcher.fetch_text(url).await?;
        self.metrics.record_fetch("buffered");
        let total = count_data_rows(&body);
        info!("Counted {} data rows for url={}", total, url);

        if let Err(e) = store.set(&key, &total.to_string(), self.ttl_secs).await {
            warn!("Row total cache write failed, continuing: {}", e);
        }

        Ok(total)
    }
}
