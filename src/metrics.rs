//! Prometheus metrics for the pager service

use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Runtime metrics, registered against an owned registry
#[derive(Clone)]
pub struct PagerMetrics {
    registry: Arc<Registry>,

    /// Read requests by entry surface (query/body)
    pub requests_total: Arc<CounterVec>,

    /// Responses by outcome (hit, computed, validation_error, not_found,
    /// schema_error, upstream_error)
    pub responses_total: Arc<CounterVec>,

    /// Cache hits by namespace (page/total)
    pub cache_hits_total: Arc<CounterVec>,

    /// Cache misses by namespace (page/total)
    pub cache_misses_total: Arc<CounterVec>,

    /// Remote fetches by mode (buffered/streamed)
    pub remote_fetches_total: Arc<CounterVec>,
}

impl PagerMetrics {
    /// Create metrics with a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("csv_pager_requests_total", "Total read requests received"),
            &["surface"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let responses_total = CounterVec::new(
            Opts::new("csv_pager_responses_total", "Responses by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(responses_total.clone()))?;

        let cache_hits_total = CounterVec::new(
            Opts::new("csv_pager_cache_hits_total", "Cache hits by namespace"),
            &["namespace"],
        )?;
        registry.register(Box::new(cache_hits_total.clone()))?;

        let cache_misses_total = CounterVec::new(
            Opts::new("csv_pager_cache_misses_total", "Cache misses by namespace"),
            &["namespace"],
        )?;
        registry.register(Box::new(cache_misses_total.clone()))?;

        let remote_fetches_total = CounterVec::new(
            Opts::new(
                "csv_pager_remote_fetches_total",
                "Remote CSV fetches by mode",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(remote_fetches_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total: Arc::new(requests_total),
            responses_total: Arc::new(responses_total),
            cache_hits_total: Arc::new(cache_hits_total),
            cache_misses_total: Arc::new(cache_misses_total),
            remote_fetches_total: Arc::new(remote_fetches_total),
        })
    }

    /// Record an inbound read request
    pub fn record_request(&self, surface: &str) {
        self.requests_total.with_label_values(&[surface]).inc();
    }

    /// Record a response outcome
    pub fn record_outcome(&self, outcome: &str) {
        self.responses_total.with_label_values(&[outcome]).inc();
    }

    /// Record a cache hit for a namespace
    pub fn record_cache_hit(&self, namespace: &str) {
        self.cache_hits_total.with_label_values(&[namespace]).inc();
    }

    /// Record a cache miss for a namespace
    pub fn record_cache_miss(&self, namespace: &str) {
        self.cache_misses_total
            .with_label_values(&[namespace])
            .inc();
    }

    /// Record a remote fetch
    pub fn record_fetch(&self, mode: &str) {
        self.remote_fetches_total.with_label_values(&[mode]).inc();
    }

    /// Render all registered metrics in Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics not utf-8: {}", e)))
    }
}
