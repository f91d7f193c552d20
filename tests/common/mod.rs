//! Shared helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use csv_pager::cache::{CacheProvider, CacheStore};
use csv_pager::{
    MemoryProvider, PagerConfig, PagerError, PagerMetrics, PagerService, RawPageRequest, Result,
};
use std::sync::Arc;

/// Build a service over a fresh in-memory cache
pub fn service_with_memory_cache() -> (PagerService, MemoryProvider) {
    let provider = MemoryProvider::new();
    let service = service_with_cache(Arc::new(provider.clone()));
    (service, provider)
}

/// Build a service over an arbitrary cache provider
pub fn service_with_cache(provider: Arc<dyn CacheProvider>) -> PagerService {
    PagerService::new(
        Arc::new(PagerConfig::default()),
        provider,
        PagerMetrics::new().unwrap(),
    )
    .unwrap()
}

/// Store whose reads and writes always fail
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get(&mut self, _key: &str) -> Result<Option<String>> {
        Err(PagerError::Cache("store unreachable".to_string()))
    }

    async fn set(&mut self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Err(PagerError::Cache("store unreachable".to_string()))
    }
}

/// Provider handing out [`BrokenStore`] handles
pub struct BrokenStoreProvider;

#[async_trait]
impl CacheProvider for BrokenStoreProvider {
    async fn acquire(&self) -> Result<Box<dyn CacheStore>> {
        Ok(Box::new(BrokenStore))
    }
}

/// Provider that cannot hand out store handles at all
pub struct UnavailableProvider;

#[async_trait]
impl CacheProvider for UnavailableProvider {
    async fn acquire(&self) -> Result<Box<dyn CacheStore>> {
        Err(PagerError::Cache("connect refused".to_string()))
    }
}

/// Build raw request fields for a URL with optional overrides
pub fn raw_request(url: &str, page: Option<&str>, limit: Option<&str>, filter: Option<&str>) -> RawPageRequest {
    RawPageRequest {
        url: Some(url.to_string()),
        page: page.map(str::to_string),
        limit: limit.map(str::to_string),
        filter: filter.map(str::to_string),
    }
}

/// A CSV body carrying all mandatory headers plus one extra column
///
/// Row values embed the row number; every odd row's Country is
/// "United Kingdom" and every even row's is "France". No trailing newline,
/// so the estimated row total equals `rows` exactly.
pub fn sample_csv(rows: usize) -> String {
    let mut body = String::from(
        "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country,Extra",
    );
    for i in 1..=rows {
        let country = if i % 2 == 1 { "United Kingdom" } else { "France" };
        body.push_str(&format!(
            "\n{i},S{i},ITEM {i},{i},2010-12-01,1.{i},C{i},{country},x"
        ));
    }
    body
}
