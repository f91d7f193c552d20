//! csv-pager
//!
//! A small HTTP service that serves windowed, optionally filtered, paginated
//! views over large CSV files living at remote URLs — without materializing a
//! whole file per response and without re-downloading it on every request.
//!
//! # Overview
//!
//! A request names a remote `.csv` URL, a 1-based page, a page size and an
//! optional substring filter. The service streams the remote file, parses
//! only as far as the requested row window, filters the windowed rows, and
//! responds with the selected records plus an exact page count. Fully
//! computed pages and per-URL row totals are written through to a Redis cache
//! with a shared TTL, so repeated requests within the TTL never touch the
//! origin.
//!
//! # Architecture
//!
//! - [`RequestValidator`]: checks and normalizes inbound parameters in a
//!   fixed, observable order
//! - [`CacheProvider`] / [`CacheStore`]: per-request handles on the key-value
//!   store (Redis in production, in-memory for tests)
//! - [`RemoteFetcher`]: buffered and streamed HTTP GETs under one hard timeout
//! - [`RowCountEstimator`]: cache-backed total-row count per URL
//! - [`csv_window::read_window`]: the streaming windowed parse with
//!   post-window filtering
//! - [`pagination::page_count`]: pure page arithmetic
//! - [`PagerService`]: composes the above and owns the write-through cache
//!   key scheme
//! - [`HttpServer`]: the `/api` read endpoint (GET and POST), `/health` and
//!   `/metrics`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use csv_pager::{MemoryProvider, PagerConfig, PagerMetrics, PagerService};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(PagerConfig::default());
//! let cache = Arc::new(MemoryProvider::new());
//! let metrics = PagerMetrics::new()?;
//! let service = PagerService::new(config, cache, metrics)?;
//! # let _ = service;
//! # Ok(())
//! # }
//! ```
//!
//! # Caching
//!
//! Two logical namespaces share one TTL but expire on independent clocks: a
//! page entry can outlive the row total it was derived from. Cache failures
//! never fail a request — reads degrade to misses and writes are dropped.
//!
//! # Known couplings
//!
//! The filter applies after windowing and the page count derives from the
//! unfiltered total, so a filtered page may report a page count that
//! overstates how many pages contain matches. This mirrors the windowing
//! contract deliberately; see DESIGN.md.

pub mod cache;
pub mod config;
pub mod csv_window;
pub mod error;
pub mod fetcher;
pub mod http_server;
pub mod metrics;
pub mod models;
pub mod pagination;
pub mod row_counter;
pub mod service;
pub mod validator;

// Re-export commonly used types
pub use cache::{CacheProvider, CacheStore, MemoryProvider, RedisProvider};
pub use config::{PagerConfig, RedisConfig};
pub use error::{PagerError, Result};
pub use fetcher::RemoteFetcher;
pub use http_server::HttpServer;
pub use metrics::PagerMetrics;
pub use models::{CsvRecord, PageRequest, PageResponse, RowWindow, MANDATORY_HEADERS};
pub use row_counter::RowCountEstimator;
pub use service::PagerService;
pub use validator::{RawPageRequest, RequestValidator, Surface};
