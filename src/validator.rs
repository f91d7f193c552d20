//! Request validation for the paginated-read endpoint
//!
//! Checks run in a fixed order and short-circuit on the first failure; the
//! order and the exact messages are part of the endpoint's contract.

use crate::config::PagerConfig;
use crate::error::{PagerError, Result};
use crate::models::PageRequest;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Which entry surface a request arrived on
///
/// The query surface (GET) applies configured defaults for omitted `limit`
/// and `page`; the body surface (POST) requires both and reports their
/// absence with the "is required and" message variants. All other checks are
/// identical across surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Query,
    Body,
}

/// Raw, untyped request fields as they arrived on the wire
///
/// Numeric fields stay strings here so that unparseable values flow through
/// the same validation checks as out-of-range ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPageRequest {
    pub url: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub filter: Option<String>,
}

/// Validates raw request fields into a `PageRequest`
pub struct RequestValidator {
    config: Arc<PagerConfig>,
}

impl RequestValidator {
    /// Create a new RequestValidator with the given configuration
    pub fn new(config: Arc<PagerConfig>) -> Self {
        RequestValidator { config }
    }

    /// Validate raw fields, producing a `PageRequest` or a 400-class failure
    ///
    /// Checks, in order:
    /// 1. `url` present and non-empty
    /// 2. `url` ends with ".csv"
    /// 3. `limit` parses to an integer greater than 0 (or defaults)
    /// 4. `limit` does not exceed the largest configured page size
    /// 5. `page` is at least 1 (or defaults)
    ///
    /// An empty `filter` string is normalized to no filter.
    pub fn validate(&self, raw: RawPageRequest, surface: Surface) -> Result<PageRequest> {
        let url = match raw.url {
            Some(url) if !url.is_empty() => url,
            _ => {
                debug!("Validation failed: url missing");
                return Err(PagerError::validation("url is required"));
            }
        };

        if !url.ends_with(".csv") {
            debug!("Validation failed: url={} lacks .csv suffix", url);
            return Err(PagerError::validation("url should be a link to csv file"));
        }

        let limit = match raw.limit {
            None => match surface {
                Surface::Query => self.config.default_limit(),
                Surface::Body => {
                    return Err(PagerError::validation(
                        "limit is required and should be greater than 0",
                    ));
                }
            },
            Some(value) => match value.trim().parse::<i64>() {
                Ok(limit) if limit > 0 => limit as u64,
                _ => {
                    debug!("Validation failed: limit={} not a positive integer", value);
                    return Err(PagerError::validation("limit should be greater than 0"));
                }
            },
        };

        let max_limit = self.config.max_limit();
        if limit > max_limit {
            debug!("Validation failed: limit={} exceeds max={}", limit, max_limit);
            return Err(PagerError::validation(format!(
                "limit should be less than or equal to {}",
                max_limit
            )));
        }

        let page = match raw.page {
            None => match surface {
                Surface::Query => 1,
                Surface::Body => {
                    return Err(PagerError::validation(
                        "page is required and should be greater than 0",
                    ));
                }
            },
            Some(value) => match value.trim().parse::<i64>() {
                Ok(page) if page >= 1 => page as u64,
                _ => {
                    debug!("Validation failed: page={} below 1", value);
                    return Err(PagerError::validation("page should be greater than 0"));
                }
            },
        };

        let filter = raw.filter.filter(|f| !f.is_empty());

        Ok(PageRequest {
            url,
            page,
            limit,
            filter,
        })
    }
}
