//! Pagination arithmetic
//!
//! Derives the page count reported alongside every page of results.

/// Number of pages needed to cover `total` data rows at `limit` rows per page
///
/// Exactly `total / limit` when the total divides evenly, otherwise one more
/// page for the remainder. A total of zero yields zero pages.
///
/// The total here is always the unfiltered row count: an active filter does
/// not change the reported page count.
pub fn page_count(total: u64, limit: u64) -> u64 {
    if total % limit == 0 {
        total / limit
    } else {
        total / limit + 1
    }
}
