//! Core data models for the csv-pager service

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Column names every accepted CSV file must expose among its headers
///
/// Additional columns are permitted and passed through unchanged.
pub const MANDATORY_HEADERS: [&str; 8] = [
    "InvoiceNo",
    "StockCode",
    "Description",
    "Quantity",
    "InvoiceDate",
    "UnitPrice",
    "CustomerID",
    "Country",
];

/// A validated paginated-read request
///
/// Constructed once per inbound call by the validator; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// URL of the remote CSV file (guaranteed to end in ".csv")
    pub url: String,
    /// Requested page, 1-based
    pub page: u64,
    /// Page size, within the configured allowed range
    pub limit: u64,
    /// Optional case-insensitive substring filter (never empty when present)
    pub filter: Option<String>,
}

impl PageRequest {
    /// The contiguous data-row window selected by this request
    pub fn window(&self) -> RowWindow {
        RowWindow::for_page(self.page, self.limit)
    }
}

/// A half-open range `[from, to)` of zero-based data-row indices
///
/// Indices count data rows only; the header row is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    /// First selected data-row index (inclusive)
    pub from: u64,
    /// First excluded data-row index
    pub to: u64,
}

impl RowWindow {
    /// Compute the window for a 1-based page and a page size
    ///
    /// Saturates at `u64::MAX` instead of overflowing: an oversized page
    /// number produces a window past the end of any stream, which selects
    /// nothing.
    pub fn for_page(page: u64, limit: u64) -> Self {
        let from = page.saturating_sub(1).saturating_mul(limit);
        RowWindow {
            from,
            to: from.saturating_add(limit),
        }
    }

    /// Check whether a data-row index falls inside the window
    pub fn contains(&self, index: u64) -> bool {
        index >= self.from && index < self.to
    }

    /// Check whether a data-row index lies at or past the window's end
    ///
    /// Once true, no later row can be selected and the consumer may stop
    /// pulling from the stream.
    pub fn is_past(&self, index: u64) -> bool {
        index >= self.to
    }
}

/// One selected data row, as an ordered column-name to value mapping
///
/// Column order follows the header row of the source file. The type
/// serializes to a JSON object and deserializes back preserving that order,
/// so cached pages round-trip byte-identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    fields: Vec<(String, String)>,
}

impl CsvRecord {
    /// Build a record by zipping header names with row values
    ///
    /// Rows shorter than the header (permitted by the relaxed parse) pad the
    /// missing trailing fields with empty strings; surplus values without a
    /// header name are dropped.
    pub fn from_row<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut values = values.into_iter();
        let fields = headers
            .into_iter()
            .map(|h| (h.to_string(), values.next().unwrap_or("").to_string()))
            .collect();
        CsvRecord { fields }
    }

    /// Get a field value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Number of columns in this record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check whether any field value contains the given lowercase needle,
    /// case-insensitively
    ///
    /// The caller lowercases the needle once per request; each field value is
    /// lowercased here per comparison.
    pub fn matches_filter(&self, needle_lower: &str) -> bool {
        self.fields
            .iter()
            .any(|(_, value)| value.to_lowercase().contains(needle_lower))
    }

    /// Check whether this record's key set covers all mandatory headers
    pub fn has_mandatory_headers(&self) -> bool {
        MANDATORY_HEADERS
            .iter()
            .all(|required| self.fields.iter().any(|(name, _)| name == required))
    }
}

impl Serialize for CsvRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CsvRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = CsvRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of column names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    fields.push((name, value));
                }
                Ok(CsvRecord { fields })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// The assembled response for one page, also the page-cache value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Selected records in stream order
    pub results: Vec<CsvRecord>,
    /// Total page count derived from the unfiltered row total
    ///
    /// When a filter is active this may overstate how many pages actually
    /// contain matching rows; the filter applies after windowing and the
    /// total is filter-independent.
    #[serde(rename = "pageCount")]
    pub page_count: u64,
}
