//! Property tests for the streaming window reader

use csv_pager::csv_window::read_window;
use csv_pager::models::RowWindow;
use proptest::prelude::*;
use tokio_test::block_on;

const COUNTRIES: [&str; 4] = ["United Kingdom", "France", "Germany", "Japan"];

/// Generate a CSV body with all mandatory headers and per-row country picks
fn csv_strategy() -> impl Strategy<Value = (String, Vec<usize>)> {
    prop::collection::vec(0usize..COUNTRIES.len(), 0..120).prop_map(|picks| {
        let mut body = String::from(
            "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country",
        );
        for (i, pick) in picks.iter().enumerate() {
            body.push_str(&format!(
                "\n{n},S{n},ITEM {n},{n},2010-12-01,1.{n},C{n},{country}",
                n = i + 1,
                country = COUNTRIES[*pick],
            ));
        }
        (body, picks)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any window, the reader returns exactly the rows whose data-row
    /// index falls inside it, in file order, and never more than the window
    /// size.
    #[test]
    fn prop_window_selects_exactly_the_in_window_rows(
        (body, picks) in csv_strategy(),
        page in 1u64..8,
        limit in 1u64..30,
    ) {
        let window = RowWindow::for_page(page, limit);

        let records = block_on(read_window(body.as_bytes(), window, None)).unwrap();

        prop_assert!(records.len() as u64 <= limit);

        let total = picks.len() as u64;
        let expected = window.to.min(total).saturating_sub(window.from.min(total));
        prop_assert_eq!(records.len() as u64, expected);

        // File order is preserved and rows line up with their window position
        for (offset, record) in records.iter().enumerate() {
            let row_number = window.from + offset as u64 + 1;
            let row_number_str = row_number.to_string();
            prop_assert_eq!(record.get("InvoiceNo"), Some(row_number_str.as_str()));
        }
    }

    /// Filtering applies after windowing: the result is the in-window rows
    /// whose values contain the needle, compared case-insensitively.
    #[test]
    fn prop_filter_matches_in_window_rows_only(
        (body, picks) in csv_strategy(),
        page in 1u64..8,
        limit in 1u64..30,
        pick in 0usize..COUNTRIES.len(),
    ) {
        let window = RowWindow::for_page(page, limit);
        let needle = COUNTRIES[pick].to_lowercase();

        let records = block_on(read_window(body.as_bytes(), window, Some(&needle))).unwrap();

        let expected: Vec<u64> = picks
            .iter()
            .enumerate()
            .filter(|(i, p)| window.contains(*i as u64) && **p == pick)
            .map(|(i, _)| i as u64 + 1)
            .collect();

        prop_assert_eq!(records.len(), expected.len());
        for (record, row_number) in records.iter().zip(&expected) {
            let row_number_str = row_number.to_string();
            prop_assert_eq!(record.get("InvoiceNo"), Some(row_number_str.as_str()));
            prop_assert_eq!(record.get("Country"), Some(COUNTRIES[pick]));
        }
    }
}
