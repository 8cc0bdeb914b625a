use std::path::Path;

use crate::Status;

use super::counters::*;

pub struct FetchCounters;

impl FetchCounters {
    pub fn page_fetched(page_nr: usize, pages_count: usize, location: &str) {
        counter(
            "catalog_page_fetched",
            &format!("Catalog page {page_nr}/{pages_count}: {location}"),
        )
    }

    pub fn wrap_ids_extracted(page_nr: usize, count: usize, total: usize) {
        counter(
            "catalog_wrap_ids_extracted",
            &format!("Catalog page {page_nr}: {count} wrapIDs ({total} so far)"),
        )
    }

    pub fn page_fetch_fail(page_nr: usize, status: &Status) {
        error_counter(
            "catalog_page_fetch_fail",
            &format!("Catalog page {page_nr} failed"),
            status,
        )
    }

    pub fn short_result(requested: usize, found: usize, status: &Status) {
        error_counter(
            "catalog_short_result",
            &format!("Requested {requested} wrapIDs, found {found}"),
            status,
        )
    }

    pub fn file_written(path: &Path, lines: usize) {
        counter(
            "wrap_id_file_written",
            &format!("Wrote {lines} lines to {}", path.display()),
        )
    }
}
