use std::cmp::Reverse;

use crate::api::CountryRecord;

/// Order records by cumulative cases, highest first.
///
/// Returns a new vector; the input is left untouched. Equal counts keep
/// their input order and missing counts sort as zero.
pub fn sort_by_cases(records: &[CountryRecord]) -> Vec<CountryRecord> {
    let mut sorted = records.to_vec();
    // slice::sort_by_key is stable
    sorted.sort_by_key(|record| Reverse(record.counters.cases.unwrap_or(0)));
    sorted
}
