mod format;
mod metric;
mod sort;

pub use format::{format_count, format_delta, format_stat, normalize_count, PLACEHOLDER};
pub use metric::MetricKind;
pub use sort::sort_by_cases;
