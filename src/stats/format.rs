//! Display formatting for case, death and recovery counters.

/// Token shown when a counter has no data yet.
pub const PLACEHOLDER: &str = "0";

/// Reduce a raw JSON number to a displayable count.
///
/// NaN and infinite values have no count. Fractions are truncated; negative
/// values clamp to zero.
pub fn normalize_count(value: f64) -> Option<u64> {
    value.is_finite().then(|| value.trunc().max(0.0) as u64)
}

/// Format a raw counter with `,` thousands separators.
///
/// Absent, NaN and infinite values render as [`PLACEHOLDER`].
pub fn format_stat(value: Option<f64>) -> String {
    format_count(value.and_then(normalize_count))
}

/// Integer form of [`format_stat`], for counters already decoded as `u64`.
pub fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), group_thousands)
}

/// Today-delta form used by the summary boxes: `+1,234`.
pub fn format_delta(value: Option<u64>) -> String {
    format!("+{}", format_count(value))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
