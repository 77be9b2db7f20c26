use crate::api::CountryRecord;
use crate::controller::SelectionKey;
use crate::map::Marker;
use crate::stats::{format_count, MetricKind};

/// One marker per country with coordinates, sized by the metric's total.
///
/// Radius grows with the square root of the count so area tracks the count.
pub fn country_markers(records: &[CountryRecord], metric: MetricKind, selection: &SelectionKey) -> Vec<Marker> {
    let selected_code = match selection {
        SelectionKey::Worldwide => None,
        SelectionKey::Country(code) => Some(code.as_str()),
    };

    records
        .iter()
        .filter_map(|record| {
            let (lat, lon) = record.coordinates()?;
            let total = record.counters.total(metric);
            let selected = selected_code.is_some() && record.iso_code() == selected_code;
            Some(Marker {
                lon,
                lat,
                radius_km: radius_km(total.unwrap_or(0), metric),
                selected,
                label: selected.then(|| format!("{} {}", record.name, format_count(total))),
            })
        })
        .collect()
}

fn radius_km(count: u64, metric: MetricKind) -> f64 {
    (count as f64).sqrt() * metric.radius_multiplier() / 1000.0
}
