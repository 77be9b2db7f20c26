use serde::{Deserialize, Deserializer};

use crate::stats::{normalize_count, MetricKind};

/// The six counters shared by worldwide, per-country and roster payloads.
///
/// Any field may be missing from a payload. Values arrive as JSON numbers;
/// negative corrections clamp to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    #[serde(default, deserialize_with = "counter")]
    pub today_cases: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    pub cases: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    pub today_deaths: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    pub today_recovered: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    pub recovered: Option<u64>,
}

impl Counters {
    /// `(today, total)` for the given metric
    pub fn pair(&self, metric: MetricKind) -> (Option<u64>, Option<u64>) {
        match metric {
            MetricKind::Cases => (self.today_cases, self.cases),
            MetricKind::Recovered => (self.today_recovered, self.recovered),
            MetricKind::Deaths => (self.today_deaths, self.deaths),
        }
    }

    pub fn total(&self, metric: MetricKind) -> Option<u64> {
        self.pair(metric).1
    }
}

fn counter<'d, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'d>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.and_then(normalize_count))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

impl CountryInfo {
    /// `(lat, long)` when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.long?))
    }
}

/// Aggregate counters for the whole world or one country.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    /// Epoch milliseconds of the upstream refresh
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_info: Option<CountryInfo>,
    #[serde(flatten)]
    pub counters: Counters,
}

impl GlobalSummary {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.country_info.as_ref().and_then(CountryInfo::coordinates)
    }
}

/// One entry of the all-countries roster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    #[serde(rename = "country")]
    pub name: String,
    #[serde(default)]
    pub country_info: CountryInfo,
    #[serde(flatten)]
    pub counters: Counters,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, iso_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country_info: CountryInfo {
                iso2: Some(iso_code.into()),
                ..CountryInfo::default()
            },
            counters: Counters::default(),
        }
    }

    pub fn with_counters(mut self, counters: Counters) -> Self {
        self.counters = counters;
        self
    }

    pub fn at(mut self, lat: f64, long: f64) -> Self {
        self.country_info.lat = Some(lat);
        self.country_info.long = Some(long);
        self
    }

    /// Selection key for this country, if the API supplied one
    pub fn iso_code(&self) -> Option<&str> {
        self.country_info.iso2.as_deref()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.country_info.coordinates()
    }
}
