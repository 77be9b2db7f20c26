use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::stats::MetricKind;

/// Upstream date keys look like `3/14/21`
const DATE_FORMAT: &str = "%m/%d/%y";

/// Shape of `historical/all`: one `date -> cumulative` map per counter.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTimeline {
    #[serde(default)]
    cases: HashMap<String, u64>,
    #[serde(default)]
    deaths: HashMap<String, u64>,
    #[serde(default)]
    recovered: HashMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedCount {
    pub date: NaiveDate,
    pub value: u64,
}

/// Worldwide cumulative counters, each series in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    cases: Vec<DatedCount>,
    deaths: Vec<DatedCount>,
    recovered: Vec<DatedCount>,
}

impl Timeline {
    /// In-memory timeline for tests; each series is sorted by date.
    #[cfg(test)]
    pub(crate) fn new(
        mut cases: Vec<DatedCount>,
        mut deaths: Vec<DatedCount>,
        mut recovered: Vec<DatedCount>,
    ) -> Self {
        for series in [&mut cases, &mut deaths, &mut recovered] {
            series.sort_by_key(|point| point.date);
        }
        Self {
            cases,
            deaths,
            recovered,
        }
    }

    pub(crate) fn from_raw(raw: RawTimeline) -> Result<Self, String> {
        Ok(Self {
            cases: chronological(raw.cases)?,
            deaths: chronological(raw.deaths)?,
            recovered: chronological(raw.recovered)?,
        })
    }

    pub fn series(&self, metric: MetricKind) -> &[DatedCount] {
        match metric {
            MetricKind::Cases => &self.cases,
            MetricKind::Recovered => &self.recovered,
            MetricKind::Deaths => &self.deaths,
        }
    }

    /// New counts per day: each date after the first minus its predecessor.
    /// Downward revisions show as zero.
    pub fn daily_new(&self, metric: MetricKind) -> Vec<DatedCount> {
        self.series(metric)
            .windows(2)
            .map(|pair| DatedCount {
                date: pair[1].date,
                value: pair[1].value.saturating_sub(pair[0].value),
            })
            .collect()
    }
}

fn chronological(map: HashMap<String, u64>) -> Result<Vec<DatedCount>, String> {
    let mut series = map
        .into_iter()
        .map(|(key, value)| {
            NaiveDate::parse_from_str(&key, DATE_FORMAT)
                .map(|date| DatedCount { date, value })
                .map_err(|e| format!("bad timeline date {key:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    series.sort_by_key(|point| point.date);
    Ok(series)
}
