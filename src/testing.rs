//! In-memory data source shared by the app and UI tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use crate::api::{CountryRecord, Counters, DataSource, DatedCount, FetchError, GlobalSummary, Timeline};
use crate::app::App;
use crate::controller::{ControllerSettings, ViewStateController};

/// 25 countries with descending case counts and a short worldwide history
pub(crate) struct Fixture;

pub(crate) fn countries() -> Vec<CountryRecord> {
    (0..25u32)
        .map(|i| {
            CountryRecord::new(format!("Country {i}"), format!("C{i}"))
                .at(f64::from(i), f64::from(i) * 2.0)
                .with_counters(Counters {
                    today_cases: Some(u64::from(i)),
                    cases: Some(1_000 - u64::from(i)),
                    deaths: Some(10),
                    recovered: Some(900),
                    ..Counters::default()
                })
        })
        .collect()
}

fn timeline() -> Timeline {
    let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
    let series = |step: u64| -> Vec<DatedCount> {
        (0..10u64)
            .map(|day| DatedCount {
                date: start + Days::new(day),
                value: 1_000 + day * step,
            })
            .collect()
    };
    Timeline::new(series(100), series(3), series(80))
}

#[async_trait]
impl DataSource for Fixture {
    async fn global_summary(&self) -> Result<GlobalSummary, FetchError> {
        Ok(GlobalSummary {
            counters: Counters {
                today_cases: Some(5),
                cases: Some(123_456),
                ..Counters::default()
            },
            ..GlobalSummary::default()
        })
    }

    async fn all_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        Ok(countries())
    }

    async fn country_detail(&self, iso_code: &str) -> Result<GlobalSummary, FetchError> {
        let record = countries()
            .into_iter()
            .find(|record| record.iso_code() == Some(iso_code))
            .ok_or_else(|| FetchError::Status {
                url: format!("countries/{iso_code}"),
                status: 404,
            })?;
        Ok(GlobalSummary {
            country: Some(record.name),
            country_info: Some(record.country_info),
            counters: record.counters,
            ..GlobalSummary::default()
        })
    }

    async fn historical_all(&self, _last_days: u32) -> Result<Timeline, FetchError> {
        Ok(timeline())
    }
}

/// An app whose initial fetches have all been applied
pub(crate) async fn loaded_app() -> App {
    let mut dashboard = ViewStateController::new(Arc::new(Fixture), ControllerSettings::default());
    dashboard.initialize();
    while dashboard.pending() > 0 {
        dashboard.next_completion().await;
    }
    App::new(dashboard)
}
