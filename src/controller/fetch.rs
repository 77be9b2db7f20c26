use clap::ValueEnum;
use serde::Deserialize;

use super::SelectionKey;
use crate::api::{CountryRecord, DataSource, FetchError, GlobalSummary, Timeline};

/// What to do with a response that arrives after a newer request for the
/// same piece of state was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Apply every response as it arrives; the last one to arrive wins
    #[default]
    LastArrival,
    /// Drop responses superseded by a later request for the same slot
    LatestRequest,
}

/// A piece of controller state written by fetch completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Summary,
    Roster,
    Timeline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    GlobalSummary,
    AllCountries,
    CountryDetail(String),
    Historical(u32),
}

impl Request {
    pub(crate) fn for_selection(key: &SelectionKey) -> Self {
        match key {
            SelectionKey::Worldwide => Request::GlobalSummary,
            SelectionKey::Country(code) => Request::CountryDetail(code.clone()),
        }
    }

    pub(crate) fn slot(&self) -> Slot {
        match self {
            Request::GlobalSummary | Request::CountryDetail(_) => Slot::Summary,
            Request::AllCountries => Slot::Roster,
            Request::Historical(_) => Slot::Timeline,
        }
    }

    pub(crate) async fn run(self, source: &dyn DataSource) -> Result<Payload, FetchError> {
        match self {
            Request::GlobalSummary => source.global_summary().await.map(Payload::Summary),
            Request::AllCountries => source.all_countries().await.map(Payload::Roster),
            Request::CountryDetail(code) => source.country_detail(&code).await.map(Payload::Summary),
            Request::Historical(days) => source.historical_all(days).await.map(Payload::Timeline),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Payload {
    Summary(GlobalSummary),
    Roster(Vec<CountryRecord>),
    Timeline(Timeline),
}

/// Identifies an issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ticket {
    /// Monotonic across all slots
    pub(crate) id: u64,
    pub(crate) slot: Slot,
    /// Set when the fetch came from a selection, so the map recenters
    pub(crate) selection: Option<SelectionKey>,
}

/// A finished fetch, sent back to the controller for application.
#[derive(Debug)]
pub struct Completion {
    pub(crate) ticket: Ticket,
    pub(crate) result: Result<Payload, FetchError>,
}

/// How a completion affected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(Slot),
    /// Superseded by a newer request and dropped
    Stale(Slot),
    /// The fetch failed; state is unchanged
    Failed(Slot),
}
