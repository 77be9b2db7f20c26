//! Dashboard view state and the operations that change it.
//!
//! Fetches run as tokio tasks and report back over a channel. The owner of
//! the [`ViewStateController`] drains that channel with
//! [`ViewStateController::next_completion`] or [`ViewStateController::pump`],
//! so every state change happens on one thread, one completion at a time.

mod fetch;
mod state;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{CountryRecord, DataSource, DatedCount, FetchError, GlobalSummary, Timeline};
use crate::stats::MetricKind;

pub use fetch::{Completion, Outcome, Slot, StalePolicy};
pub use state::{LatLng, MapViewport, Roster, SelectionKey, SelectorOption};

use fetch::{Payload, Request, Ticket};

/// Knobs for [`ViewStateController`].
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub stale_policy: StalePolicy,
    /// Days of history requested for the trend graph
    pub history_days: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            stale_policy: StalePolicy::default(),
            history_days: 120,
        }
    }
}

/// Owns everything the dashboard shows.
pub struct ViewStateController {
    source: Arc<dyn DataSource>,
    settings: ControllerSettings,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    next_id: u64,
    latest: HashMap<Slot, u64>,
    in_flight: usize,

    summary: Option<GlobalSummary>,
    roster: Roster,
    timeline: Option<Timeline>,
    selection: SelectionKey,
    viewport: MapViewport,
    metric: MetricKind,
    last_error: Option<(Slot, String)>,
}

impl ViewStateController {
    pub fn new(source: Arc<dyn DataSource>, settings: ControllerSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            settings,
            tx,
            rx,
            next_id: 0,
            latest: HashMap::new(),
            in_flight: 0,
            summary: None,
            roster: Roster::default(),
            timeline: None,
            selection: SelectionKey::Worldwide,
            viewport: MapViewport::default(),
            metric: MetricKind::default(),
            last_error: None,
        }
    }

    /// Start the worldwide summary, roster and history fetches.
    ///
    /// They run concurrently and apply independently; a failure in one does
    /// not hold back the others. Must be called within a tokio runtime.
    pub fn initialize(&mut self) {
        info!("loading worldwide summary, roster and {} days of history", self.settings.history_days);
        self.issue(Request::GlobalSummary, None);
        self.issue(Request::AllCountries, None);
        self.issue(Request::Historical(self.settings.history_days), None);
    }

    /// Switch the displayed summary to `key`.
    ///
    /// The selection itself changes immediately; summary and map viewport
    /// follow when the fetch completes, and stay as they were if it fails.
    pub fn select_country(&mut self, key: SelectionKey) {
        info!("selecting {key}");
        let request = Request::for_selection(&key);
        self.selection = key.clone();
        self.issue(request, Some(key));
    }

    pub fn set_metric(&mut self, metric: MetricKind) {
        self.metric = metric;
    }

    fn issue(&mut self, request: Request, selection: Option<SelectionKey>) {
        self.next_id += 1;
        let ticket = Ticket {
            id: self.next_id,
            slot: request.slot(),
            selection,
        };
        self.latest.insert(ticket.slot, ticket.id);
        self.in_flight += 1;
        debug!("issuing #{} {:?} for {:?}", ticket.id, request, ticket.slot);

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = request.run(source.as_ref()).await;
            // The receiver lives as long as the controller; nothing to do
            // if it is gone.
            let _ = tx.send(Completion { ticket, result });
        });
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Cancel safe: a completion is either applied in full or left queued.
    /// Pends forever while nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Outcome> {
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply every completion already queued, without waiting.
    pub fn pump(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Fold one finished fetch into state.
    pub fn apply(&mut self, completion: Completion) -> Outcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion { ticket, result } = completion;
        let slot = ticket.slot;

        if self.settings.stale_policy == StalePolicy::LatestRequest
            && self.latest.get(&slot) != Some(&ticket.id)
        {
            debug!("dropping superseded response #{} for {slot:?}", ticket.id);
            return Outcome::Stale(slot);
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => return self.fail(slot, err),
        };

        match payload {
            Payload::Summary(summary) => {
                if let Some(key) = &ticket.selection {
                    let viewport = match key {
                        SelectionKey::Worldwide => MapViewport::default(),
                        SelectionKey::Country(code) => match summary.coordinates() {
                            Some((lat, lng)) => MapViewport::country(lat, lng),
                            // The HTTP client rejects these with the full URL;
                            // other sources are checked here
                            None => {
                                let err = FetchError::malformed(
                                    format!("countries/{code}"),
                                    "country detail has no countryInfo coordinates (rejected by the view controller)",
                                );
                                return self.fail(slot, err);
                            }
                        },
                    };
                    self.viewport = viewport;
                }
                self.summary = Some(summary);
            }
            Payload::Roster(records) => {
                info!("roster loaded with {} countries", records.len());
                self.roster = Roster::new(records);
            }
            Payload::Timeline(timeline) => self.timeline = Some(timeline),
        }

        if matches!(&self.last_error, Some((failed, _)) if *failed == slot) {
            self.last_error = None;
        }
        Outcome::Applied(slot)
    }

    fn fail(&mut self, slot: Slot, err: FetchError) -> Outcome {
        warn!("{slot:?} fetch failed: {err}");
        self.last_error = Some((slot, err.to_string()));
        Outcome::Failed(slot)
    }

    pub fn summary(&self) -> Option<&GlobalSummary> {
        self.summary.as_ref()
    }

    pub fn selection(&self) -> &SelectionKey {
        &self.selection
    }

    pub fn viewport(&self) -> MapViewport {
        self.viewport
    }

    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selector_options(&self) -> &[SelectorOption] {
        self.roster.options()
    }

    pub fn table(&self) -> &[CountryRecord] {
        self.roster.table()
    }

    /// Worldwide new values per day for the current metric
    pub fn graph_points(&self) -> Vec<DatedCount> {
        self.timeline
            .as_ref()
            .map(|timeline| timeline.daily_new(self.metric))
            .unwrap_or_default()
    }

    /// Message of the most recent failure not yet superseded by a success
    /// for the same slot
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().map(|(_, message)| message.as_str())
    }

    /// Fetches issued but not yet applied
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Display name of the current selection
    pub fn selection_label(&self) -> &str {
        match &self.selection {
            SelectionKey::Worldwide => "Worldwide",
            SelectionKey::Country(code) => self
                .roster
                .find(code)
                .map(|record| record.name.as_str())
                .unwrap_or(code),
        }
    }
}

#[cfg(test)]
mod tests;
