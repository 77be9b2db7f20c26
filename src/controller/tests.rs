use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

use super::*;
use crate::api::Counters;

/// In-memory source. Country details can be held back behind a gate to
/// control the order in which responses arrive.
#[derive(Default)]
struct FakeSource {
    summary: Option<GlobalSummary>,
    countries: Option<Vec<CountryRecord>>,
    details: HashMap<String, GlobalSummary>,
    timeline: Option<Timeline>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeSource {
    fn with_summary(mut self, summary: GlobalSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    fn with_countries(mut self, countries: Vec<CountryRecord>) -> Self {
        self.countries = Some(countries);
        self
    }

    fn with_detail(mut self, code: &str, detail: GlobalSummary) -> Self {
        self.details.insert(code.to_string(), detail);
        self
    }

    fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Hold `code`'s response (or the worldwide summary, for
    /// `SelectionKey::WORLDWIDE`) until the returned sender fires
    fn gated(self, code: &str) -> (Self, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        self.gates.lock().unwrap().insert(code.to_string(), gate);
        (self, release)
    }

    async fn wait_for(&self, key: &str) {
        let gate = self.gates.lock().unwrap().remove(key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn unavailable(what: &str) -> FetchError {
        FetchError::Network {
            url: what.to_string(),
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn global_summary(&self) -> Result<GlobalSummary, FetchError> {
        self.wait_for(SelectionKey::WORLDWIDE).await;
        self.summary.clone().ok_or_else(|| Self::unavailable("all"))
    }

    async fn all_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        self.countries.clone().ok_or_else(|| Self::unavailable("countries"))
    }

    async fn country_detail(&self, iso_code: &str) -> Result<GlobalSummary, FetchError> {
        self.wait_for(iso_code).await;
        self.details
            .get(iso_code)
            .cloned()
            .ok_or_else(|| Self::unavailable(iso_code))
    }

    async fn historical_all(&self, _last_days: u32) -> Result<Timeline, FetchError> {
        self.timeline.clone().ok_or_else(|| Self::unavailable("historical"))
    }
}

fn counters(cases: u64, today_cases: u64) -> Counters {
    Counters {
        cases: Some(cases),
        today_cases: Some(today_cases),
        ..Counters::default()
    }
}

fn worldwide(cases: u64, today_cases: u64) -> GlobalSummary {
    GlobalSummary {
        counters: counters(cases, today_cases),
        ..GlobalSummary::default()
    }
}

fn detail(cases: u64, lat: f64, long: f64) -> GlobalSummary {
    GlobalSummary {
        country_info: Some(crate::api::CountryInfo {
            lat: Some(lat),
            long: Some(long),
            ..Default::default()
        }),
        counters: counters(cases, 0),
        ..GlobalSummary::default()
    }
}

fn country(name: &str, iso: &str, cases: u64) -> CountryRecord {
    CountryRecord::new(name, iso).with_counters(counters(cases, 0))
}

fn three_countries() -> Vec<CountryRecord> {
    vec![
        country("Aland", "AA", 20),
        country("Bland", "BB", 70),
        country("Cland", "CC", 45),
    ]
}

fn controller(source: FakeSource, stale_policy: StalePolicy) -> ViewStateController {
    ViewStateController::new(
        Arc::new(source),
        ControllerSettings {
            stale_policy,
            history_days: 30,
        },
    )
}

/// Apply completions until nothing is in flight
async fn settle(dashboard: &mut ViewStateController) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    while dashboard.pending() > 0 {
        outcomes.extend(dashboard.next_completion().await);
    }
    outcomes
}

#[tokio::test]
async fn test_initialize_populates_summary_selector_and_table() {
    let source = FakeSource::default()
        .with_summary(worldwide(100, 5))
        .with_countries(three_countries())
        .with_timeline(Timeline::default());
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.initialize();
    assert_eq!(dashboard.pending(), 3);
    let outcomes = settle(&mut dashboard).await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| matches!(o, Outcome::Applied(_))));

    let summary = dashboard.summary().unwrap();
    assert_eq!(summary.counters.cases, Some(100));
    assert_eq!(summary.counters.today_cases, Some(5));

    let keys: Vec<_> = dashboard.selector_options().iter().map(|o| o.key.to_string()).collect();
    assert_eq!(keys, vec!["worldwide", "AA", "BB", "CC"]);

    let table: Vec<_> = dashboard.table().iter().map(|r| r.counters.cases).collect();
    assert_eq!(table, vec![Some(70), Some(45), Some(20)]);

    assert_eq!(dashboard.selection(), &SelectionKey::Worldwide);
    assert_eq!(dashboard.viewport(), MapViewport::default());
    assert_eq!(dashboard.last_error(), None);
}

#[tokio::test]
async fn test_initialize_failures_are_independent() {
    // No summary and no timeline configured: both fail, roster still lands
    let source = FakeSource::default().with_countries(three_countries());
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.initialize();
    let outcomes = settle(&mut dashboard).await;

    assert!(outcomes.contains(&Outcome::Applied(Slot::Roster)));
    assert!(outcomes.contains(&Outcome::Failed(Slot::Summary)));
    assert!(outcomes.contains(&Outcome::Failed(Slot::Timeline)));
    assert!(dashboard.summary().is_none());
    assert_eq!(dashboard.table().len(), 3);
    assert!(dashboard.graph_points().is_empty());
    assert!(dashboard.last_error().is_some());
}

#[tokio::test]
async fn test_select_country_moves_viewport() {
    let source = FakeSource::default()
        .with_summary(worldwide(100, 5))
        .with_detail("XX", detail(42, 10.0, 20.0));
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::country("XX"));
    // Selection changes before the response arrives
    assert_eq!(dashboard.selection(), &SelectionKey::country("XX"));
    assert_eq!(dashboard.viewport(), MapViewport::default());

    settle(&mut dashboard).await;
    assert_eq!(
        dashboard.viewport(),
        MapViewport {
            center: LatLng { lat: 10.0, lng: 20.0 },
            zoom: 4,
        }
    );
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(42));
}

#[tokio::test]
async fn test_select_worldwide_resets_viewport() {
    let source = FakeSource::default()
        .with_summary(worldwide(100, 5))
        .with_detail("XX", detail(42, 10.0, 20.0));
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::country("XX"));
    settle(&mut dashboard).await;
    assert_eq!(dashboard.viewport().zoom, 4);

    dashboard.select_country(SelectionKey::Worldwide);
    settle(&mut dashboard).await;
    assert_eq!(
        dashboard.viewport(),
        MapViewport {
            center: LatLng {
                lat: 34.80746,
                lng: -40.4796,
            },
            zoom: 3,
        }
    );
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(100));
}

#[tokio::test]
async fn test_failed_selection_keeps_previous_state() {
    let source = FakeSource::default().with_detail("XX", detail(42, 10.0, 20.0));
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::country("XX"));
    settle(&mut dashboard).await;
    let summary_before = dashboard.summary().cloned();
    let viewport_before = dashboard.viewport();

    dashboard.select_country(SelectionKey::country("ZZ"));
    let outcomes = settle(&mut dashboard).await;

    assert_eq!(outcomes, vec![Outcome::Failed(Slot::Summary)]);
    assert_eq!(dashboard.summary().cloned(), summary_before);
    assert_eq!(dashboard.viewport(), viewport_before);
    assert!(dashboard.last_error().unwrap().contains("ZZ"));

    // A later success for the same slot clears the error
    dashboard.select_country(SelectionKey::country("XX"));
    settle(&mut dashboard).await;
    assert_eq!(dashboard.last_error(), None);
}

#[tokio::test]
async fn test_country_without_coordinates_is_malformed() {
    let source = FakeSource::default().with_detail("NC", worldwide(9, 1));
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::country("NC"));
    let outcomes = settle(&mut dashboard).await;

    assert_eq!(outcomes, vec![Outcome::Failed(Slot::Summary)]);
    assert!(dashboard.summary().is_none());
    assert_eq!(dashboard.viewport(), MapViewport::default());
    let message = dashboard.last_error().unwrap();
    assert!(message.contains("malformed"));
    assert!(message.contains("view controller"));
}

#[tokio::test]
async fn test_last_arrival_wins_by_default() {
    let source = FakeSource::default()
        .with_detail("A", detail(111, 1.0, 1.0))
        .with_detail("B", detail(222, 2.0, 2.0));
    let (source, release_a) = source.gated("A");
    let (source, release_b) = source.gated("B");
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::country("A"));
    dashboard.select_country(SelectionKey::country("B"));

    release_b.send(()).unwrap();
    assert_eq!(dashboard.next_completion().await, Some(Outcome::Applied(Slot::Summary)));
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(222));

    release_a.send(()).unwrap();
    assert_eq!(dashboard.next_completion().await, Some(Outcome::Applied(Slot::Summary)));

    // A arrived last, so A is displayed even though B is selected
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(111));
    assert_eq!(dashboard.viewport(), MapViewport::country(1.0, 1.0));
    assert_eq!(dashboard.selection(), &SelectionKey::country("B"));
}

#[tokio::test]
async fn test_latest_request_drops_superseded_response() {
    let source = FakeSource::default()
        .with_detail("A", detail(111, 1.0, 1.0))
        .with_detail("B", detail(222, 2.0, 2.0));
    let (source, release_a) = source.gated("A");
    let (source, release_b) = source.gated("B");
    let mut dashboard = controller(source, StalePolicy::LatestRequest);

    dashboard.select_country(SelectionKey::country("A"));
    dashboard.select_country(SelectionKey::country("B"));

    release_b.send(()).unwrap();
    assert_eq!(dashboard.next_completion().await, Some(Outcome::Applied(Slot::Summary)));
    release_a.send(()).unwrap();
    assert_eq!(dashboard.next_completion().await, Some(Outcome::Stale(Slot::Summary)));

    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(222));
    assert_eq!(dashboard.viewport(), MapViewport::country(2.0, 2.0));
    assert_eq!(dashboard.pending(), 0);
}

#[tokio::test]
async fn test_latest_request_tracks_slots_separately() {
    let source = FakeSource::default()
        .with_summary(worldwide(100, 5))
        .with_countries(three_countries())
        .with_timeline(Timeline::default());
    let mut dashboard = controller(source, StalePolicy::LatestRequest);

    // Roster and timeline ids are older than the summary's but still current
    dashboard.initialize();
    let outcomes = settle(&mut dashboard).await;
    assert!(outcomes.iter().all(|o| matches!(o, Outcome::Applied(_))), "{outcomes:?}");
}

#[tokio::test]
async fn test_set_metric_switches_graph_series() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2021, 1, d).unwrap();
    let point = |d: u32, value: u64| DatedCount { date: day(d), value };
    let timeline = Timeline::new(
        vec![point(1, 10), point(2, 30)],
        vec![point(1, 1), point(2, 4)],
        Vec::new(),
    );
    let source = FakeSource::default().with_timeline(timeline);
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.initialize();
    settle(&mut dashboard).await;

    assert_eq!(dashboard.graph_points(), vec![point(2, 20)]);
    dashboard.set_metric(MetricKind::Deaths);
    assert_eq!(dashboard.metric(), MetricKind::Deaths);
    assert_eq!(dashboard.graph_points(), vec![point(2, 3)]);
    dashboard.set_metric(MetricKind::Recovered);
    assert!(dashboard.graph_points().is_empty());
    assert_eq!(dashboard.pending(), 0);
}

#[tokio::test]
async fn test_pump_applies_queued_completions() {
    let source = FakeSource::default().with_summary(worldwide(7, 0));
    let mut dashboard = controller(source, StalePolicy::LastArrival);

    dashboard.select_country(SelectionKey::Worldwide);
    // Let the spawned fetch run
    while dashboard.pump().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(7));
}

#[tokio::test]
async fn test_selection_label_uses_roster_name() {
    let source = FakeSource::default()
        .with_countries(three_countries())
        .with_detail("BB", detail(70, 5.0, 5.0));
    let mut dashboard = controller(source, StalePolicy::LastArrival);
    assert_eq!(dashboard.selection_label(), "Worldwide");

    dashboard.initialize();
    settle(&mut dashboard).await;
    dashboard.select_country(SelectionKey::country("BB"));
    assert_eq!(dashboard.selection_label(), "Bland");
    dashboard.select_country(SelectionKey::country("QQ"));
    assert_eq!(dashboard.selection_label(), "QQ");
    settle(&mut dashboard).await;
}

/// Start up, pick a country, and let everything except the initial
/// worldwide summary land. Returns the outcome of that summary.
async fn select_during_initialize(stale_policy: StalePolicy) -> (ViewStateController, Option<Outcome>) {
    let source = FakeSource::default()
        .with_summary(worldwide(100, 5))
        .with_countries(three_countries())
        .with_timeline(Timeline::default())
        .with_detail("XX", detail(42, 10.0, 20.0));
    let (source, release_worldwide) = source.gated(SelectionKey::WORLDWIDE);
    let mut dashboard = controller(source, stale_policy);

    dashboard.initialize();
    dashboard.select_country(SelectionKey::country("XX"));

    let mut early = Vec::new();
    for _ in 0..3 {
        early.extend(dashboard.next_completion().await);
    }
    early.sort_by_key(|outcome| format!("{outcome:?}"));
    assert_eq!(
        early,
        vec![
            Outcome::Applied(Slot::Roster),
            Outcome::Applied(Slot::Summary),
            Outcome::Applied(Slot::Timeline),
        ]
    );
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(42));

    release_worldwide.send(()).unwrap();
    let outcome = dashboard.next_completion().await;
    assert_eq!(dashboard.pending(), 0);
    (dashboard, outcome)
}

#[tokio::test]
async fn test_late_initial_summary_overwrites_selection_under_last_arrival() {
    let (dashboard, outcome) = select_during_initialize(StalePolicy::LastArrival).await;

    assert_eq!(outcome, Some(Outcome::Applied(Slot::Summary)));
    // Worldwide counters on display, but the map stays on the country
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(100));
    assert_eq!(dashboard.viewport(), MapViewport::country(10.0, 20.0));
    assert_eq!(dashboard.viewport().zoom, MapViewport::COUNTRY_ZOOM);
    assert_eq!(dashboard.selection(), &SelectionKey::country("XX"));
}

#[tokio::test]
async fn test_late_initial_summary_dropped_under_latest_request() {
    let (dashboard, outcome) = select_during_initialize(StalePolicy::LatestRequest).await;

    assert_eq!(outcome, Some(Outcome::Stale(Slot::Summary)));
    assert_eq!(dashboard.summary().unwrap().counters.cases, Some(42));
    assert_eq!(dashboard.viewport(), MapViewport::country(10.0, 20.0));
    assert_eq!(dashboard.selection(), &SelectionKey::country("XX"));
}
