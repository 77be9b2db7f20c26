use ratatui::style::Color;

/// Which counter pair is highlighted in the summary boxes, map and graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MetricKind {
    #[default]
    Cases,
    Recovered,
    Deaths,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Cases, MetricKind::Recovered, MetricKind::Deaths];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cases => "cases",
            MetricKind::Recovered => "recovered",
            MetricKind::Deaths => "deaths",
        }
    }

    /// Title used on the summary box for this metric
    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Cases => "Coronavirus Cases",
            MetricKind::Recovered => "Recovered",
            MetricKind::Deaths => "Deaths",
        }
    }

    pub fn color(self) -> Color {
        match self {
            MetricKind::Cases => Color::Red,
            MetricKind::Recovered => Color::Green,
            MetricKind::Deaths => Color::LightRed,
        }
    }

    /// Map marker radius in metres per square root of the count.
    pub fn radius_multiplier(self) -> f64 {
        match self {
            MetricKind::Cases => 800.0,
            MetricKind::Recovered => 1200.0,
            MetricKind::Deaths => 2000.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            MetricKind::Cases => MetricKind::Recovered,
            MetricKind::Recovered => MetricKind::Deaths,
            MetricKind::Deaths => MetricKind::Cases,
        }
    }
}
