use std::collections::HashSet;
use std::fmt;

use log::warn;

use crate::api::CountryRecord;
use crate::stats::sort_by_cases;

/// Which summary is on display: the whole world or one country by ISO code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    #[default]
    Worldwide,
    Country(String),
}

impl SelectionKey {
    pub const WORLDWIDE: &'static str = "worldwide";

    pub fn country(iso_code: impl Into<String>) -> Self {
        SelectionKey::Country(iso_code.into())
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKey::Worldwide => f.write_str(Self::WORLDWIDE),
            SelectionKey::Country(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Map center and zoom level, recomputed on every successful selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapViewport {
    pub const DEFAULT_CENTER: LatLng = LatLng {
        lat: 34.80746,
        lng: -40.4796,
    };
    pub const WORLD_ZOOM: u8 = 3;
    pub const COUNTRY_ZOOM: u8 = 4;

    pub fn country(lat: f64, lng: f64) -> Self {
        Self {
            center: LatLng { lat, lng },
            zoom: Self::COUNTRY_ZOOM,
        }
    }

    /// Projection scale for the terminal map: the world zoom shows the
    /// whole globe across the canvas, each level above doubles it.
    pub fn scale(&self) -> f64 {
        2f64.powi(i32::from(self.zoom) - i32::from(Self::WORLD_ZOOM))
    }
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: Self::DEFAULT_CENTER,
            zoom: Self::WORLD_ZOOM,
        }
    }
}

/// One entry of the country selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: String,
    pub key: SelectionKey,
}

/// The last roster fetched, with the views derived from it.
///
/// Table order and selector entries are built once per roster and replaced
/// together with it.
#[derive(Debug, Clone)]
pub struct Roster {
    records: Vec<CountryRecord>,
    table: Vec<CountryRecord>,
    options: Vec<SelectorOption>,
}

impl Roster {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        let table = sort_by_cases(&records);
        let options = selector_options(&records);
        Self {
            records,
            table,
            options,
        }
    }

    /// Records in API order
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    /// Records by cases, highest first
    pub fn table(&self) -> &[CountryRecord] {
        &self.table
    }

    /// The worldwide sentinel followed by every selectable country
    pub fn options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn find(&self, iso_code: &str) -> Option<&CountryRecord> {
        self.records
            .iter()
            .find(|record| record.iso_code() == Some(iso_code))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn selector_options(records: &[CountryRecord]) -> Vec<SelectorOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::with_capacity(records.len() + 1);
    options.push(SelectorOption {
        label: "Worldwide".to_string(),
        key: SelectionKey::Worldwide,
    });

    for record in records {
        let Some(code) = record.iso_code() else {
            continue;
        };
        if !seen.insert(code) {
            warn!("duplicate country code {code} for {}; keeping first entry", record.name);
            continue;
        }
        options.push(SelectorOption {
            label: record.name.clone(),
            key: SelectionKey::country(code),
        });
    }

    options
}
