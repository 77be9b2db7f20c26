//! Read access to the COVID-19 statistics service.

mod client;
mod error;
mod model;
mod timeline;

use async_trait::async_trait;

pub use client::{DiseaseClient, DEFAULT_BASE_URL};
pub use error::FetchError;
pub use model::{CountryInfo, CountryRecord, Counters, GlobalSummary};
pub use timeline::{DatedCount, Timeline};

/// The read operations the dashboard needs from a statistics backend.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Worldwide aggregate counters
    async fn global_summary(&self) -> Result<GlobalSummary, FetchError>;

    /// Every country, in the backend's order
    async fn all_countries(&self) -> Result<Vec<CountryRecord>, FetchError>;

    /// Counters for one country, including its coordinates. A response
    /// without coordinates is `FetchError::Malformed`.
    async fn country_detail(&self, iso_code: &str) -> Result<GlobalSummary, FetchError>;

    /// Worldwide cumulative series over the last `last_days` days
    async fn historical_all(&self, last_days: u32) -> Result<Timeline, FetchError>;
}
