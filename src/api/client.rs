use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use super::timeline::{RawTimeline, Timeline};
use super::{CountryRecord, DataSource, FetchError, GlobalSummary};

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the disease.sh COVID-19 endpoints.
#[derive(Debug, Clone)]
pub struct DiseaseClient {
    http: Client,
    base: Url,
}

impl DiseaseClient {
    /// Build a client rooted at `base_url`.
    ///
    /// `timeout` bounds each whole request; `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base URL {base_url:?}"))?;
        if base.cannot_be_a_base() {
            bail!("base URL {base_url:?} cannot carry a path");
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base can always carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(&url, e))?
            .to_vec();
        simd_json::serde::from_slice(&mut body).map_err(|e| FetchError::malformed(&url, e))
    }
}

#[async_trait]
impl DataSource for DiseaseClient {
    async fn global_summary(&self) -> Result<GlobalSummary, FetchError> {
        self.get_json(self.endpoint(&["all"])).await
    }

    async fn all_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        self.get_json(self.endpoint(&["countries"])).await
    }

    async fn country_detail(&self, iso_code: &str) -> Result<GlobalSummary, FetchError> {
        let url = self.endpoint(&["countries", iso_code]);
        let detail: GlobalSummary = self.get_json(url.clone()).await?;
        if detail.coordinates().is_none() {
            return Err(FetchError::malformed(&url, "missing countryInfo coordinates"));
        }
        Ok(detail)
    }

    async fn historical_all(&self, last_days: u32) -> Result<Timeline, FetchError> {
        let mut url = self.endpoint(&["historical", "all"]);
        url.query_pairs_mut()
            .append_pair("lastdays", &last_days.to_string());
        let raw: RawTimeline = self.get_json(url.clone()).await?;
        Timeline::from_raw(raw).map_err(|reason| FetchError::malformed(&url, reason))
    }
}
