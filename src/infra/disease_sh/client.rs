use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::analyzers::types::{CountrySummary, RawSeries};
use crate::error::{Error, Result};
use crate::fetch::{HttpClient, fetch_json};
use crate::services::DiseaseApi;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

/// `/historical/all` answers with `cases` at the top level, while per-country
/// lookups nest it under `timeline`.
#[derive(Deserialize)]
struct HistoricalResponse {
    cases: Option<RawSeries>,
    timeline: Option<Timeline>,
}

#[derive(Deserialize)]
struct Timeline {
    cases: RawSeries,
}

pub struct DiseaseShClient<C> {
    http: C,
    base_url: Url,
}

impl<C: HttpClient> DiseaseShClient<C> {
    pub fn new(http: C, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Upstream(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Upstream(format!("{base_url} cannot be used as a base URL")));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl<C: HttpClient> DiseaseApi for DiseaseShClient<C> {
    #[instrument(skip(self))]
    async fn historical_cases(&self, country: &str) -> Result<RawSeries> {
        let mut url = self.endpoint(&["historical", country]);
        url.query_pairs_mut().append_pair("lastdays", "all");

        let body: HistoricalResponse = fetch_json(&self.http, url).await?;
        let cases = body
            .timeline
            .map(|t| t.cases)
            .or(body.cases)
            .ok_or_else(|| Error::Upstream("response has no case timeline".to_string()))?;

        debug!(days = cases.len(), "Historical timeline fetched");
        Ok(cases)
    }

    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<CountrySummary>> {
        let url = self.endpoint(&["countries"]);
        let countries: Vec<CountrySummary> = fetch_json(&self.http, url).await?;

        debug!(count = countries.len(), "Country listing fetched");
        Ok(countries)
    }
}
