//! Trait for the upstream COVID-19 statistics provider.

use async_trait::async_trait;

use crate::analyzers::types::{CountrySummary, RawSeries};
use crate::error::Result;

/// Abstraction over a statistics provider (e.g., disease.sh).
#[async_trait]
pub trait DiseaseApi: Send + Sync {
    /// Returns the full daily cumulative case timeline for `country`,
    /// or the global timeline for `"all"`.
    async fn historical_cases(&self, country: &str) -> Result<RawSeries>;

    /// Returns the current case total for every country the provider knows.
    async fn countries(&self) -> Result<Vec<CountrySummary>>;
}
