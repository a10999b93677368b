#![allow(dead_code)]

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use covid_dashboard::analyzers::types::{CountrySummary, RawSeries};
use covid_dashboard::error::{Error, Result};
use covid_dashboard::services::DiseaseApi;
use serde::Deserialize;

/// In-memory statistics provider. `None` simulates an upstream outage.
#[derive(Default)]
pub struct StubApi {
    pub timeline: Option<RawSeries>,
    pub countries: Option<Vec<CountrySummary>>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn with_timeline(timeline: RawSeries) -> Self {
        Self {
            timeline: Some(timeline),
            ..Default::default()
        }
    }

    pub fn with_countries(countries: Vec<CountrySummary>) -> Self {
        Self {
            countries: Some(countries),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiseaseApi for StubApi {
    async fn historical_cases(&self, country: &str) -> Result<RawSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(country.to_string());
        self.timeline
            .clone()
            .ok_or(Error::UpstreamUnavailable { status: 503 })
    }

    async fn countries(&self) -> Result<Vec<CountrySummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.countries
            .clone()
            .ok_or(Error::UpstreamUnavailable { status: 503 })
    }
}

#[derive(Deserialize)]
struct Historical {
    timeline: Timeline,
}

#[derive(Deserialize)]
struct Timeline {
    cases: RawSeries,
}

/// Case timeline from `tests/fixtures/historical_peru.json`.
pub fn peru_timeline() -> RawSeries {
    let body: Historical =
        serde_json::from_str(include_str!("../fixtures/historical_peru.json")).unwrap();
    body.timeline.cases
}

pub fn raw(entries: &[(&str, i64)]) -> RawSeries {
    entries
        .iter()
        .map(|(date, count)| (date.to_string(), *count))
        .collect()
}

pub fn summary(country: &str, cases: i64) -> CountrySummary {
    CountrySummary {
        country: country.to_string(),
        cases,
    }
}

/// Temporary trace file, deleted when dropped.
pub struct TraceFile(PathBuf);

impl Deref for TraceFile {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TraceFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Fresh trace file path; any previous file is removed.
pub fn trace_path(name: &str) -> TraceFile {
    let path = std::env::temp_dir()
        .join("covid_dashboard_api_tests")
        .join(format!("{name}.jsonl"));
    let _ = std::fs::remove_file(&path);
    TraceFile(path)
}

pub fn read_trace(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
