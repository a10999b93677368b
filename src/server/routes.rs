use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::ranking::{country_list, top_countries};
use crate::analyzers::rate::derive_rate_of_change;
use crate::analyzers::types::{AggregatedSeries, CountrySummary, Period, RateSeries};
use crate::error::Error;
use crate::output::{TraceEntry, TraceMeta};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::params::{SeriesParams, SeriesQuery};
use crate::webhook::WebhookPayload;

const CASES_BY_PERIOD: &str = "/api/covid/casesByPeriod";
const RATE_CHANGE: &str = "/api/covid/rateChange";
const TOP_COUNTRIES_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct CasesByPeriodResponse {
    pub period: Period,
    pub country: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub aggregated: AggregatedSeries,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateChangeResponse {
    pub period: Period,
    pub country: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub rate_change: RateSeries,
}

#[derive(Debug, Serialize)]
pub struct CountryListResponse {
    pub countries: Vec<String>,
}

/// GET /api/covid/casesByPeriod?period=month&country=all&start=&end=
///
/// Case counts summed per day, ISO week, or month.
#[instrument(skip(state))]
pub async fn cases_by_period(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> Result<Json<CasesByPeriodResponse>, ApiError> {
    let started = Instant::now();
    let query = params.validate(Period::Month)?;

    let aggregated = match load_aggregated(&state, &query).await {
        Ok(aggregated) => aggregated,
        Err(e) => return Err(state.fail(CASES_BY_PERIOD, e)),
    };

    let duration_ms = elapsed_ms(started);
    state.succeed(CASES_BY_PERIOD, &query, aggregated.len(), duration_ms);
    state.webhook.notify(WebhookPayload::new(
        "COVID_CASES_BY_PERIOD",
        200,
        duration_ms,
        aggregated.clone(),
    ));

    Ok(Json(CasesByPeriodResponse {
        period: query.period,
        country: query.country,
        start: query.range.start,
        end: query.range.end,
        aggregated,
    }))
}

/// GET /api/covid/rateChange?period=day&country=all&start=&end=
///
/// Period-over-period fractional change of the aggregated case counts.
#[instrument(skip(state))]
pub async fn rate_change(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> Result<Json<RateChangeResponse>, ApiError> {
    let started = Instant::now();
    let query = params.validate(Period::Day)?;

    let rate_change = match load_aggregated(&state, &query).await {
        Ok(aggregated) => derive_rate_of_change(&aggregated),
        Err(e) => return Err(state.fail(RATE_CHANGE, e)),
    };

    let duration_ms = elapsed_ms(started);
    state.succeed(RATE_CHANGE, &query, rate_change.len(), duration_ms);
    state.webhook.notify(WebhookPayload::new(
        "COVID_RATE_CHANGE",
        200,
        duration_ms,
        rate_change.clone(),
    ));

    Ok(Json(RateChangeResponse {
        period: query.period,
        country: query.country,
        start: query.range.start,
        end: query.range.end,
        rate_change,
    }))
}

/// GET /api/covid/topCountries
///
/// The ten countries with the most cases, highest first.
#[instrument(skip(state))]
pub async fn get_top_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CountrySummary>>, ApiError> {
    let countries = state.api.countries().await?;
    Ok(Json(top_countries(countries, TOP_COUNTRIES_LIMIT)))
}

/// GET /api/covid/countryList
#[instrument(skip(state))]
pub async fn get_country_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountryListResponse>, ApiError> {
    let countries = state.api.countries().await?;
    Ok(Json(CountryListResponse {
        countries: country_list(&countries),
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn load_aggregated(state: &AppState, query: &SeriesQuery) -> Result<AggregatedSeries, Error> {
    let cases = state.api.historical_cases(&query.country).await?;
    let aggregated = aggregate(&cases, query.period, &query.range)?;
    info!(
        days = cases.len(),
        buckets = aggregated.len(),
        period = %query.period,
        "Aggregated case timeline"
    );
    Ok(aggregated)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl AppState {
    fn succeed(&self, endpoint: &'static str, query: &SeriesQuery, count: usize, duration_ms: u64) {
        self.trace_log.record(&TraceEntry {
            method: "GET",
            endpoint,
            status: 200,
            duration_ms: Some(duration_ms),
            meta: Some(TraceMeta {
                period: query.period.to_string(),
                country: query.country.clone(),
                count,
            }),
            error: None,
        });
    }

    fn fail(&self, endpoint: &'static str, e: Error) -> ApiError {
        let err = ApiError::internal(&e);
        self.trace_log.record(&TraceEntry {
            method: "GET",
            endpoint,
            status: err.status.as_u16(),
            duration_ms: None,
            meta: None,
            error: Some(e.to_string()),
        });
        err
    }
}
