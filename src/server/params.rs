//! Query-string validation for the series endpoints.
//!
//! Everything here runs before the statistics API is contacted, so bad input
//! never costs an upstream round trip.

use serde::Deserialize;

use crate::analyzers::ranking::ALL_COUNTRIES;
use crate::analyzers::types::{DateRange, Period};
use crate::date::is_valid_date;
use crate::error::Error;
use crate::server::error::ApiError;

const MAX_COUNTRY_LEN: usize = 64;

/// Raw query parameters. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesParams {
    pub period: Option<String>,
    pub country: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Validated parameters, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub period: Period,
    pub country: String,
    pub range: DateRange,
}

impl SeriesParams {
    pub fn validate(self, default_period: Period) -> Result<SeriesQuery, ApiError> {
        let period = match non_empty(self.period) {
            Some(p) => p.parse::<Period>()?,
            None => default_period,
        };

        let start = non_empty(self.start);
        if start.as_deref().is_some_and(|s| !is_valid_date(s)) {
            return Err(ApiError::bad_request(
                "Invalid start date. Expected format: YYYY-MM-DD",
            ));
        }

        let end = non_empty(self.end);
        if end.as_deref().is_some_and(|e| !is_valid_date(e)) {
            return Err(ApiError::bad_request(
                "Invalid end date. Expected format: YYYY-MM-DD",
            ));
        }

        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(Error::InvalidRange {
                    start: s.clone(),
                    end: e.clone(),
                }
                .into());
            }
        }

        let country = non_empty(self.country).unwrap_or_else(|| ALL_COUNTRIES.to_string());
        if !is_valid_country(&country) {
            return Err(ApiError::bad_request("Invalid country parameter"));
        }

        Ok(SeriesQuery {
            period,
            country,
            range: DateRange::new(start, end),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Any name the provider lists is accepted; the client percent-encodes it
/// as a single path segment. Dot segments would be dropped from the path.
fn is_valid_country(country: &str) -> bool {
    country.len() <= MAX_COUNTRY_LEN
        && !matches!(country, "." | "..")
        && !country.chars().any(|c| c.is_control() || c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::ranking::country_list;
    use crate::analyzers::types::CountrySummary;
    use axum::http::StatusCode;

    fn summary(country: &str) -> CountrySummary {
        CountrySummary {
            country: country.to_string(),
            cases: 1,
        }
    }

    fn params(period: &str, country: &str, start: &str, end: &str) -> SeriesParams {
        let opt = |s: &str| Some(s.to_string());
        SeriesParams {
            period: opt(period),
            country: opt(country),
            start: opt(start),
            end: opt(end),
        }
    }

    fn message(p: SeriesParams) -> String {
        let err = p.validate(Period::Month).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        err.message
    }

    #[test]
    fn test_defaults() {
        let query = SeriesParams::default().validate(Period::Day).unwrap();
        assert_eq!(query.period, Period::Day);
        assert_eq!(query.country, "all");
        assert_eq!(query.range, DateRange::default());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let query = params("", "", "", "").validate(Period::Month).unwrap();
        assert_eq!(query.period, Period::Month);
        assert_eq!(query.country, "all");
        assert_eq!(query.range, DateRange::default());
    }

    #[test]
    fn test_valid_params() {
        let query = params("week", "South Korea", "2021-01-01", "2021-01-01")
            .validate(Period::Month)
            .unwrap();
        assert_eq!(query.period, Period::Week);
        assert_eq!(query.country, "South Korea");
        assert_eq!(query.range.start.as_deref(), Some("2021-01-01"));
        assert_eq!(query.range.end.as_deref(), Some("2021-01-01"));
    }

    #[test]
    fn test_invalid_period() {
        assert_eq!(
            message(params("year", "all", "", "")),
            "Invalid period. Allowed values: day, week, month"
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(
            message(params("day", "all", "2022-13-40", "")),
            "Invalid start date. Expected format: YYYY-MM-DD"
        );
        assert_eq!(
            message(params("day", "all", "", "2022-1-31")),
            "Invalid end date. Expected format: YYYY-MM-DD"
        );
    }

    #[test]
    fn test_start_after_end() {
        assert_eq!(
            message(params("day", "all", "2022-02-01", "2022-01-31")),
            "Start date cannot be after end date"
        );
    }

    #[test]
    fn test_period_is_checked_before_dates() {
        assert_eq!(
            message(params("hour", "all", "nope", "nope")),
            "Invalid period. Allowed values: day, week, month"
        );
    }

    #[test]
    fn test_invalid_country() {
        assert_eq!(
            message(params("day", "../countries", "", "")),
            "Invalid country parameter"
        );
        assert_eq!(
            message(params("day", &"x".repeat(65), "", "")),
            "Invalid country parameter"
        );
        assert_eq!(
            message(params("day", "Peru\n", "", "")),
            "Invalid country parameter"
        );
        assert_eq!(
            message(params("day", "..", "", "")),
            "Invalid country parameter"
        );
    }

    #[test]
    fn test_every_listed_country_is_accepted() {
        let listed = country_list(&[
            summary("Côte d'Ivoire"),
            summary("Curaçao"),
            summary("Réunion"),
            summary("Guinea-Bissau"),
            summary("S. Korea"),
            summary("Saint Helena, Ascension and Tristan da Cunha"),
        ]);

        for name in listed {
            let query = params("day", &name, "", "")
                .validate(Period::Month)
                .unwrap_or_else(|e| panic!("{name:?} rejected: {}", e.message));
            assert_eq!(query.country, name);
        }
    }
}
