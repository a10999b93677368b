use chrono::{Datelike, Days, NaiveDate};

use crate::analyzers::types::{AggregatedSeries, DateRange, Period, RawSeries};
use crate::date::{normalize, parse_calendar_date};
use crate::error::Result;

/// Buckets a raw daily series by `period`, summing counts per bucket.
///
/// Each source date is normalized first and dropped if it falls outside
/// `range` (both ends inclusive). Bucket keys are:
///
/// | Period | Key          |
/// |--------|--------------|
/// | day    | `YYYY-MM-DD` |
/// | week   | `YYYY-Www`   |
/// | month  | `YYYY-MM`    |
///
/// Counts are summed as-is, negative values included; sums saturate at the
/// `i64` bounds.
///
/// # Errors
///
/// Fails on a malformed source token, or under [`Period::Week`] on a date
/// that is not a real calendar day.
pub fn aggregate(
    series: &RawSeries,
    period: Period,
    range: &DateRange,
) -> Result<AggregatedSeries> {
    let mut result = AggregatedSeries::new();

    for (source_date, count) in series {
        let date = normalize(source_date)?;
        if !range.contains(&date) {
            continue;
        }

        let key = match period {
            Period::Day => date,
            Period::Week => iso_week_key(parse_calendar_date(&date)?),
            Period::Month => date[..7].to_string(),
        };

        let total = result.entry(key).or_insert(0);
        *total = total.saturating_add(*count);
    }

    Ok(result)
}

/// Formats the ISO-8601 week containing `date` as `YYYY-Www`.
///
/// The week-numbering year is the year of that week's Thursday, so the
/// last days of December can belong to week 01 of the next year and the
/// first days of January to week 52/53 of the previous one.
pub fn iso_week_key(date: NaiveDate) -> String {
    // Monday = 0 .. Sunday = 6
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let thursday = shift_days(date, 3 - weekday);
    let iso_year = thursday.year();

    let jan4 = NaiveDate::from_ymd_opt(iso_year, 1, 4).unwrap_or(thursday);
    let jan4_weekday = i64::from(jan4.weekday().num_days_from_monday());
    let days_since_jan4 = (thursday - jan4).num_days();

    // The offset is always a whole number of weeks from week 1's Thursday.
    let week = 1 + (days_since_jan4 - 3 + jan4_weekday).div_euclid(7);

    format!("{iso_year}-W{week:02}")
}

fn shift_days(date: NaiveDate, offset: i64) -> NaiveDate {
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    shifted.unwrap_or(date)
}
