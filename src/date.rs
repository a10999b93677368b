//! Date normalization for the upstream feed.
//!
//! The statistics API keys its timelines by `M/D/YY` tokens. Everything
//! downstream works on canonical `YYYY-MM-DD` strings, which sort
//! lexicographically in chronological order.

use chrono::NaiveDate;

use crate::error::{Error, Result};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Converts an `M/D/YY` token into `YYYY-MM-DD`.
///
/// Two-digit years below 50 land in the 2000s, the rest in the 1900s.
/// Tokens that are already canonical are returned as-is.
///
/// No calendar validation happens here: `"13/40/22"` becomes `"2022-13-40"`.
///
/// # Errors
///
/// Returns [`Error::MalformedDate`] if the token is not made of exactly three
/// `/`-separated numeric parts with a two-digit year.
pub fn normalize(source: &str) -> Result<String> {
    if has_canonical_shape(source) {
        return Ok(source.to_string());
    }

    let parts: Vec<&str> = source.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(Error::malformed(source, "expected exactly two '/' separators"));
    };

    if !is_short_number(month) || !is_short_number(day) {
        return Err(Error::malformed(source, "month and day must be 1-2 digits"));
    }
    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(source, "year must be exactly 2 digits"));
    }

    let century = if year.parse::<u8>().unwrap_or(0) < 50 {
        "20"
    } else {
        "19"
    };

    Ok(format!("{century}{year}-{month:0>2}-{day:0>2}"))
}

/// Returns `true` iff `candidate` is `YYYY-MM-DD` and names a real calendar day.
pub fn is_valid_date(candidate: &str) -> bool {
    has_canonical_shape(candidate) && NaiveDate::parse_from_str(candidate, CANONICAL_FORMAT).is_ok()
}

/// Parses a canonical date into a calendar date.
pub fn parse_calendar_date(canonical: &str) -> Result<NaiveDate> {
    if !has_canonical_shape(canonical) {
        return Err(Error::malformed(canonical, "expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(canonical, CANONICAL_FORMAT)
        .map_err(|_| Error::malformed(canonical, "not a calendar date"))
}

fn has_canonical_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

fn is_short_number(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
