use crate::analyzers::types::{AggregatedSeries, RateSeries};

/// Computes each bucket's fractional change from the bucket before it.
///
/// The first bucket has no predecessor and gets `None`. A predecessor of zero
/// also yields `None`, which only affects the bucket right after it.
pub fn derive_rate_of_change(aggregated: &AggregatedSeries) -> RateSeries {
    let mut result = RateSeries::new();
    let mut previous: Option<i64> = None;

    for (key, &value) in aggregated {
        let rate = match previous {
            Some(prev) if prev != 0 => Some((value as f64 - prev as f64) / prev as f64),
            _ => None,
        };
        result.insert(key.clone(), rate);
        previous = Some(value);
    }

    result
}
