use crate::analyzers::types::CountrySummary;

/// Sentinel that selects the global timeline upstream.
pub const ALL_COUNTRIES: &str = "all";

/// Returns the `limit` countries with the most cases, highest first.
/// Ties keep their upstream order.
pub fn top_countries(mut countries: Vec<CountrySummary>, limit: usize) -> Vec<CountrySummary> {
    countries.sort_by(|a, b| b.cases.cmp(&a.cases));
    countries.truncate(limit);
    countries
}

/// Country names for the selector, with [`ALL_COUNTRIES`] first.
pub fn country_list(countries: &[CountrySummary]) -> Vec<String> {
    std::iter::once(ALL_COUNTRIES.to_string())
        .chain(countries.iter().map(|c| c.country.clone()))
        .collect()
}
