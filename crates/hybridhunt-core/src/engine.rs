//! The deal query engine: normalize, filter, rank, summarize.
//!
//! This is the single entry point every surface uses (search, favorites,
//! shared links). It performs no I/O and reads no clock, so identical inputs
//! always produce identical output.

use serde::Serialize;

use crate::aggregate::{summarize, Summary};
use crate::deals::DealRecord;
use crate::error::EngineError;
use crate::filter::{matches, FilterCriteria, RawFilterCriteria};
use crate::normalize::{normalize, NormalizedDeal};
use crate::rank::{rank, SortKey};

/// Ordered, annotated result set plus its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub items: Vec<NormalizedDeal>,
    pub stats: Summary,
}

/// Runs the full pipeline over `records`.
#[must_use]
pub fn query(records: &[DealRecord], criteria: &FilterCriteria, sort: SortKey) -> QueryResult {
    let mut degraded = 0_usize;
    let survivors: Vec<NormalizedDeal> = records
        .iter()
        .map(normalize)
        .inspect(|deal| degraded += usize::from(deal.is_degraded()))
        .filter(|deal| matches(deal, criteria))
        .collect();

    let items = rank(survivors, sort);
    let stats = summarize(&items);

    tracing::debug!(
        input = records.len(),
        matched = stats.count,
        degraded,
        sort = %sort,
        "deal query complete"
    );

    QueryResult { items, stats }
}

/// Normalizes and summarizes `records` without filtering or reordering.
///
/// Used by surfaces whose order is set by the caller, such as shared links.
#[must_use]
pub fn annotate(records: &[DealRecord]) -> QueryResult {
    let items: Vec<NormalizedDeal> = records.iter().map(normalize).collect();
    let stats = summarize(&items);
    QueryResult { items, stats }
}

/// Parses untyped criteria and a sort token, then runs [`query`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidCriteria`] if a filter bound is not a valid
/// non-negative number, a category/strain token is unknown, or the sort key
/// is not one of `effective_price`, `thc`, `distance`.
pub fn query_raw(
    records: &[DealRecord],
    raw: RawFilterCriteria,
    sort: &str,
) -> Result<QueryResult, EngineError> {
    let criteria = FilterCriteria::try_from(raw)?;
    let sort = sort.parse::<SortKey>()?;
    Ok(query(records, &criteria, sort))
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
