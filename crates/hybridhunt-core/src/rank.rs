use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::normalize::NormalizedDeal;

/// Comparison key for ordering a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending by effective price ("best value").
    #[default]
    EffectivePrice,
    /// Descending by THC percentage; records without THC last.
    Thc,
    /// Ascending by dispensary distance; records without distance last.
    Distance,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::EffectivePrice => write!(f, "effective_price"),
            SortKey::Thc => write!(f, "thc"),
            SortKey::Distance => write!(f, "distance"),
        }
    }
}

impl FromStr for SortKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "effective_price" => Ok(SortKey::EffectivePrice),
            "thc" => Ok(SortKey::Thc),
            "distance" => Ok(SortKey::Distance),
            other => Err(EngineError::invalid(
                "sort",
                other,
                "expected one of effective_price, thc, distance",
            )),
        }
    }
}

/// Orders deals by `key`. The sort is stable: deals with equal keys keep
/// their input order.
#[must_use]
pub fn rank(mut deals: Vec<NormalizedDeal>, key: SortKey) -> Vec<NormalizedDeal> {
    match key {
        SortKey::EffectivePrice => {
            deals.sort_by(|a, b| a.exact_effective_price().cmp(&b.exact_effective_price()));
        }
        SortKey::Thc => deals.sort_by(|a, b| {
            compare_present_first(
                a.record.thc_percentage,
                b.record.thc_percentage,
                |x, y| y.cmp(x),
            )
        }),
        SortKey::Distance => deals.sort_by(|a, b| {
            compare_present_first(
                a.record.dispensary.distance_miles,
                b.record.dispensary.distance_miles,
                |x, y| x.cmp(y),
            )
        }),
    }
    deals
}

/// Compares two optional values with `present` ordering, placing `None` after
/// every `Some`.
fn compare_present_first<F>(a: Option<Decimal>, b: Option<Decimal>, present: F) -> Ordering
where
    F: Fn(&Decimal, &Decimal) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => present(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
