//! Filter evaluation over normalized deals.
//!
//! Every criterion is optional and the set is conjunctive. An absent
//! criterion never rejects a record for missing the corresponding field; the
//! one exception is a positive `min_thc`, which rejects records without a
//! THC value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deals::{Category, StrainType};
use crate::error::EngineError;
use crate::normalize::NormalizedDeal;

/// Typed filter criteria. `Default` means "no constraint on any dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    /// Inclusive lower bound on the raw `price`.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the raw `price`.
    pub max_price: Option<Decimal>,
    /// Inclusive lower bound on `thc_percentage`.
    pub min_thc: Option<Decimal>,
    pub strain_type: Option<StrainType>,
}

/// Untyped criteria as they arrive from a query string or CLI flags.
///
/// Empty or whitespace-only values are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawFilterCriteria {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_thc: Option<String>,
    pub strain_type: Option<String>,
}

impl TryFrom<RawFilterCriteria> for FilterCriteria {
    type Error = EngineError;

    fn try_from(raw: RawFilterCriteria) -> Result<Self, Self::Error> {
        Ok(Self {
            category: parse_token("category", raw.category.as_deref())?,
            min_price: parse_bound("min_price", raw.min_price.as_deref())?,
            max_price: parse_bound("max_price", raw.max_price.as_deref())?,
            min_thc: parse_bound("min_thc", raw.min_thc.as_deref())?,
            strain_type: parse_token("strain_type", raw.strain_type.as_deref())?,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_token<T>(field: &'static str, value: Option<&str>) -> Result<Option<T>, EngineError>
where
    T: std::str::FromStr<Err = String>,
{
    non_blank(value)
        .map(|v| {
            v.to_lowercase()
                .parse::<T>()
                .map_err(|reason| EngineError::invalid(field, v, reason))
        })
        .transpose()
}

fn parse_bound(field: &'static str, value: Option<&str>) -> Result<Option<Decimal>, EngineError> {
    let Some(v) = non_blank(value) else {
        return Ok(None);
    };
    let bound = v
        .parse::<Decimal>()
        .map_err(|_| EngineError::invalid(field, v, "not a valid number"))?;
    if bound < Decimal::ZERO {
        return Err(EngineError::invalid(field, v, "must not be negative"));
    }
    Ok(Some(bound))
}

/// Returns `true` when `deal` satisfies every criterion that is set.
#[must_use]
pub fn matches(deal: &NormalizedDeal, criteria: &FilterCriteria) -> bool {
    let record = &deal.record;

    if criteria.category.is_some_and(|c| c != record.category) {
        return false;
    }
    if criteria.min_price.is_some_and(|min| record.price < min) {
        return false;
    }
    if criteria.max_price.is_some_and(|max| record.price > max) {
        return false;
    }
    if let Some(min_thc) = criteria.min_thc {
        match record.thc_percentage {
            Some(thc) if thc < min_thc => return false,
            None if min_thc > Decimal::ZERO => return false,
            _ => {}
        }
    }
    if criteria
        .strain_type
        .is_some_and(|s| record.strain_type != Some(s))
    {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deals::{DealId, DealRecord, DealType, Dispensary};
    use crate::normalize::normalize;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn make_deal(price: &str, thc: Option<&str>, strain: Option<StrainType>) -> NormalizedDeal {
        normalize(&DealRecord {
            id: DealId(1),
            name: "Wedding Cake".to_string(),
            category: Category::Flower,
            strain_type: strain,
            thc_percentage: thc.map(dec),
            price: dec(price),
            deal_type: DealType::Single,
            deal_quantity: 1,
            deal_total_price: None,
            dispensary: Dispensary {
                id: 1,
                name: "Oasis".to_string(),
                distance_miles: None,
            },
        })
    }

    #[test]
    fn default_criteria_match_everything() {
        let deal = make_deal("30", None, None);
        assert!(matches(&deal, &FilterCriteria::default()));
    }

    #[test]
    fn category_must_match_exactly() {
        let deal = make_deal("30", None, None);
        let flower = FilterCriteria {
            category: Some(Category::Flower),
            ..FilterCriteria::default()
        };
        let vapes = FilterCriteria {
            category: Some(Category::Vapes),
            ..FilterCriteria::default()
        };
        assert!(matches(&deal, &flower));
        assert!(!matches(&deal, &vapes));
    }

    #[test]
    fn price_bounds_are_inclusive_on_raw_price() {
        let deal = make_deal("30", None, None);
        let exact = FilterCriteria {
            min_price: Some(dec("30")),
            max_price: Some(dec("30")),
            ..FilterCriteria::default()
        };
        let above = FilterCriteria {
            min_price: Some(dec("30.01")),
            ..FilterCriteria::default()
        };
        let below = FilterCriteria {
            max_price: Some(dec("29.99")),
            ..FilterCriteria::default()
        };
        assert!(matches(&deal, &exact));
        assert!(!matches(&deal, &above));
        assert!(!matches(&deal, &below));
    }

    #[test]
    fn price_bounds_ignore_effective_price() {
        let mut record = make_deal("40", None, None).record;
        record.deal_type = DealType::Discount;
        record.deal_total_price = Some(dec("20"));
        let deal = normalize(&record);

        let criteria = FilterCriteria {
            max_price: Some(dec("25")),
            ..FilterCriteria::default()
        };
        assert!(!matches(&deal, &criteria));
    }

    #[test]
    fn min_thc_rejects_missing_thc_only_when_positive() {
        let no_thc = make_deal("30", None, None);
        let zero_floor = FilterCriteria {
            min_thc: Some(Decimal::ZERO),
            ..FilterCriteria::default()
        };
        let positive_floor = FilterCriteria {
            min_thc: Some(dec("20")),
            ..FilterCriteria::default()
        };
        assert!(matches(&no_thc, &zero_floor));
        assert!(!matches(&no_thc, &positive_floor));
    }

    #[test]
    fn min_thc_is_inclusive() {
        let deal = make_deal("30", Some("20"), None);
        let criteria = FilterCriteria {
            min_thc: Some(dec("20")),
            ..FilterCriteria::default()
        };
        assert!(matches(&deal, &criteria));
        assert!(!matches(
            &deal,
            &FilterCriteria {
                min_thc: Some(dec("20.1")),
                ..FilterCriteria::default()
            }
        ));
    }

    #[test]
    fn strain_type_rejects_absent_strain_when_set() {
        let hybrid = make_deal("30", None, Some(StrainType::Hybrid));
        let unknown = make_deal("30", None, None);
        let criteria = FilterCriteria {
            strain_type: Some(StrainType::Hybrid),
            ..FilterCriteria::default()
        };
        assert!(matches(&hybrid, &criteria));
        assert!(!matches(&unknown, &criteria));
    }

    #[test]
    fn raw_criteria_treat_blank_values_as_wildcards() {
        let raw = RawFilterCriteria {
            category: Some(String::new()),
            min_price: Some("  ".to_string()),
            max_price: None,
            min_thc: Some(String::new()),
            strain_type: Some(String::new()),
        };
        assert_eq!(FilterCriteria::try_from(raw), Ok(FilterCriteria::default()));
    }

    #[test]
    fn raw_criteria_parse_typed_values() {
        let raw = RawFilterCriteria {
            category: Some("pre-roll".to_string()),
            min_price: Some("10".to_string()),
            max_price: Some("45.50".to_string()),
            min_thc: Some("18".to_string()),
            strain_type: Some("Sativa".to_string()),
        };
        let criteria = FilterCriteria::try_from(raw).unwrap();
        assert_eq!(criteria.category, Some(Category::PreRoll));
        assert_eq!(criteria.min_price, Some(dec("10")));
        assert_eq!(criteria.max_price, Some(dec("45.50")));
        assert_eq!(criteria.min_thc, Some(dec("18")));
        assert_eq!(criteria.strain_type, Some(StrainType::Sativa));
    }

    #[test]
    fn raw_criteria_reject_non_numeric_bound() {
        let raw = RawFilterCriteria {
            min_price: Some("cheap".to_string()),
            ..RawFilterCriteria::default()
        };
        let err = FilterCriteria::try_from(raw).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidCriteria { field: "min_price", ref value, .. } if value == "cheap"
        ));
    }

    #[test]
    fn raw_criteria_reject_negative_bound() {
        let raw = RawFilterCriteria {
            min_thc: Some("-1".to_string()),
            ..RawFilterCriteria::default()
        };
        assert!(FilterCriteria::try_from(raw).is_err());
    }

    #[test]
    fn raw_criteria_reject_unknown_category() {
        let raw = RawFilterCriteria {
            category: Some("tinctures".to_string()),
            ..RawFilterCriteria::default()
        };
        let err = FilterCriteria::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("category"));
    }
}
