use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Stable identifier of a deal, as assigned by the record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub i64);

impl std::fmt::Display for DealId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DealId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(DealId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flower,
    Edibles,
    Vapes,
    Concentrates,
    #[serde(rename = "pre-roll")]
    PreRoll,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Flower,
        Category::Edibles,
        Category::Vapes,
        Category::Concentrates,
        Category::PreRoll,
    ];

    /// Human-readable label, e.g. `"Pre Roll"` for `pre-roll`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Flower => "Flower",
            Category::Edibles => "Edibles",
            Category::Vapes => "Vapes",
            Category::Concentrates => "Concentrates",
            Category::PreRoll => "Pre Roll",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Flower => write!(f, "flower"),
            Category::Edibles => write!(f, "edibles"),
            Category::Vapes => write!(f, "vapes"),
            Category::Concentrates => write!(f, "concentrates"),
            Category::PreRoll => write!(f, "pre-roll"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string() == s)
            .ok_or_else(|| "expected one of flower, edibles, vapes, concentrates, pre-roll".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrainType {
    Sativa,
    Indica,
    Hybrid,
}

impl std::fmt::Display for StrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrainType::Sativa => write!(f, "sativa"),
            StrainType::Indica => write!(f, "indica"),
            StrainType::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for StrainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sativa" => Ok(StrainType::Sativa),
            "indica" => Ok(StrainType::Indica),
            "hybrid" => Ok(StrainType::Hybrid),
            _ => Err("expected one of sativa, indica, hybrid".to_string()),
        }
    }
}

/// Structural category of a pricing offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealType {
    #[default]
    Single,
    /// `deal_quantity` units for `deal_total_price`.
    Bundle,
    /// Buy one, get one. Label only; no effect on the effective price.
    Bogo,
    /// Sale price in `deal_total_price`.
    Discount,
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealType::Single => write!(f, "single"),
            DealType::Bundle => write!(f, "bundle"),
            DealType::Bogo => write!(f, "bogo"),
            DealType::Discount => write!(f, "discount"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispensary {
    pub id: i64,
    pub name: String,
    /// Distance from the shopper's reference point, if the store knows it.
    #[serde(default)]
    pub distance_miles: Option<Decimal>,
}

/// A raw product/deal snapshot as handed over by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: DealId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub strain_type: Option<StrainType>,
    #[serde(default)]
    pub thc_percentage: Option<Decimal>,
    /// Undiscounted per-unit price, regardless of deal type.
    pub price: Decimal,
    #[serde(default)]
    pub deal_type: DealType,
    #[serde(default = "default_deal_quantity")]
    pub deal_quantity: u32,
    /// Total for `deal_quantity` units (bundle) or the sale price (discount).
    #[serde(default)]
    pub deal_total_price: Option<Decimal>,
    pub dispensary: Dispensary,
}

pub(crate) fn default_deal_quantity() -> u32 {
    1
}

impl DealRecord {
    /// Checks the structural invariants of a record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), RecordError> {
        let fail = |reason: String| RecordError {
            id: self.id,
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(fail("name must be non-empty".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(fail(format!("price must be >= 0, got {}", self.price)));
        }
        if let Some(thc) = self.thc_percentage {
            if thc < Decimal::ZERO || thc > Decimal::ONE_HUNDRED {
                return Err(fail(format!(
                    "thc_percentage must be within 0..=100, got {thc}"
                )));
            }
        }
        if self.deal_quantity == 0 {
            return Err(fail("deal_quantity must be >= 1".to_string()));
        }
        if let Some(total) = self.deal_total_price {
            if total < Decimal::ZERO {
                return Err(fail(format!(
                    "deal_total_price must be >= 0, got {total}"
                )));
            }
        }
        if let Some(distance) = self.dispensary.distance_miles {
            if distance < Decimal::ZERO {
                return Err(fail(format!(
                    "dispensary distance_miles must be >= 0, got {distance}"
                )));
            }
        }
        Ok(())
    }

    /// Display label for the deal structure, e.g. `"4 for $100"`.
    ///
    /// Returns `None` for single-unit pricing and for deal records that lack
    /// the fields their deal type needs.
    #[must_use]
    pub fn deal_label(&self) -> Option<String> {
        match self.deal_type {
            DealType::Single => None,
            DealType::Bogo => Some("BOGO".to_string()),
            DealType::Bundle => self
                .deal_total_price
                .filter(|_| self.deal_quantity >= 1)
                .map(|total| format!("{} for ${}", self.deal_quantity, total.normalize())),
            DealType::Discount => self
                .deal_total_price
                .map(|total| format!("${} (was ${})", total.normalize(), self.price.normalize())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(deal_type: DealType) -> DealRecord {
        DealRecord {
            id: DealId(7),
            name: "Blue Dream 3.5g".to_string(),
            category: Category::Flower,
            strain_type: Some(StrainType::Hybrid),
            thc_percentage: Some(Decimal::new(243, 1)),
            price: Decimal::new(40, 0),
            deal_type,
            deal_quantity: 1,
            deal_total_price: None,
            dispensary: Dispensary {
                id: 1,
                name: "Planet 13".to_string(),
                distance_miles: Some(Decimal::new(32, 1)),
            },
        }
    }

    #[test]
    fn category_round_trips_through_display_and_from_str() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn category_rejects_unknown_token() {
        assert!("beverages".parse::<Category>().is_err());
        assert!("Flower".parse::<Category>().is_err());
    }

    #[test]
    fn pre_roll_uses_hyphenated_wire_name() {
        let json = serde_json::to_string(&Category::PreRoll).unwrap();
        assert_eq!(json, "\"pre-roll\"");
        assert_eq!(Category::PreRoll.label(), "Pre Roll");
    }

    #[test]
    fn deserialize_applies_deal_defaults() {
        let json = r#"{
            "id": 3,
            "name": "Sour Gummies",
            "category": "edibles",
            "price": "18",
            "dispensary": {"id": 2, "name": "The Source"}
        }"#;
        let record: DealRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.deal_type, DealType::Single);
        assert_eq!(record.deal_quantity, 1);
        assert!(record.deal_total_price.is_none());
        assert!(record.strain_type.is_none());
        assert!(record.dispensary.distance_miles.is_none());
    }

    #[test]
    fn validate_accepts_well_formed_record() {
        assert!(make_record(DealType::Single).validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut record = make_record(DealType::Single);
        record.name = "   ".to_string();
        let err = record.validate().unwrap_err();
        assert_eq!(err.id, DealId(7));
        assert!(err.reason.contains("name"));
    }

    #[test]
    fn validate_rejects_negative_price() {
        let mut record = make_record(DealType::Single);
        record.price = Decimal::new(-1, 0);
        assert!(record.validate().is_err());
    }

    #[test]
    fn validate_accepts_zero_price() {
        let mut record = make_record(DealType::Single);
        record.price = Decimal::ZERO;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn validate_rejects_thc_above_hundred() {
        let mut record = make_record(DealType::Single);
        record.thc_percentage = Some(Decimal::new(101, 0));
        assert!(record.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_quantity() {
        let mut record = make_record(DealType::Bundle);
        record.deal_quantity = 0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn deal_label_for_bundle() {
        let mut record = make_record(DealType::Bundle);
        record.deal_quantity = 4;
        record.deal_total_price = Some(Decimal::new(10000, 2));
        assert_eq!(record.deal_label().as_deref(), Some("4 for $100"));
    }

    #[test]
    fn deal_label_for_discount_and_bogo() {
        let mut discount = make_record(DealType::Discount);
        discount.deal_total_price = Some(Decimal::new(35, 0));
        assert_eq!(discount.deal_label().as_deref(), Some("$35 (was $40)"));

        assert_eq!(make_record(DealType::Bogo).deal_label().as_deref(), Some("BOGO"));
        assert!(make_record(DealType::Single).deal_label().is_none());
    }

    #[test]
    fn deal_label_absent_when_bundle_total_missing() {
        let mut record = make_record(DealType::Bundle);
        record.deal_quantity = 2;
        assert!(record.deal_label().is_none());
    }
}
