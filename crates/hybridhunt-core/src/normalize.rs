//! Price normalization: resolves every deal structure to a comparable
//! per-unit effective price and a savings percentage.
//!
//! Values are kept at full precision on [`NormalizedDeal`] so ranking and
//! aggregation never compare rounded numbers; rounding happens only when the
//! values leave the engine (accessors and serialization).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::deals::{DealRecord, DealType};
use crate::error::MalformedRecord;

/// A [`DealRecord`] annotated with its effective price and savings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedDeal {
    #[serde(flatten)]
    pub record: DealRecord,
    #[serde(serialize_with = "serialize_money")]
    effective_price: Decimal,
    #[serde(serialize_with = "serialize_percent")]
    savings_percent: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    deal_label: Option<String>,
    #[serde(skip)]
    degraded: bool,
}

impl NormalizedDeal {
    /// Effective per-unit price rounded to 2 decimal places.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        round_money(self.effective_price)
    }

    /// Savings versus the baseline price, rounded to 1 decimal place.
    #[must_use]
    pub fn savings_percent(&self) -> Decimal {
        round_percent(self.savings_percent)
    }

    /// Unrounded effective price, used for ordering and averaging.
    #[must_use]
    pub fn exact_effective_price(&self) -> Decimal {
        self.effective_price
    }

    #[must_use]
    pub fn deal_label(&self) -> Option<&str> {
        self.deal_label.as_deref()
    }

    /// `true` when the record's deal fields were unusable and it was priced
    /// as a single unit instead.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Normalizes one record. Never fails: a record whose deal fields do not
/// support its deal type is priced as a single unit and logged.
#[must_use]
pub fn normalize(record: &DealRecord) -> NormalizedDeal {
    let (effective_price, degraded) = match resolve_effective_price(record) {
        Ok(price) => (price, false),
        Err(malformed) => {
            tracing::warn!(
                deal_id = %malformed.id,
                deal_type = %record.deal_type,
                reason = malformed.reason,
                "malformed deal record; pricing as single unit"
            );
            (record.price, true)
        }
    };

    NormalizedDeal {
        savings_percent: savings_percent(record.price, effective_price),
        effective_price,
        deal_label: record.deal_label(),
        degraded,
        record: record.clone(),
    }
}

/// Resolves the unrounded per-unit price for a record's deal type.
///
/// # Errors
///
/// Returns [`MalformedRecord`] when a bundle or discount lacks the fields its
/// deal type requires.
pub fn resolve_effective_price(record: &DealRecord) -> Result<Decimal, MalformedRecord> {
    let malformed = |reason| MalformedRecord {
        id: record.id,
        reason,
    };

    match record.deal_type {
        DealType::Single | DealType::Bogo => Ok(record.price),
        DealType::Bundle => {
            if record.deal_quantity == 0 {
                return Err(malformed("bundle deal_quantity must be >= 1"));
            }
            let total = record
                .deal_total_price
                .ok_or_else(|| malformed("bundle is missing deal_total_price"))?;
            if total < Decimal::ZERO {
                return Err(malformed("bundle deal_total_price is negative"));
            }
            Ok(total / Decimal::from(record.deal_quantity))
        }
        DealType::Discount => {
            let total = record
                .deal_total_price
                .ok_or_else(|| malformed("discount is missing deal_total_price"))?;
            if total < Decimal::ZERO {
                return Err(malformed("discount deal_total_price is negative"));
            }
            Ok(total)
        }
    }
}

/// `(price - effective) / price * 100`, clamped to zero. Zero when the base
/// price is zero or the effective price is not below it.
#[must_use]
pub fn savings_percent(price: Decimal, effective_price: Decimal) -> Decimal {
    if price <= Decimal::ZERO || effective_price >= price {
        return Decimal::ZERO;
    }
    (price - effective_price)
        .checked_div(price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |savings| savings.max(Decimal::ZERO))
}

/// Rounds to cents and pins the scale so `25` renders as `25.00`.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    round_fixed(value, 2)
}

/// Rounds to one decimal place and pins the scale so `0` renders as `0.0`.
#[must_use]
pub fn round_percent(value: Decimal) -> Decimal {
    round_fixed(value, 1)
}

fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

fn serialize_money<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    Serialize::serialize(&round_money(*value), serializer)
}

fn serialize_percent<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    Serialize::serialize(&round_percent(*value), serializer)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
