use rust_decimal::Decimal;
use serde::Serialize;

use crate::normalize::{round_money, NormalizedDeal};

/// Summary statistics over a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: usize,
    /// Rounded to cents.
    pub average_effective_price: Decimal,
}

/// Computes the count and mean effective price of `deals`.
///
/// The mean is taken over unrounded effective prices and then rounded to
/// cents. An empty slice yields a zero average, not an error.
#[must_use]
pub fn summarize(deals: &[NormalizedDeal]) -> Summary {
    let count = deals.len();
    if count == 0 {
        return Summary {
            count,
            average_effective_price: round_money(Decimal::ZERO),
        };
    }

    let divisor = Decimal::from(count);
    let mean = deals
        .iter()
        .map(NormalizedDeal::exact_effective_price)
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .map_or_else(|| scaled_mean(deals, divisor), |total| total / divisor);

    Summary {
        count,
        average_effective_price: round_money(mean),
    }
}

/// Mean computed as a sum of `price / count` terms, for totals that do not
/// fit in a `Decimal`. Each term is at most the largest price, so the sum
/// stays in range.
fn scaled_mean(deals: &[NormalizedDeal], divisor: Decimal) -> Decimal {
    tracing::warn!(
        count = deals.len(),
        "effective price total overflowed; averaging scaled terms"
    );
    deals.iter().fold(Decimal::ZERO, |acc, deal| {
        acc.checked_add(deal.exact_effective_price() / divisor)
            .unwrap_or(Decimal::MAX)
    })
}
