use std::fmt::Write;

use chrono::NaiveDate;

use crate::deals::DealRecord;
use crate::normalize::round_money;

/// Renders a plain-text favorites list suitable for saving or pasting.
///
/// `date` is stamped into the header as `YYYY-MM-DD`.
#[must_use]
pub fn export_text(records: &[DealRecord], date: NaiveDate) -> String {
    let mut out = format!("HybridHunt Favorites ({})\n", date.format("%Y-%m-%d"));
    out.push_str(&"=".repeat(40));
    out.push_str("\n\n");

    for (index, record) in records.iter().enumerate() {
        let thc = record
            .thc_percentage
            .map_or_else(|| "n/a".to_string(), |thc| format!("{}%", thc.normalize()));

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}. {}", index + 1, record.name);
        let _ = writeln!(out, "   Dispensary: {}", record.dispensary.name);
        let _ = writeln!(out, "   Price: ${}", round_money(record.price));
        let _ = writeln!(out, "   THC: {thc}");
        let _ = writeln!(out, "   Category: {}", record.category.label());
        if let Some(label) = record.deal_label() {
            let _ = writeln!(out, "   Deal: {label}");
        }
        out.push('\n');
    }

    out
}
