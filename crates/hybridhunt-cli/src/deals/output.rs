use hybridhunt_core::normalize::round_money;
use hybridhunt_core::QueryResult;
use rust_decimal::Decimal;

const NAME_WIDTH: usize = 28;

/// Format an optional decimal with a suffix, or a dash when `None`.
fn fmt_optional(value: Option<Decimal>, suffix: &str) -> String {
    value.map_or_else(
        || "\u{2014}".to_string(),
        |v| format!("{}{suffix}", v.normalize()),
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(super) fn print_table(result: &QueryResult) {
    let header = format!(
        "{:<30}{:<18}{:>9}{:>11}{:>9}{:>8}{:>7}",
        "NAME", "DISPENSARY", "PRICE", "EFFECTIVE", "SAVINGS", "THC", "DIST"
    );
    println!("{header}");
    for deal in &result.items {
        let record = &deal.record;
        println!(
            "{:<30}{:<18}{:>9}{:>11}{:>9}{:>8}{:>7}",
            truncate(&record.name, NAME_WIDTH),
            truncate(&record.dispensary.name, 16),
            format!("${}", round_money(record.price)),
            format!("${}", deal.effective_price()),
            format!("{}%", deal.savings_percent()),
            fmt_optional(record.thc_percentage, "%"),
            fmt_optional(record.dispensary.distance_miles, "mi"),
        );
    }
    println!();
    println!(
        "{} deals, average effective price ${}",
        result.stats.count, result.stats.average_effective_price
    );
}

pub(super) fn print_json(result: &QueryResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
