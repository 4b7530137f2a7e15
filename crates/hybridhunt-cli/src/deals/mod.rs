//! Deal command handlers for the CLI.
//!
//! Every handler runs the shared engine over the loaded catalog; none of them
//! price or order deals on their own.

mod output;

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use hybridhunt_core::{
    export_text, query_raw, resolve_shared, AppConfig, Catalog, DealId, RawFilterCriteria,
    RecordSource, ShareLink,
};

use output::{print_json, print_table};

/// Sub-commands available under `deals`.
#[derive(Debug, Subcommand)]
pub enum DealsCommands {
    /// Filter and rank deals from the catalog
    Search {
        /// Category (flower, edibles, vapes, concentrates, pre-roll)
        #[arg(long)]
        category: Option<String>,
        /// Minimum undiscounted price
        #[arg(long)]
        min_price: Option<String>,
        /// Maximum undiscounted price
        #[arg(long)]
        max_price: Option<String>,
        /// Minimum THC percentage
        #[arg(long)]
        min_thc: Option<String>,
        /// Strain type (sativa, indica, hybrid)
        #[arg(long)]
        strain_type: Option<String>,
        /// Sort key: effective_price, thc, or distance (defaults to `HH_DEFAULT_SORT`)
        #[arg(long)]
        sort: Option<String>,
        /// Print the JSON payload instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve a share link such as "ids=1,2,3&user=abcd1234"
    Shared {
        #[arg(long)]
        link: String,
        /// Print the JSON payload instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a plain-text export of the given deals
    Export {
        /// Comma-separated deal ids, in export order
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
        /// Date stamped into the header (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Dispatches a `deals` sub-command.
///
/// # Errors
///
/// Returns an error if filter criteria or the share link are invalid.
pub(crate) fn run(
    catalog: &Catalog,
    config: &AppConfig,
    command: DealsCommands,
) -> anyhow::Result<()> {
    match command {
        DealsCommands::Search {
            category,
            min_price,
            max_price,
            min_thc,
            strain_type,
            sort,
            json,
        } => {
            let raw = RawFilterCriteria {
                category,
                min_price,
                max_price,
                min_thc,
                strain_type,
            };
            let sort = sort.unwrap_or_else(|| config.default_sort.to_string());
            let result = query_raw(catalog.records(), raw, &sort)?;
            if json {
                print_json(&result)?;
            } else if result.items.is_empty() {
                println!("no deals match the given filters");
            } else {
                print_table(&result);
            }
        }
        DealsCommands::Shared { link, json } => {
            let link = ShareLink::parse(&link)?;
            let result = resolve_shared(catalog, &link, config.share_max_ids);
            if json {
                print_json(&result)?;
            } else if result.items.is_empty() {
                println!("none of the shared deals are available anymore");
            } else {
                println!("Shared by {}", link.sharer);
                println!();
                print_table(&result);
            }
        }
        DealsCommands::Export { ids, date } => {
            let ids: Vec<DealId> = ids.into_iter().map(DealId).collect();
            let records = catalog.by_ids(&ids, ids.len());
            if records.len() < ids.len() {
                tracing::warn!(
                    requested = ids.len(),
                    found = records.len(),
                    "some deal ids were not found in the catalog"
                );
            }
            if records.is_empty() {
                anyhow::bail!("no deals to export");
            }
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            print!("{}", export_text(&records, date));
        }
    }

    Ok(())
}
