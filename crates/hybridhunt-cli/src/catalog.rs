use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use hybridhunt_core::Catalog;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Load and validate the catalog file, then print a summary
    Validate {
        /// Catalog path (defaults to `HH_CATALOG_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Prints deal and dispensary counts for a catalog that passed validation.
pub(crate) fn run_validate(catalog: &Catalog, path: &Path) {
    println!(
        "catalog OK: {} deals across {} dispensaries ({})",
        catalog.len(),
        catalog.dispensary_count(),
        path.display()
    );

    let mut by_category: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in catalog.records() {
        *by_category.entry(record.category.label()).or_default() += 1;
    }
    for (category, count) in by_category {
        println!("  {category:<14}{count}");
    }
}
