use std::collections::{HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::deals::{
    default_deal_quantity, Category, DealId, DealRecord, DealType, Dispensary, StrainType,
};
use crate::CatalogError;

/// Supplies raw deal records to the engine.
pub trait RecordSource {
    /// Every record, in source order.
    fn all(&self) -> Vec<DealRecord>;

    /// Records for `ids`, in the order requested, skipping unknown ids and
    /// returning at most `limit` records.
    fn by_ids(&self, ids: &[DealId], limit: usize) -> Vec<DealRecord>;

    fn contains(&self, id: DealId) -> bool;
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub dispensaries: Vec<DispensaryEntry>,
    #[serde(default)]
    pub deals: Vec<DealEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispensaryEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub distance_miles: Option<Decimal>,
}

/// A deal row as stored in the catalog file, referencing its dispensary by id.
#[derive(Debug, Clone, Deserialize)]
pub struct DealEntry {
    pub id: DealId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub strain_type: Option<StrainType>,
    #[serde(default)]
    pub thc_percentage: Option<Decimal>,
    pub price: Decimal,
    #[serde(default)]
    pub deal_type: DealType,
    #[serde(default = "default_deal_quantity")]
    pub deal_quantity: u32,
    #[serde(default)]
    pub deal_total_price: Option<Decimal>,
    pub dispensary_id: i64,
}

/// In-memory record source built from a validated catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<DealRecord>,
    index: HashMap<DealId, usize>,
    dispensary_count: usize,
}

impl Catalog {
    /// Builds a catalog from already-joined records.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` on duplicate ids or records that
    /// fail [`DealRecord::validate`].
    pub fn from_records(records: Vec<DealRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            record.validate()?;
            if index.insert(record.id, pos).is_some() {
                return Err(CatalogError::Validation(format!(
                    "duplicate deal id: {}",
                    record.id
                )));
            }
        }
        let dispensary_count = records
            .iter()
            .map(|r| r.dispensary.id)
            .collect::<HashSet<_>>()
            .len();
        Ok(Self {
            records,
            index,
            dispensary_count,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct dispensaries referenced by the catalog's deals.
    #[must_use]
    pub fn dispensary_count(&self) -> usize {
        self.dispensary_count
    }

    #[must_use]
    pub fn get(&self, id: DealId) -> Option<&DealRecord> {
        self.index.get(&id).and_then(|&pos| self.records.get(pos))
    }

    #[must_use]
    pub fn records(&self) -> &[DealRecord] {
        &self.records
    }
}

impl RecordSource for Catalog {
    fn all(&self) -> Vec<DealRecord> {
        self.records.clone()
    }

    fn by_ids(&self, ids: &[DealId], limit: usize) -> Vec<DealRecord> {
        ids.iter()
            .filter_map(|&id| self.get(id))
            .take(limit)
            .cloned()
            .collect()
    }

    fn contains(&self, id: DealId) -> bool {
        self.index.contains_key(&id)
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog = parse_catalog(&content)?;
    tracing::info!(
        path = %path.display(),
        deals = catalog.len(),
        dispensaries = catalog.dispensary_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse and validate a catalog from YAML text.
///
/// # Errors
///
/// Returns `CatalogError::Parse` for malformed YAML and
/// `CatalogError::Validation` for duplicate ids, dangling dispensary
/// references, or invalid records.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = serde_yaml::from_str(yaml)?;
    let dispensaries = index_dispensaries(&file.dispensaries)?;

    let records = file
        .deals
        .into_iter()
        .map(|entry| {
            let dispensary = dispensaries.get(&entry.dispensary_id).ok_or_else(|| {
                CatalogError::Validation(format!(
                    "deal {} references unknown dispensary {}",
                    entry.id, entry.dispensary_id
                ))
            })?;
            Ok(DealRecord {
                id: entry.id,
                name: entry.name,
                category: entry.category,
                strain_type: entry.strain_type,
                thc_percentage: entry.thc_percentage,
                price: entry.price,
                deal_type: entry.deal_type,
                deal_quantity: entry.deal_quantity,
                deal_total_price: entry.deal_total_price,
                dispensary: dispensary.clone(),
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    Catalog::from_records(records)
}

fn index_dispensaries(
    entries: &[DispensaryEntry],
) -> Result<HashMap<i64, Dispensary>, CatalogError> {
    let mut seen_names = HashSet::new();
    let mut by_id = HashMap::with_capacity(entries.len());

    for entry in entries {
        if entry.name.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "dispensary {} must have a non-empty name",
                entry.id
            )));
        }
        if entry.distance_miles.is_some_and(|d| d < Decimal::ZERO) {
            return Err(CatalogError::Validation(format!(
                "dispensary '{}' has a negative distance",
                entry.name
            )));
        }
        if !seen_names.insert(entry.name.to_lowercase()) {
            return Err(CatalogError::Validation(format!(
                "duplicate dispensary name: '{}'",
                entry.name
            )));
        }
        let dispensary = Dispensary {
            id: entry.id,
            name: entry.name.clone(),
            distance_miles: entry.distance_miles,
        };
        if by_id.insert(entry.id, dispensary).is_some() {
            return Err(CatalogError::Validation(format!(
                "duplicate dispensary id: {}",
                entry.id
            )));
        }
    }

    Ok(by_id)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
