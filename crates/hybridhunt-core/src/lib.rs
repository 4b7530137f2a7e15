pub mod aggregate;
pub mod app_config;
pub mod catalog;
pub mod config;
pub mod deals;
pub mod engine;
pub mod error;
pub mod export;
pub mod favorites;
pub mod filter;
pub mod normalize;
pub mod rank;
pub mod share;

pub use aggregate::{summarize, Summary};
pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, parse_catalog, Catalog, RecordSource};
pub use config::{load_app_config, load_app_config_from_env};
pub use deals::{Category, DealId, DealRecord, DealType, Dispensary, StrainType};
pub use engine::{annotate, query, query_raw, QueryResult};
pub use error::{CatalogError, ConfigError, EngineError, MalformedRecord, RecordError, ShareError};
pub use export::export_text;
pub use favorites::{
    badge_label, favorite_records, FavoritesChanged, FavoritesStore, InMemoryFavorites,
    SubscriptionId, ToggleAction, UserContext, UserId,
};
pub use filter::{matches, FilterCriteria, RawFilterCriteria};
pub use normalize::{normalize, NormalizedDeal};
pub use rank::{rank, SortKey};
pub use share::{resolve_shared, ShareLink};
