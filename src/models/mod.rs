//! Data models and structures for the mirror latency bench

pub mod catalog;
pub mod config;
pub mod trial;

// Re-export main model types
pub use catalog::{Catalog, CatalogEntry, FileSpec};
pub use config::{Config, Sources};
pub use trial::{TrialRecord, TrialResult, CSV_HEADER};
