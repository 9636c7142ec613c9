//! `orderlens-recon`: order / PBI reconciliation and aggregation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns aggregates,
//! comparisons and summaries. No CLI or IO dependencies.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod model;
pub mod report;
pub mod summary;

pub use aggregate::{aggregate_by, aggregate_by_asin, aggregate_by_date, aggregate_by_marketplace};
pub use compare::{compare_data, discrepancy_pct, find_missing_asins, PbiIndex, PbiMatch};
pub use config::ReconConfig;
pub use error::ReconError;
pub use filter::{drilldown, FilterChoices, MetadataFilter, OrderFilter};
pub use lookup::{get_unique_values, FieldLookup};
pub use model::{AggregateBucket, AsinMetadata, ComparisonData, OrderRecord, PbiRecord, ReconReport};
pub use report::build_report;
