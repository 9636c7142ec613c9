// Source file ingestion: orders, ASIN metadata, PBI exports

pub mod error;
pub mod ingest;
pub mod number;
pub mod rows;
pub mod sources;
pub mod table;

pub use error::{FileKind, IngestError};
pub use ingest::{
    ingest_metadata, ingest_orders, ingest_pbi, metadata_from_str, orders_from_str, pbi_from_str,
};
pub use rows::{
    normalize_metadata_row, parse_order_row, parse_pbi_row, validate_metadata_headers,
    validate_metadata_row, METADATA_REQUIRED_HEADERS,
};
pub use sources::SourceSet;
