//! Raw CSV rows → typed records.
//!
//! Order and PBI parsers return `None` for a row that cannot be coerced; the
//! caller drops it. Metadata rows are validated, then normalized.

use orderlens_recon::config::DecimalStyle;
use orderlens_recon::model::columns;
use orderlens_recon::model::{AsinMetadata, OrderRecord, PbiRecord};

use crate::error::IngestError;
use crate::number::{parse_count, parse_decimal};
use crate::table::RawRow;

/// Columns every metadata file must carry.
pub const METADATA_REQUIRED_HEADERS: [&str; 6] = [
    columns::ASIN,
    columns::BRAND,
    columns::CATEGORY,
    columns::SUBCATEGORY,
    columns::PRODUCT_TYPE,
    columns::CLIENT,
];

/// Columns an order row needs to produce a record.
pub const ORDER_REQUIRED_HEADERS: [&str; 3] =
    [columns::ASIN, columns::QUANTITY, columns::ITEM_PRICE_EUR];

/// Columns a PBI row needs to produce a record.
pub const PBI_REQUIRED_HEADERS: [&str; 3] =
    [columns::PBI_ASIN, columns::PBI_SALES, columns::PBI_UNITS];

/// Trimmed cell value; absent columns read as `None`.
fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(|v| v.trim())
}

/// Trimmed, non-empty cell value.
fn required<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    cell(row, column).filter(|v| !v.is_empty())
}

fn text(row: &RawRow, column: &str) -> String {
    cell(row, column).unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub fn parse_order_row(row: &RawRow, decimal: DecimalStyle) -> Option<OrderRecord> {
    let asin = required(row, columns::ASIN)?;
    let quantity = parse_count(cell(row, columns::QUANTITY)?, decimal)?;
    let item_price_eur = parse_decimal(cell(row, columns::ITEM_PRICE_EUR)?, decimal)?;

    Some(OrderRecord {
        asin: asin.to_string(),
        quantity,
        item_price_eur,
        order_status: text(row, columns::ORDER_STATUS),
        sales_channel: text(row, columns::SALES_CHANNEL),
        date: text(row, columns::DATE),
    })
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Check the header row carries every required metadata column.
/// The error names all missing columns.
pub fn validate_metadata_headers(headers: &[String]) -> Result<(), IngestError> {
    let missing: Vec<&str> = METADATA_REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.trim() == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::Validation(format!(
            "metadata file is missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

pub fn validate_metadata_row(row: &RawRow) -> bool {
    METADATA_REQUIRED_HEADERS
        .iter()
        .all(|column| required(row, column).is_some())
}

/// Copy a validated row into the typed shape. Absent fields become empty
/// strings; call [`validate_metadata_row`] first.
pub fn normalize_metadata_row(row: &RawRow) -> AsinMetadata {
    AsinMetadata {
        asin: text(row, columns::ASIN),
        brand: text(row, columns::BRAND),
        category: text(row, columns::CATEGORY),
        subcategory: text(row, columns::SUBCATEGORY),
        product_type: text(row, columns::PRODUCT_TYPE),
        client: text(row, columns::CLIENT),
    }
}

// ---------------------------------------------------------------------------
// PBI
// ---------------------------------------------------------------------------

pub fn parse_pbi_row(row: &RawRow, decimal: DecimalStyle) -> Option<PbiRecord> {
    let asin = required(row, columns::PBI_ASIN)?;
    let sales = parse_decimal(cell(row, columns::PBI_SALES)?, decimal)?;
    let units = parse_count(cell(row, columns::PBI_UNITS)?, decimal)?;

    Some(PbiRecord {
        asin: asin.to_string(),
        sales,
        units,
    })
}
