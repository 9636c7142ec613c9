//! File ingestion for the three source kinds.
//!
//! `*_from_str` run synchronously over decoded text; `ingest_*` read a file
//! with tokio, then decode and parse on the blocking pool. Either way the
//! result is all-or-nothing at the file level and best-effort at the row
//! level: a row that is short, long or uncoercible is dropped, never fatal.

use std::path::Path;

use orderlens_recon::config::IngestConfig;
use orderlens_recon::model::{AsinMetadata, OrderRecord, PbiRecord};

use crate::error::{FileKind, IngestError};
use crate::rows::{
    normalize_metadata_row, parse_order_row, parse_pbi_row, validate_metadata_headers,
    validate_metadata_row, METADATA_REQUIRED_HEADERS, ORDER_REQUIRED_HEADERS,
    PBI_REQUIRED_HEADERS,
};
use crate::table::{decode_text, resolve_delimiter, DelimitedText, RawRow};

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Parse an orders extract. Rows that fail coercion or lack a required
/// column are dropped.
pub fn orders_from_str(
    content: &str,
    config: &IngestConfig,
) -> Result<Vec<OrderRecord>, IngestError> {
    collect_rows(
        content,
        FileKind::Orders,
        config,
        &ORDER_REQUIRED_HEADERS,
        |_| Ok(()),
        |row| parse_order_row(row, config.decimal),
    )
}

/// Parse a metadata file. Missing required headers fail before any row is
/// read; incomplete rows are dropped, and zero survivors is an error.
pub fn metadata_from_str(
    content: &str,
    config: &IngestConfig,
) -> Result<Vec<AsinMetadata>, IngestError> {
    let records = collect_rows(
        content,
        FileKind::Metadata,
        config,
        &METADATA_REQUIRED_HEADERS,
        validate_metadata_headers,
        |row| validate_metadata_row(row).then(|| normalize_metadata_row(row)),
    )?;

    if records.is_empty() {
        return Err(IngestError::Validation("no valid metadata rows found".into()));
    }
    Ok(records)
}

/// Parse a PBI extract. Rows that fail coercion or lack a required column
/// are dropped.
pub fn pbi_from_str(
    content: &str,
    config: &IngestConfig,
) -> Result<Vec<PbiRecord>, IngestError> {
    collect_rows(
        content,
        FileKind::Pbi,
        config,
        &PBI_REQUIRED_HEADERS,
        |_| Ok(()),
        |row| parse_pbi_row(row, config.decimal),
    )
}

/// Stream every row of `content` through `parse_row`, keeping the survivors.
fn collect_rows<T>(
    content: &str,
    kind: FileKind,
    config: &IngestConfig,
    key_columns: &[&str],
    check_headers: impl FnOnce(&[String]) -> Result<(), IngestError>,
    parse_row: impl Fn(&RawRow) -> Option<T>,
) -> Result<Vec<T>, IngestError> {
    let delimiter = resolve_delimiter(config.delimiter, content, key_columns);
    let table =
        DelimitedText::open(content, delimiter).map_err(|e| IngestError::parse(kind, e))?;

    check_headers(table.headers())?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in table.into_rows() {
        let row = row.map_err(|e| IngestError::parse(kind, e))?;
        match parse_row(&row) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    tracing::debug!(%kind, kept = records.len(), dropped, "parsed file");
    if dropped > 0 {
        tracing::warn!(%kind, dropped, "dropped rows that failed validation");
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

pub async fn ingest_orders(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<Vec<OrderRecord>, IngestError> {
    ingest_file(path.as_ref(), FileKind::Orders, config, orders_from_str).await
}

pub async fn ingest_metadata(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<Vec<AsinMetadata>, IngestError> {
    ingest_file(path.as_ref(), FileKind::Metadata, config, metadata_from_str).await
}

pub async fn ingest_pbi(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<Vec<PbiRecord>, IngestError> {
    ingest_file(path.as_ref(), FileKind::Pbi, config, pbi_from_str).await
}

async fn ingest_file<T>(
    path: &Path,
    kind: FileKind,
    config: &IngestConfig,
    parse: fn(&str, &IngestConfig) -> Result<Vec<T>, IngestError>,
) -> Result<Vec<T>, IngestError>
where
    T: Send + 'static,
{
    let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(%kind, path = %path.display(), bytes = bytes.len(), "read file");

    let config = config.clone();
    tokio::task::spawn_blocking(move || {
        let content = decode_text(bytes, config.encoding_fallback)
            .map_err(|e| IngestError::parse(kind, e))?;
        parse(&content, &config)
    })
    .await?
}
