//! Loaded-state holder for the three source files.

use std::path::Path;

use orderlens_recon::config::IngestConfig;
use orderlens_recon::model::{AsinMetadata, OrderRecord, PbiRecord};

use crate::error::{FileKind, IngestError};
use crate::ingest::{ingest_metadata, ingest_orders, ingest_pbi};

/// The most recent successful load of each file.
///
/// Each `load_*` call touches only its own slot, and only when the load
/// succeeds. On failure every slot keeps its previous value and the error is
/// returned to the caller.
#[derive(Debug, Default)]
pub struct SourceSet {
    config: IngestConfig,
    orders: Option<Vec<OrderRecord>>,
    metadata: Option<Vec<AsinMetadata>>,
    pbi: Option<Vec<PbiRecord>>,
}

impl SourceSet {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub async fn load_orders(&mut self, path: impl AsRef<Path>) -> Result<usize, IngestError> {
        let result = ingest_orders(path.as_ref(), &self.config).await;
        replace_slot(&mut self.orders, FileKind::Orders, path.as_ref(), result)
    }

    pub async fn load_metadata(&mut self, path: impl AsRef<Path>) -> Result<usize, IngestError> {
        let result = ingest_metadata(path.as_ref(), &self.config).await;
        replace_slot(&mut self.metadata, FileKind::Metadata, path.as_ref(), result)
    }

    pub async fn load_pbi(&mut self, path: impl AsRef<Path>) -> Result<usize, IngestError> {
        let result = ingest_pbi(path.as_ref(), &self.config).await;
        replace_slot(&mut self.pbi, FileKind::Pbi, path.as_ref(), result)
    }

    pub fn orders(&self) -> Option<&[OrderRecord]> {
        self.orders.as_deref()
    }

    pub fn metadata(&self) -> Option<&[AsinMetadata]> {
        self.metadata.as_deref()
    }

    pub fn pbi(&self) -> Option<&[PbiRecord]> {
        self.pbi.as_deref()
    }

    /// Orders and PBI are both loaded, so a comparison can run.
    pub fn is_ready(&self) -> bool {
        self.orders.is_some() && self.pbi.is_some()
    }
}

fn replace_slot<T>(
    slot: &mut Option<Vec<T>>,
    kind: FileKind,
    path: &Path,
    result: Result<Vec<T>, IngestError>,
) -> Result<usize, IngestError> {
    match result {
        Ok(records) => {
            let count = records.len();
            tracing::info!(%kind, path = %path.display(), records = count, "loaded");
            *slot = Some(records);
            Ok(count)
        }
        Err(e) => {
            tracing::warn!(
                %kind,
                path = %path.display(),
                kept_previous = slot.is_some(),
                error = %e,
                "load failed"
            );
            Err(e)
        }
    }
}
