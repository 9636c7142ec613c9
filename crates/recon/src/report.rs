use crate::aggregate::{aggregate_by_asin, aggregate_by_date, aggregate_by_marketplace};
use crate::compare::{compare_data, find_missing_asins};
use crate::config::ToleranceConfig;
use crate::filter::OrderFilter;
use crate::lookup::get_unique_values;
use crate::model::columns;
use crate::model::{AsinMetadata, Breakdowns, OrderRecord, PbiRecord, ReconMeta, ReconReport};
use crate::summary::compute_summary;

/// Run every engine stage over the loaded sources.
///
/// Comparisons, the summary and the missing-ASIN lists always cover the full
/// order set; `filter` only narrows the breakdowns.
pub fn build_report(
    config_name: &str,
    tolerance: &ToleranceConfig,
    orders: &[OrderRecord],
    pbi: &[PbiRecord],
    metadata: Option<&[AsinMetadata]>,
    filter: &OrderFilter,
) -> ReconReport {
    let comparisons = compare_data(orders, pbi);
    let summary = compute_summary(&comparisons, tolerance);

    let filtered = filter.apply(orders);
    let breakdowns = Breakdowns {
        by_asin: aggregate_by_asin(&filtered),
        by_marketplace: aggregate_by_marketplace(&filtered),
        by_date: aggregate_by_date(&filtered),
    };

    ReconReport {
        meta: ReconMeta {
            config_name: config_name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            order_status: filter.order_status.clone(),
        },
        summary,
        missing_from_pbi: find_missing_asins(orders, pbi),
        missing_from_metadata: metadata.map(|m| find_missing_asins(orders, m)),
        comparisons,
        breakdowns,
        order_statuses: get_unique_values(orders, columns::ORDER_STATUS),
    }
}
