use crate::config::ToleranceConfig;
use crate::model::{ComparisonData, ReconSummary};

/// Compute summary statistics from comparison rows.
pub fn compute_summary(comparisons: &[ComparisonData], tolerance: &ToleranceConfig) -> ReconSummary {
    let mut order_total = 0.0;
    let mut order_units = 0u64;
    let mut pbi_sales = 0.0;
    let mut pbi_units = 0u64;
    let mut unmatched = 0;
    let mut flagged = 0;

    for c in comparisons {
        order_total += c.total;
        order_units = order_units.saturating_add(c.units);
        pbi_sales += c.pbi_sales;
        pbi_units = pbi_units.saturating_add(c.pbi_units);

        if !c.pbi_matched {
            unmatched += 1;
        }
        if tolerance.exceeded_by(c) {
            flagged += 1;
        }
    }

    ReconSummary {
        asins: comparisons.len(),
        order_total,
        order_units,
        pbi_sales,
        pbi_units,
        unmatched,
        flagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(asin: &str, sales_pct: f64, units_pct: f64, matched: bool) -> ComparisonData {
        ComparisonData {
            asin: asin.into(),
            total: 100.0,
            units: 10,
            pbi_sales: if matched { 100.0 + sales_pct } else { 0.0 },
            pbi_units: if matched { 10 } else { 0 },
            sales_discrepancy: sales_pct,
            units_discrepancy: units_pct,
            pbi_matched: matched,
        }
    }

    #[test]
    fn summary_counts() {
        let rows = vec![
            comparison("A1", 0.0, 0.0, true),
            comparison("A2", 4.9, 0.0, true),
            comparison("A3", -12.0, 0.0, true),
            comparison("A4", 0.0, 30.0, true),
            comparison("A5", -100.0, -100.0, false),
        ];
        let summary = compute_summary(&rows, &ToleranceConfig { discrepancy_pct: 5.0 });
        assert_eq!(summary.asins, 5);
        assert_eq!(summary.order_total, 500.0);
        assert_eq!(summary.order_units, 50);
        assert_eq!(summary.pbi_units, 40);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.flagged, 3);
    }

    #[test]
    fn zero_tolerance_flags_any_difference() {
        let rows = vec![comparison("A1", 0.0, 0.0, true), comparison("A2", 0.5, 0.0, true)];
        let summary = compute_summary(&rows, &ToleranceConfig { discrepancy_pct: 0.0 });
        assert_eq!(summary.flagged, 1);
    }

    #[test]
    fn unit_totals_saturate() {
        let mut big = comparison("A1", 0.0, 0.0, true);
        big.units = u64::MAX - 1;
        big.pbi_units = u64::MAX;
        let rows = vec![big.clone(), big];
        let summary = compute_summary(&rows, &ToleranceConfig::default());
        assert_eq!(summary.order_units, u64::MAX);
        assert_eq!(summary.pbi_units, u64::MAX);
    }

    #[test]
    fn empty_summary() {
        let summary = compute_summary(&[], &ToleranceConfig::default());
        assert_eq!(summary.asins, 0);
        assert_eq!(summary.order_total, 0.0);
        assert_eq!(summary.flagged, 0);
    }
}
