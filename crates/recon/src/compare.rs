use std::collections::{BTreeSet, HashMap, HashSet};

use crate::aggregate::aggregate_by_asin;
use crate::model::{AsinKeyed, ComparisonData, OrderRecord, PbiRecord};

/// Outcome of looking up an ASIN in the PBI extract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PbiMatch<'a> {
    Found(&'a PbiRecord),
    Missing,
}

impl PbiMatch<'_> {
    /// PBI sales, or zero when no record exists.
    pub fn sales(&self) -> f64 {
        match self {
            Self::Found(record) => record.sales,
            Self::Missing => 0.0,
        }
    }

    /// PBI units, or zero when no record exists.
    pub fn units(&self) -> u64 {
        match self {
            Self::Found(record) => record.units,
            Self::Missing => 0,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// ASIN → PBI record. On duplicate ASINs the first record wins.
pub struct PbiIndex<'a> {
    by_asin: HashMap<&'a str, &'a PbiRecord>,
}

impl<'a> PbiIndex<'a> {
    pub fn new(pbi: &'a [PbiRecord]) -> Self {
        let mut by_asin: HashMap<&'a str, &'a PbiRecord> = HashMap::with_capacity(pbi.len());
        for record in pbi {
            if by_asin.contains_key(record.asin.as_str()) {
                tracing::debug!(asin = %record.asin, "duplicate PBI ASIN ignored, first record kept");
                continue;
            }
            by_asin.insert(record.asin.as_str(), record);
        }
        Self { by_asin }
    }

    pub fn lookup(&self, asin: &str) -> PbiMatch<'a> {
        match self.by_asin.get(asin) {
            Some(&record) => PbiMatch::Found(record),
            None => PbiMatch::Missing,
        }
    }
}

/// Relative difference of the PBI side against the order side, in percent.
///
/// Defined as exactly 0 whenever the order side is not positive, whatever
/// the PBI side holds.
pub fn discrepancy_pct(order_side: f64, pbi_side: f64) -> f64 {
    if order_side > 0.0 {
        (pbi_side - order_side) / order_side * 100.0
    } else {
        0.0
    }
}

/// Aggregate orders by ASIN and measure each ASIN against the PBI extract.
/// Output follows the first-seen ASIN order of `orders`.
pub fn compare_data(orders: &[OrderRecord], pbi: &[PbiRecord]) -> Vec<ComparisonData> {
    let index = PbiIndex::new(pbi);

    aggregate_by_asin(orders)
        .into_iter()
        .map(|bucket| {
            let found = index.lookup(&bucket.key);
            let pbi_sales = found.sales();
            let pbi_units = found.units();

            ComparisonData {
                sales_discrepancy: discrepancy_pct(bucket.total, pbi_sales),
                units_discrepancy: discrepancy_pct(bucket.units as f64, pbi_units as f64),
                asin: bucket.key,
                total: bucket.total,
                units: bucket.units,
                pbi_sales,
                pbi_units,
                pbi_matched: found.is_found(),
            }
        })
        .collect()
}

/// Distinct order ASINs that do not appear in `universe`, sorted ascending.
pub fn find_missing_asins<T: AsinKeyed>(orders: &[OrderRecord], universe: &[T]) -> Vec<String> {
    let known: HashSet<&str> = universe.iter().map(|item| item.asin()).collect();

    orders
        .iter()
        .map(|order| order.asin.as_str())
        .filter(|asin| !known.contains(asin))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(asin: &str, quantity: u64, price: f64) -> OrderRecord {
        OrderRecord {
            asin: asin.into(),
            quantity,
            item_price_eur: price,
            order_status: "Shipped".into(),
            sales_channel: "Amazon.de".into(),
            date: "2024-03-01".into(),
        }
    }

    fn pbi(asin: &str, sales: f64, units: u64) -> PbiRecord {
        PbiRecord {
            asin: asin.into(),
            sales,
            units,
        }
    }

    #[test]
    fn end_to_end_discrepancy() {
        let orders = vec![order("A1", 2, 10.0), order("A1", 1, 5.0)];
        let result = compare_data(&orders, &[pbi("A1", 18.0, 3)]);

        assert_eq!(result.len(), 1);
        let c = &result[0];
        assert_eq!(c.asin, "A1");
        assert_eq!(c.total, 15.0);
        assert_eq!(c.units, 3);
        assert_eq!(c.pbi_sales, 18.0);
        assert_eq!(c.pbi_units, 3);
        assert!((c.sales_discrepancy - 20.0).abs() < 1e-9);
        assert_eq!(c.units_discrepancy, 0.0);
        assert!(c.pbi_matched);
    }

    #[test]
    fn zero_total_means_zero_discrepancy() {
        let orders = vec![order("A1", 1, 10.0), order("A1", 0, -10.0)];
        let result = compare_data(&orders, &[pbi("A1", 999.0, 7)]);
        assert_eq!(result[0].total, 0.0);
        assert_eq!(result[0].sales_discrepancy, 0.0);
        // units side still has a positive denominator
        assert_eq!(result[0].units_discrepancy, 600.0);
    }

    #[test]
    fn negative_total_means_zero_discrepancy() {
        let result = compare_data(&[order("A1", 0, -5.0)], &[pbi("A1", 10.0, 2)]);
        assert_eq!(result[0].sales_discrepancy, 0.0);
        assert_eq!(result[0].units_discrepancy, 0.0);
    }

    #[test]
    fn missing_pbi_falls_back_to_zero() {
        let result = compare_data(&[order("A1", 4, 40.0)], &[pbi("B9", 1.0, 1)]);
        let c = &result[0];
        assert!(!c.pbi_matched);
        assert_eq!(c.pbi_sales, 0.0);
        assert_eq!(c.pbi_units, 0);
        assert_eq!(c.sales_discrepancy, -100.0);
        assert_eq!(c.units_discrepancy, -100.0);
    }

    #[test]
    fn first_pbi_duplicate_wins() {
        let records = vec![pbi("A1", 10.0, 1), pbi("A1", 50.0, 5)];
        let index = PbiIndex::new(&records);
        match index.lookup("A1") {
            PbiMatch::Found(r) => assert_eq!(r.sales, 10.0),
            PbiMatch::Missing => panic!("expected a match"),
        }
        assert_eq!(index.lookup("a1"), PbiMatch::Missing);
    }

    #[test]
    fn output_follows_order_asin_sequence() {
        let orders = vec![order("C3", 1, 1.0), order("A1", 1, 1.0), order("C3", 1, 1.0)];
        let result = compare_data(&orders, &[]);
        let asins: Vec<_> = result.iter().map(|c| c.asin.as_str()).collect();
        assert_eq!(asins, vec!["C3", "A1"]);
    }

    #[test]
    fn compare_is_idempotent() {
        let orders = vec![order("A1", 2, 10.0), order("B2", 1, 3.5)];
        let records = vec![pbi("A1", 18.0, 3)];
        assert_eq!(compare_data(&orders, &records), compare_data(&orders, &records));
    }

    #[test]
    fn missing_asins_against_pbi() {
        let orders = vec![
            order("C3", 1, 1.0),
            order("A1", 1, 1.0),
            order("B2", 1, 1.0),
            order("C3", 1, 1.0),
        ];
        let missing = find_missing_asins(&orders, &[pbi("A1", 1.0, 1)]);
        assert_eq!(missing, vec!["B2", "C3"]);
    }

    #[test]
    fn no_asins_missing_from_own_comparison() {
        let orders = vec![order("A1", 1, 1.0), order("B2", 1, 1.0)];
        let comparisons = compare_data(&orders, &[]);
        assert!(find_missing_asins(&orders, &comparisons).is_empty());
    }
}
