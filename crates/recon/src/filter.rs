use std::collections::HashMap;

use serde::Serialize;

use crate::lookup::get_unique_values;
use crate::model::columns;
use crate::model::{AsinMetadata, DrilldownRow, OrderRecord, PbiRecord};

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Status selection applied to order breakdowns. `None` keeps every order.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub order_status: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &OrderRecord) -> bool {
        self.order_status
            .as_deref()
            .map_or(true, |status| order.order_status == status)
    }

    /// Fresh collection of the matching orders.
    pub fn apply(&self, orders: &[OrderRecord]) -> Vec<OrderRecord> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Metadata drilldown
// ---------------------------------------------------------------------------

/// Catalog attribute selection. Each `None` leaves that attribute unconstrained.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub subcategory: Option<String>,
    pub product_type: Option<String>,
}

impl MetadataFilter {
    pub fn matches(&self, metadata: &AsinMetadata) -> bool {
        fn selected(choice: &Option<String>, value: &str) -> bool {
            choice.as_deref().map_or(true, |c| c == value)
        }

        selected(&self.brand, &metadata.brand)
            && selected(&self.category, &metadata.category)
            && selected(&self.client, &metadata.client)
            && selected(&self.subcategory, &metadata.subcategory)
            && selected(&self.product_type, &metadata.product_type)
    }
}

/// PBI records joined to their catalog entry (first match per ASIN), keeping
/// only those whose entry passes `filter`. PBI records with no catalog entry
/// are dropped.
pub fn drilldown(
    pbi: &[PbiRecord],
    metadata: &[AsinMetadata],
    filter: &MetadataFilter,
) -> Vec<DrilldownRow> {
    let mut catalog: HashMap<&str, &AsinMetadata> = HashMap::with_capacity(metadata.len());
    for entry in metadata {
        catalog.entry(entry.asin.as_str()).or_insert(entry);
    }

    pbi.iter()
        .filter_map(|record| {
            let entry = catalog.get(record.asin.as_str())?;
            filter.matches(entry).then(|| DrilldownRow {
                pbi: record.clone(),
                metadata: (*entry).clone(),
            })
        })
        .collect()
}

/// Selection choices for each catalog attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChoices {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub clients: Vec<String>,
    pub subcategories: Vec<String>,
    pub product_types: Vec<String>,
}

impl FilterChoices {
    pub fn for_metadata(metadata: &[AsinMetadata]) -> Self {
        Self {
            brands: get_unique_values(metadata, columns::BRAND),
            categories: get_unique_values(metadata, columns::CATEGORY),
            clients: get_unique_values(metadata, columns::CLIENT),
            subcategories: get_unique_values(metadata, columns::SUBCATEGORY),
            product_types: get_unique_values(metadata, columns::PRODUCT_TYPE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(asin: &str, brand: &str, category: &str) -> AsinMetadata {
        AsinMetadata {
            asin: asin.into(),
            brand: brand.into(),
            category: category.into(),
            subcategory: "Pans".into(),
            product_type: "COOKWARE".into(),
            client: "Acme".into(),
        }
    }

    fn pbi(asin: &str, sales: f64) -> PbiRecord {
        PbiRecord {
            asin: asin.into(),
            sales,
            units: 1,
        }
    }

    fn order(status: &str) -> OrderRecord {
        OrderRecord {
            asin: "A1".into(),
            quantity: 1,
            item_price_eur: 1.0,
            order_status: status.into(),
            sales_channel: "Amazon.de".into(),
            date: "2024-03-01".into(),
        }
    }

    #[test]
    fn order_status_filter() {
        let orders = vec![order("Shipped"), order("Cancelled"), order("Shipped")];

        let all = OrderFilter::default().apply(&orders);
        assert_eq!(all.len(), 3);

        let shipped = OrderFilter { order_status: Some("Shipped".into()) }.apply(&orders);
        assert_eq!(shipped.len(), 2);
        assert!(shipped.iter().all(|o| o.order_status == "Shipped"));
    }

    #[test]
    fn drilldown_without_selection_joins_everything_known() {
        let metadata = vec![meta("A1", "Fissler", "Kitchen"), meta("A2", "WMF", "Kitchen")];
        let records = vec![pbi("A1", 10.0), pbi("A2", 20.0), pbi("ZZ", 30.0)];

        let rows = drilldown(&records, &metadata, &MetadataFilter::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pbi.asin, "A1");
        assert_eq!(rows[1].metadata.brand, "WMF");
    }

    #[test]
    fn drilldown_applies_every_selected_attribute() {
        let metadata = vec![
            meta("A1", "Fissler", "Kitchen"),
            meta("A2", "Fissler", "Garden"),
            meta("A3", "WMF", "Kitchen"),
        ];
        let records = vec![pbi("A1", 10.0), pbi("A2", 20.0), pbi("A3", 30.0)];

        let filter = MetadataFilter {
            brand: Some("Fissler".into()),
            category: Some("Kitchen".into()),
            ..Default::default()
        };
        let rows = drilldown(&records, &metadata, &filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pbi.asin, "A1");
    }

    #[test]
    fn drilldown_uses_first_catalog_entry() {
        let metadata = vec![meta("A1", "Fissler", "Kitchen"), meta("A1", "WMF", "Kitchen")];
        let filter = MetadataFilter {
            brand: Some("WMF".into()),
            ..Default::default()
        };
        assert!(drilldown(&[pbi("A1", 1.0)], &metadata, &filter).is_empty());
    }

    #[test]
    fn choices_for_metadata() {
        let metadata = vec![meta("A1", "WMF", "Kitchen"), meta("A2", "Fissler", "Garden")];
        let choices = FilterChoices::for_metadata(&metadata);
        assert_eq!(choices.brands, vec!["Fissler", "WMF"]);
        assert_eq!(choices.categories, vec!["Garden", "Kitchen"]);
        assert_eq!(choices.product_types, vec!["COOKWARE"]);
    }
}
