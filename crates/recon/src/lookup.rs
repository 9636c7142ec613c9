use std::collections::BTreeSet;

use crate::model::columns;
use crate::model::{AsinMetadata, OrderRecord, PbiRecord};

/// Text fields addressable by their source column name.
pub trait FieldLookup {
    /// Value of the named column, or `None` if the record has no such text field.
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldLookup for OrderRecord {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            columns::ASIN => Some(&self.asin),
            columns::ORDER_STATUS => Some(&self.order_status),
            columns::SALES_CHANNEL => Some(&self.sales_channel),
            columns::DATE => Some(&self.date),
            _ => None,
        }
    }
}

impl FieldLookup for AsinMetadata {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            columns::ASIN => Some(&self.asin),
            columns::BRAND => Some(&self.brand),
            columns::CATEGORY => Some(&self.category),
            columns::SUBCATEGORY => Some(&self.subcategory),
            columns::PRODUCT_TYPE => Some(&self.product_type),
            columns::CLIENT => Some(&self.client),
            _ => None,
        }
    }
}

impl FieldLookup for PbiRecord {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            columns::PBI_ASIN => Some(&self.asin),
            _ => None,
        }
    }
}

/// Distinct non-empty values of `field`, sorted ascending.
pub fn get_unique_values<T: FieldLookup>(records: &[T], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.field(field))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
