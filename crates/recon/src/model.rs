use serde::Serialize;

/// Column names shared by the row parsers and the field lookups.
pub mod columns {
    pub const ASIN: &str = "asin";
    pub const QUANTITY: &str = "quantity";
    pub const ITEM_PRICE_EUR: &str = "item-price-eur";
    pub const ORDER_STATUS: &str = "order-status";
    pub const SALES_CHANNEL: &str = "sales-channel";
    pub const DATE: &str = "date";

    pub const BRAND: &str = "brand";
    pub const CATEGORY: &str = "category";
    pub const SUBCATEGORY: &str = "subcategory";
    pub const PRODUCT_TYPE: &str = "product-type";
    pub const CLIENT: &str = "client";

    pub const PBI_ASIN: &str = "ASIN";
    pub const PBI_SALES: &str = "Sales";
    pub const PBI_UNITS: &str = "Units";
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One sales order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub asin: String,
    pub quantity: u64,
    /// May be zero or negative (refunds).
    #[serde(rename = "item-price-eur")]
    pub item_price_eur: f64,
    #[serde(rename = "order-status")]
    pub order_status: String,
    #[serde(rename = "sales-channel")]
    pub sales_channel: String,
    /// ISO-formatted, so lexical order is chronological order.
    pub date: String,
}

/// Static catalog attributes for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsinMetadata {
    pub asin: String,
    pub brand: String,
    pub category: String,
    pub subcategory: String,
    #[serde(rename = "product-type")]
    pub product_type: String,
    pub client: String,
}

/// One entry of the external PBI reporting extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PbiRecord {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Units")]
    pub units: u64,
}

/// Anything that carries an ASIN join key.
pub trait AsinKeyed {
    fn asin(&self) -> &str;
}

impl AsinKeyed for OrderRecord {
    fn asin(&self) -> &str {
        &self.asin
    }
}

impl AsinKeyed for AsinMetadata {
    fn asin(&self) -> &str {
        &self.asin
    }
}

impl AsinKeyed for PbiRecord {
    fn asin(&self) -> &str {
        &self.asin
    }
}

impl AsinKeyed for ComparisonData {
    fn asin(&self) -> &str {
        &self.asin
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Summed order revenue and units for one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket<K> {
    pub key: K,
    pub total: f64,
    pub units: u64,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Order totals for one ASIN measured against the PBI extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    pub asin: String,
    pub total: f64,
    pub units: u64,
    pub pbi_sales: f64,
    pub pbi_units: u64,
    pub sales_discrepancy: f64,
    pub units_discrepancy: f64,
    /// False when no PBI record carried this ASIN and the zero fallback was used.
    pub pbi_matched: bool,
}

/// A PBI record joined to its catalog attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrilldownRow {
    #[serde(flatten)]
    pub pbi: PbiRecord,
    pub metadata: AsinMetadata,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub asins: usize,
    pub order_total: f64,
    pub order_units: u64,
    pub pbi_sales: f64,
    pub pbi_units: u64,
    pub unmatched: usize,
    pub flagged: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Breakdowns {
    pub by_asin: Vec<AggregateBucket<String>>,
    pub by_marketplace: Vec<AggregateBucket<String>>,
    pub by_date: Vec<AggregateBucket<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub comparisons: Vec<ComparisonData>,
    /// Order ASINs with no PBI record.
    pub missing_from_pbi: Vec<String>,
    /// Order ASINs with no catalog entry; `None` when metadata was not loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_from_metadata: Option<Vec<String>>,
    pub breakdowns: Breakdowns,
    pub order_statuses: Vec<String>,
}
