use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{AggregateBucket, OrderRecord};

/// Group orders by `key_fn`, summing `item-price-eur` into `total` and
/// `quantity` into `units` (saturating at `u64::MAX`). Buckets come out in
/// first-seen key order.
pub fn aggregate_by<K, F>(orders: &[OrderRecord], key_fn: F) -> Vec<AggregateBucket<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&OrderRecord) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<AggregateBucket<K>> = Vec::new();

    for order in orders {
        let key = key_fn(order);
        let slot = match slots.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let slot = buckets.len();
                slots.insert(key.clone(), slot);
                buckets.push(AggregateBucket {
                    key,
                    total: 0.0,
                    units: 0,
                });
                slot
            }
        };
        let bucket = &mut buckets[slot];
        bucket.total += order.item_price_eur;
        bucket.units = bucket.units.saturating_add(order.quantity);
    }

    buckets
}

pub fn aggregate_by_asin(orders: &[OrderRecord]) -> Vec<AggregateBucket<String>> {
    aggregate_by(orders, |o| o.asin.clone())
}

/// Marketplace = the order's sales channel.
pub fn aggregate_by_marketplace(orders: &[OrderRecord]) -> Vec<AggregateBucket<String>> {
    aggregate_by(orders, |o| o.sales_channel.clone())
}

/// Date buckets ascend by key; ISO dates sort chronologically as strings.
pub fn aggregate_by_date(orders: &[OrderRecord]) -> Vec<AggregateBucket<String>> {
    let mut buckets = aggregate_by(orders, |o| o.date.clone());
    buckets.sort_by(|a, b| a.key.cmp(&b.key));
    buckets
}
