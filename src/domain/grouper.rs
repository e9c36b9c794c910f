//! Grouping of the flat order ledger into per-symbol buckets.

use crate::domain::order::Order;
use std::collections::HashMap;

/// Per-symbol buckets of orders.
///
/// Buckets iterate in first-occurrence order of each symbol among the raw
/// orders, and orders keep their original relative order within a bucket.
/// Both matter downstream: positional trade ids depend on the bucket order,
/// hold-duration extremes on the bucket contents.
#[derive(Debug, Clone, Default)]
pub struct SymbolBuckets {
    buckets: Vec<(String, Vec<Order>)>,
}

impl SymbolBuckets {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Order])> {
        self.buckets
            .iter()
            .map(|(symbol, orders)| (symbol.as_str(), orders.as_slice()))
    }

    pub fn get(&self, symbol: &str) -> Option<&[Order]> {
        self.buckets
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, orders)| orders.as_slice())
    }

    /// Re-flatten all buckets into a single list. Together with [`group`]
    /// this recovers the original multiset of orders.
    pub fn flatten(self) -> Vec<Order> {
        self.buckets
            .into_iter()
            .flat_map(|(_, orders)| orders)
            .collect()
    }
}

/// Partition orders by exact `symbol` string match. No filtering, no
/// validation; empty input yields empty buckets.
pub fn group(orders: Vec<Order>) -> SymbolBuckets {
    let mut buckets: Vec<(String, Vec<Order>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        match index.get(&order.symbol) {
            Some(&i) => buckets[i].1.push(order),
            None => {
                index.insert(order.symbol.clone(), buckets.len());
                let symbol = order.symbol.clone();
                buckets.push((symbol, vec![order]));
            }
        }
    }

    SymbolBuckets { buckets }
}
