//! Per-symbol trade aggregation and open-position netting.

use crate::domain::grouper::SymbolBuckets;
use crate::domain::order::Side;
use serde::{Deserialize, Serialize};

/// One synthetic aggregate per symbol bucket, completed or not.
///
/// `id` is positional within one output batch (the Nth bucket gets id N) and
/// is not stable across calls once the order set changes. It must never be
/// treated as a durable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: i64,
    pub symbol: String,
    pub total_quantity: f64,
    pub avg_price: f64,
    #[serde(rename = "realizedPnL")]
    pub realized_pnl: f64,
    pub orders: Vec<i64>,
}

/// A symbol with positive net shares after netting all buys and sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPosition {
    pub symbol: String,
    pub shares: f64,
    pub invested: f64,
}

/// One [`Trade`] per bucket. A bucket with only buys still yields a trade
/// whose realized P&L is the negative of the buy cost (sell sum is 0).
pub fn compute_trades(buckets: &SymbolBuckets) -> Vec<Trade> {
    buckets
        .iter()
        .enumerate()
        .map(|(idx, (symbol, orders))| {
            let total_quantity: f64 = orders.iter().map(|o| o.quantity).sum();
            let weighted_sum: f64 = orders.iter().map(|o| o.price * o.quantity).sum();
            // 0/0 when every quantity is zero; report 0 rather than NaN.
            let avg_price = if total_quantity == 0.0 {
                0.0
            } else {
                weighted_sum / total_quantity
            };

            let (buy_sum, sell_sum) = side_sums(orders);

            Trade {
                id: idx as i64 + 1,
                symbol: symbol.to_string(),
                total_quantity,
                avg_price,
                realized_pnl: sell_sum - buy_sum,
                orders: orders.iter().map(|o| o.id).collect(),
            }
        })
        .collect()
}

/// Net still-held shares and invested capital per symbol. Only symbols with
/// net shares > 0 are emitted; net-zero and oversold symbols are dropped
/// silently, never reported as shorts.
pub fn compute_open_positions(buckets: &SymbolBuckets) -> Vec<OpenPosition> {
    buckets
        .iter()
        .filter_map(|(symbol, orders)| {
            let mut shares = 0.0;
            let mut invested = 0.0;
            for order in orders {
                match order.side {
                    Side::Buy => {
                        shares += order.quantity;
                        invested += order.price * order.quantity;
                    }
                    Side::Sell => {
                        shares -= order.quantity;
                        invested -= order.price * order.quantity;
                    }
                }
            }
            if shares > 0.0 {
                Some(OpenPosition {
                    symbol: symbol.to_string(),
                    shares,
                    invested,
                })
            } else {
                None
            }
        })
        .collect()
}

pub(crate) fn side_sums(orders: &[crate::domain::order::Order]) -> (f64, f64) {
    let mut buy_sum = 0.0;
    let mut sell_sum = 0.0;
    for order in orders {
        match order.side {
            Side::Buy => buy_sum += order.price * order.quantity,
            Side::Sell => sell_sum += order.price * order.quantity,
        }
    }
    (buy_sum, sell_sum)
}
