//! Per-symbol notes and the externally tracked depot value.
//!
//! Neither record feeds the aggregation engine; they exist for display
//! alongside its output.

use crate::domain::aggregate::OpenPosition;
use serde::{Deserialize, Serialize};

/// Free-text annotation keyed by symbol, upserted independently of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMeta {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Externally tracked cash/account balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub value: f64,
}

/// Depot value plus capital still invested in open positions.
pub fn portfolio_value(depot: f64, positions: &[OpenPosition]) -> f64 {
    depot + positions.iter().map(|p| p.invested).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portfolio_value_adds_invested_capital() {
        let positions = vec![
            OpenPosition {
                symbol: "AAPL".into(),
                shares: 6.0,
                invested: 860.0,
            },
            OpenPosition {
                symbol: "TSLA".into(),
                shares: 2.0,
                invested: 350.0,
            },
        ];
        assert!((portfolio_value(1000.0, &positions) - 2210.0).abs() < 1e-9);
    }

    #[test]
    fn portfolio_value_without_positions_is_depot_value() {
        assert_eq!(portfolio_value(500.0, &[]), 500.0);
    }

    #[test]
    fn trade_meta_json_omits_absent_notes() {
        let meta = TradeMeta {
            symbol: "AAPL".into(),
            notes: None,
        };
        assert_eq!(serde_json::to_string(&meta).unwrap(), r#"{"symbol":"AAPL"}"#);
    }
}
