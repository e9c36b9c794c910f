//! Typed listing options for the order ledger.
//!
//! Sort and filter parameters arrive as text (query string or CLI flags) and
//! are parsed into a validated structure here, before any core logic runs.
//! Unparseable values are rejected at this boundary instead of coercing into
//! NaN or silently falling back.

use crate::domain::error::TradelogError;
use crate::domain::order::{Order, Side};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Symbol,
    Quantity,
    Price,
    Side,
}

impl SortKey {
    pub fn parse(s: &str) -> Result<Self, TradelogError> {
        match s {
            "id" => Ok(SortKey::Id),
            "symbol" => Ok(SortKey::Symbol),
            "quantity" => Ok(SortKey::Quantity),
            "price" => Ok(SortKey::Price),
            "side" => Ok(SortKey::Side),
            other => Err(TradelogError::InvalidQuery {
                reason: format!(
                    "unknown sort key '{other}' (expected id, symbol, quantity, price or side)"
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Result<Self, TradelogError> {
        match s {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(TradelogError::InvalidQuery {
                reason: format!("unknown sort direction '{other}' (expected asc or desc)"),
            }),
        }
    }
}

/// Validated filter and sort options for listing orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub sort: SortKey,
    pub dir: SortDir,
}

impl OrderQuery {
    /// Parse raw text parameters. `None` or empty strings mean "not given".
    pub fn parse(
        symbol: Option<&str>,
        side: Option<&str>,
        sort: Option<&str>,
        dir: Option<&str>,
    ) -> Result<Self, TradelogError> {
        let symbol = symbol
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let side = match side.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(Side::parse(s).map_err(|_| TradelogError::InvalidQuery {
                reason: format!("unknown side filter '{s}' (expected buy or sell)"),
            })?),
            None => None,
        };
        let sort = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => SortKey::parse(s)?,
            None => SortKey::default(),
        };
        let dir = match dir.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => SortDir::parse(s)?,
            None => SortDir::default(),
        };
        Ok(Self {
            symbol,
            side,
            sort,
            dir,
        })
    }

    /// Apply filter then sort. Symbol filtering is a case-insensitive
    /// substring match; the sort is stable.
    pub fn apply(&self, mut orders: Vec<Order>) -> Vec<Order> {
        if let Some(needle) = &self.symbol {
            let needle = needle.to_lowercase();
            orders.retain(|o| o.symbol.to_lowercase().contains(&needle));
        }
        if let Some(side) = self.side {
            orders.retain(|o| o.side == side);
        }

        let key = self.sort;
        orders.sort_by(|a, b| {
            let ord = match key {
                SortKey::Id => a.id.cmp(&b.id),
                SortKey::Symbol => a.symbol.cmp(&b.symbol),
                SortKey::Quantity => {
                    a.quantity.partial_cmp(&b.quantity).unwrap_or(Ordering::Equal)
                }
                SortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
                SortKey::Side => a.side.as_str().cmp(b.side.as_str()),
            };
            match self.dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(id: i64, symbol: &str, quantity: f64, price: f64, side: Side) -> Order {
        Order {
            id,
            symbol: symbol.to_string(),
            quantity,
            price,
            side,
            date: None,
            comments: None,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            make_order(1, "AAPL", 10.0, 150.0, Side::Buy),
            make_order(2, "GOOGL", 5.0, 2800.0, Side::Sell),
            make_order(3, "TSLA", 3.0, 200.0, Side::Buy),
        ]
    }

    #[test]
    fn defaults_sort_by_id_ascending() {
        let q = OrderQuery::parse(None, None, None, None).unwrap();
        assert_eq!(q, OrderQuery::default());
        let ids: Vec<i64> = q.apply(sample()).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_strings_behave_like_absent() {
        let q = OrderQuery::parse(Some(""), Some(" "), Some(""), Some("")).unwrap();
        assert_eq!(q, OrderQuery::default());
    }

    #[test]
    fn symbol_filter_matches_substring_case_insensitive() {
        let q = OrderQuery::parse(Some("oog"), None, None, None).unwrap();
        let result = q.apply(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].symbol, "GOOGL");
    }

    #[test]
    fn side_filter_keeps_only_matching() {
        let q = OrderQuery::parse(None, Some("buy"), None, None).unwrap();
        let result = q.apply(sample());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|o| o.side == Side::Buy));
    }

    #[test]
    fn sort_by_price_descending() {
        let q = OrderQuery::parse(None, None, Some("price"), Some("desc")).unwrap();
        let symbols: Vec<String> = q.apply(sample()).into_iter().map(|o| o.symbol).collect();
        assert_eq!(symbols, vec!["GOOGL", "TSLA", "AAPL"]);
    }

    #[test]
    fn sort_by_symbol() {
        let q = OrderQuery::parse(None, None, Some("symbol"), None).unwrap();
        let symbols: Vec<String> = q.apply(sample()).into_iter().map(|o| o.symbol).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "TSLA"]);
    }

    #[test]
    fn invalid_sort_key_rejected() {
        let err = OrderQuery::parse(None, None, Some("pnl"), None).unwrap_err();
        assert!(matches!(err, TradelogError::InvalidQuery { .. }));
    }

    #[test]
    fn invalid_direction_rejected() {
        assert!(OrderQuery::parse(None, None, None, Some("down")).is_err());
    }

    #[test]
    fn invalid_side_filter_rejected() {
        let err = OrderQuery::parse(None, Some("short"), None, None).unwrap_err();
        assert!(matches!(err, TradelogError::InvalidQuery { .. }));
    }
}
