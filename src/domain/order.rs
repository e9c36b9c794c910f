//! Order records and boundary validation.

use crate::domain::error::TradelogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Result<Self, TradelogError> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(TradelogError::InvalidOrder {
                reason: format!("unknown side '{other}' (expected buy or sell)"),
            }),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded buy or sell transaction. Ids are assigned by the store;
/// the engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// An order as submitted for create/update/import, before the store assigns
/// an id. Validated at the boundary so the engine never sees a malformed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub side: Side,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<(), TradelogError> {
        if self.symbol.is_empty() {
            return Err(TradelogError::InvalidOrder {
                reason: "symbol must not be empty".into(),
            });
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(TradelogError::InvalidOrder {
                reason: format!("quantity must be a positive number, got {}", self.quantity),
            });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(TradelogError::InvalidOrder {
                reason: format!("price must be a non-negative number, got {}", self.price),
            });
        }
        Ok(())
    }

    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            symbol: self.symbol,
            quantity: self.quantity,
            price: self.price,
            side: self.side,
            date: self.date,
            comments: self.comments,
        }
    }
}
