//! Order-ledger access port trait.
//!
//! The aggregation engine is a pure function over whatever snapshot
//! `list_orders` returns; it holds no ambient state of its own. Each caller
//! reads one consistent snapshot per recomputation.

use crate::domain::error::TradelogError;
use crate::domain::meta::TradeMeta;
use crate::domain::order::{Order, OrderDraft};

pub trait JournalPort {
    fn list_orders(&self) -> Result<Vec<Order>, TradelogError>;

    fn get_order(&self, id: i64) -> Result<Option<Order>, TradelogError>;

    fn insert_order(&self, draft: &OrderDraft) -> Result<Order, TradelogError>;

    /// Replace an existing order wholesale. `None` when the id is unknown.
    fn update_order(&self, id: i64, draft: &OrderDraft) -> Result<Option<Order>, TradelogError>;

    /// `false` when the id is unknown.
    fn delete_order(&self, id: i64) -> Result<bool, TradelogError>;

    /// Batch insert; returns the number of orders written.
    fn insert_orders(&self, drafts: &[OrderDraft]) -> Result<usize, TradelogError>;

    /// Administrative wipe of orders, notes and the depot record.
    fn delete_all(&self) -> Result<(), TradelogError>;

    /// 0.0 when no depot value has been stored yet.
    fn get_depot(&self) -> Result<f64, TradelogError>;

    fn set_depot(&self, value: f64) -> Result<f64, TradelogError>;

    fn get_trade_meta(&self, symbol: &str) -> Result<Option<TradeMeta>, TradelogError>;

    fn upsert_trade_meta(
        &self,
        symbol: &str,
        notes: Option<&str>,
    ) -> Result<TradeMeta, TradelogError>;
}
