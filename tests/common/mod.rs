#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use tradelog::domain::error::TradelogError;
use tradelog::domain::meta::TradeMeta;
use tradelog::domain::order::{Order, OrderDraft, Side};
use tradelog::ports::journal_port::JournalPort;

/// In-memory journal used to drive the engine without a database.
pub struct MockJournal {
    state: Mutex<MockState>,
}

struct MockState {
    orders: Vec<Order>,
    next_id: i64,
    depot: Option<f64>,
    meta: HashMap<String, Option<String>>,
}

impl MockJournal {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                orders: Vec::new(),
                next_id: 1,
                depot: None,
                meta: HashMap::new(),
            }),
        }
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        let next_id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MockState {
                orders,
                next_id,
                depot: None,
                meta: HashMap::new(),
            }),
        }
    }
}

impl JournalPort for MockJournal {
    fn list_orders(&self) -> Result<Vec<Order>, TradelogError> {
        Ok(self.state.lock().unwrap().orders.clone())
    }

    fn get_order(&self, id: i64) -> Result<Option<Order>, TradelogError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    fn insert_order(&self, draft: &OrderDraft) -> Result<Order, TradelogError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let order = draft.clone().into_order(id);
        state.orders.push(order.clone());
        Ok(order)
    }

    fn update_order(&self, id: i64, draft: &OrderDraft) -> Result<Option<Order>, TradelogError> {
        let mut state = self.state.lock().unwrap();
        match state.orders.iter_mut().find(|o| o.id == id) {
            Some(slot) => {
                *slot = draft.clone().into_order(id);
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_order(&self, id: i64) -> Result<bool, TradelogError> {
        let mut state = self.state.lock().unwrap();
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        Ok(state.orders.len() < before)
    }

    fn insert_orders(&self, drafts: &[OrderDraft]) -> Result<usize, TradelogError> {
        for draft in drafts {
            self.insert_order(draft)?;
        }
        Ok(drafts.len())
    }

    fn delete_all(&self) -> Result<(), TradelogError> {
        let mut state = self.state.lock().unwrap();
        state.orders.clear();
        state.depot = None;
        state.meta.clear();
        Ok(())
    }

    fn get_depot(&self) -> Result<f64, TradelogError> {
        Ok(self.state.lock().unwrap().depot.unwrap_or(0.0))
    }

    fn set_depot(&self, value: f64) -> Result<f64, TradelogError> {
        self.state.lock().unwrap().depot = Some(value);
        Ok(value)
    }

    fn get_trade_meta(&self, symbol: &str) -> Result<Option<TradeMeta>, TradelogError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .meta
            .get(symbol)
            .map(|notes| TradeMeta {
                symbol: symbol.to_string(),
                notes: notes.clone(),
            }))
    }

    fn upsert_trade_meta(
        &self,
        symbol: &str,
        notes: Option<&str>,
    ) -> Result<TradeMeta, TradelogError> {
        self.state
            .lock()
            .unwrap()
            .meta
            .insert(symbol.to_string(), notes.map(str::to_string));
        Ok(TradeMeta {
            symbol: symbol.to_string(),
            notes: notes.map(str::to_string),
        })
    }
}

pub fn make_order(id: i64, symbol: &str, quantity: f64, price: f64, side: Side) -> Order {
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

pub fn make_dated_order(
    id: i64,
    symbol: &str,
    quantity: f64,
    price: f64,
    side: Side,
    date: DateTime<Utc>,
) -> Order {
    Order {
        date: Some(date),
        ..make_order(id, symbol, quantity, price, side)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}
