//! HTTP request handlers for the web adapter.
//!
//! Every derived view reads one full snapshot of the order ledger and
//! recomputes from scratch; nothing derived is cached or persisted.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::analytics::compute_analytics;
use crate::domain::aggregate::{compute_open_positions, compute_trades};
use crate::domain::grouper::group;
use crate::domain::meta::Depot;
use crate::domain::order::OrderDraft;
use crate::domain::query::OrderQuery;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OrderListParams>,
) -> Result<Response, ApiError> {
    let query = OrderQuery::parse(
        params.symbol.as_deref(),
        params.side.as_deref(),
        params.sort.as_deref(),
        params.dir.as_deref(),
    )?;
    let orders = state.journal.list_orders()?;
    Ok(Json(query.apply(orders)).into_response())
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.journal.get_order(id)? {
        Some(order) => Ok(Json(order).into_response()),
        None => Err(ApiError::not_found("Order not found")),
    }
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<OrderDraft>,
) -> Result<Response, ApiError> {
    draft.validate()?;
    let order = state.journal.insert_order(&draft)?;
    Ok((StatusCode::CREATED, Json(order)).into_response())
}

pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(draft): Json<OrderDraft>,
) -> Result<Response, ApiError> {
    draft.validate()?;
    match state.journal.update_order(id, &draft)? {
        Some(order) => Ok(Json(order).into_response()),
        None => Err(ApiError::not_found("Order not found")),
    }
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if state.journal.delete_order(id)? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(ApiError::not_found("Order not found"))
    }
}

pub async fn list_trades(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let orders = state.journal.list_orders()?;
    Ok(Json(compute_trades(&group(orders))).into_response())
}

pub async fn open_stock(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let orders = state.journal.list_orders()?;
    Ok(Json(compute_open_positions(&group(orders))).into_response())
}

pub async fn analytics(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let orders = state.journal.list_orders()?;
    Ok(Json(compute_analytics(&group(orders))).into_response())
}

pub async fn get_depot(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let value = state.journal.get_depot()?;
    Ok(Json(Depot { value }).into_response())
}

pub async fn set_depot(
    State(state): State<Arc<AppState>>,
    Json(depot): Json<Depot>,
) -> Result<Response, ApiError> {
    if !depot.value.is_finite() {
        return Err(ApiError::bad_request("depot value must be a finite number"));
    }
    let value = state.journal.set_depot(depot.value)?;
    Ok(Json(Depot { value }).into_response())
}

pub async fn get_trade_meta(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, ApiError> {
    match state.journal.get_trade_meta(&symbol)? {
        Some(meta) => Ok(Json(meta).into_response()),
        None => Err(ApiError::not_found("Meta not found")),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TradeMetaBody {
    pub notes: Option<String>,
}

pub async fn put_trade_meta(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Json(body): Json<TradeMetaBody>,
) -> Result<Response, ApiError> {
    let meta = state
        .journal
        .upsert_trade_meta(&symbol, body.notes.as_deref())?;
    Ok(Json(meta).into_response())
}

pub async fn empty_db(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.journal.delete_all()?;
    Ok(Json(json!({ "ok": true })).into_response())
}

const DUMMY_ORDER_COUNT: usize = 500;
const DUMMY_SYMBOLS: [&str; 10] = [
    "AAPL", "TSLA", "GOOG", "MSFT", "AMZN", "NVDA", "META", "SAP", "BAS", "VOW3",
];

pub async fn import_dummy(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut drafts = Vec::with_capacity(DUMMY_ORDER_COUNT);

    for i in 0..DUMMY_ORDER_COUNT {
        let symbol = DUMMY_SYMBOLS[rng.gen_range(0..DUMMY_SYMBOLS.len())];
        let side = if rng.gen_bool(0.5) {
            crate::domain::order::Side::Buy
        } else {
            crate::domain::order::Side::Sell
        };
        let quantity = rng.gen_range(1..=50) as f64;
        let price = (rng.gen_range(10.0..510.0_f64) * 100.0).round() / 100.0;
        let date = now - Duration::seconds(rng.gen_range(0..365 * 86_400i64));
        let comments = if rng.gen_bool(0.3) {
            Some(format!("Dummy comment {i}"))
        } else {
            None
        };

        drafts.push(OrderDraft {
            symbol: symbol.to_string(),
            quantity,
            price,
            side,
            date: Some(date),
            comments,
        });
    }

    let count = state.journal.insert_orders(&drafts)?;
    Ok(Json(json!({ "count": count })).into_response())
}
