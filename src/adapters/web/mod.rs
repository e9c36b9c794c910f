//! Web server adapter.
//!
//! Axum JSON API over the journal store: order CRUD plus the derived
//! trades, open-stock and analytics views.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::ports::journal_port::JournalPort;

pub struct AppState {
    pub journal: Arc<dyn JournalPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/orders/{id}",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/trades", get(handlers::list_trades))
        .route(
            "/trades/meta/{symbol}",
            get(handlers::get_trade_meta).put(handlers::put_trade_meta),
        )
        .route("/openstock", get(handlers::open_stock))
        .route("/analytics", get(handlers::analytics))
        .route("/depot", get(handlers::get_depot).post(handlers::set_depot))
        .route("/dev/empty-db", post(handlers::empty_db))
        .route("/dev/import-dummy", post(handlers::import_dummy))
        .with_state(Arc::new(state))
}
