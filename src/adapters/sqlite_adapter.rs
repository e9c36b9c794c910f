//! SQLite journal adapter.

use crate::domain::error::TradelogError;
use crate::domain::meta::TradeMeta;
use crate::domain::order::{Order, OrderDraft, Side};
use crate::ports::config_port::ConfigPort;
use crate::ports::journal_port::JournalPort;
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

type PooledConn = r2d2::PooledConnection<SqliteConnectionManager>;

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradelogError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| TradelogError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| TradelogError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, TradelogError> {
        let manager = SqliteConnectionManager::memory();
        // One connection only: each in-memory connection is its own database.
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| TradelogError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), TradelogError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                quantity REAL NOT NULL,
                price REAL NOT NULL,
                side TEXT NOT NULL,
                date TEXT,
                comments TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_orders_symbol ON orders(symbol);
            CREATE TABLE IF NOT EXISTS depot (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                value REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS trade_meta (
                symbol TEXT PRIMARY KEY,
                notes TEXT
            );",
        )
        .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn conn(&self) -> Result<PooledConn, TradelogError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| TradelogError::Database {
                reason: e.to_string(),
            })
    }

    fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
        let side_str: String = row.get(4)?;
        let side = match side_str.as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    format!("unknown side '{other}'").into(),
                ));
            }
        };
        // Tolerate unparsable stored dates; analytics treats them as absent.
        let date: Option<DateTime<Utc>> = row
            .get::<_, Option<String>>(5)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc));

        Ok(Order {
            id: row.get(0)?,
            symbol: row.get(1)?,
            quantity: row.get(2)?,
            price: row.get(3)?,
            side,
            date,
            comments: row.get(6)?,
        })
    }
}

const ORDER_COLUMNS: &str = "id, symbol, quantity, price, side, date, comments";

impl JournalPort for SqliteAdapter {
    fn list_orders(&self) -> Result<Vec<Order>, TradelogError> {
        let conn = self.conn()?;
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id ASC");

        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], Self::row_to_order)
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(
                row.map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(orders)
    }

    fn get_order(&self, id: i64) -> Result<Option<Order>, TradelogError> {
        let conn = self.conn()?;
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        match conn.query_row(&query, params![id], Self::row_to_order) {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TradelogError::DatabaseQuery {
                reason: e.to_string(),
            }),
        }
    }

    fn insert_order(&self, draft: &OrderDraft) -> Result<Order, TradelogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO orders (symbol, quantity, price, side, date, comments)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.symbol,
                draft.quantity,
                draft.price,
                draft.side.as_str(),
                draft.date.map(|d| d.to_rfc3339()),
                draft.comments,
            ],
        )
        .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(draft.clone().into_order(conn.last_insert_rowid()))
    }

    fn update_order(&self, id: i64, draft: &OrderDraft) -> Result<Option<Order>, TradelogError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE orders
                 SET symbol = ?1, quantity = ?2, price = ?3, side = ?4, date = ?5, comments = ?6
                 WHERE id = ?7",
                params![
                    draft.symbol,
                    draft.quantity,
                    draft.price,
                    draft.side.as_str(),
                    draft.date.map(|d| d.to_rfc3339()),
                    draft.comments,
                    id,
                ],
            )
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        if changed == 0 {
            Ok(None)
        } else {
            Ok(Some(draft.clone().into_order(id)))
        }
    }

    fn delete_order(&self, id: i64) -> Result<bool, TradelogError> {
        let conn = self.conn()?;
        let changed = conn
            .execute("DELETE FROM orders WHERE id = ?1", params![id])
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        Ok(changed > 0)
    }

    fn insert_orders(&self, drafts: &[OrderDraft]) -> Result<usize, TradelogError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for draft in drafts {
            tx.execute(
                "INSERT INTO orders (symbol, quantity, price, side, date, comments)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    draft.symbol,
                    draft.quantity,
                    draft.price,
                    draft.side.as_str(),
                    draft.date.map(|d| d.to_rfc3339()),
                    draft.comments,
                ],
            )
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(drafts.len())
    }

    fn delete_all(&self) -> Result<(), TradelogError> {
        let conn = self.conn()?;
        conn.execute_batch("DELETE FROM orders; DELETE FROM trade_meta; DELETE FROM depot;")
            .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn get_depot(&self) -> Result<f64, TradelogError> {
        let conn = self.conn()?;
        match conn.query_row("SELECT value FROM depot WHERE id = 1", [], |row| {
            row.get::<_, f64>(0)
        }) {
            Ok(value) => Ok(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0.0),
            Err(e) => Err(TradelogError::DatabaseQuery {
                reason: e.to_string(),
            }),
        }
    }

    fn set_depot(&self, value: f64) -> Result<f64, TradelogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO depot (id, value) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET value = excluded.value",
            params![value],
        )
        .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(value)
    }

    fn get_trade_meta(&self, symbol: &str) -> Result<Option<TradeMeta>, TradelogError> {
        let conn = self.conn()?;
        match conn.query_row(
            "SELECT symbol, notes FROM trade_meta WHERE symbol = ?1",
            params![symbol],
            |row| {
                Ok(TradeMeta {
                    symbol: row.get(0)?,
                    notes: row.get(1)?,
                })
            },
        ) {
            Ok(meta) => Ok(Some(meta)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TradelogError::DatabaseQuery {
                reason: e.to_string(),
            }),
        }
    }

    fn upsert_trade_meta(
        &self,
        symbol: &str,
        notes: Option<&str>,
    ) -> Result<TradeMeta, TradelogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trade_meta (symbol, notes) VALUES (?1, ?2)
             ON CONFLICT(symbol) DO UPDATE SET notes = excluded.notes",
            params![symbol, notes],
        )
        .map_err(|e: rusqlite::Error| TradelogError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(TradeMeta {
            symbol: symbol.to_string(),
            notes: notes.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    fn journal() -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        adapter
    }

    fn draft(symbol: &str, quantity: f64, price: f64, side: Side) -> OrderDraft {
        OrderDraft {
            symbol: symbol.to_string(),
            quantity,
            price,
            side,
            date: None,
            comments: None,
        }
    }

    #[test]
    fn from_config_missing_path() {
        match SqliteAdapter::from_config(&EmptyConfig) {
            Err(TradelogError::ConfigMissing { section, key }) => {
                assert_eq!(section, "sqlite");
                assert_eq!(key, "path");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let journal = journal();
        let first = journal
            .insert_order(&draft("AAPL", 10.0, 150.0, Side::Buy))
            .unwrap();
        let second = journal
            .insert_order(&draft("GOOGL", 5.0, 2800.0, Side::Sell))
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn list_returns_orders_in_id_order() {
        let journal = journal();
        journal
            .insert_order(&draft("TSLA", 3.0, 200.0, Side::Buy))
            .unwrap();
        journal
            .insert_order(&draft("AAPL", 2.0, 100.0, Side::Buy))
            .unwrap();

        let orders = journal.list_orders().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].symbol, "TSLA");
        assert_eq!(orders[1].symbol, "AAPL");
    }

    #[test]
    fn get_order_round_trips_date_and_comments() {
        let journal = journal();
        let date = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let mut d = draft("AAPL", 10.0, 150.0, Side::Buy);
        d.date = Some(date);
        d.comments = Some("earnings play".into());

        let inserted = journal.insert_order(&d).unwrap();
        let fetched = journal.get_order(inserted.id).unwrap().unwrap();
        assert_eq!(fetched.date, Some(date));
        assert_eq!(fetched.comments.as_deref(), Some("earnings play"));
    }

    #[test]
    fn get_missing_order_returns_none() {
        assert!(journal().get_order(99).unwrap().is_none());
    }

    #[test]
    fn update_replaces_order() {
        let journal = journal();
        let order = journal
            .insert_order(&draft("AAPL", 10.0, 150.0, Side::Buy))
            .unwrap();

        let updated = journal
            .update_order(order.id, &draft("AAPL", 12.0, 140.0, Side::Buy))
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, 12.0);

        let fetched = journal.get_order(order.id).unwrap().unwrap();
        assert_eq!(fetched.quantity, 12.0);
        assert_eq!(fetched.price, 140.0);
    }

    #[test]
    fn update_missing_order_returns_none() {
        let result = journal()
            .update_order(42, &draft("AAPL", 1.0, 1.0, Side::Buy))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_order_reports_whether_found() {
        let journal = journal();
        let order = journal
            .insert_order(&draft("AAPL", 10.0, 150.0, Side::Buy))
            .unwrap();
        assert!(journal.delete_order(order.id).unwrap());
        assert!(!journal.delete_order(order.id).unwrap());
        assert!(journal.list_orders().unwrap().is_empty());
    }

    #[test]
    fn batch_insert_writes_all() {
        let journal = journal();
        let drafts = vec![
            draft("AAPL", 2.0, 100.0, Side::Buy),
            draft("AAPL", 1.0, 120.0, Side::Sell),
            draft("TSLA", 3.0, 200.0, Side::Buy),
        ];
        assert_eq!(journal.insert_orders(&drafts).unwrap(), 3);
        assert_eq!(journal.list_orders().unwrap().len(), 3);
    }

    #[test]
    fn delete_all_wipes_everything() {
        let journal = journal();
        journal
            .insert_order(&draft("AAPL", 2.0, 100.0, Side::Buy))
            .unwrap();
        journal.set_depot(2500.0).unwrap();
        journal.upsert_trade_meta("AAPL", Some("notes")).unwrap();

        journal.delete_all().unwrap();

        assert!(journal.list_orders().unwrap().is_empty());
        assert_eq!(journal.get_depot().unwrap(), 0.0);
        assert!(journal.get_trade_meta("AAPL").unwrap().is_none());
    }

    #[test]
    fn depot_defaults_to_zero_and_upserts() {
        let journal = journal();
        assert_eq!(journal.get_depot().unwrap(), 0.0);
        assert_eq!(journal.set_depot(1000.0).unwrap(), 1000.0);
        assert_eq!(journal.get_depot().unwrap(), 1000.0);
        journal.set_depot(750.5).unwrap();
        assert_eq!(journal.get_depot().unwrap(), 750.5);
    }

    #[test]
    fn trade_meta_upsert_and_lookup() {
        let journal = journal();
        assert!(journal.get_trade_meta("AAPL").unwrap().is_none());

        journal.upsert_trade_meta("AAPL", Some("swing trade")).unwrap();
        let meta = journal.get_trade_meta("AAPL").unwrap().unwrap();
        assert_eq!(meta.notes.as_deref(), Some("swing trade"));

        journal.upsert_trade_meta("AAPL", None).unwrap();
        let meta = journal.get_trade_meta("AAPL").unwrap().unwrap();
        assert_eq!(meta.notes, None);
    }
}
