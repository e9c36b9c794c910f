//! CSV order import adapter.
//!
//! Expected header: `symbol,quantity,price,side,date,comments`. The `date`
//! and `comments` cells may be empty; dates are RFC 3339.

use crate::domain::error::TradelogError;
use crate::domain::order::{OrderDraft, Side};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub fn read_orders<P: AsRef<Path>>(path: P) -> Result<Vec<OrderDraft>, TradelogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| TradelogError::Import {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_orders(&content)
}

pub fn parse_orders(content: &str) -> Result<Vec<OrderDraft>, TradelogError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut drafts = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = result.map_err(|e| TradelogError::Import {
            reason: format!("CSV parse error on line {line}: {e}"),
        })?;

        let field = |idx: usize, name: &str| -> Result<&str, TradelogError> {
            record.get(idx).ok_or_else(|| TradelogError::Import {
                reason: format!("missing {name} column on line {line}"),
            })
        };

        let symbol = field(0, "symbol")?.trim().to_string();
        let quantity: f64 = field(1, "quantity")?.trim().parse().map_err(|_| {
            TradelogError::Import {
                reason: format!("invalid quantity on line {line}"),
            }
        })?;
        let price: f64 =
            field(2, "price")?
                .trim()
                .parse()
                .map_err(|_| TradelogError::Import {
                    reason: format!("invalid price on line {line}"),
                })?;
        let side = Side::parse(field(3, "side")?.trim()).map_err(|_| TradelogError::Import {
            reason: format!("invalid side on line {line}"),
        })?;

        let date: Option<DateTime<Utc>> = match record.get(4).map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                DateTime::parse_from_rfc3339(s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| TradelogError::Import {
                        reason: format!("invalid date on line {line}: {e}"),
                    })?,
            ),
        };
        let comments = record
            .get(5)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let draft = OrderDraft {
            symbol,
            quantity,
            price,
            side,
            date,
            comments,
        };
        draft.validate().map_err(|e| TradelogError::Import {
            reason: format!("line {line}: {e}"),
        })?;
        drafts.push(draft);
    }

    Ok(drafts)
}
