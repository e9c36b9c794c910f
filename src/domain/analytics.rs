//! Portfolio-wide performance statistics over completed trades.

use crate::domain::aggregate::side_sums;
use crate::domain::grouper::SymbolBuckets;
use crate::domain::order::Side;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Gross profit divided by gross loss, with an explicit sentinel for the
/// all-wins case. Modeled as a tagged variant rather than `f64::INFINITY`
/// because not every serialization target preserves float infinity.
///
/// JSON: `Finite` serializes as a plain number, `PositiveInfinity` as the
/// string `"Infinity"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Finite(f64),
    PositiveInfinity,
}

impl ProfitFactor {
    pub fn as_f64(&self) -> f64 {
        match self {
            ProfitFactor::Finite(v) => *v,
            ProfitFactor::PositiveInfinity => f64::INFINITY,
        }
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Finite(v) => serializer.serialize_f64(*v),
            ProfitFactor::PositiveInfinity => serializer.serialize_str("Infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for ProfitFactor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(ProfitFactor::Finite(v)),
            Repr::Text(s) if s == "Infinity" => Ok(ProfitFactor::PositiveInfinity),
            Repr::Text(s) => Err(de::Error::custom(format!(
                "expected a number or \"Infinity\", got \"{s}\""
            ))),
        }
    }
}

/// Scalar statistics over all completed buckets (≥1 buy and ≥1 sell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub completed_trades: usize,
    pub win_rate: f64,
    pub profit_factor: ProfitFactor,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub avg_hold_duration_days: f64,
}

impl AnalyticsSummary {
    pub fn empty() -> Self {
        Self {
            completed_trades: 0,
            win_rate: 0.0,
            profit_factor: ProfitFactor::Finite(0.0),
            avg_win: 0.0,
            avg_loss: 0.0,
            avg_hold_duration_days: 0.0,
        }
    }
}

/// Compute portfolio statistics. Never fails: every degenerate case (no
/// completed trades, all wins, zero-priced orders, missing or inverted
/// dates) resolves to a defined fallback value.
pub fn compute_analytics(buckets: &SymbolBuckets) -> AnalyticsSummary {
    let mut completed_trades = 0usize;
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut win_sum = 0.0_f64;
    let mut loss_sum = 0.0_f64;
    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;
    let mut hold_durations: Vec<f64> = Vec::new();

    for (_, orders) in buckets.iter() {
        let has_buy = orders.iter().any(|o| o.side == Side::Buy);
        let has_sell = orders.iter().any(|o| o.side == Side::Sell);
        if !has_buy || !has_sell {
            continue;
        }
        completed_trades += 1;

        let (buy_sum, sell_sum) = side_sums(orders);
        let pnl = sell_sum - buy_sum;
        if pnl > 0.0 {
            wins += 1;
            win_sum += pnl;
            gross_profit += pnl;
        } else if pnl < 0.0 {
            losses += 1;
            loss_sum += pnl.abs();
            gross_loss += pnl.abs();
        }

        // Undated orders count toward the sums above but cannot anchor the
        // duration extremes.
        let min_buy = orders
            .iter()
            .filter(|o| o.side == Side::Buy)
            .filter_map(|o| o.date)
            .min();
        let max_sell = orders
            .iter()
            .filter(|o| o.side == Side::Sell)
            .filter_map(|o| o.date)
            .max();
        if let (Some(min_buy), Some(max_sell)) = (min_buy, max_sell) {
            let days = (max_sell - min_buy).num_seconds() as f64 / SECONDS_PER_DAY;
            // A sell dated before every buy is excluded, not reported as
            // negative.
            if days >= 0.0 {
                hold_durations.push(days);
            }
        }
    }

    let win_rate = if completed_trades > 0 {
        wins as f64 / completed_trades as f64
    } else {
        0.0
    };

    let profit_factor = if gross_loss > 0.0 {
        ProfitFactor::Finite(gross_profit / gross_loss)
    } else if gross_profit > 0.0 {
        ProfitFactor::PositiveInfinity
    } else {
        ProfitFactor::Finite(0.0)
    };

    let avg_win = if wins > 0 { win_sum / wins as f64 } else { 0.0 };
    let avg_loss = if losses > 0 {
        -(loss_sum / losses as f64)
    } else {
        0.0
    };

    let avg_hold_duration_days = if hold_durations.is_empty() {
        0.0
    } else {
        hold_durations.iter().sum::<f64>() / hold_durations.len() as f64
    };

    AnalyticsSummary {
        completed_trades,
        win_rate,
        profit_factor,
        avg_win,
        avg_loss,
        avg_hold_duration_days,
    }
}
