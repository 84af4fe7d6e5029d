//! Portfolio and trade log types

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::AssetSymbol;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Holdings of a single asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Units held
    pub amount: f64,
    /// Weighted-average purchase price; zero when nothing is held
    pub avg_price: f64,
}

/// Cash and positions of the simulated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Total value: cash plus marked-to-market positions, floored at zero
    pub value: f64,
    /// Available cash, never negative
    pub cash: f64,
    /// Daily P&L. Carried in the snapshot but not computed by the engine.
    pub daily_pnl: f64,
    /// One position per configured asset
    pub positions: BTreeMap<AssetSymbol, Position>,
}

impl Portfolio {
    /// Fresh portfolio: all cash, empty positions for every symbol.
    pub fn new(budget: f64, symbols: &[AssetSymbol]) -> Self {
        Self {
            value: budget,
            cash: budget,
            daily_pnl: 0.0,
            positions: symbols.iter().map(|s| (*s, Position::default())).collect(),
        }
    }

    pub fn position(&self, symbol: AssetSymbol) -> Position {
        self.positions.get(&symbol).copied().unwrap_or_default()
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLogEntry {
    /// Unique trade ID
    pub id: Uuid,
    /// When the trade was executed (ms)
    pub executed_at: i64,
    pub asset: AssetSymbol,
    pub side: OrderSide,
    pub amount: f64,
    /// Execution price
    pub price: f64,
    /// Realized P&L; zero for buys
    pub pnl: f64,
}

impl TradeLogEntry {
    pub fn new(asset: AssetSymbol, side: OrderSide, amount: f64, price: f64, pnl: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            executed_at: Utc::now().timestamp_millis(),
            asset,
            side,
            amount,
            price,
            pnl,
        }
    }

    /// Wall-clock time of execution as `HH:MM:SS` (UTC).
    pub fn time_label(&self) -> String {
        Utc.timestamp_millis_opt(self.executed_at)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_portfolio_is_all_cash() {
        let portfolio = Portfolio::new(500.0, &[AssetSymbol::Btc, AssetSymbol::Sol]);

        assert_eq!(portfolio.cash, 500.0);
        assert_eq!(portfolio.value, 500.0);
        assert_eq!(portfolio.daily_pnl, 0.0);
        assert_eq!(portfolio.positions.len(), 2);
        assert_eq!(portfolio.position(AssetSymbol::Btc), Position::default());
    }

    #[test]
    fn test_trade_entry_serializes_side_uppercase() {
        let entry = TradeLogEntry::new(AssetSymbol::Eth, OrderSide::Sell, 0.5, 1300.0, 12.5);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["side"], "SELL");
        assert_eq!(json["asset"], "ETH");
        assert_eq!(json["pnl"], 12.5);
        assert_eq!(entry.time_label().len(), 8);
    }
}
