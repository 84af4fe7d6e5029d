//! Engine snapshot pushed to the subscriber

use serde::{Deserialize, Serialize};

use super::{AssetState, AssetSymbol, Portfolio, SignalQueue, TradeLogEntry};

/// Full, self-contained engine state. Subscribers receive an owned copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub assets: Vec<AssetState>,
    /// Every trade executed this session, oldest first
    pub logs: Vec<TradeLogEntry>,
    pub portfolio: Portfolio,
    /// Active advisory signals, oldest first
    pub signals: SignalQueue,
    pub running: bool,
    /// Number of ticks processed
    pub tick: u64,
}

impl EngineState {
    pub fn new(assets: Vec<AssetState>, portfolio: Portfolio) -> Self {
        Self {
            assets,
            logs: Vec::new(),
            portfolio,
            signals: SignalQueue::new(),
            running: false,
            tick: 0,
        }
    }

    pub fn asset(&self, symbol: AssetSymbol) -> Option<&AssetState> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }

    /// Last `n` trades, oldest first (the dashboard shows 8).
    pub fn recent_trades(&self, n: usize) -> &[TradeLogEntry] {
        let start = self.logs.len().saturating_sub(n);
        &self.logs[start..]
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
