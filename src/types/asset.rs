use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of prices kept in an asset's history.
pub const HISTORY_CAP: usize = 100;

/// Tradable symbols supported by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    Btc,
    Eth,
    Sol,
}

impl AssetSymbol {
    /// All supported symbols, in dashboard order.
    pub const ALL: [AssetSymbol; 3] = [AssetSymbol::Btc, AssetSymbol::Eth, AssetSymbol::Sol];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
            AssetSymbol::Sol => "SOL",
        }
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            "SOL" => Ok(Self::Sol),
            other => Err(format!("Unknown asset symbol: {}", other)),
        }
    }
}

/// Simulated market state for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetState {
    pub symbol: AssetSymbol,
    /// Current price, always >= 0.1 once the engine has touched it
    pub price: f64,
    /// Most recent prices, oldest first
    pub history: VecDeque<f64>,
    /// Display-only 24h change percentage; the engine never updates it
    pub change_24h: f64,
}

impl AssetState {
    /// Create an asset with an empty history.
    pub fn new(symbol: AssetSymbol, price: f64) -> Self {
        Self {
            symbol,
            price,
            history: VecDeque::with_capacity(HISTORY_CAP),
            change_24h: 0.0,
        }
    }

    /// Set the display-only 24h change.
    pub fn with_change_24h(mut self, change_24h: f64) -> Self {
        self.change_24h = change_24h;
        self
    }

    /// Record a new price, evicting the oldest history entries past the cap.
    pub fn record_price(&mut self, price: f64) {
        self.price = price;
        self.history.push_back(price);
        self.trim_history();
    }

    /// Drop history entries beyond the most recent [`HISTORY_CAP`].
    pub fn trim_history(&mut self) {
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Last `n` prices, oldest first (the dashboard chart shows 40).
    pub fn recent_history(&self, n: usize) -> Vec<f64> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).copied().collect()
    }
}
