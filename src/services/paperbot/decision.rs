//! Trading decision: the per-tick gate and the random trade intent

use serde::{Deserialize, Serialize};

use crate::services::precision::round_amount;
use crate::services::random::RandomSource;
use crate::types::{AssetState, AssetSymbol, BotConfig, OrderSide};

/// Base trade rate before risk and category scaling.
pub const BASE_TRADE_RATE: f64 = 0.25;

/// A tick trades when the scaled score is strictly below this.
pub const TRADE_GATE_THRESHOLD: f64 = 0.9;

/// Jitter applied to the score, uniform in `[low, high)`.
pub const JITTER_RANGE: (f64, f64) = (0.4, 1.3);

/// Trade size ceiling as a fraction of budget or price, whichever is larger.
pub const TRADE_SIZE_FRACTION: f64 = 0.001;

/// Probability that an executed trade raises an advisory signal.
pub const SIGNAL_PROBABILITY: f64 = 0.4;

/// A concrete order to run against the ledger at the current price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub symbol: AssetSymbol,
    pub side: OrderSide,
    pub amount: f64,
}

impl TradeOrder {
    pub fn buy(symbol: AssetSymbol, amount: f64) -> Self {
        Self {
            symbol,
            side: OrderSide::Buy,
            amount,
        }
    }

    pub fn sell(symbol: AssetSymbol, amount: f64) -> Self {
        Self {
            symbol,
            side: OrderSide::Sell,
            amount,
        }
    }
}

/// What the bot wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeDecision {
    Hold,
    Trade(TradeOrder),
}

/// Gate score for a given jitter. Not a normalized probability.
pub fn trade_score(config: &BotConfig, jitter: f64) -> f64 {
    BASE_TRADE_RATE * config.risk.trade_factor() * config.category.trade_factor() * jitter
}

/// Draw a jitter and evaluate the gate.
pub fn passes_gate(config: &BotConfig, rng: &mut dyn RandomSource) -> bool {
    let jitter = rng.uniform(JITTER_RANGE.0, JITTER_RANGE.1);
    trade_score(config, jitter) < TRADE_GATE_THRESHOLD
}

/// Largest amount a single random trade may request.
pub fn max_trade_size(budget: f64, price: f64) -> f64 {
    (TRADE_SIZE_FRACTION * budget).max(TRADE_SIZE_FRACTION * price)
}

/// Pick asset, amount and side uniformly at random.
pub fn draw_order(config: &BotConfig, assets: &[AssetState], rng: &mut dyn RandomSource) -> Option<TradeOrder> {
    if assets.is_empty() {
        return None;
    }

    let asset = &assets[rng.index(assets.len())];
    let ceiling = max_trade_size(config.budget, asset.price);
    let amount = round_amount(rng.uniform(0.0, ceiling));
    let side = if rng.next_unit() > 0.5 {
        OrderSide::Buy
    } else {
        OrderSide::Sell
    };

    Some(TradeOrder {
        symbol: asset.symbol,
        side,
        amount,
    })
}

/// Full per-tick decision: gate first, then the order draw.
pub fn decide(config: &BotConfig, assets: &[AssetState], rng: &mut dyn RandomSource) -> TradeDecision {
    if !passes_gate(config, rng) {
        return TradeDecision::Hold;
    }

    match draw_order(config, assets, rng) {
        Some(order) => TradeDecision::Trade(order),
        None => TradeDecision::Hold,
    }
}

/// Advisory text raised after a trade on the given side.
pub fn signal_message(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "Bullish Momentum Detected",
        OrderSide::Sell => "Profit-taking Opportunity",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::ScriptedRandom;
    use crate::types::{RiskLevel, UserCategory};

    fn config(risk: RiskLevel, category: UserCategory) -> BotConfig {
        BotConfig::new(1000.0, category, risk, vec![AssetSymbol::Btc, AssetSymbol::Eth])
    }

    #[test]
    fn test_trade_score_multiplies_factors() {
        let cfg = config(RiskLevel::Medium, UserCategory::Intermediate);
        let score = trade_score(&cfg, 1.0);
        assert!((score - 0.25 * 0.9 * 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gate_passes_for_every_profile() {
        // The highest reachable score is 0.25 * 1.4 * 1.3 * 1.3, well under the threshold.
        let cfg = config(RiskLevel::High, UserCategory::Pro);
        let mut rng = ScriptedRandom::constant(0.999_999);
        assert!(passes_gate(&cfg, &mut rng));
        assert!(trade_score(&cfg, JITTER_RANGE.1) < TRADE_GATE_THRESHOLD);
    }

    #[test]
    fn test_max_trade_size_uses_larger_base() {
        assert_eq!(max_trade_size(1000.0, 50.0), 1.0);
        assert_eq!(max_trade_size(1000.0, 5000.0), 5.0);
    }

    #[test]
    fn test_draw_order_maps_draws() {
        let cfg = config(RiskLevel::Low, UserCategory::Beginner);
        let assets = vec![
            AssetState::new(AssetSymbol::Btc, 1000.0),
            AssetState::new(AssetSymbol::Eth, 3000.0),
        ];
        // asset index, amount fraction, side
        let mut rng = ScriptedRandom::new(vec![0.75, 0.5, 0.9]);

        let order = draw_order(&cfg, &assets, &mut rng).unwrap();

        assert_eq!(order.symbol, AssetSymbol::Eth);
        assert_eq!(order.amount, 1.5);
        assert_eq!(order.side, OrderSide::Buy);
    }

    #[test]
    fn test_side_is_sell_at_midpoint() {
        let cfg = config(RiskLevel::Low, UserCategory::Beginner);
        let assets = vec![AssetState::new(AssetSymbol::Btc, 1000.0)];
        let mut rng = ScriptedRandom::new(vec![0.0, 0.25, 0.5]);

        let order = draw_order(&cfg, &assets, &mut rng).unwrap();

        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.amount, 0.25);
    }

    #[test]
    fn test_decide_consumes_gate_then_order() {
        let cfg = config(RiskLevel::Low, UserCategory::Beginner);
        let assets = vec![AssetState::new(AssetSymbol::Btc, 1000.0)];
        let mut rng = ScriptedRandom::new(vec![0.5, 0.0, 0.1, 0.9]);

        let decision = decide(&cfg, &assets, &mut rng);

        assert_eq!(decision, TradeDecision::Trade(TradeOrder::buy(AssetSymbol::Btc, 0.1)));
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn test_signal_messages_differ_by_side() {
        assert_ne!(signal_message(OrderSide::Buy), signal_message(OrderSide::Sell));
    }
}
