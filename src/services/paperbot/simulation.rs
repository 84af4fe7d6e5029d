//! Simulation core
//!
//! Owns the engine state and applies one tick at a time. Timing lives in the runner;
//! everything here is synchronous so tests can drive it step by step.

use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::precision::round_price;
use crate::services::price_model::{self, MIN_PRICE};
use crate::services::random::RandomSource;
use crate::types::{AssetState, AssetSymbol, BotConfig, EngineState, OrderSide, Portfolio, TradeLogEntry};

use super::decision::{self, TradeDecision, TradeOrder, SIGNAL_PROBABILITY};

/// What happened during a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter after this tick
    pub tick: u64,
    /// Trade executed this tick, if any
    pub trade: Option<TradeLogEntry>,
    /// Signal raised by that trade, if any
    pub signal: Option<&'static str>,
}

/// The simulated market, portfolio and bot for one dashboard session.
pub struct Simulation {
    config: BotConfig,
    state: EngineState,
    rng: Box<dyn RandomSource>,
}

impl Simulation {
    /// Build a simulation from a configuration and its starting market.
    ///
    /// `assets` must hold exactly one entry per configured symbol, in the same order,
    /// each with a positive price.
    pub fn new(config: BotConfig, assets: Vec<AssetState>, rng: Box<dyn RandomSource>) -> Result<Self> {
        config.validate()?;

        let symbols: Vec<AssetSymbol> = assets.iter().map(|a| a.symbol).collect();
        if symbols != config.assets {
            return Err(AppError::InvalidConfig(format!(
                "initial assets {:?} do not match configured assets {:?}",
                symbols, config.assets
            )));
        }

        if let Some(bad) = assets.iter().find(|a| !a.price.is_finite() || a.price <= 0.0) {
            return Err(AppError::InvalidConfig(format!(
                "initial price for {} must be positive, got {}",
                bad.symbol, bad.price
            )));
        }

        let portfolio = Portfolio::new(config.budget, &config.assets);
        let state = EngineState::new(assets, portfolio);

        Ok(Self { config, state, rng })
    }

    /// Build a simulation with the default starting market for the configured symbols.
    pub fn seeded(config: BotConfig, mut rng: Box<dyn RandomSource>) -> Result<Self> {
        config.validate()?;
        let assets = price_model::seed_assets(&config.assets, rng.as_mut());
        Self::new(config, assets, rng)
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Owned copy of the current state for subscribers.
    pub fn snapshot(&self) -> EngineState {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.state.running = running;
    }

    /// Run one simulation step: prices, one trade opportunity, revaluation.
    pub fn tick(&mut self) -> TickReport {
        self.update_prices();

        let mut report = TickReport::default();
        if let Some(entry) = self.attempt_trade() {
            report.signal = self.roll_signal(entry.side);
            report.trade = Some(entry);
        }

        self.state.portfolio.revalue(&self.state.assets);
        self.state.tick += 1;
        report.tick = self.state.tick;
        report
    }

    /// Move every asset one step along its random walk.
    fn update_prices(&mut self) {
        let risk = self.config.risk;
        for asset in &mut self.state.assets {
            price_model::advance(asset, risk, self.rng.as_mut());
        }
        self.state.portfolio.revalue(&self.state.assets);
    }

    /// Evaluate the trade gate and, when it passes, execute a random order.
    fn attempt_trade(&mut self) -> Option<TradeLogEntry> {
        match decision::decide(&self.config, &self.state.assets, self.rng.as_mut()) {
            TradeDecision::Trade(order) => self.execute(order),
            TradeDecision::Hold => None,
        }
    }

    /// Run an order against the ledger at the asset's current price.
    ///
    /// Returns the log entry on success; rejected orders leave the state untouched.
    pub fn execute(&mut self, order: TradeOrder) -> Option<TradeLogEntry> {
        let price = match self.state.asset(order.symbol) {
            Some(asset) => asset.price,
            None => {
                debug!("Trade abandoned: {} is not simulated", order.symbol);
                return None;
            }
        };

        let portfolio = &mut self.state.portfolio;
        let result = match order.side {
            OrderSide::Buy => portfolio.apply_buy(order.symbol, order.amount, price),
            OrderSide::Sell => portfolio.apply_sell(order.symbol, order.amount, price),
        };

        match result {
            Ok(fill) => {
                let entry = TradeLogEntry::new(
                    order.symbol,
                    order.side,
                    fill.amount,
                    fill.price,
                    round_price(fill.realized_pnl),
                );
                self.state.logs.push(entry.clone());
                self.state.portfolio.revalue(&self.state.assets);

                debug!(
                    "Executed {} {} {} @ {:.2} (pnl {:.2}, cash {:.2})",
                    entry.side, entry.amount, entry.asset, entry.price, entry.pnl, self.state.portfolio.cash
                );
                Some(entry)
            }
            Err(rejection) => {
                debug!(
                    "Trade abandoned: {} {} {} @ {:.2}: {}",
                    order.side, order.amount, order.symbol, price, rejection
                );
                None
            }
        }
    }

    /// Mark an asset at a given price, as if the model had produced it.
    pub fn inject_price(&mut self, symbol: AssetSymbol, price: f64) -> bool {
        let Some(asset) = self.state.assets.iter_mut().find(|a| a.symbol == symbol) else {
            return false;
        };

        asset.record_price(round_price(price.max(MIN_PRICE)));
        self.state.portfolio.revalue(&self.state.assets);
        true
    }

    /// Remove the oldest active signal.
    pub fn expire_signal(&mut self) -> Option<String> {
        self.state.signals.expire_oldest()
    }

    /// Session reset: empty trade log, all cash at the budget, no signals.
    /// The tick counter and the (trimmed) price history are kept.
    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.logs.clear();
        self.state.portfolio.reset(self.config.budget);
        for asset in &mut self.state.assets {
            asset.trim_history();
        }
        self.state.signals.clear();
    }

    fn roll_signal(&mut self, side: OrderSide) -> Option<&'static str> {
        if !self.rng.chance(SIGNAL_PROBABILITY) {
            return None;
        }

        let message = decision::signal_message(side);
        self.state.signals.push(message);
        Some(message)
    }
}
