//! Synthetic price paths.
//!
//! Each tick moves a price by a uniform relative drift in `[-volatility, volatility)`,
//! floors it at [`MIN_PRICE`] and rounds to cents.

use crate::services::precision::round_price;
use crate::services::random::RandomSource;
use crate::types::{AssetState, AssetSymbol, RiskLevel};

/// Lowest price the model will ever produce.
pub const MIN_PRICE: f64 = 0.1;

/// Starting price of the first seeded asset.
const SEED_BASE_PRICE: f64 = 1000.0;

/// Price step between consecutive seeded assets, relative to the base.
const SEED_PRICE_STEP: f64 = 0.3;

/// Upper bound (exclusive) of the seeded display-only 24h change.
const SEED_MAX_CHANGE_24H: f64 = 4.0;

/// Next price given the current one, a volatility and a uniform draw in `[0, 1)`.
pub fn next_price(current: f64, volatility: f64, draw: f64) -> f64 {
    let drift = (draw - 0.5) * volatility * 2.0;
    let shock = current * drift;
    round_price((current + shock).max(MIN_PRICE))
}

/// Advance one asset by a single tick.
pub fn advance(asset: &mut AssetState, risk: RiskLevel, rng: &mut dyn RandomSource) {
    let next = next_price(asset.price, risk.volatility(), rng.next_unit());
    asset.record_price(next);
}

/// Initial market for a session: asset `i` starts at `1000 * (1 + 0.3 i)`.
pub fn seed_assets(symbols: &[AssetSymbol], rng: &mut dyn RandomSource) -> Vec<AssetState> {
    symbols
        .iter()
        .enumerate()
        .map(|(idx, symbol)| {
            let price = SEED_BASE_PRICE * (1.0 + idx as f64 * SEED_PRICE_STEP);
            AssetState::new(*symbol, round_price(price))
                .with_change_24h(rng.uniform(0.0, SEED_MAX_CHANGE_24H))
        })
        .collect()
}
