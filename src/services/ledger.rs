//! Portfolio accounting: cash, weighted-average cost and total value.

use std::fmt;

use crate::services::precision::round_amount;
use crate::types::{AssetState, AssetSymbol, Portfolio, Position};

/// Result of a successful ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub amount: f64,
    pub price: f64,
    /// Realized P&L, zero for buys
    pub realized_pnl: f64,
}

/// Why a trade was not booked. These are business-rule outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    ZeroAmount,
    UnknownAsset(AssetSymbol),
    InsufficientCash { required: f64, available: f64 },
    InsufficientHoldings { requested: f64, held: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ZeroAmount => write!(f, "zero amount"),
            Rejection::UnknownAsset(symbol) => write!(f, "{} is not in this portfolio", symbol),
            Rejection::InsufficientCash { required, available } => {
                write!(f, "needs {:.2} cash, has {:.2}", required, available)
            }
            Rejection::InsufficientHoldings { requested, held } => {
                write!(f, "sell of {} exceeds holdings of {}", requested, held)
            }
        }
    }
}

impl Portfolio {
    /// Buy `amount` units (rounded to six decimals) at `price`. Leaves the portfolio untouched when rejected.
    pub fn apply_buy(&mut self, symbol: AssetSymbol, amount: f64, price: f64) -> Result<Fill, Rejection> {
        let amount = round_amount(amount);
        if amount <= 0.0 {
            return Err(Rejection::ZeroAmount);
        }

        let required = amount * price;
        if self.cash < required {
            return Err(Rejection::InsufficientCash {
                required,
                available: self.cash,
            });
        }

        let position = self
            .positions
            .get_mut(&symbol)
            .ok_or(Rejection::UnknownAsset(symbol))?;

        let total_cost = position.amount * position.avg_price + amount * price;
        let new_amount = position.amount + amount;
        position.avg_price = total_cost / new_amount;
        position.amount = round_amount(new_amount);
        self.cash -= required;

        Ok(Fill {
            amount,
            price,
            realized_pnl: 0.0,
        })
    }

    /// Sell `amount` units (rounded to six decimals) at `price`. Leaves the portfolio untouched when rejected.
    pub fn apply_sell(&mut self, symbol: AssetSymbol, amount: f64, price: f64) -> Result<Fill, Rejection> {
        let amount = round_amount(amount);
        if amount <= 0.0 {
            return Err(Rejection::ZeroAmount);
        }

        let position = self
            .positions
            .get_mut(&symbol)
            .ok_or(Rejection::UnknownAsset(symbol))?;

        if position.amount < amount {
            return Err(Rejection::InsufficientHoldings {
                requested: amount,
                held: position.amount,
            });
        }

        position.amount = round_amount(position.amount - amount);
        let realized_pnl = (price - position.avg_price) * amount;
        if position.amount == 0.0 {
            position.avg_price = 0.0;
        }
        self.cash += amount * price;

        Ok(Fill {
            amount,
            price,
            realized_pnl,
        })
    }

    /// Recompute total value from cash and current prices, floored at zero.
    pub fn revalue(&mut self, assets: &[AssetState]) -> f64 {
        let positions_value: f64 = assets
            .iter()
            .map(|a| self.position(a.symbol).amount * a.price)
            .sum();
        self.value = (self.cash + positions_value).max(0.0);
        self.value
    }

    /// Back to all cash at `budget`, with every position emptied.
    pub fn reset(&mut self, budget: f64) {
        self.cash = budget;
        self.value = budget;
        self.daily_pnl = 0.0;
        for position in self.positions.values_mut() {
            *position = Position::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc_portfolio(cash: f64) -> Portfolio {
        Portfolio::new(cash, &[AssetSymbol::Btc])
    }

    #[test]
    fn test_buy_updates_cash_and_average_cost() {
        let mut portfolio = btc_portfolio(1000.0);

        let fill = portfolio.apply_buy(AssetSymbol::Btc, 1.0, 1000.0).unwrap();

        assert_eq!(fill.realized_pnl, 0.0);
        assert_eq!(portfolio.cash, 0.0);
        assert_eq!(
            portfolio.position(AssetSymbol::Btc),
            Position {
                amount: 1.0,
                avg_price: 1000.0
            }
        );
    }

    #[test]
    fn test_buy_weights_average_cost() {
        let mut portfolio = btc_portfolio(10_000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 2.0, 100.0).unwrap();
        portfolio.apply_buy(AssetSymbol::Btc, 1.0, 400.0).unwrap();

        let position = portfolio.position(AssetSymbol::Btc);
        let expected = (2.0 * 100.0 + 1.0 * 400.0) / 3.0;
        assert!((position.avg_price - expected).abs() < 1e-9);
        assert_eq!(position.amount, 3.0);
        assert_eq!(portfolio.cash, 9_400.0);
    }

    #[test]
    fn test_buy_rejected_without_cash() {
        let mut portfolio = btc_portfolio(100.0);
        let before = portfolio.clone();

        let result = portfolio.apply_buy(AssetSymbol::Btc, 1.0, 100.01);

        assert!(matches!(result, Err(Rejection::InsufficientCash { .. })));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn test_sell_rejected_beyond_holdings() {
        let mut portfolio = btc_portfolio(1000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 0.5, 1000.0).unwrap();
        let before = portfolio.clone();

        let result = portfolio.apply_sell(AssetSymbol::Btc, 0.6, 1000.0);

        assert!(matches!(result, Err(Rejection::InsufficientHoldings { .. })));
        assert_eq!(portfolio, before);
    }

    #[test]
    fn test_sell_realizes_pnl_and_resets_cost_when_flat() {
        let mut portfolio = btc_portfolio(1000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 1.0, 1000.0).unwrap();

        let fill = portfolio.apply_sell(AssetSymbol::Btc, 1.0, 1200.0).unwrap();

        assert_eq!(fill.realized_pnl, 200.0);
        assert_eq!(portfolio.cash, 1200.0);
        assert_eq!(portfolio.position(AssetSymbol::Btc), Position::default());
    }

    #[test]
    fn test_partial_sell_keeps_average_cost() {
        let mut portfolio = btc_portfolio(1000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 0.3, 1000.0).unwrap();
        portfolio.apply_sell(AssetSymbol::Btc, 0.1, 900.0).unwrap();

        let position = portfolio.position(AssetSymbol::Btc);
        assert_eq!(position.amount, 0.2);
        assert_eq!(position.avg_price, 1000.0);
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let mut portfolio = btc_portfolio(1000.0);

        assert_eq!(
            portfolio.apply_buy(AssetSymbol::Btc, 0.0, 1000.0),
            Err(Rejection::ZeroAmount)
        );
        assert_eq!(
            portfolio.apply_sell(AssetSymbol::Btc, 0.0, 1000.0),
            Err(Rejection::ZeroAmount)
        );
    }

    #[test]
    fn test_sub_precision_amount_is_rejected() {
        let mut portfolio = btc_portfolio(1000.0);
        let before = portfolio.clone();

        assert_eq!(
            portfolio.apply_buy(AssetSymbol::Btc, 0.0000004, 1000.0),
            Err(Rejection::ZeroAmount)
        );
        assert_eq!(portfolio, before);
    }

    #[test]
    fn test_fill_books_rounded_amount() {
        let mut portfolio = btc_portfolio(1000.0);

        let fill = portfolio.apply_buy(AssetSymbol::Btc, 0.1234567, 1000.0).unwrap();

        assert_eq!(fill.amount, 0.123457);
        assert_eq!(portfolio.position(AssetSymbol::Btc).amount, 0.123457);
        assert!((portfolio.cash - (1000.0 - 0.123457 * 1000.0)).abs() < 1e-9);

        let sell = portfolio.apply_sell(AssetSymbol::Btc, 0.1234572, 1000.0).unwrap();
        assert_eq!(sell.amount, 0.123457);
        assert_eq!(portfolio.position(AssetSymbol::Btc), Position::default());
    }

    #[test]
    fn test_unknown_asset_is_rejected() {
        let mut portfolio = btc_portfolio(1000.0);

        assert_eq!(
            portfolio.apply_buy(AssetSymbol::Eth, 0.1, 10.0),
            Err(Rejection::UnknownAsset(AssetSymbol::Eth))
        );
        assert_eq!(portfolio.cash, 1000.0);
    }

    #[test]
    fn test_revalue_marks_positions_to_market() {
        let mut portfolio = btc_portfolio(1000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 0.5, 1000.0).unwrap();

        let assets = vec![AssetState::new(AssetSymbol::Btc, 1100.0)];
        let value = portfolio.revalue(&assets);

        assert_eq!(value, 500.0 + 0.5 * 1100.0);
        assert_eq!(portfolio.value, value);
    }

    #[test]
    fn test_reset_restores_budget() {
        let mut portfolio = btc_portfolio(1000.0);
        portfolio.apply_buy(AssetSymbol::Btc, 0.5, 1000.0).unwrap();

        portfolio.reset(1000.0);

        assert_eq!(portfolio.cash, 1000.0);
        assert_eq!(portfolio.value, 1000.0);
        assert_eq!(portfolio.position(AssetSymbol::Btc), Position::default());
    }
}
