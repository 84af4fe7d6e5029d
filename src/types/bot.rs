//! Bot configuration supplied by the onboarding flow

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::AssetSymbol;
use crate::error::{AppError, Result};

/// Experience level chosen by the user; scales trade frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserCategory {
    /// Lower frequency trades, conservative
    Beginner,
    /// Balanced trading
    Intermediate,
    /// Aggressive, higher frequency
    Pro,
}

impl UserCategory {
    /// Multiplier applied to the trade gate.
    pub fn trade_factor(&self) -> f64 {
        match self {
            UserCategory::Beginner => 0.6,
            UserCategory::Intermediate => 1.0,
            UserCategory::Pro => 1.3,
        }
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserCategory::Beginner => write!(f, "Beginner"),
            UserCategory::Intermediate => write!(f, "Intermediate"),
            UserCategory::Pro => write!(f, "Pro"),
        }
    }
}

impl std::str::FromStr for UserCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "pro" => Ok(Self::Pro),
            other => Err(format!("Unknown user category: {}", other)),
        }
    }
}

/// Risk tier; drives both price volatility and trade frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Relative per-tick volatility used by the price model.
    pub fn volatility(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.003,
            RiskLevel::Medium => 0.007,
            RiskLevel::High => 0.015,
        }
    }

    /// Multiplier applied to the trade gate.
    pub fn trade_factor(&self) -> f64 {
        match self {
            RiskLevel::Low => 0.5,
            RiskLevel::Medium => 0.9,
            RiskLevel::High => 1.4,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

/// Configuration for a simulated trading bot. Immutable for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Starting cash in USD
    pub budget: f64,

    /// User experience category
    pub category: UserCategory,

    /// Risk tier
    pub risk: RiskLevel,

    /// Symbols traded this session, in display order
    pub assets: Vec<AssetSymbol>,
}

impl BotConfig {
    pub fn new(budget: f64, category: UserCategory, risk: RiskLevel, assets: Vec<AssetSymbol>) -> Self {
        Self {
            budget,
            category,
            risk,
            assets,
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "budget must be a positive number, got {}",
                self.budget
            )));
        }

        if self.assets.is_empty() {
            return Err(AppError::InvalidConfig(
                "at least one asset must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for symbol in &self.assets {
            if !seen.insert(symbol) {
                return Err(AppError::InvalidConfig(format!(
                    "asset {} is configured more than once",
                    symbol
                )));
            }
        }

        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            budget: 1000.0,
            category: UserCategory::Beginner,
            risk: RiskLevel::Low,
            assets: AssetSymbol::ALL.to_vec(),
        }
    }
}
