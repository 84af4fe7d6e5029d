use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::services::paperbot::EngineTiming;
use crate::types::{AssetSymbol, BotConfig, RiskLevel, UserCategory};

/// How the binary renders each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    /// One log line with value, prices and signals, plus the recent trades.
    #[default]
    Summary,
    /// The full snapshot as a JSON document.
    Json,
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown snapshot format '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Starting cash.
    pub budget: f64,
    pub category: UserCategory,
    pub risk: RiskLevel,
    /// Traded symbols, in display order.
    pub assets: Vec<AssetSymbol>,
    /// Time between ticks (ms).
    pub tick_interval_ms: u64,
    /// Lifetime of an advisory signal (ms).
    pub signal_ttl_ms: u64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    /// Stop the demo after this many ticks.
    pub run_ticks: Option<u64>,
    pub snapshot_format: SnapshotFormat,
    /// Recent trades shown per summary.
    pub log_tail: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Unset keys take their defaults;
    /// unparseable ones are logged and take their defaults too.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = BotConfig::default();

        let assets = lookup("BOT_ASSETS")
            .map(|raw| parse_assets(&raw))
            .filter(|assets| !assets.is_empty())
            .unwrap_or(defaults.assets);

        Self {
            budget: parse_or(&lookup, "BOT_BUDGET", defaults.budget),
            category: parse_or(&lookup, "BOT_CATEGORY", defaults.category),
            risk: parse_or(&lookup, "BOT_RISK", defaults.risk),
            assets,
            tick_interval_ms: parse_or(&lookup, "TICK_INTERVAL_MS", 1500),
            signal_ttl_ms: parse_or(&lookup, "SIGNAL_TTL_MS", 1800),
            seed: parse_optional(&lookup, "SIM_SEED"),
            run_ticks: parse_optional(&lookup, "RUN_TICKS"),
            snapshot_format: parse_or(&lookup, "SNAPSHOT_FORMAT", SnapshotFormat::default()),
            log_tail: parse_or(&lookup, "LOG_TAIL", 8),
        }
    }

    /// The engine's input contract. Not validated here; `Simulation::new` does that.
    pub fn bot_config(&self) -> BotConfig {
        BotConfig::new(self.budget, self.category, self.risk, self.assets.clone())
    }

    pub fn timing(&self) -> EngineTiming {
        EngineTiming {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            signal_ttl: Duration::from_millis(self.signal_ttl_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    parse_optional(lookup, key).unwrap_or(default)
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

fn parse_assets(raw: &str) -> Vec<AssetSymbol> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                warn!("Ignoring asset in BOT_ASSETS: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.budget, 1000.0);
        assert_eq!(config.category, UserCategory::Beginner);
        assert_eq!(config.risk, RiskLevel::Low);
        assert_eq!(config.assets, AssetSymbol::ALL.to_vec());
        assert_eq!(config.tick_interval_ms, 1500);
        assert_eq!(config.signal_ttl_ms, 1800);
        assert_eq!(config.seed, None);
        assert_eq!(config.run_ticks, None);
        assert_eq!(config.snapshot_format, SnapshotFormat::Summary);
        assert_eq!(config.log_tail, 8);
        assert_eq!(config.timing(), EngineTiming::default());
    }

    #[test]
    fn test_config_from_vars() {
        let config = config_from(&[
            ("BOT_BUDGET", "2500"),
            ("BOT_CATEGORY", "pro"),
            ("BOT_RISK", "High"),
            ("BOT_ASSETS", "sol, btc"),
            ("TICK_INTERVAL_MS", "250"),
            ("SIM_SEED", "42"),
            ("RUN_TICKS", "20"),
            ("SNAPSHOT_FORMAT", "json"),
        ]);

        assert_eq!(config.budget, 2500.0);
        assert_eq!(config.category, UserCategory::Pro);
        assert_eq!(config.risk, RiskLevel::High);
        assert_eq!(config.assets, vec![AssetSymbol::Sol, AssetSymbol::Btc]);
        assert_eq!(config.timing().tick_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.run_ticks, Some(20));
        assert_eq!(config.snapshot_format, SnapshotFormat::Json);

        let bot = config.bot_config();
        assert_eq!(bot.budget, 2500.0);
        assert!(bot.validate().is_ok());
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_from(&[
            ("BOT_BUDGET", "lots"),
            ("BOT_RISK", "extreme"),
            ("BOT_ASSETS", "DOGE"),
            ("SIM_SEED", "-1"),
            ("SNAPSHOT_FORMAT", "xml"),
        ]);

        assert_eq!(config.budget, 1000.0);
        assert_eq!(config.risk, RiskLevel::Low);
        assert_eq!(config.assets, AssetSymbol::ALL.to_vec());
        assert_eq!(config.seed, None);
        assert_eq!(config.snapshot_format, SnapshotFormat::Summary);
    }

    #[test]
    fn test_semantic_errors_left_to_validation() {
        let config = config_from(&[("BOT_BUDGET", "-5"), ("BOT_ASSETS", "BTC,BTC")]);

        assert_eq!(config.budget, -5.0);
        assert_eq!(config.assets, vec![AssetSymbol::Btc, AssetSymbol::Btc]);
        assert!(config.bot_config().validate().is_err());
    }
}
