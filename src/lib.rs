//! Paperdash - simulation engine behind a mock crypto trading dashboard
//!
//! A paper-trading bot runs against a random-walk market: prices move every tick, the
//! bot occasionally buys or sells from a cash portfolio and raises short-lived advisory
//! signals, and each change is pushed to a subscriber as a full [`types::EngineState`].

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::paperbot::{BotRunner, ChannelSubscriber, EngineHandle, EngineTiming, Simulation, Subscriber};
