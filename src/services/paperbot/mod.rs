//! PaperBot Simulation Engine
//!
//! A single simulated trading bot: a synchronous [`Simulation`] that advances the market
//! one tick at a time, and a [`BotRunner`] that schedules it on tokio and pushes every
//! state change to a [`Subscriber`].

pub mod decision;
pub mod runner;
pub mod signals;
pub mod simulation;
pub mod subscriber;

pub use decision::{TradeDecision, TradeOrder};
pub use runner::{BotRunner, EngineHandle, EngineTiming};
pub use signals::ExpirySchedule;
pub use simulation::{Simulation, TickReport};
pub use subscriber::{ChannelSubscriber, Subscriber};
