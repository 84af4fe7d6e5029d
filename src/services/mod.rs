pub mod ledger;
pub mod paperbot;
pub mod precision;
pub mod price_model;
pub mod random;

pub use ledger::{Fill, Rejection};
pub use paperbot::{BotRunner, ChannelSubscriber, EngineHandle, EngineTiming, Simulation, Subscriber};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
