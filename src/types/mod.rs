pub mod asset;
pub mod bot;
pub mod engine;
pub mod signal;
pub mod trading;

pub use asset::*;
pub use bot::*;
pub use engine::*;
pub use signal::*;
pub use trading::*;
