//! Snapshot consumers

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::EngineState;

/// Receives every snapshot the engine emits. Called synchronously from the engine task.
pub trait Subscriber: Send + 'static {
    fn on_update(&mut self, state: EngineState);
}

impl<F> Subscriber for F
where
    F: FnMut(EngineState) + Send + 'static,
{
    fn on_update(&mut self, state: EngineState) {
        self(state)
    }
}

/// Forwards snapshots to another task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    sender: mpsc::UnboundedSender<EngineState>,
}

impl ChannelSubscriber {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineState>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_update(&mut self, state: EngineState) {
        if self.sender.send(state).is_err() {
            debug!("Snapshot receiver dropped; discarding update");
        }
    }
}
