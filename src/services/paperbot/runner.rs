//! Bot Runner Service
//!
//! Drives a [`Simulation`] on a single tokio task: fires ticks on a fixed interval,
//! expires signals on their own one-shot deadlines and handles start/pause/stop
//! commands. Because all of it runs inside one `select!` loop, no two of these ever
//! touch the state at the same time.

use std::future::pending;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::types::EngineState;

use super::signals::ExpirySchedule;
use super::simulation::Simulation;
use super::subscriber::Subscriber;

/// Default time between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1500);

/// Default lifetime of an advisory signal.
pub const DEFAULT_SIGNAL_TTL: Duration = Duration::from_millis(1800);

/// Shortest tick interval the runner will schedule.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Scheduler timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTiming {
    pub tick_interval: Duration,
    pub signal_ttl: Duration,
}

impl EngineTiming {
    /// Copy with the tick interval raised to at least [`MIN_TICK_INTERVAL`].
    pub fn clamped(self) -> Self {
        if self.tick_interval >= MIN_TICK_INTERVAL {
            return self;
        }

        warn!(
            "Tick interval {:?} is too short, using {:?}",
            self.tick_interval, MIN_TICK_INTERVAL
        );
        Self {
            tick_interval: MIN_TICK_INTERVAL,
            ..self
        }
    }
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            signal_ttl: DEFAULT_SIGNAL_TTL,
        }
    }
}

#[derive(Debug)]
enum EngineCommand {
    Start,
    Pause,
    Stop,
    Snapshot(oneshot::Sender<EngineState>),
    Shutdown,
}

/// Cloneable control surface for a running engine task.
///
/// When the last handle is dropped the engine performs a final stop and exits.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    /// Begin ticking. No-op when already running.
    pub fn start(&self) -> Result<()> {
        self.send(EngineCommand::Start)
    }

    /// Halt ticking, keeping all state.
    pub fn pause(&self) -> Result<()> {
        self.send(EngineCommand::Pause)
    }

    /// Halt ticking and reset the session to the initial budget.
    pub fn stop(&self) -> Result<()> {
        self.send(EngineCommand::Stop)
    }

    /// Stop and end the engine task.
    pub fn shutdown(&self) -> Result<()> {
        self.send(EngineCommand::Shutdown)
    }

    /// Current state, without waiting for the next emission.
    pub async fn snapshot(&self) -> Result<EngineState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot(reply_tx))?;
        reply_rx.await.map_err(|_| AppError::EngineClosed)
    }

    fn send(&self, command: EngineCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| AppError::EngineClosed)
    }
}

/// Owns the simulation and its subscriber for the lifetime of a session.
pub struct BotRunner<S: Subscriber> {
    simulation: Simulation,
    subscriber: S,
    timing: EngineTiming,
    /// Present only while running
    ticker: Option<Interval>,
    expiries: ExpirySchedule,
    commands: mpsc::UnboundedReceiver<EngineCommand>,
}

impl<S: Subscriber> BotRunner<S> {
    /// Create a runner and the handle that controls it. Nothing runs until [`BotRunner::run`].
    pub fn new(simulation: Simulation, timing: EngineTiming, subscriber: S) -> (Self, EngineHandle) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let timing = timing.clamped();

        let runner = Self {
            simulation,
            subscriber,
            timing,
            ticker: None,
            expiries: ExpirySchedule::new(timing.signal_ttl),
            commands: commands_rx,
        };

        (runner, EngineHandle { commands: commands_tx })
    }

    /// Create a runner and spawn it on the current tokio runtime.
    pub fn spawn(simulation: Simulation, timing: EngineTiming, subscriber: S) -> (EngineHandle, JoinHandle<()>) {
        let (runner, handle) = Self::new(simulation, timing, subscriber);
        let task = tokio::spawn(runner.run());
        (handle, task)
    }

    /// Process commands, ticks and signal expiries until shut down.
    pub async fn run(mut self) {
        info!(
            "Engine ready: budget {:.2}, {} / {} risk, assets {:?}",
            self.simulation.config().budget,
            self.simulation.config().category,
            self.simulation.config().risk,
            self.simulation.config().assets
        );

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(EngineCommand::Start) => self.start(),
                    Some(EngineCommand::Pause) => self.pause(),
                    Some(EngineCommand::Stop) => self.stop(),
                    Some(EngineCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.simulation.snapshot());
                    }
                    Some(EngineCommand::Shutdown) | None => {
                        self.stop();
                        break;
                    }
                },
                _ = next_tick(&mut self.ticker) => self.on_tick(),
                _ = wait_until(self.expiries.next_deadline()) => self.on_signal_expiry(),
            }
        }

        info!("Engine shut down after {} ticks", self.simulation.state().tick);
    }

    fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        self.simulation.set_running(true);
        info!("Engine started (tick every {:?})", self.timing.tick_interval);
        self.emit();

        let period = self.timing.tick_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn pause(&mut self) {
        if self.ticker.take().is_some() {
            info!("Engine paused at tick {}", self.simulation.state().tick);
        }
        self.simulation.set_running(false);
    }

    fn stop(&mut self) {
        self.pause();
        self.simulation.reset();
        self.expiries.clear();
        info!("Engine stopped; portfolio reset to {:.2}", self.simulation.config().budget);
        self.emit();
    }

    fn on_tick(&mut self) {
        let report = self.simulation.tick();
        if report.signal.is_some() {
            self.expiries.schedule(Instant::now());
        }

        let state = self.simulation.state();
        debug!(
            "Tick {}: value {:.2}, cash {:.2}, trade {}",
            report.tick,
            state.portfolio.value,
            state.portfolio.cash,
            report
                .trade
                .as_ref()
                .map(|t| format!("{} {} {}", t.side, t.amount, t.asset))
                .unwrap_or_else(|| "none".to_string())
        );

        self.emit();
    }

    fn on_signal_expiry(&mut self) {
        self.expiries.pop_next();
        if let Some(signal) = self.simulation.expire_signal() {
            debug!("Signal expired: {}", signal);
        }
        self.emit();
    }

    fn emit(&mut self) {
        self.subscriber.on_update(self.simulation.snapshot());
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending::<()>().await,
    }
}
