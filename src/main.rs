use paperdash::config::{Config, SnapshotFormat};
use paperdash::services::random::{RandomSource, SeededRandom};
use paperdash::types::EngineState;
use paperdash::{BotRunner, ChannelSubscriber, Simulation};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperdash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting paper bot: budget {:.2}, {} / {} risk, assets {:?}",
        config.budget, config.category, config.risk, config.assets
    );

    let rng: Box<dyn RandomSource> = match config.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            Box::new(SeededRandom::from_seed(seed))
        }
        None => Box::new(SeededRandom::from_entropy()),
    };

    let simulation = Simulation::seeded(config.bot_config(), rng)?;
    let (subscriber, mut updates) = ChannelSubscriber::new();
    let (handle, engine_task) = BotRunner::spawn(simulation, config.timing(), subscriber);

    handle.start()?;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(state) = update else { break };
                render(&config, &state);

                if config.run_ticks.is_some_and(|limit| state.tick >= limit) {
                    info!("Reached {} ticks, stopping", state.tick);
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    handle.stop()?;
    handle.shutdown()?;
    engine_task.await?;

    // Drain the final reset snapshot
    while let Ok(state) = updates.try_recv() {
        render(&config, &state);
    }

    Ok(())
}

fn render(config: &Config, state: &EngineState) {
    match config.snapshot_format {
        SnapshotFormat::Json => match state.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize snapshot: {}", e),
        },
        SnapshotFormat::Summary => {
            let prices = state
                .assets
                .iter()
                .map(|a| format!("{} {:.2}", a.symbol, a.price))
                .collect::<Vec<_>>()
                .join(" | ");
            let signals = state.signals.iter().collect::<Vec<_>>().join(", ");

            info!(
                "[tick {}{}] value {:.2} cash {:.2} | {} | signals [{}]",
                state.tick,
                if state.running { "" } else { ", idle" },
                state.portfolio.value,
                state.portfolio.cash,
                prices,
                signals
            );

            for trade in state.recent_trades(config.log_tail) {
                info!(
                    "  {} {:<4} {:>10.6} {} @ {:.2} pnl {:.2}",
                    trade.time_label(),
                    trade.side,
                    trade.amount,
                    trade.asset,
                    trade.price,
                    trade.pnl
                );
            }
        }
    }
}
