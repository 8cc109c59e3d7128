use anyhow::Context;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use redlight::game::{Game, GameConfig};
use redlight::session::SessionPhase;

/// Fixed simulation step, 60 Hz.
const TICK: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    // Setup tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("Could not set global default")?;

    let mut game = Game::new(GameConfig::default()).context("Could not initialize game")?;
    game.start().context("Could not start session")?;

    info!("Starting simulation loop ({:.3}ms)", TICK * 1000.0);
    let mut ticks = 0u32;
    while game.phase() != SessionPhase::Ended {
        game.tick(TICK);
        ticks += 1;
    }

    // Let the final sweep and fades settle before reporting.
    for _ in 0..60 {
        game.tick(TICK);
        ticks += 1;
    }

    let tally = game.tally();
    info!(
        ticks,
        countdown = game.session().countdown,
        dancing = tally.dance,
        dead = tally.dead,
        idle = tally.idle,
        "Session over"
    );
    Ok(())
}
