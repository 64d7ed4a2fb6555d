// Framework bootstrap for the game server runtime.

use crate::domain::World;
use crate::frameworks::config::{self, ConfigError, GameSettings};
use crate::interface_adapters::net::handle_connection;
use crate::interface_adapters::protocol::encode_snapshot;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::ShipIdAllocator;
use crate::use_cases::{Game, GameEvent, world_task};

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{Notify, mpsc};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
}

const DEFAULT_LOG_FILTER: &str = "warn,spacewars_server=info";

fn init_runtime() {
    let _ = dotenvy::dotenv();

    // Without RUST_LOG, this crate logs at info and dependencies only warn.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves connections on `listener` until the process exits.
pub async fn run(listener: TcpListener, settings: GameSettings) -> Result<(), ServerError> {
    let address = listener.local_addr()?;
    let state = build_state(&settings);

    tracing::info!(
        %address,
        world_size = settings.universe_size,
        ms_per_frame = settings.ms_per_frame,
        boss = settings.boss.enabled,
        "listening"
    );

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    tracing::debug!(%peer, error = %e, "failed to set TCP_NODELAY");
                }
                tokio::spawn(handle_connection(stream, peer, state.clone()));
            }
            Err(e) => {
                // Accept errors are per-connection (e.g. fd exhaustion); keep serving.
                tracing::warn!(error = %e, "accept failed");
            }
        }
    }
}

pub async fn run_with_config() -> Result<(), ServerError> {
    init_runtime();

    let settings_path = config::settings_path();
    let settings = GameSettings::load(&settings_path).inspect_err(|e| {
        tracing::error!(path = %settings_path.display(), error = %e, "failed to load settings");
    })?;

    let address = config::bind_addr();

    // Bind TCP listener with error handling
    let listener = TcpListener::bind(address.as_str()).await.inspect_err(|e| {
        tracing::error!(%address, error = %e, "failed to bind");
    })?;

    run(listener, settings).await
}

fn build_state(settings: &GameSettings) -> Arc<AppState> {
    let mut world = World::new(settings.world_tuning());
    for star in settings.star_placements() {
        let star_id = world.spawn_star(star.loc, star.mass);
        tracing::debug!(star_id, x = star.loc.x, y = star.loc.y, mass = star.mass, "star placed");
    }

    // input_tx/rx: every connection feeds the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);

    // The world task runs for the lifetime of the server; nothing signals shutdown yet.
    let shutdown = Arc::new(Notify::new());
    tokio::spawn(world_task(
        input_rx,
        Game::new(world, encode_snapshot),
        settings.tick_interval(),
        shutdown,
    ));

    Arc::new(AppState {
        input_tx,
        ship_ids: ShipIdAllocator::new(),
        world_size: settings.universe_size,
    })
}
