// Use-case level inputs/outputs for the game loop.

use crate::domain::{CommandSet, Projectile, Ship, ShipId, Star};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-session queue of serialized frames, drained by the connection task.
pub type Outbound = mpsc::Sender<Arc<str>>;

/// Renders one tick's broadcast into the wire text sent to every session.
pub type FrameEncoder = fn(&WorldSnapshot) -> String;

#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Handshake finished: spawn the ship and start sending it frames.
    Join {
        ship_id: ShipId,
        name: String,
        outbound: Outbound,
    },
    /// Replaces the ship's queued commands.
    Commands {
        ship_id: ShipId,
        commands: CommandSet,
    },
    /// The connection is gone; the session is reaped at the end of the next tick.
    Leave { ship_id: ShipId },
}

/// Records broadcast at the end of a tick, in wire order.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub ships: Vec<Ship>,
    pub projectiles: Vec<Projectile>,
    pub stars: Vec<Star>,
}
