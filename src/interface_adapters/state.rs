use crate::interface_adapters::utils::ids::ShipIdAllocator;
use crate::use_cases::GameEvent;
use tokio::sync::mpsc;

pub struct AppState {
    // Events flowing from connections into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Ship ids for completed handshakes.
    pub ship_ids: ShipIdAllocator,
    // Sent to clients in the handshake reply.
    pub world_size: u32,
}
