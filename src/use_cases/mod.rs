// Use cases layer: application workflows for the game server.

pub mod game;
pub mod sessions;
pub mod types;

pub use game::{Game, world_task};
pub use sessions::{Session, SessionTable};
pub use types::{FrameEncoder, GameEvent, Outbound, WorldSnapshot};
