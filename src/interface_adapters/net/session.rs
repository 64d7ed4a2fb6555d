// Per-connection handshake state machine: one transition per received line.

use crate::domain::{CommandSet, ShipId};
use crate::interface_adapters::protocol::{encode_handshake, parse_command_line};
use crate::interface_adapters::utils::ids::ShipIdAllocator;

/// Display names are cut to this many characters.
pub const MAX_NAME_CHARS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingName,
    Playing { ship_id: ShipId },
}

/// What the connection should do with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// Spawn the ship, then write `reply` to the client.
    Join {
        ship_id: ShipId,
        name: String,
        reply: String,
    },
    Commands {
        ship_id: ShipId,
        commands: CommandSet,
    },
    /// A gameplay line that is not a command; dropped.
    Ignored,
}

impl SessionPhase {
    pub fn ship_id(&self) -> Option<ShipId> {
        match self {
            SessionPhase::AwaitingName => None,
            SessionPhase::Playing { ship_id } => Some(*ship_id),
        }
    }

    pub fn on_line(&mut self, line: &str, ids: &ShipIdAllocator, world_size: u32) -> LineAction {
        match *self {
            SessionPhase::AwaitingName => {
                let ship_id = ids.next_id();
                let name: String = line.chars().take(MAX_NAME_CHARS).collect();
                *self = SessionPhase::Playing { ship_id };
                LineAction::Join {
                    ship_id,
                    name,
                    reply: encode_handshake(ship_id, world_size),
                }
            }
            SessionPhase::Playing { ship_id } => match parse_command_line(line) {
                Some(commands) => LineAction::Commands { ship_id, commands },
                None => LineAction::Ignored,
            },
        }
    }
}
