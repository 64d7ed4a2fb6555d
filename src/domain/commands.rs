// Player intent queued on a ship between ticks.

use std::fmt;

/// Canonical set of recognized intent symbols.
///
/// Repetition and ordering in the client's message do not matter; the ship applies
/// the set in the fixed order L, R, F, T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandSet {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub thrust: bool,
}

impl CommandSet {
    pub const EMPTY: CommandSet = CommandSet {
        left: false,
        right: false,
        fire: false,
        thrust: false,
    };

    /// Keeps the recognized symbols (`L`, `R`, `T`, `F`) and drops everything else.
    pub fn from_symbols(symbols: &str) -> Self {
        let mut set = CommandSet::EMPTY;
        for c in symbols.chars() {
            match c {
                'L' => set.left = true,
                'R' => set.right = true,
                'F' => set.fire = true,
                'T' => set.thrust = true,
                _ => {}
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        *self == CommandSet::EMPTY
    }
}

impl fmt::Display for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, symbol) in [
            (self.left, "L"),
            (self.right, "R"),
            (self.fire, "F"),
            (self.thrust, "T"),
        ] {
            if on {
                f.write_str(symbol)?;
            }
        }
        Ok(())
    }
}
