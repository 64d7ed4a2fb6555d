// Gameplay tuning consumed by the World. Loaded from the settings file at startup.

use super::vector::Vector2;

/// Per-ship physical constants applied on every spawn and respawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipTuning {
    /// Velocity added per thrust command (distance per frame squared).
    pub accel_rate: f64,
    /// Degrees rotated per turn command.
    pub turn_rate: f64,
    pub max_hp: i32,
    /// Collision radius against projectiles.
    pub size: f64,
    /// Frames between shots.
    pub fire_delay: u32,
    /// Frames spent dead before respawning.
    pub respawn_delay: u32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            accel_rate: 0.08,
            turn_rate: 2.0,
            max_hp: 5,
            size: 20.0,
            fire_delay: 6,
            respawn_delay: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarTuning {
    /// Collision radius against ships and projectiles.
    pub size: f64,
    pub respawn_delay: u32,
}

impl Default for StarTuning {
    fn default() -> Self {
        Self {
            size: 35.0,
            respawn_delay: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossTuning {
    pub enabled: bool,
    /// Health every star spawns and respawns with.
    pub max_hp: i32,
    /// Ticks between boss volleys (the pattern's `k`).
    pub fire_delay: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            max_hp: 100,
            fire_delay: 2,
        }
    }
}

/// Initial star placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPlacement {
    pub loc: Vector2,
    pub mass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldTuning {
    /// Edge length of the square world centered on the origin.
    pub world_size: u32,
    /// Distance per frame travelled by ship-fired projectiles.
    pub projectile_speed: f64,
    pub ship: ShipTuning,
    pub star: StarTuning,
    pub boss: BossTuning,
}

impl WorldTuning {
    /// Half the world edge, using integer division like the bounds checks expect.
    pub fn half_extent(&self) -> f64 {
        f64::from(self.world_size / 2)
    }
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            world_size: 750,
            projectile_speed: 15.0,
            ship: ShipTuning::default(),
            star: StarTuning::default(),
            boss: BossTuning::default(),
        }
    }
}
