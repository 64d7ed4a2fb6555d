// Projectiles fired by ships or, in boss mode, by stars.

use super::ship::ShipId;
use super::vector::Vector2;

pub type ProjectileId = u32;

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Ship(ShipId),
    /// Star-fired; exempt from ship ownership rules and never credited.
    Environment,
}

impl Owner {
    pub fn ship_id(self) -> Option<ShipId> {
        match self {
            Owner::Ship(id) => Some(id),
            Owner::Environment => None,
        }
    }

    pub fn is_environment(self) -> bool {
        matches!(self, Owner::Environment)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub loc: Vector2,
    /// Direction captured at spawn. Motion uses `velocity`.
    pub dir: Vector2,
    pub alive: bool,
    pub owner: Owner,
    pub velocity: Vector2,
}

impl Projectile {
    pub fn new(id: ProjectileId, loc: Vector2, dir: Vector2, owner: Owner) -> Self {
        Self {
            id,
            loc,
            dir,
            alive: true,
            owner,
            velocity: Vector2::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn advance(&mut self) {
        self.loc += self.velocity;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}
