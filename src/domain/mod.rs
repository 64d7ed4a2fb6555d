// Domain layer: entities, physics and the authoritative world.

pub mod commands;
pub mod projectile;
pub mod ship;
pub mod star;
pub mod systems;
pub mod timer;
pub mod tuning;
pub mod vector;
pub mod world;

pub use commands::CommandSet;
pub use projectile::{Owner, Projectile, ProjectileId};
pub use ship::{Ship, ShipId};
pub use star::{Star, StarId};
pub use tuning::{BossTuning, ShipTuning, StarPlacement, StarTuning, WorldTuning};
pub use vector::Vector2;
pub use world::World;
