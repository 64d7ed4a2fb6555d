// Wire protocol DTOs and conversions. Every record is one JSON object per line.
//
// Records carry no type tag: the decoder tells them apart by which fields are
// present (`thrust` for ships, `owner` for projectiles, `mass` for stars) and hands
// back a tagged `WireRecord`.

use crate::domain::{
    CommandSet, Owner, Projectile, ProjectileId, Ship, ShipId, Star, StarId, Vector2,
};
use crate::use_cases::WorldSnapshot;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Owner id sent for star-fired projectiles.
pub const ENVIRONMENT_OWNER_ID: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2Dto {
    pub x: f64,
    pub y: f64,
}

impl From<Vector2> for Vector2Dto {
    fn from(v: Vector2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vector2Dto> for Vector2 {
    fn from(v: Vector2Dto) -> Self {
        Vector2::new(v.x, v.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDto {
    pub ship: ShipId,
    pub loc: Vector2Dto,
    pub dir: Vector2Dto,
    pub thrust: bool,
    pub name: String,
    pub hp: i32,
    pub score: i32,
}

impl From<&Ship> for ShipDto {
    fn from(ship: &Ship) -> Self {
        Self {
            ship: ship.id,
            loc: ship.loc.into(),
            dir: ship.dir.into(),
            thrust: ship.thrust,
            name: ship.name.clone(),
            hp: ship.hp,
            score: ship.score,
        }
    }
}

impl From<ShipDto> for Ship {
    fn from(dto: ShipDto) -> Self {
        let mut ship = Ship::new(
            dto.ship,
            dto.loc.into(),
            dto.dir.into(),
            dto.name,
            dto.hp,
            dto.score,
        );
        ship.thrust = dto.thrust;
        ship
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDto {
    pub proj: ProjectileId,
    pub loc: Vector2Dto,
    pub dir: Vector2Dto,
    pub alive: bool,
    pub owner: u32,
}

impl From<&Projectile> for ProjectileDto {
    fn from(projectile: &Projectile) -> Self {
        Self {
            proj: projectile.id,
            loc: projectile.loc.into(),
            dir: projectile.dir.into(),
            alive: projectile.alive,
            owner: match projectile.owner {
                Owner::Ship(id) => id,
                Owner::Environment => ENVIRONMENT_OWNER_ID,
            },
        }
    }
}

impl From<ProjectileDto> for Projectile {
    fn from(dto: ProjectileDto) -> Self {
        let owner = if dto.owner == ENVIRONMENT_OWNER_ID {
            Owner::Environment
        } else {
            Owner::Ship(dto.owner)
        };
        let mut projectile = Projectile::new(dto.proj, dto.loc.into(), dto.dir.into(), owner);
        projectile.alive = dto.alive;
        projectile
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarDto {
    pub star: StarId,
    pub loc: Vector2Dto,
    pub mass: f64,
}

impl From<&Star> for StarDto {
    fn from(star: &Star) -> Self {
        Self {
            star: star.id,
            loc: star.loc.into(),
            mass: star.mass,
        }
    }
}

impl From<StarDto> for Star {
    fn from(dto: StarDto) -> Self {
        Star::new(dto.star, dto.loc.into(), dto.mass)
    }
}

/// A decoded world record. Variants are tried in order, so each one must require
/// its distinguishing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireRecord {
    Ship(ShipDto),
    Projectile(ProjectileDto),
    Star(StarDto),
}

pub fn decode_record(line: &str) -> Result<WireRecord, serde_json::Error> {
    serde_json::from_str(line.trim_end_matches(['\r', '\n']))
}

/// Reply to a successful name exchange: the assigned id, then the world size.
pub fn encode_handshake(ship_id: ShipId, world_size: u32) -> String {
    format!("{ship_id}\n{world_size}\n")
}

/// Renders a tick as ships, then projectiles, then stars, one record per line.
pub fn encode_snapshot(snapshot: &WorldSnapshot) -> String {
    let mut out = String::new();
    for ship in &snapshot.ships {
        push_record(&mut out, &ShipDto::from(ship));
    }
    for projectile in &snapshot.projectiles {
        push_record(&mut out, &ProjectileDto::from(projectile));
    }
    for star in &snapshot.stars {
        push_record(&mut out, &StarDto::from(star));
    }
    out
}

fn push_record<T: Serialize>(out: &mut String, record: &T) {
    match serde_json::to_string(record) {
        Ok(json) => {
            out.push_str(&json);
            out.push('\n');
        }
        Err(e) => warn!(error = %e, "failed to serialize world record"),
    }
}

/// Parses a gameplay line of the form `(<symbols>)`. Unknown symbols are dropped;
/// a line without the surrounding parentheses is rejected.
pub fn parse_command_line(line: &str) -> Option<CommandSet> {
    let inner = line.trim().strip_prefix('(')?.strip_suffix(')')?;
    Some(CommandSet::from_symbols(inner))
}
