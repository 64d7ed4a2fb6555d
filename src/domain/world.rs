// The authoritative game world: entity collections, physics, spawning and collision
// queries. Owned exclusively by the simulation task.

use super::projectile::{Owner, Projectile, ProjectileId};
use super::ship::{Ship, ShipId};
use super::star::{Star, StarId};
use super::systems::boss_fire::{BossFireState, FireMode};
use super::tuning::WorldTuning;
use super::vector::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::debug;

// Star shots travel at a third of the ship projectile speed.
const STAR_PROJECTILE_SPEED_DIVISOR: f64 = 3.0;

pub struct World {
    tuning: WorldTuning,

    ships: HashMap<ShipId, Ship>,
    projectiles: HashMap<ProjectileId, Projectile>,
    stars: HashMap<StarId, Star>,

    // Entities waiting for their respawn timer.
    dead_ships: HashMap<ShipId, Ship>,
    dead_stars: HashMap<StarId, Star>,

    boss_fire: HashMap<StarId, BossFireState>,

    next_projectile_id: ProjectileId,
    next_star_id: StarId,
    rng: StdRng,
}

impl World {
    pub fn new(tuning: WorldTuning) -> Self {
        Self::with_rng(tuning, StdRng::from_entropy())
    }

    /// Builds a world with a caller-provided RNG (seeded in tests).
    pub fn with_rng(tuning: WorldTuning, rng: StdRng) -> Self {
        Self {
            tuning,
            ships: HashMap::new(),
            projectiles: HashMap::new(),
            stars: HashMap::new(),
            dead_ships: HashMap::new(),
            dead_stars: HashMap::new(),
            boss_fire: HashMap::new(),
            next_projectile_id: 0,
            next_star_id: 0,
            rng,
        }
    }

    pub fn tuning(&self) -> &WorldTuning {
        &self.tuning
    }

    pub fn world_size(&self) -> u32 {
        self.tuning.world_size
    }

    // Collection access.

    pub fn ships(&self) -> &HashMap<ShipId, Ship> {
        &self.ships
    }

    pub fn projectiles(&self) -> &HashMap<ProjectileId, Projectile> {
        &self.projectiles
    }

    pub fn stars(&self) -> &HashMap<StarId, Star> {
        &self.stars
    }

    pub fn dead_ships(&self) -> &HashMap<ShipId, Ship> {
        &self.dead_ships
    }

    pub fn dead_stars(&self) -> &HashMap<StarId, Star> {
        &self.dead_stars
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(&id)
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    pub fn star(&self, id: StarId) -> Option<&Star> {
        self.stars.get(&id)
    }

    pub fn star_mut(&mut self, id: StarId) -> Option<&mut Star> {
        self.stars.get_mut(&id)
    }

    /// Current record for a ship whether it is live or awaiting respawn.
    pub fn ship_record(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id).or_else(|| self.dead_ships.get(&id))
    }

    /// Current record for a star whether it is live or awaiting respawn.
    pub fn star_record(&self, id: StarId) -> Option<&Star> {
        self.stars.get(&id).or_else(|| self.dead_stars.get(&id))
    }

    // Insert-or-replace by id.

    pub fn add_ship(&mut self, ship: Ship) {
        // A ship lives in exactly one collection.
        self.dead_ships.remove(&ship.id);
        self.ships.insert(ship.id, ship);
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.insert(projectile.id, projectile);
    }

    pub fn add_star(&mut self, star: Star) {
        self.dead_stars.remove(&star.id);
        self.stars.insert(star.id, star);
    }

    pub fn remove_ship(&mut self, id: ShipId) -> Option<Ship> {
        self.ships.remove(&id)
    }

    pub fn remove_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    pub fn remove_star(&mut self, id: StarId) -> Option<Star> {
        self.boss_fire.remove(&id);
        self.stars.remove(&id)
    }

    /// Forgets a ship waiting to respawn so it never comes back.
    pub fn remove_dead_ship(&mut self, id: ShipId) -> Option<Ship> {
        self.dead_ships.remove(&id)
    }

    /// Drops every projectile whose alive flag has been cleared.
    pub fn remove_dead_projectiles(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|_, p| p.alive);
        before - self.projectiles.len()
    }

    /// Moves a live ship to the dead collection and starts its respawn timer.
    /// Returns false if the ship was not live.
    pub fn kill_ship(&mut self, id: ShipId) -> bool {
        let Some(mut ship) = self.ships.remove(&id) else {
            return false;
        };
        ship.died();
        self.dead_ships.insert(id, ship);
        true
    }

    /// Moves a live star to the dead collection and starts its respawn timer.
    pub fn kill_star(&mut self, id: StarId) -> bool {
        let Some(mut star) = self.stars.remove(&id) else {
            return false;
        };
        star.died();
        self.dead_stars.insert(id, star);
        true
    }

    // Per-frame physics.

    /// Integrates ship positions and ticks fire cooldowns.
    pub fn update_ships(&mut self) {
        for ship in self.ships.values_mut() {
            ship.advance();
            ship.cooldown_tick();
        }
    }

    pub fn update_projectiles(&mut self) {
        for projectile in self.projectiles.values_mut() {
            projectile.advance();
        }
    }

    /// Adds each star's mass, directed from the ship toward the star, straight onto
    /// every ship's velocity. One constant impulse per frame.
    pub fn apply_star_gravity(&mut self) {
        for star in self.stars.values() {
            for ship in self.ships.values_mut() {
                if let Some(pull) = (star.loc - ship.loc).normalized() {
                    ship.accelerate(pull * star.mass);
                }
            }
        }
    }

    /// Ticks respawn timers of dead ships and stars and brings back the ready ones.
    pub fn update_respawn_counter(&mut self) {
        let mut ready_ships = Vec::new();
        for ship in self.dead_ships.values_mut() {
            ship.respawn_tick();
            if ship.is_ready_to_respawn() {
                ready_ships.push(ship.id);
            }
        }
        for id in ready_ships {
            if let Some(dead) = self.dead_ships.remove(&id) {
                self.respawn_ship(&dead);
            }
        }

        let mut ready_stars = Vec::new();
        for star in self.dead_stars.values_mut() {
            star.respawn_tick();
            if star.is_ready_to_respawn() {
                ready_stars.push(star.id);
            }
        }
        for id in ready_stars {
            if let Some(dead) = self.dead_stars.remove(&id) {
                self.respawn_star(&dead);
            }
        }
    }

    // Spawning.

    /// Creates a ship at a random position, facing up, at rest with full health.
    pub fn spawn_ship(&mut self, id: ShipId, name: impl Into<String>) {
        let loc = self.random_location();
        let ship = self.fresh_ship(id, loc, name.into(), 0);
        debug!(ship_id = id, x = loc.x, y = loc.y, "ship spawned");
        self.add_ship(ship);
    }

    fn respawn_ship(&mut self, dead: &Ship) {
        let loc = self.random_location();
        let ship = self.fresh_ship(dead.id, loc, dead.name.clone(), dead.score);
        debug!(ship_id = dead.id, x = loc.x, y = loc.y, "ship respawned");
        self.add_ship(ship);
    }

    fn fresh_ship(&self, id: ShipId, loc: Vector2, name: String, score: i32) -> Ship {
        let tuning = &self.tuning.ship;
        Ship::new(id, loc, Vector2::UP, name, tuning.max_hp, score)
            .with_tuning(tuning, self.tuning.world_size)
    }

    /// Creates a star at a fixed position and returns its id.
    pub fn spawn_star(&mut self, loc: Vector2, mass: f64) -> StarId {
        let id = self.next_star_id;
        self.next_star_id = self.next_star_id.wrapping_add(1);
        let star = Star::new(id, loc, mass)
            .with_hp(self.tuning.boss.max_hp)
            .with_respawn_delay(self.tuning.star.respawn_delay);
        self.add_star(star);
        id
    }

    fn respawn_star(&mut self, dead: &Star) {
        let star = Star::new(dead.id, dead.loc, dead.mass)
            .with_hp(self.tuning.boss.max_hp)
            .with_respawn_delay(dead.respawn_delay());
        debug!(star_id = dead.id, "star respawned");
        self.add_star(star);
    }

    /// Fires from a live ship along its orientation if its cooldown allows.
    pub fn spawn_projectile_from_ship(&mut self, ship_id: ShipId) -> Option<ProjectileId> {
        let speed = self.tuning.projectile_speed;
        let ship = self.ships.get_mut(&ship_id)?;
        if !ship.is_ready_to_fire() {
            return None;
        }
        ship.mark_fired();
        let (loc, dir) = (ship.loc, ship.dir);

        let id = self.next_projectile_id();
        self.add_projectile(
            Projectile::new(id, loc, dir, Owner::Ship(ship_id)).with_velocity(dir * speed),
        );
        Some(id)
    }

    /// Fires an environment-owned projectile from a live star.
    pub fn spawn_projectile_from_star(
        &mut self,
        star_id: StarId,
        dir: Vector2,
    ) -> Option<ProjectileId> {
        let loc = self.stars.get(&star_id)?.loc;
        let speed = self.tuning.projectile_speed / STAR_PROJECTILE_SPEED_DIVISOR;

        let id = self.next_projectile_id();
        self.add_projectile(
            Projectile::new(id, loc, dir, Owner::Environment).with_velocity(dir * speed),
        );
        Some(id)
    }

    fn next_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    // Boss mode.

    pub fn boss_fire_mode1(&mut self, star_id: StarId) -> usize {
        self.boss_fire(star_id, FireMode::Sweep)
    }

    pub fn boss_fire_mode2(&mut self, star_id: StarId) -> usize {
        self.boss_fire(star_id, FireMode::Cross)
    }

    pub fn boss_fire_mode3(&mut self, star_id: StarId) -> usize {
        self.boss_fire(star_id, FireMode::Spiral)
    }

    /// Advances the star's fire pattern one tick and spawns its shots.
    /// Returns the number of projectiles created.
    pub fn boss_fire(&mut self, star_id: StarId, mode: FireMode) -> usize {
        if !self.stars.contains_key(&star_id) {
            return 0;
        }
        if !self.boss_fire.contains_key(&star_id) {
            let start = Vector2::new(1.0, 0.0).rotated(self.rng.gen_range(0.0..360.0));
            self.boss_fire.insert(star_id, BossFireState::new(start));
        }
        let delay = self.tuning.boss.fire_delay;
        let Some(state) = self.boss_fire.get_mut(&star_id) else {
            return 0;
        };
        let shots = state.step(mode, delay);
        shots
            .into_iter()
            .filter_map(|dir| self.spawn_projectile_from_star(star_id, dir))
            .count()
    }

    // Collision queries.

    pub fn has_collided_ship_star(&self, ship: &Ship, star: &Star) -> bool {
        ship.loc.distance(star.loc) <= self.tuning.star.size
    }

    /// Ships never collide with their own projectiles.
    pub fn has_collided_ship_proj(&self, ship: &Ship, projectile: &Projectile) -> bool {
        projectile.owner != Owner::Ship(ship.id)
            && ship.loc.distance(projectile.loc) <= self.tuning.ship.size
    }

    pub fn has_collided_proj_star(&self, star: &Star, projectile: &Projectile) -> bool {
        star.loc.distance(projectile.loc) <= self.tuning.star.size
    }

    pub fn is_out_of_bounds(&self, loc: Vector2) -> bool {
        let half = self.tuning.half_extent();
        loc.x.abs() > half || loc.y.abs() > half
    }

    // Scoring.

    /// Credits points to a ship wherever it currently lives (live or dead).
    pub fn credit_score(&mut self, ship_id: ShipId, points: i32) -> bool {
        let owner = match self.ships.get_mut(&ship_id) {
            Some(ship) => Some(ship),
            None => self.dead_ships.get_mut(&ship_id),
        };
        match owner {
            Some(ship) => {
                ship.add_score(points);
                true
            }
            None => false,
        }
    }

    fn random_location(&mut self) -> Vector2 {
        let half = i64::from(self.tuning.world_size / 2);
        if half == 0 {
            return Vector2::ZERO;
        }
        let x = self.rng.gen_range(-half..half);
        let y = self.rng.gen_range(-half..half);
        Vector2::new(x as f64, y as f64)
    }
}
