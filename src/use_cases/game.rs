use super::sessions::{Session, SessionTable};
use super::types::{FrameEncoder, GameEvent, WorldSnapshot};
use crate::domain::systems::boss_fire::FireMode;
use crate::domain::{Owner, ProjectileId, ShipId, StarId, World};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info, trace};

// Points credited for destroying a ship or a boss star.
const SHIP_KILL_POINTS: i32 = 1;
const STAR_KILL_POINTS: i32 = 5;

/// The simulation task's state: the World plus the sessions it broadcasts to.
pub struct Game {
    world: World,
    sessions: SessionTable,
    // Ships whose session was reaped. Killed if still live, then purged once dead.
    departed: HashSet<ShipId>,
    tick: u64,
    encode: FrameEncoder,
}

// Ids captured at the start of a tick. Sorted so one tick's outcome is reproducible.
struct TickIds {
    ships: Vec<ShipId>,
    projectiles: Vec<ProjectileId>,
    stars: Vec<StarId>,
}

impl Game {
    pub fn new(world: World, encode: FrameEncoder) -> Self {
        Self {
            world,
            sessions: SessionTable::new(),
            departed: HashSet::new(),
            tick: 0,
            encode,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Join {
                ship_id,
                name,
                outbound,
            } => {
                info!(ship_id, %name, "ship joined");
                self.departed.remove(&ship_id);
                self.world.spawn_ship(ship_id, name);
                self.sessions.insert(Session::new(ship_id, outbound));
            }
            GameEvent::Commands { ship_id, commands } => {
                if self.sessions.is_marked(ship_id) {
                    return;
                }
                match self.world.ship_mut(ship_id) {
                    Some(ship) => ship.queue_commands(commands),
                    // Dead ships ignore input until they respawn.
                    None => trace!(ship_id, %commands, "commands for inactive ship dropped"),
                }
            }
            GameEvent::Leave { ship_id } => {
                if self.sessions.mark(ship_id) {
                    info!(ship_id, "ship left");
                }
            }
        }
    }

    /// Runs one fixed simulation step and broadcasts the result.
    pub fn tick(&mut self) {
        self.tick += 1;
        let ids = self.capture_ids();

        self.world.update_ships();
        self.world.apply_star_gravity();
        self.world.update_respawn_counter();

        self.process_ship_commands(&ids);

        self.world.update_projectiles();
        self.kill_out_of_bounds_projectiles(&ids);

        self.resolve_ship_projectile_hits(&ids);
        self.resolve_ship_star_hits(&ids);
        self.resolve_star_projectile_hits(&ids);

        if self.world.tuning().boss.enabled {
            self.fire_boss_patterns(&ids);
        }

        let snapshot = self.snapshot(&ids);
        let frame: Arc<str> = Arc::from((self.encode)(&snapshot));
        self.sessions.broadcast(&frame);
        trace!(
            tick = snapshot.tick,
            sessions = self.sessions.len(),
            ships = snapshot.ships.len(),
            projectiles = snapshot.projectiles.len(),
            bytes = frame.len(),
            "frame broadcast"
        );

        self.reap_sessions();
        self.world.remove_dead_projectiles();
    }

    fn capture_ids(&self) -> TickIds {
        let mut ships: Vec<ShipId> = self.world.ships().keys().copied().collect();
        let mut projectiles: Vec<ProjectileId> =
            self.world.projectiles().keys().copied().collect();
        let mut stars: Vec<StarId> = self.world.stars().keys().copied().collect();
        ships.sort_unstable();
        projectiles.sort_unstable();
        stars.sort_unstable();
        TickIds {
            ships,
            projectiles,
            stars,
        }
    }

    fn process_ship_commands(&mut self, ids: &TickIds) {
        for &ship_id in &ids.ships {
            if self.departed.contains(&ship_id) || self.sessions.is_marked(ship_id) {
                if let Some(ship) = self.world.ship_mut(ship_id) {
                    ship.hp = 0;
                }
                if self.world.kill_ship(ship_id) {
                    debug!(ship_id, "ship of departed session destroyed");
                }
                continue;
            }

            let Some(ship) = self.world.ship(ship_id) else {
                continue;
            };
            if ship.queued_commands().fire {
                self.world.spawn_projectile_from_ship(ship_id);
            }
            if let Some(ship) = self.world.ship_mut(ship_id) {
                ship.process_commands();
            }
        }
    }

    fn kill_out_of_bounds_projectiles(&mut self, ids: &TickIds) {
        for &projectile_id in &ids.projectiles {
            let out = self
                .world
                .projectile(projectile_id)
                .is_some_and(|p| p.alive && self.world.is_out_of_bounds(p.loc));
            if !out {
                continue;
            }
            if let Some(projectile) = self.world.projectile_mut(projectile_id) {
                projectile.kill();
            }
        }
    }

    fn resolve_ship_projectile_hits(&mut self, ids: &TickIds) {
        let boss_mode = self.world.tuning().boss.enabled;
        for &ship_id in &ids.ships {
            for &projectile_id in &ids.projectiles {
                let hit = match (
                    self.world.ship(ship_id),
                    self.world.projectile(projectile_id),
                ) {
                    // Boss mode: only star-fired projectiles hurt ships.
                    (Some(ship), Some(projectile))
                        if projectile.alive
                            && (!boss_mode || projectile.owner.is_environment()) =>
                    {
                        self.world
                            .has_collided_ship_proj(ship, projectile)
                            .then_some(projectile.owner)
                    }
                    _ => None,
                };
                let Some(owner) = hit else {
                    continue;
                };

                if let Some(projectile) = self.world.projectile_mut(projectile_id) {
                    projectile.kill();
                }
                let Some(ship) = self.world.ship_mut(ship_id) else {
                    continue;
                };
                ship.damage(1);
                if ship.is_dead() {
                    if let Owner::Ship(owner_id) = owner {
                        self.credit(owner_id, SHIP_KILL_POINTS);
                    }
                    self.world.kill_ship(ship_id);
                    debug!(ship_id, ?owner, "ship destroyed by projectile");
                    break;
                }
            }
        }
    }

    fn resolve_ship_star_hits(&mut self, ids: &TickIds) {
        for &ship_id in &ids.ships {
            let crashed = ids.stars.iter().any(|&star_id| {
                match (self.world.ship(ship_id), self.world.star(star_id)) {
                    (Some(ship), Some(star)) => self.world.has_collided_ship_star(ship, star),
                    _ => false,
                }
            });
            if !crashed {
                continue;
            }
            if let Some(ship) = self.world.ship_mut(ship_id) {
                ship.hp = 0;
            }
            self.world.kill_ship(ship_id);
            debug!(ship_id, "ship destroyed by star");
        }
    }

    fn resolve_star_projectile_hits(&mut self, ids: &TickIds) {
        let boss_mode = self.world.tuning().boss.enabled;
        for &star_id in &ids.stars {
            for &projectile_id in &ids.projectiles {
                let hit = match (self.world.star(star_id), self.world.projectile(projectile_id)) {
                    (Some(star), Some(projectile))
                        if projectile.alive && !projectile.owner.is_environment() =>
                    {
                        self.world
                            .has_collided_proj_star(star, projectile)
                            .then_some(projectile.owner)
                    }
                    _ => None,
                };
                let Some(owner) = hit else {
                    continue;
                };

                if let Some(projectile) = self.world.projectile_mut(projectile_id) {
                    projectile.kill();
                }
                if !boss_mode {
                    continue;
                }
                let Some(star) = self.world.star_mut(star_id) else {
                    continue;
                };
                star.damage(1);
                if star.hp <= 0 {
                    if let Owner::Ship(owner_id) = owner {
                        self.credit(owner_id, STAR_KILL_POINTS);
                    }
                    self.world.kill_star(star_id);
                    info!(star_id, ?owner, "boss star destroyed");
                    break;
                }
            }
        }
    }

    fn fire_boss_patterns(&mut self, ids: &TickIds) {
        let max_hp = self.world.tuning().boss.max_hp;
        for &star_id in &ids.stars {
            let Some(mode) = self
                .world
                .star(star_id)
                .and_then(|star| FireMode::for_health(star.hp, max_hp))
            else {
                continue;
            };
            self.world.boss_fire(star_id, mode);
        }
    }

    fn credit(&mut self, owner_id: ShipId, points: i32) {
        if !self.world.credit_score(owner_id, points) {
            debug!(owner_id, points, "score owner no longer exists; credit skipped");
        }
    }

    fn snapshot(&self, ids: &TickIds) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            ships: ids
                .ships
                .iter()
                .filter_map(|&id| self.world.ship_record(id).cloned())
                .collect(),
            projectiles: ids
                .projectiles
                .iter()
                .filter_map(|&id| self.world.projectile(id).cloned())
                .collect(),
            stars: ids
                .stars
                .iter()
                .filter_map(|&id| self.world.star_record(id).cloned())
                .collect(),
        }
    }

    fn reap_sessions(&mut self) {
        for ship_id in self.sessions.reap() {
            info!(ship_id, "session removed");
            self.departed.insert(ship_id);
        }
        // Departed ships only leave the World from the dead collection so peers
        // observe the death first.
        let world = &mut self.world;
        self.departed
            .retain(|&ship_id| world.remove_dead_ship(ship_id).is_none());
    }
}

pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    mut game: Game,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(ticks = game.tick_count(), "world task stopping");
                break;
            }
            _ = interval.tick() => {}
        }

        // Apply everything that arrived since the last tick, in arrival order.
        while let Ok(event) = input_rx.try_recv() {
            game.apply_event(event);
        }

        game.tick();
    }
}
