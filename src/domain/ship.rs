// Player ship state and per-frame behavior.

use super::commands::CommandSet;
use super::timer::CycleTimer;
use super::tuning::ShipTuning;
use super::vector::Vector2;

pub type ShipId = u32;

const DEFAULT_WORLD_SIZE: u32 = 750;

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub id: ShipId,
    pub loc: Vector2,
    /// Unit orientation; rotated incrementally by turn commands.
    pub dir: Vector2,
    /// Display-only: true while a thrust command was applied this tick.
    pub thrust: bool,
    pub name: String,
    pub hp: i32,
    pub score: i32,
    pub velocity: Vector2,

    queued: CommandSet,
    accel_rate: f64,
    turn_rate: f64,
    half_extent: f64,
    cooldown: CycleTimer,
    respawn: CycleTimer,
}

impl Ship {
    pub fn new(
        id: ShipId,
        loc: Vector2,
        dir: Vector2,
        name: impl Into<String>,
        hp: i32,
        score: i32,
    ) -> Self {
        let tuning = ShipTuning::default();
        Self {
            id,
            loc,
            dir,
            thrust: false,
            name: name.into(),
            hp,
            score,
            velocity: Vector2::ZERO,
            queued: CommandSet::EMPTY,
            accel_rate: tuning.accel_rate,
            turn_rate: tuning.turn_rate,
            half_extent: f64::from(DEFAULT_WORLD_SIZE / 2),
            cooldown: CycleTimer::new(tuning.fire_delay),
            respawn: CycleTimer::new(tuning.respawn_delay),
        }
    }

    /// Applies configured physics constants and the world bounds used for wrapping.
    pub fn with_tuning(mut self, tuning: &ShipTuning, world_size: u32) -> Self {
        self.accel_rate = tuning.accel_rate;
        self.turn_rate = tuning.turn_rate;
        self.half_extent = f64::from(world_size / 2);
        self.cooldown = CycleTimer::new(tuning.fire_delay);
        self.respawn = CycleTimer::new(tuning.respawn_delay);
        self
    }

    pub fn accelerate(&mut self, delta: Vector2) {
        self.velocity += delta;
    }

    /// Integrates position by velocity, wrapping to the opposite edge when a
    /// coordinate leaves the world.
    pub fn advance(&mut self) {
        let mut next = self.loc + self.velocity;
        if next.x.abs() > self.half_extent {
            next.x = -self.half_extent * next.x.signum();
        }
        if next.y.abs() > self.half_extent {
            next.y = -self.half_extent * next.y.signum();
        }
        self.loc = next;
    }

    pub fn turn_left(&mut self) {
        self.dir.rotate(-self.turn_rate);
    }

    pub fn turn_right(&mut self) {
        self.dir.rotate(self.turn_rate);
    }

    pub fn apply_thrust(&mut self) {
        self.thrust = true;
        self.accelerate(self.dir * self.accel_rate);
    }

    /// Replaces the queued commands; the latest message before a tick wins.
    pub fn queue_commands(&mut self, commands: CommandSet) {
        self.queued = commands;
    }

    pub fn queued_commands(&self) -> CommandSet {
        self.queued
    }

    /// Applies queued turn and thrust commands, then clears the queue.
    /// Fire is resolved by the World before this runs.
    pub fn process_commands(&mut self) {
        let commands = std::mem::take(&mut self.queued);
        if !commands.thrust {
            self.thrust = false;
        }
        if commands.left {
            self.turn_left();
        }
        if commands.right {
            self.turn_right();
        }
        if commands.thrust {
            self.apply_thrust();
        }
    }

    pub fn is_ready_to_fire(&self) -> bool {
        self.cooldown.is_ready()
    }

    pub fn mark_fired(&mut self) {
        self.cooldown.start();
    }

    pub fn cooldown_tick(&mut self) {
        self.cooldown.tick();
    }

    pub fn died(&mut self) {
        self.respawn.start();
    }

    pub fn respawn_tick(&mut self) {
        self.respawn.tick();
    }

    pub fn is_ready_to_respawn(&self) -> bool {
        self.respawn.is_ready()
    }

    pub fn damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn add_score(&mut self, points: i32) {
        self.score += points;
    }
}
