// Stars pull ships in every frame and, in boss mode, can be shot down.

use super::timer::CycleTimer;
use super::vector::Vector2;

pub type StarId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: StarId,
    /// Fixed for the star's lifetime, including across respawns.
    pub loc: Vector2,
    /// Gravitational strength added to ship velocity per frame.
    pub mass: f64,
    /// Only meaningful in boss mode.
    pub hp: i32,
    respawn: CycleTimer,
}

impl Star {
    pub fn new(id: StarId, loc: Vector2, mass: f64) -> Self {
        Self {
            id,
            loc,
            mass,
            hp: 100,
            respawn: CycleTimer::new(300),
        }
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_respawn_delay(mut self, frames: u32) -> Self {
        self.respawn = CycleTimer::new(frames);
        self
    }

    pub fn respawn_delay(&self) -> u32 {
        self.respawn.period()
    }

    pub fn damage(&mut self, amount: i32) {
        self.hp -= amount;
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
}
