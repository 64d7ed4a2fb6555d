// Boss-mode fire patterns. Each star keeps its own pattern state so several bosses
// can fire independently.

use crate::domain::vector::Vector2;

const MODE1_STEP_DEGREES: f64 = 2.5;
const MODE2_STEP_DEGREES: f64 = -1.5;
const MODE3_STEP_DEGREES: f64 = 2.0;
// Mode 3 reverses its sweep whenever the heading passes through [0, FLIP_WINDOW).
const MODE3_FLIP_WINDOW_DEGREES: f64 = 2.0;

/// Pattern chosen from the star's remaining health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    /// Single rotating stream.
    Sweep,
    /// Four streams at right angles, every third window.
    Cross,
    /// Two opposite streams that reverse direction each revolution.
    Spiral,
}

impl FireMode {
    /// Picks a pattern by health fraction using integer thirds of `max_hp`.
    pub fn for_health(hp: i32, max_hp: i32) -> Option<FireMode> {
        let third = max_hp / 3;
        if hp >= 2 * third {
            Some(FireMode::Sweep)
        } else if hp >= third {
            Some(FireMode::Cross)
        } else if hp > 0 {
            Some(FireMode::Spiral)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossFireState {
    frame: u64,
    fire_dir: Vector2,
    clockwise: bool,
}

impl BossFireState {
    pub fn new(initial_dir: Vector2) -> Self {
        Self {
            frame: 0,
            fire_dir: initial_dir,
            clockwise: true,
        }
    }

    #[cfg(test)]
    fn fire_dir(&self) -> Vector2 {
        self.fire_dir
    }

    /// Advances the pattern by one tick and returns the directions to fire along.
    pub fn step(&mut self, mode: FireMode, delay: u32) -> Vec<Vector2> {
        let delay = u64::from(delay.max(1));
        let shots = match mode {
            FireMode::Sweep if self.frame % delay == 0 => self.sweep(),
            FireMode::Cross if self.frame % (delay * 3) == 0 => self.cross(),
            FireMode::Spiral if self.frame % delay == 0 => self.spiral(),
            _ => Vec::new(),
        };
        self.frame += 1;
        shots
    }

    fn sweep(&mut self) -> Vec<Vector2> {
        self.fire_dir.rotate(MODE1_STEP_DEGREES);
        vec![self.fire_dir]
    }

    fn cross(&mut self) -> Vec<Vector2> {
        self.fire_dir.rotate(MODE2_STEP_DEGREES);
        let mut shots = Vec::with_capacity(4);
        for _ in 0..4 {
            shots.push(self.fire_dir);
            self.fire_dir.rotate(90.0);
        }
        shots
    }

    fn spiral(&mut self) -> Vec<Vector2> {
        let angle = self.fire_dir.to_angle();
        if (0.0..MODE3_FLIP_WINDOW_DEGREES).contains(&angle) {
            self.clockwise = !self.clockwise;
        }
        let step = if self.clockwise {
            MODE3_STEP_DEGREES
        } else {
            -MODE3_STEP_DEGREES
        };
        self.fire_dir.rotate(step);

        let forward = self.fire_dir;
        self.fire_dir.rotate(180.0);
        let backward = self.fire_dir;
        self.fire_dir.rotate(180.0);
        vec![forward, backward]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(state: &mut BossFireState, mode: FireMode, ticks: usize) -> usize {
        (0..ticks).map(|_| state.step(mode, 2).len()).sum()
    }

    #[test]
    fn when_health_drops_then_patterns_escalate() {
        assert_eq!(FireMode::for_health(100, 100), Some(FireMode::Sweep));
        assert_eq!(FireMode::for_health(66, 100), Some(FireMode::Sweep));
        assert_eq!(FireMode::for_health(65, 100), Some(FireMode::Cross));
        assert_eq!(FireMode::for_health(33, 100), Some(FireMode::Cross));
        assert_eq!(FireMode::for_health(32, 100), Some(FireMode::Spiral));
        assert_eq!(FireMode::for_health(1, 100), Some(FireMode::Spiral));
        assert_eq!(FireMode::for_health(0, 100), None);
    }

    #[test]
    fn when_sequencing_all_modes_then_shot_counts_follow_their_windows() {
        let mut state = BossFireState::new(Vector2::new(1.0, 0.0));
        assert_eq!(count(&mut state, FireMode::Sweep, 10), 5);
        assert_eq!(count(&mut state, FireMode::Cross, 18), 12);
        assert_eq!(count(&mut state, FireMode::Spiral, 1000), 1000);
    }

    #[test]
    fn when_cross_fires_then_streams_are_perpendicular_and_base_rotates() {
        let mut state = BossFireState::new(Vector2::UP);
        let shots = state.step(FireMode::Cross, 2);
        assert_eq!(shots.len(), 4);
        assert!((shots[0].to_angle() - (-1.5)).abs() < 1e-9);
        assert!((shots[1].to_angle() - 88.5).abs() < 1e-9);
        assert!((state.fire_dir().to_angle() - (-1.5)).abs() < 1e-9);
    }

    #[test]
    fn when_spiral_fires_then_streams_are_opposite() {
        let mut state = BossFireState::new(Vector2::new(1.0, 0.0));
        let shots = state.step(FireMode::Spiral, 2);
        let sum = shots[0] + shots[1];
        assert!(sum.length() < 1e-9);
    }

    #[test]
    fn when_spiral_passes_heading_zero_then_rotation_reverses() {
        let mut state = BossFireState::new(Vector2::UP.rotated(-1.0));
        // Heading -1: clockwise step lands on +1, inside the flip window.
        state.step(FireMode::Spiral, 1);
        assert!((state.fire_dir().to_angle() - 1.0).abs() < 1e-9);
        state.step(FireMode::Spiral, 1);
        assert!((state.fire_dir().to_angle() - (-1.0)).abs() < 1e-9);
    }
}
