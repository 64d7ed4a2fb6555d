// Frame counters used for fire cooldowns and respawn delays.

/// Counts frames modulo a fixed period once started.
///
/// A stopped timer (counter 0) is ready. `start` moves the counter to 1, and every
/// `tick` advances it until it wraps back to 0, so a started timer becomes ready
/// again after exactly `period - 1` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimer {
    counter: u32,
    period: u32,
}

impl CycleTimer {
    pub fn new(period: u32) -> Self {
        Self {
            counter: 0,
            period: period.max(1),
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn is_ready(&self) -> bool {
        self.counter == 0
    }

    pub fn start(&mut self) {
        self.counter = 1 % self.period;
    }

    pub fn tick(&mut self) {
        if self.counter > 0 {
            self.counter = (self.counter + 1) % self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_new_then_timer_is_ready() {
        assert!(CycleTimer::new(6).is_ready());
    }

    #[test]
    fn when_started_then_ready_after_period_minus_one_ticks() {
        let mut timer = CycleTimer::new(300);
        timer.start();
        for _ in 0..298 {
            timer.tick();
            assert!(!timer.is_ready());
        }
        timer.tick();
        assert!(timer.is_ready());
    }

    #[test]
    fn when_period_is_zero_or_one_then_timer_never_blocks() {
        let mut timer = CycleTimer::new(0);
        assert_eq!(timer.period(), 1);
        timer.start();
        assert!(timer.is_ready());
    }

    #[test]
    fn when_stopped_then_tick_keeps_it_ready() {
        let mut timer = CycleTimer::new(4);
        timer.tick();
        timer.tick();
        assert!(timer.is_ready());
    }
}
