/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Elapsed simulation time in seconds, advanced once per tick.
///
/// Every timed transition in a game compares against this clock instead of
/// scheduling callbacks, so the order of state changes is fixed by tick order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    now: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt as f64;
    }

    /// Seconds since the clock started.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Seconds elapsed since `since`.
    pub fn since(&self, since: f64) -> f64 {
        self.now - since
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

/// A point in time after which something expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    pub at: f64,
}

impl Deadline {
    /// A deadline `seconds` after `now`.
    pub fn after(now: f64, seconds: f64) -> Self {
        Self { at: now + seconds }
    }

    /// Expired once `now` is strictly past the deadline.
    pub fn expired(&self, now: f64) -> bool {
        now > self.at
    }
}

/// Re-armable window: fires once a condition has held continuously for
/// `window` seconds. Any observation where the condition is false restarts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    window: f64,
    started: Option<f64>,
}

impl Cooldown {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            started: None,
        }
    }

    /// Feed one observation. Returns `true` when the window has elapsed;
    /// the cooldown disarms itself at that point.
    pub fn observe(&mut self, now: f64, condition: bool) -> bool {
        if !condition {
            self.started = None;
            return false;
        }
        match self.started {
            None => {
                self.started = Some(now);
                false
            }
            Some(start) if now - start > self.window => {
                self.started = None;
                true
            }
            Some(_) => false,
        }
    }

    /// Whether the condition is currently being timed.
    pub fn is_armed(&self) -> bool {
        self.started.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0); // 60 frames worth, but capped at 10
        assert_eq!(steps, 10);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }

    #[test]
    fn clock_advances_per_tick() {
        let mut clock = Clock::new();
        for _ in 0..30 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.now() - 0.5).abs() < 1e-4);
        assert!((clock.since(0.25) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn deadline_expires_strictly_after() {
        let d = Deadline::after(1.0, 2.0);
        assert!(!d.expired(2.5));
        assert!(!d.expired(3.0));
        assert!(d.expired(3.01));
    }

    #[test]
    fn cooldown_fires_after_sustained_condition() {
        let mut c = Cooldown::new(1.0);
        assert!(!c.observe(0.0, true));
        assert!(c.is_armed());
        assert!(!c.observe(0.9, true));
        assert!(c.observe(1.1, true));
        assert!(!c.is_armed());
    }

    #[test]
    fn cooldown_rearms_when_condition_breaks() {
        let mut c = Cooldown::new(1.0);
        c.observe(0.0, true);
        c.observe(0.8, false);
        assert!(!c.is_armed());
        assert!(!c.observe(0.9, true));
        // 1.1s after the first observation, but only 0.2s after re-arming
        assert!(!c.observe(1.1, true));
        assert!(c.observe(2.0, true));
    }
}
