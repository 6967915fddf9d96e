//! Match countdown.

/// Counts whole seconds down from the match length once started.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTimer {
    limit_secs: u32,
    remaining: u32,
    /// Clock time at which the next second ticks off.
    next_tick: Option<f64>,
    /// Part of the current second left when the timer was paused.
    paused: Option<f64>,
}

impl MatchTimer {
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining: limit_secs,
            next_tick: None,
            paused: None,
        }
    }

    /// Start counting from `now`, or resume a paused count where it left off.
    /// Has no effect once running.
    pub fn start(&mut self, now: f64) {
        if self.next_tick.is_some() || self.is_up() {
            return;
        }
        match self.paused.take() {
            Some(left) => {
                self.next_tick = Some(now + left);
                log::info!("match timer resumed: {}", self.display());
            }
            None => {
                self.next_tick = Some(now + 1.0);
                log::info!("match timer started: {}", self.display());
            }
        }
    }

    /// Stop counting at `now`, keeping the part-second already elapsed.
    pub fn pause(&mut self, now: f64) {
        if let Some(next) = self.next_tick.take() {
            self.paused = Some((next - now).max(0.0));
            log::info!("match timer paused: {}", self.display());
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Take off every whole second that has elapsed by `now`.
    /// Returns `true` on the tick that runs the clock out.
    pub fn update(&mut self, now: f64) -> bool {
        let Some(mut next) = self.next_tick else {
            return false;
        };
        while now >= next && self.remaining > 0 {
            self.remaining -= 1;
            next += 1.0;
        }
        if self.remaining == 0 {
            self.next_tick = None;
            log::info!("match timer expired");
            return true;
        }
        self.next_tick = Some(next);
        false
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_up(&self) -> bool {
        self.remaining == 0
    }

    /// `MM:SS`.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn reset(&mut self) {
        self.remaining = self.limit_secs;
        self.next_tick = None;
        self.paused = None;
    }
}
