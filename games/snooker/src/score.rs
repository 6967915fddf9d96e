/// Running point total. Fouls subtract; there is no floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    points: i32,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: i32) {
        self.points += points;
        log::debug!("score {:+} -> {}", points, self.points);
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn reset(&mut self) {
        self.points = 0;
    }
}
