use baize_engine::Deadline;

/// A line of text shown until its deadline passes.
///
/// Showing a new message replaces the current one and restarts the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    duration: f64,
    current: Option<(String, Deadline)>,
}

impl Banner {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, now: f64) {
        self.current = Some((text.into(), Deadline::after(now, self.duration)));
    }

    /// Drop the message once `now` is past its deadline.
    pub fn expire(&mut self, now: f64) {
        if matches!(&self.current, Some((_, deadline)) if deadline.expired(now)) {
            self.current = None;
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
