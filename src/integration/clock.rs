/// Turns the host's per-frame timestamps into elapsed seconds between frames.
///
/// Render loops usually hand over an absolute timestamp in milliseconds
/// rather than a delta; the stepper wants the delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `timestamp_ms` and returns seconds since the previous tick.
    /// The first tick, and any tick that goes back in time, returns 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let elapsed = match self.last_timestamp_ms {
            Some(last) if timestamp_ms > last => (timestamp_ms - last) / 1000.0,
            _ => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        elapsed
    }

    /// Forgets the previous timestamp, so the next tick returns 0.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}
