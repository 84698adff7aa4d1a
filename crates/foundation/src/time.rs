/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn offset(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Span beginning at `start` and lasting `duration_ms`.
    pub fn starting_at(start: Time, duration_ms: u64) -> Self {
        Self {
            start,
            end: start.offset(duration_ms as f64 / 1000.0),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized position of `t` within the span, clamped to `[0, 1]`.
    ///
    /// Zero-length spans are complete as soon as they start.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }
}
