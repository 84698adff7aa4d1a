use foundation::time::Time;

/// Deterministic frame metadata.
///
/// This is the primary timebase for the render loop. Timers, camera tweens
/// and deferred scene work are all expressed against `Frame::time` so a run
/// can be replayed frame by frame in tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Loop time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// Frame zero at the given refresh rate.
    pub fn first_at_hz(hz: f64) -> Self {
        Self::new(0, 1.0 / hz.max(1.0))
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Seconds between `since` and the start of this frame.
    pub fn elapsed_since(&self, since: Time) -> f64 {
        self.time.0 - since.0
    }
}
