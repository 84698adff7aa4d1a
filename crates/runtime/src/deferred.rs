//! One-shot deferred triggers driven by the frame timebase.
//!
//! A [`OneShot`] fires at most once. Two trigger policies exist:
//! - [`Trigger::After`]: fire on the first frame at or past a fixed delay.
//! - [`Trigger::WhenStable`]: after a minimum delay, fire once an observed
//!   count (typically scene object count) has held steady for a number of
//!   consecutive frames, or unconditionally once `max_wait_s` has elapsed.

use foundation::time::Time;

use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Trigger {
    After { delay_s: f64 },
    WhenStable {
        min_delay_s: f64,
        stable_frames: u32,
        max_wait_s: f64,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OneShotState {
    Pending,
    Fired,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct OneShot {
    trigger: Trigger,
    armed_at: Time,
    state: OneShotState,
    last_count: Option<usize>,
    stable_run: u32,
}

impl OneShot {
    pub fn new(trigger: Trigger, armed_at: Time) -> Self {
        Self {
            trigger,
            armed_at,
            state: OneShotState::Pending,
            last_count: None,
            stable_run: 0,
        }
    }

    pub fn after(delay_s: f64, armed_at: Time) -> Self {
        Self::new(Trigger::After { delay_s }, armed_at)
    }

    pub fn state(&self) -> OneShotState {
        self.state
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Cancels a pending trigger. Returns `false` if it already fired.
    pub fn cancel(&mut self) -> bool {
        if self.state == OneShotState::Pending {
            self.state = OneShotState::Cancelled;
            return true;
        }
        false
    }

    /// Advances the trigger by one frame.
    ///
    /// `observed` is the readiness observation for this frame (`None` when the
    /// observed resource does not exist yet). Returns `true` exactly once, on
    /// the frame the trigger fires.
    pub fn poll(&mut self, frame: Frame, observed: Option<usize>) -> bool {
        if self.state != OneShotState::Pending {
            return false;
        }

        let elapsed = frame.elapsed_since(self.armed_at);
        let fire = match self.trigger {
            Trigger::After { delay_s } => elapsed >= delay_s,
            Trigger::WhenStable {
                min_delay_s,
                stable_frames,
                max_wait_s,
            } => {
                match (observed, self.last_count) {
                    (Some(now), Some(prev)) if now == prev => self.stable_run += 1,
                    _ => self.stable_run = 0,
                }
                self.last_count = observed;

                elapsed >= max_wait_s
                    || (elapsed >= min_delay_s
                        && observed.is_some()
                        && self.stable_run >= stable_frames)
            }
        };

        if fire {
            self.state = OneShotState::Fired;
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::{OneShot, OneShotState, Trigger};
    use crate::frame::Frame;
    use foundation::time::Time;

    #[test]
    fn fixed_delay_fires_once() {
        let mut shot = OneShot::after(1.0, Time(0.0));
        let mut fired_at = Vec::new();
        let mut frame = Frame::new(0, 0.25);
        for _ in 0..10 {
            if shot.poll(frame, None) {
                fired_at.push(frame.index);
            }
            frame = frame.next();
        }
        assert_eq!(fired_at, vec![4]);
        assert_eq!(shot.state(), OneShotState::Fired);
    }

    #[test]
    fn cancelled_never_fires() {
        let mut shot = OneShot::after(0.0, Time(0.0));
        assert!(shot.cancel());
        assert!(!shot.poll(Frame::new(5, 1.0), Some(1)));
        assert_eq!(shot.state(), OneShotState::Cancelled);
    }

    #[test]
    fn cancel_after_fire_is_rejected() {
        let mut shot = OneShot::after(0.0, Time(0.0));
        assert!(shot.poll(Frame::new(0, 1.0), None));
        assert!(!shot.cancel());
    }

    #[test]
    fn waits_for_count_to_stabilise() {
        let trigger = Trigger::WhenStable {
            min_delay_s: 0.0,
            stable_frames: 2,
            max_wait_s: 100.0,
        };
        let mut shot = OneShot::new(trigger, Time(0.0));
        let observations = [None, Some(1), Some(3), Some(4), Some(4), Some(4), Some(4)];
        let mut fired = None;
        let mut frame = Frame::new(0, 0.1);
        for obs in observations {
            if shot.poll(frame, obs) {
                fired = Some(frame.index);
            }
            frame = frame.next();
        }
        // Count reaches 4 at frame 3 and holds through frames 4 and 5.
        assert_eq!(fired, Some(5));
    }

    #[test]
    fn stable_trigger_gives_up_at_max_wait() {
        let trigger = Trigger::WhenStable {
            min_delay_s: 0.0,
            stable_frames: 3,
            max_wait_s: 0.45,
        };
        let mut shot = OneShot::new(trigger, Time(0.0));
        let mut frame = Frame::new(0, 0.1);
        let mut fired = None;
        for i in 0..10usize {
            // Never stable.
            if shot.poll(frame, Some(i)) {
                fired = Some(frame.index);
            }
            frame = frame.next();
        }
        assert_eq!(fired, Some(5));
    }
}
