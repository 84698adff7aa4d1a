//! Globe camera: point-of-view state with animated transitions.

use foundation::math::wrap_longitude;
use foundation::time::{Time, TimeSpan};

/// Where the camera looks from: above `(lat, lon)` at `altitude` globe radii
/// above the surface, looking at the globe centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointOfView {
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
}

impl PointOfView {
    pub const fn new(lat: f64, lon: f64, altitude: f64) -> Self {
        Self { lat, lon, altitude }
    }
}

impl Default for PointOfView {
    fn default() -> Self {
        Self::new(0.0, 0.0, 2.5)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Transition {
    from: PointOfView,
    to: PointOfView,
    span: TimeSpan,
}

#[derive(Debug, Clone, Default)]
pub struct Camera {
    pov: PointOfView,
    transition: Option<Transition>,
}

impl Camera {
    pub fn new(pov: PointOfView) -> Self {
        Self {
            pov,
            transition: None,
        }
    }

    pub fn pov(&self) -> PointOfView {
        self.pov
    }

    /// Destination of the running transition, or the current view.
    pub fn target(&self) -> PointOfView {
        self.transition.map(|t| t.to).unwrap_or(self.pov)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Starts animating towards `to`. Replaces any running transition, starting
    /// from wherever the camera currently is. A zero duration snaps.
    pub fn transition_to(&mut self, to: PointOfView, duration_ms: u64, now: Time) {
        if duration_ms == 0 {
            self.pov = to;
            self.transition = None;
            return;
        }
        self.transition = Some(Transition {
            from: self.pov,
            to,
            span: TimeSpan::starting_at(now, duration_ms),
        });
    }

    pub fn update(&mut self, now: Time) {
        let Some(t) = self.transition else {
            return;
        };
        let progress = t.span.progress(now);
        self.pov = interpolate(t.from, t.to, ease_cubic_in_out(progress));
        if progress >= 1.0 {
            self.pov = t.to;
            self.transition = None;
        }
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Longitude delta along the shorter way round, in `(-180, 180]`.
fn shortest_longitude_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

fn interpolate(from: PointOfView, to: PointOfView, e: f64) -> PointOfView {
    let mut lon = from.lon + shortest_longitude_delta(from.lon, to.lon) * e;
    if lon <= -180.0 {
        lon += 360.0;
    }
    PointOfView {
        lat: from.lat + (to.lat - from.lat) * e,
        lon: wrap_longitude(lon),
        altitude: from.altitude + (to.altitude - from.altitude) * e,
    }
}
