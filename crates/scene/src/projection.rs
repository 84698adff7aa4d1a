use foundation::math::{GeoPoint, Vec3};

/// Globe radius in scene units.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Read access to the engine's geographic → scene projection.
///
/// `None` means the engine has not finished building its scene yet; callers
/// treat that as "skip this pass", never as an error.
pub trait ScenePositions {
    fn project_to_scene(&self, point: GeoPoint, altitude: f64) -> Option<Vec3>;
}

/// Spherical projection, Y up, `(0°, 0°)` on +Z and `(0°, 90°E)` on +X.
///
/// `altitude` is a fraction of the globe radius above the surface.
pub fn polar_to_cartesian(point: GeoPoint, altitude: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - point.latitude).to_radians();
    let theta = (90.0 - point.longitude).to_radians();
    let r = radius * (1.0 + altitude);
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Projection snapshot handed to layer factories.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereProjection {
    pub radius: f64,
    pub ready: bool,
}

impl ScenePositions for SphereProjection {
    fn project_to_scene(&self, point: GeoPoint, altitude: f64) -> Option<Vec3> {
        self.ready
            .then(|| polar_to_cartesian(point, altitude, self.radius))
    }
}
