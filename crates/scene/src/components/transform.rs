use foundation::math::Vec3;

/// Placement of a scene object.
///
/// `up` is the local axis the geometry extrudes along (cylinders grow along
/// it); it is the scene Y axis for objects that do not care.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub up: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            up: Vec3::Y,
        }
    }

    pub fn oriented(position: Vec3, up: Vec3) -> Self {
        Self {
            position,
            up: up.normalize().unwrap_or(Vec3::Y),
        }
    }
}
