use crate::geometry::TubeGeometry;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape3D {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    /// Upright cylinder with its base at the transform origin, growing along
    /// `Transform::up`.
    Cylinder {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Tube(TubeGeometry),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
}

impl Drawable3D {
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self {
            shape: Shape3D::Sphere {
                radius,
                width_segments: segments,
                height_segments: segments,
            },
        }
    }

    pub fn cylinder(radius: f64, height: f64, radial_segments: u32) -> Self {
        Self {
            shape: Shape3D::Cylinder {
                radius,
                height,
                radial_segments,
            },
        }
    }

    pub fn tube(geometry: TubeGeometry) -> Self {
        Self {
            shape: Shape3D::Tube(geometry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable3D, Shape3D};

    #[test]
    fn create_sphere_drawable() {
        let drawable = Drawable3D::sphere(1.5, 32);
        assert!(matches!(
            drawable.shape,
            Shape3D::Sphere {
                width_segments: 32,
                height_segments: 32,
                ..
            }
        ));
    }
}
