//! Tube extrusion along a straight path.

use foundation::math::Vec3;

/// Tube of circular cross-section extruded along the segment `start → end`.
///
/// Vertex layout follows the usual ring-major order: ring `i` (for
/// `i in 0..=tubular_segments`) holds `radial_segments + 1` vertices, the last
/// duplicating the first so the seam can carry its own UVs. Two triangles per
/// quad, counter-clockwise when viewed from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeGeometry {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f64,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TubeGeometry {
    /// Straight tube with a single tubular segment.
    ///
    /// Returns `None` when the path has zero length or the cross-section is
    /// degenerate (`radius <= 0` or fewer than 3 radial segments).
    pub fn along_line(start: Vec3, end: Vec3, radius: f64, radial_segments: u32) -> Option<Self> {
        Self::along_line_segmented(start, end, 1, radius, radial_segments)
    }

    pub fn along_line_segmented(
        start: Vec3,
        end: Vec3,
        tubular_segments: u32,
        radius: f64,
        radial_segments: u32,
    ) -> Option<Self> {
        if radius <= 0.0 || radial_segments < 3 || tubular_segments == 0 {
            return None;
        }
        let tangent = (end - start).normalize()?;
        let (normal, binormal) = frame_for_tangent(tangent);

        let ring = radial_segments as usize + 1;
        let rings = tubular_segments as usize + 1;
        let mut positions = Vec::with_capacity(ring * rings);
        let mut normals = Vec::with_capacity(ring * rings);

        for i in 0..rings {
            let center = start.lerp(end, i as f64 / tubular_segments as f64);
            for j in 0..ring {
                let v = j as f64 / radial_segments as f64 * std::f64::consts::TAU;
                let sin = v.sin();
                let cos = -v.cos();
                let n = (normal.scale(cos) + binormal.scale(sin))
                    .normalize()
                    .unwrap_or(normal);
                normals.push(n);
                positions.push(center + n.scale(radius));
            }
        }

        let stride = ring as u32;
        let mut indices = Vec::with_capacity((tubular_segments * radial_segments * 6) as usize);
        for j in 1..=tubular_segments {
            for i in 1..=radial_segments {
                let a = stride * (j - 1) + (i - 1);
                let b = stride * j + (i - 1);
                let c = stride * j + i;
                let d = stride * (j - 1) + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Some(Self {
            start,
            end,
            radius,
            tubular_segments,
            radial_segments,
            positions,
            normals,
            indices,
        })
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Normal/binormal pair perpendicular to `tangent`, seeded from the axis the
/// tangent is least aligned with.
fn frame_for_tangent(tangent: Vec3) -> (Vec3, Vec3) {
    let (tx, ty, tz) = (tangent.x.abs(), tangent.y.abs(), tangent.z.abs());
    let mut min = f64::MAX;
    let mut seed = Vec3::X;
    if tx <= min {
        min = tx;
        seed = Vec3::X;
    }
    if ty <= min {
        min = ty;
        seed = Vec3::Y;
    }
    if tz <= min {
        seed = Vec3::Z;
    }

    let side = tangent.cross(seed).normalize().unwrap_or(Vec3::Y);
    let normal = tangent.cross(side);
    let binormal = tangent.cross(normal);
    (normal, binormal)
}
