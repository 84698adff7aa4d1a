//! Beam layer: the tube joining a place to its antipode through the globe.

use foundation::math::{GeoPoint, Vec3};
use scene::components::{Drawable3D, Material, Transform};
use scene::geometry::TubeGeometry;
use scene::{CustomLayer, SceneMesh, ScenePositions};

use crate::symbology::BeamStyle;

pub const BEAM_NODE: &str = "beam";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BeamSpec {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl BeamSpec {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }
}

/// Scene position of `p` according to the engine's own projection.
pub fn map_to_scene_position(
    positions: &dyn ScenePositions,
    p: GeoPoint,
    altitude: f64,
) -> Option<Vec3> {
    positions.project_to_scene(p, altitude)
}

/// Straight tube between two scene positions with an unlit translucent material.
///
/// Either endpoint being absent (engine not ready) yields `None`, as does a
/// zero-length path.
pub fn build_beam_geometry(
    start: Option<Vec3>,
    end: Option<Vec3>,
    style: &BeamStyle,
) -> Option<SceneMesh> {
    let (start, end) = (start?, end?);
    let tube = TubeGeometry::along_line(start, end, style.radius, style.radial_segments)?;
    Some(SceneMesh {
        name: BEAM_NODE.to_string(),
        transform: Transform::identity(),
        geometry: Drawable3D::tube(tube),
        material: Material::unlit(style.color).translucent(style.opacity),
    })
}

/// Per-datum factory: projects both ends and builds a fresh beam mesh.
pub fn beam_object(
    spec: &BeamSpec,
    positions: &dyn ScenePositions,
    style: &BeamStyle,
) -> Option<SceneMesh> {
    let start = map_to_scene_position(positions, spec.start, style.altitude);
    let end = map_to_scene_position(positions, spec.end, style.altitude);
    build_beam_geometry(start, end, style)
}

/// Custom-layer binding for a beam list (zero or one element in practice).
pub fn beam_layer(beams: Vec<BeamSpec>, style: BeamStyle) -> CustomLayer {
    CustomLayer::new(beams, move |spec: &BeamSpec, positions: &dyn ScenePositions| {
        beam_object(spec, positions, &style)
    })
}
