use foundation::math::Vec3;

use crate::World;
use crate::components::{Color, Drawable3D, Material, Transform};
use crate::entity::EntityId;

pub const GLOBE_NODE: &str = "globe";
pub const ATMOSPHERE_NODE: &str = "atmosphere";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlobeEntities {
    pub globe: EntityId,
    pub atmosphere: Option<EntityId>,
    pub lights: [EntityId; 2],
}

/// Spawns the globe sphere, its atmosphere shell and the scene lights.
///
/// Lights are plain nodes without geometry or material.
pub fn spawn_globe(
    world: &mut World,
    radius: f64,
    segments: u32,
    atmosphere_altitude: Option<f64>,
) -> GlobeEntities {
    let globe = world.spawn_named(GLOBE_NODE);
    world.set_transform(globe, Transform::identity());
    world.set_drawable_3d(globe, Drawable3D::sphere(radius, segments));
    world.set_material(globe, Material::lit(Color::WHITE));

    let atmosphere = atmosphere_altitude.map(|alt| {
        let shell = world.spawn_named(ATMOSPHERE_NODE);
        world.set_transform(shell, Transform::identity());
        world.set_drawable_3d(shell, Drawable3D::sphere(radius * (1.0 + alt), segments));
        world.set_material(
            shell,
            Material::unlit(Color::from_u32(0xadd8e6)).translucent(0.7),
        );
        shell
    });

    let ambient = world.spawn_named("ambient-light");
    let sun = world.spawn_named("directional-light");
    world.set_transform(sun, Transform::translate(Vec3::new(1.0, 1.0, 1.0).scale(radius)));

    GlobeEntities {
        globe,
        atmosphere,
        lights: [ambient, sun],
    }
}
