//! In-process globe engine.
//!
//! [`Globe`] owns the live [`World`], the camera and two data-bound layers:
//! a point layer (one radial cylinder per [`PointDatum`]) and a custom
//! per-datum object layer whose meshes come from a caller-supplied factory.
//! Layer data is applied on the next [`GlobeEngine::tick`]; previous objects
//! are despawned before their replacements spawn, so rebinding never
//! accumulates.

use foundation::math::{GeoPoint, Vec3};
use foundation::time::Time;
use runtime::frame::Frame;

use crate::World;
use crate::camera::{Camera, PointOfView};
use crate::components::{Color, Drawable3D, Material, Transform};
use crate::entity::EntityId;
use crate::prefabs::{GlobeEntities, spawn_globe};
use crate::projection::{GLOBE_RADIUS, ScenePositions, SphereProjection, polar_to_cartesian};

pub const POINT_NODE_PREFIX: &str = "point:";

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    pub radius: f64,
    pub sphere_segments: u32,
    /// Frames spent constructing the scene before projections are available.
    pub build_frames: u32,
    /// Atmosphere shell height as a fraction of the radius; `None` disables it.
    pub atmosphere_altitude: Option<f64>,
    pub point_radial_segments: u32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: GLOBE_RADIUS,
            sphere_segments: 75,
            build_frames: 3,
            atmosphere_altitude: Some(0.15),
            point_radial_segments: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointDatum {
    pub point: GeoPoint,
    /// Angular radius in degrees.
    pub radius_deg: f64,
    /// Height as a fraction of the globe radius.
    pub altitude: f64,
    pub color: Color,
    pub label: String,
}

/// A renderable object produced by a layer factory. Ownership passes to the
/// engine when it is spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    pub name: String,
    pub transform: Transform,
    pub geometry: Drawable3D,
    pub material: Material,
}

type LayerBuild = Box<dyn Fn(&dyn ScenePositions) -> Vec<Option<SceneMesh>>>;

/// Data plus per-datum factory for the custom object layer.
pub struct CustomLayer {
    build: LayerBuild,
    len: usize,
}

impl CustomLayer {
    pub fn new<T, F>(data: Vec<T>, factory: F) -> Self
    where
        T: 'static,
        F: Fn(&T, &dyn ScenePositions) -> Option<SceneMesh> + 'static,
    {
        let len = data.len();
        Self {
            build: Box::new(move |positions: &dyn ScenePositions| -> Vec<Option<SceneMesh>> {
                data.iter().map(|d| factory(d, positions)).collect()
            }),
            len,
        }
    }

    pub fn empty() -> Self {
        Self {
            build: Box::new(|_: &dyn ScenePositions| -> Vec<Option<SceneMesh>> { Vec::new() }),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for CustomLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomLayer").field("len", &self.len).finish()
    }
}

/// Contract between the application and the globe engine.
///
/// Everything that touches the scene is a no-op before [`is_ready`] turns
/// true: projections return `None`, camera requests are dropped and
/// `scene`/`scene_mut` return `None`. Layer data is retained and applied once
/// the scene exists.
///
/// [`is_ready`]: GlobeEngine::is_ready
pub trait GlobeEngine: ScenePositions {
    fn is_ready(&self) -> bool;
    fn set_points_data(&mut self, points: Vec<PointDatum>);
    fn set_custom_layer(&mut self, layer: CustomLayer);
    /// Returns `false` when the request was dropped because the scene is not built.
    fn transition_camera(&mut self, pov: PointOfView, duration_ms: u64) -> bool;
    fn camera(&self) -> &Camera;
    fn scene(&self) -> Option<&World>;
    fn scene_mut(&mut self) -> Option<&mut World>;
    fn tick(&mut self, frame: Frame);
}

#[derive(Debug)]
pub struct Globe {
    config: GlobeConfig,
    world: World,
    frames_built: u32,
    entities: Option<GlobeEntities>,
    camera: Camera,
    now: Time,
    points: Vec<PointDatum>,
    points_dirty: bool,
    point_entities: Vec<EntityId>,
    custom: CustomLayer,
    custom_dirty: bool,
    custom_entities: Vec<EntityId>,
    factory_invocations: u64,
}

impl Globe {
    pub fn new(config: GlobeConfig) -> Self {
        Self {
            config,
            world: World::new(),
            frames_built: 0,
            entities: None,
            camera: Camera::default(),
            now: Time(0.0),
            points: Vec::new(),
            points_dirty: false,
            point_entities: Vec::new(),
            custom: CustomLayer::empty(),
            custom_dirty: false,
            custom_entities: Vec::new(),
            factory_invocations: 0,
        }
    }

    /// Live objects currently owned by the custom layer.
    pub fn custom_objects(&self) -> &[EntityId] {
        &self.custom_entities
    }

    pub fn point_objects(&self) -> &[EntityId] {
        &self.point_entities
    }

    /// Total number of per-datum factory calls made so far.
    pub fn factory_invocations(&self) -> u64 {
        self.factory_invocations
    }

    fn projection(&self) -> SphereProjection {
        SphereProjection {
            radius: self.config.radius,
            ready: self.entities.is_some(),
        }
    }

    fn rebuild_points(&mut self) {
        for e in self.point_entities.drain(..) {
            self.world.despawn(e);
        }
        let radius = self.config.radius;
        for datum in &self.points {
            let base = polar_to_cartesian(datum.point, 0.0, radius);
            let entity = self
                .world
                .spawn_named(format!("{POINT_NODE_PREFIX}{}", datum.label));
            self.world.set_transform(entity, Transform::oriented(base, base));
            self.world.set_drawable_3d(
                entity,
                Drawable3D::cylinder(
                    datum.radius_deg.to_radians() * radius,
                    (datum.altitude * radius).max(0.1),
                    self.config.point_radial_segments,
                ),
            );
            self.world.set_material(entity, Material::lit(datum.color));
            self.point_entities.push(entity);
        }
        self.points_dirty = false;
    }

    fn rebuild_custom(&mut self) {
        for e in self.custom_entities.drain(..) {
            self.world.despawn(e);
        }
        let projection = self.projection();
        let built = (self.custom.build)(&projection);
        self.factory_invocations += built.len() as u64;

        let mut missing = false;
        for mesh in built {
            let Some(mesh) = mesh else {
                missing = true;
                continue;
            };
            let entity = self.world.spawn_named(mesh.name);
            self.world.set_transform(entity, mesh.transform);
            self.world.set_drawable_3d(entity, mesh.geometry);
            self.world.set_material(entity, mesh.material);
            self.custom_entities.push(entity);
        }
        // Factories that declined this pass get another chance next frame.
        self.custom_dirty = missing;
    }
}

impl Default for Globe {
    fn default() -> Self {
        Self::new(GlobeConfig::default())
    }
}

impl ScenePositions for Globe {
    fn project_to_scene(&self, point: GeoPoint, altitude: f64) -> Option<Vec3> {
        self.projection().project_to_scene(point, altitude)
    }
}

impl GlobeEngine for Globe {
    fn is_ready(&self) -> bool {
        self.entities.is_some()
    }

    fn set_points_data(&mut self, points: Vec<PointDatum>) {
        self.points = points;
        self.points_dirty = true;
    }

    fn set_custom_layer(&mut self, layer: CustomLayer) {
        self.custom = layer;
        self.custom_dirty = true;
    }

    fn transition_camera(&mut self, pov: PointOfView, duration_ms: u64) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.camera.transition_to(pov, duration_ms, self.now);
        true
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn scene(&self) -> Option<&World> {
        self.is_ready().then_some(&self.world)
    }

    fn scene_mut(&mut self) -> Option<&mut World> {
        if self.is_ready() {
            Some(&mut self.world)
        } else {
            None
        }
    }

    fn tick(&mut self, frame: Frame) {
        self.now = frame.time;

        if self.entities.is_none() {
            self.frames_built += 1;
            if self.frames_built < self.config.build_frames {
                return;
            }
            self.entities = Some(spawn_globe(
                &mut self.world,
                self.config.radius,
                self.config.sphere_segments,
                self.config.atmosphere_altitude,
            ));
        }

        self.camera.update(self.now);
        if self.points_dirty {
            self.rebuild_points();
        }
        if self.custom_dirty {
            self.rebuild_custom();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomLayer, Globe, GlobeConfig, GlobeEngine, PointDatum, SceneMesh};
    use crate::camera::PointOfView;
    use crate::components::{Color, Drawable3D, Material, Transform};
    use crate::projection::ScenePositions;
    use foundation::math::{GeoPoint, Vec3};
    use runtime::frame::Frame;

    fn ready_globe() -> (Globe, Frame) {
        let mut globe = Globe::new(GlobeConfig {
            build_frames: 2,
            ..GlobeConfig::default()
        });
        let mut frame = Frame::new(0, 0.1);
        while !globe.is_ready() {
            globe.tick(frame);
            frame = frame.next();
        }
        (globe, frame)
    }

    fn marker_mesh(at: &GeoPoint, positions: &dyn ScenePositions) -> Option<SceneMesh> {
        let p = positions.project_to_scene(*at, 0.0)?;
        Some(SceneMesh {
            name: "marker".to_string(),
            transform: Transform::translate(p),
            geometry: Drawable3D::sphere(1.0, 8),
            material: Material::unlit(Color::WHITE),
        })
    }

    #[test]
    fn scene_is_absent_while_constructing() {
        let mut globe = Globe::new(GlobeConfig {
            build_frames: 3,
            ..GlobeConfig::default()
        });
        globe.tick(Frame::new(0, 0.1));
        assert!(!globe.is_ready());
        assert!(globe.scene().is_none());
        assert!(globe.scene_mut().is_none());
        assert!(globe.project_to_scene(GeoPoint::new(0.0, 0.0), 0.0).is_none());
        assert!(!globe.transition_camera(PointOfView::new(0.0, 10.0, 2.5), 100));

        globe.tick(Frame::new(1, 0.1));
        globe.tick(Frame::new(2, 0.1));
        assert!(globe.is_ready());
        assert!(globe.scene().is_some());
        // Globe, atmosphere and two lights.
        assert_eq!(globe.scene().unwrap().len(), 4);
    }

    #[test]
    fn points_replace_previous_set() {
        let (mut globe, frame) = ready_globe();
        let datum = |label: &str, lon: f64| PointDatum {
            point: GeoPoint::new(0.0, lon),
            radius_deg: 0.5,
            altitude: 0.02,
            color: Color::WHITE,
            label: label.to_string(),
        };
        globe.set_points_data(vec![datum("a", 0.0), datum("b", 90.0)]);
        globe.tick(frame);
        globe.set_points_data(vec![datum("c", 10.0), datum("d", -90.0)]);
        globe.tick(frame.next());

        let world = globe.scene().unwrap();
        assert_eq!(world.find_by_name_prefix("point:").len(), 2);
        assert_eq!(globe.point_objects().len(), 2);
        let first = globe.point_objects()[0];
        assert_eq!(world.name(first), Some("point:c"));
    }

    #[test]
    fn custom_layer_applied_once_ready() {
        let mut globe = Globe::new(GlobeConfig {
            build_frames: 2,
            ..GlobeConfig::default()
        });
        globe.set_custom_layer(CustomLayer::new(vec![GeoPoint::new(0.0, 0.0)], marker_mesh));
        globe.tick(Frame::new(0, 0.1));
        assert_eq!(globe.factory_invocations(), 0);
        globe.tick(Frame::new(1, 0.1));
        assert_eq!(globe.custom_objects().len(), 1);

        let obj = globe.custom_objects()[0];
        let pos = globe.scene().unwrap().transform(obj).unwrap().position;
        assert!(pos.distance(Vec3::new(0.0, 0.0, 100.0)) < 1e-9);
    }

    #[test]
    fn rebinding_does_not_leak_objects() {
        let (mut globe, mut frame) = ready_globe();
        let baseline = globe.scene().unwrap().len();
        for i in 0..10 {
            let data = vec![GeoPoint::new(0.0, i as f64)];
            globe.set_custom_layer(CustomLayer::new(data, marker_mesh));
            globe.tick(frame);
            frame = frame.next();
        }
        assert_eq!(globe.scene().unwrap().len(), baseline + 1);
        assert_eq!(globe.factory_invocations(), 10);

        globe.set_custom_layer(CustomLayer::empty());
        globe.tick(frame);
        assert_eq!(globe.scene().unwrap().len(), baseline);
    }

    #[test]
    fn declining_factory_is_retried() {
        let (mut globe, frame) = ready_globe();
        globe.set_custom_layer(CustomLayer::new(vec![()], |_: &(), _: &dyn ScenePositions| None));
        globe.tick(frame);
        globe.tick(frame.next());
        assert_eq!(globe.factory_invocations(), 2);
        assert!(globe.custom_objects().is_empty());
    }

    #[test]
    fn camera_transition_runs_on_engine_time() {
        let (mut globe, frame) = ready_globe();
        globe.tick(frame);
        let target = PointOfView::new(0.0, 45.0, 2.5);
        assert!(globe.transition_camera(target, 2000));
        let mut f = frame;
        for _ in 0..25 {
            f = f.next();
            globe.tick(f);
        }
        assert_eq!(globe.camera().pov(), target);
    }
}
