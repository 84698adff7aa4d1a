use crate::components::{Drawable3D, Material, Transform};
use crate::entity::EntityId;
use foundation::handles::Handle;

/// Live scene graph.
///
/// Flat component storage indexed by entity slot. Slots are recycled after
/// [`World::despawn`]; the generation in [`EntityId`] keeps stale ids from
/// aliasing the new occupant.
#[derive(Debug, Default)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    names: Vec<Option<String>>,
    transforms: Vec<Option<Transform>>,
    drawables_3d: Vec<Option<Drawable3D>>,
    materials: Vec<Option<Material>>,
}

/// Mutable view of one object during [`World::traverse`].
pub struct SceneNodeMut<'a> {
    pub entity: EntityId,
    pub name: Option<&'a str>,
    pub geometry: Option<&'a Drawable3D>,
    pub material: Option<&'a mut Material>,
}

impl SceneNodeMut<'_> {
    /// Renderable objects carry both geometry and a material; lights and
    /// groups carry neither.
    pub fn is_mesh(&self) -> bool {
        self.geometry.is_some() && self.material.is_some()
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        if let Some(idx) = self.free.pop() {
            let i = idx as usize;
            self.alive[i] = true;
            return EntityId(Handle::new(idx, self.generations[i]));
        }

        let idx = self.generations.len();
        self.generations.push(0);
        self.alive.push(true);
        self.names.push(None);
        self.transforms.push(None);
        self.drawables_3d.push(None);
        self.materials.push(None);
        EntityId(Handle::new(idx as u32, 0))
    }

    pub fn spawn_named(&mut self, name: impl Into<String>) -> EntityId {
        let entity = self.spawn();
        self.set_name(entity, name);
        entity
    }

    /// Removes an entity and all of its components. Returns `false` for stale ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(i) = self.slot(entity) else {
            return false;
        };
        self.alive[i] = false;
        self.generations[i] = self.generations[i].wrapping_add(1);
        self.names[i] = None;
        self.transforms[i] = None;
        self.drawables_3d[i] = None;
        self.materials[i] = None;
        self.free.push(i as u32);
        true
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        if let Some(i) = self.slot(entity) {
            self.names[i] = Some(name.into());
        }
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        if let Some(i) = self.slot(entity) {
            self.transforms[i] = Some(transform);
        }
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        if let Some(i) = self.slot(entity) {
            self.drawables_3d[i] = Some(drawable);
        }
    }

    pub fn set_material(&mut self, entity: EntityId, material: Material) {
        if let Some(i) = self.slot(entity) {
            self.materials[i] = Some(material);
        }
    }

    pub fn name(&self, entity: EntityId) -> Option<&str> {
        self.slot(entity).and_then(|i| self.names[i].as_deref())
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.slot(entity).and_then(|i| self.transforms[i])
    }

    pub fn drawable_3d(&self, entity: EntityId) -> Option<&Drawable3D> {
        self.slot(entity).and_then(|i| self.drawables_3d[i].as_ref())
    }

    pub fn material(&self, entity: EntityId) -> Option<&Material> {
        self.slot(entity).and_then(|i| self.materials[i].as_ref())
    }

    /// Live entities whose name starts with `prefix`, in slot order.
    pub fn find_by_name_prefix(&self, prefix: &str) -> Vec<EntityId> {
        self.live_entities()
            .filter(|e| self.name(*e).is_some_and(|n| n.starts_with(prefix)))
            .collect()
    }

    /// Meshes with their placement, in slot order.
    pub fn meshes(&self) -> Vec<(EntityId, Transform, &Drawable3D, &Material)> {
        let mut out = Vec::new();
        for entity in self.live_entities() {
            let i = entity.index() as usize;
            let (Some(drawable), Some(material)) = (&self.drawables_3d[i], &self.materials[i])
            else {
                continue;
            };
            let transform = self.transforms[i].unwrap_or_else(Transform::identity);
            out.push((entity, transform, drawable, material));
        }
        out
    }

    /// Visits every live object, meshes and non-meshes alike, in slot order.
    pub fn traverse(&mut self, mut visit: impl FnMut(SceneNodeMut<'_>)) {
        let slots = self
            .alive
            .iter()
            .zip(&self.generations)
            .zip(&self.names)
            .zip(&self.drawables_3d)
            .zip(self.materials.iter_mut());

        for (idx, ((((alive, generation), name), geometry), material)) in slots.enumerate() {
            if !*alive {
                continue;
            }
            visit(SceneNodeMut {
                entity: EntityId(Handle::new(idx as u32, *generation)),
                name: name.as_deref(),
                geometry: geometry.as_ref(),
                material: material.as_mut(),
            });
        }
    }

    fn live_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(idx, (_, generation))| EntityId(Handle::new(idx as u32, *generation)))
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let i = entity.index() as usize;
        let live = self.alive.get(i).copied().unwrap_or(false);
        (live && self.generations[i] == entity.generation()).then_some(i)
    }
}
