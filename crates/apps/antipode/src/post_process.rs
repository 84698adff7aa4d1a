use foundation::time::Time;
use runtime::{Frame, OneShot, OneShotState};
use scene::{GlobeEngine, World};
use tracing::{debug, info};

use crate::config::PostProcessConfig;

/// Makes every mesh in the scene translucent, once, after the globe has
/// finished building.
#[derive(Debug, Clone)]
pub struct ScenePostProcessor {
    shot: OneShot,
    opacity: f32,
    applied: Option<usize>,
}

impl ScenePostProcessor {
    pub fn new(config: &PostProcessConfig, mounted_at: Time) -> Self {
        Self {
            shot: OneShot::new(config.trigger, mounted_at),
            opacity: config.opacity,
            applied: None,
        }
    }

    pub fn state(&self) -> OneShotState {
        self.shot.state()
    }

    /// Number of meshes updated by the pass, once it has run against a scene.
    pub fn applied(&self) -> Option<usize> {
        self.applied
    }

    pub fn cancel(&mut self) -> bool {
        let cancelled = self.shot.cancel();
        if cancelled {
            debug!("pending scene post-process cancelled");
        }
        cancelled
    }

    /// Polls the trigger and runs the pass on the frame it fires.
    ///
    /// A scene that does not exist yet when the trigger fires is skipped
    /// without retry.
    pub fn tick<E: GlobeEngine + ?Sized>(&mut self, frame: Frame, engine: &mut E) -> Option<usize> {
        let observed = engine.scene().map(World::len);
        if !self.shot.poll(frame, observed) {
            return None;
        }

        let Some(world) = engine.scene_mut() else {
            debug!(frame = frame.index, "scene not ready; post-process skipped");
            return None;
        };
        let updated = apply_transparency(world, self.opacity);
        info!(frame = frame.index, meshes = updated, opacity = self.opacity, "scene made translucent");
        self.applied = Some(updated);
        Some(updated)
    }
}

/// Overrides every mesh material to be transparent at `opacity`.
///
/// Re-running with the same opacity leaves the scene unchanged.
pub fn apply_transparency(world: &mut World, opacity: f32) -> usize {
    let mut updated = 0;
    world.traverse(|node| {
        if node.geometry.is_none() {
            return;
        }
        if let Some(material) = node.material {
            material.set_translucent(opacity);
            updated += 1;
        }
    });
    updated
}
