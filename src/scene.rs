//! Demo scene: spinning objects, a ray-tracer style triangle gather, and
//! steady object churn to keep id recycling busy.

use std::f32::consts::TAU;
use std::sync::Arc;

use anyhow::{Context, Result};
use ember_core::{Material, Quat, Transform, Vec3};
use ember_ecs::{Coordinator, GameObject, SystemHandle, SystemSchedule};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::settings::SceneSettings;

/// Radians per frame around the local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin(pub f32);

/// A world-space triangle handed to the ray tracer.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub material: Material,
}

impl Triangle {
    pub fn area(&self) -> f32 {
        0.5 * (self.p1 - self.p0).cross(self.p2 - self.p0).length()
    }
}

/// Per-frame numbers collected by the systems.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub spun: usize,
    pub triangles: Vec<Triangle>,
}

const UNIT_TRIANGLE: [Vec3; 3] = [
    Vec3::new(-0.5, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

pub struct Scene {
    coordinator: Coordinator,
    schedule: SystemSchedule,
    renderable: SystemHandle,
    stats: Arc<Mutex<FrameStats>>,
    settings: SceneSettings,
    rng: StdRng,
    spawned: usize,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Result<Self> {
        let mut coordinator = Coordinator::new();
        let spinning = coordinator.register_system_for::<(Transform, Spin)>()?;
        let renderable = coordinator.register_system_for::<(Transform, Material)>()?;
        let stats = Arc::new(Mutex::new(FrameStats::default()));

        let mut schedule = SystemSchedule::new();
        let spin_stats = stats.clone();
        schedule.add_system(
            spinning,
            move |ecs: &mut Coordinator, members: &[GameObject]| {
                for &object in members {
                    let Ok(&Spin(rate)) = ecs.get_component::<Spin>(object) else {
                        continue;
                    };
                    if let Ok(transform) = ecs.get_component_mut::<Transform>(object) {
                        transform.rotate(Quat::from_rotation_y(rate));
                    }
                }
                spin_stats.lock().spun = members.len();
            },
        );
        let gather_stats = stats.clone();
        schedule.add_system(
            renderable,
            move |ecs: &mut Coordinator, members: &[GameObject]| {
                let mut triangles = Vec::with_capacity(members.len());
                for &object in members {
                    let (Ok(transform), Ok(material)) = (
                        ecs.get_component::<Transform>(object),
                        ecs.get_component::<Material>(object),
                    ) else {
                        continue;
                    };
                    let model = transform.matrix();
                    let [p0, p1, p2] = UNIT_TRIANGLE.map(|p| model.transform_point3(p));
                    triangles.push(Triangle {
                        p0,
                        p1,
                        p2,
                        material: *material,
                    });
                }
                gather_stats.lock().triangles = triangles;
            },
        );

        let rng = StdRng::seed_from_u64(settings.seed);
        let mut scene = Self {
            coordinator,
            schedule,
            renderable,
            stats,
            settings,
            rng,
            spawned: 0,
        };
        for _ in 0..scene.settings.objects {
            scene.spawn()?;
        }
        info!(
            objects = scene.coordinator.object_count(),
            renderable = scene.coordinator.members(renderable)?.len(),
            "scene populated"
        );
        Ok(scene)
    }

    /// Create one object laid out on a square grid.
    fn spawn(&mut self) -> Result<GameObject> {
        let index = self.spawned;
        self.spawned += 1;

        let side = (self.settings.objects.max(1) as f32).sqrt().ceil() as usize;
        let position = Vec3::new(
            (index % side) as f32 * self.settings.spacing,
            0.0,
            (index / side % side) as f32 * self.settings.spacing,
        );
        let ecs = &mut self.coordinator;
        let object = ecs.create_object().context("Failed to spawn scene object")?;
        let heading = Vec3::new(0.0, self.rng.gen_range(0.0..TAU), 0.0);
        ecs.add_component(object, Transform::from_euler(position, heading, Vec3::ONE))?;
        ecs.add_component(object, Spin(self.rng.gen_range(-0.05..0.05)))?;
        if self.settings.material_every > 0 && index % self.settings.material_every == 0 {
            ecs.add_component(object, self.settings.material)?;
        }
        Ok(object)
    }

    /// Destroy the lowest-id object and spawn a replacement.
    fn churn(&mut self) -> Result<()> {
        let Some(victim) = self
            .coordinator
            .iter_components::<Transform>()
            .map(|(object, _)| object)
            .min()
        else {
            return Ok(());
        };
        self.coordinator.destroy_object(victim)?;
        let replacement = self.spawn()?;
        debug!(%victim, %replacement, "churned object");
        Ok(())
    }

    /// Advance one frame and return what the systems produced.
    pub fn step(&mut self, frame: u32) -> Result<FrameStats> {
        if self.settings.churn_every > 0 && frame > 0 && frame % self.settings.churn_every == 0 {
            self.churn()?;
        }
        self.schedule.run_all(&mut self.coordinator)?;
        Ok(std::mem::take(&mut *self.stats.lock()))
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn renderable(&self) -> SystemHandle {
        self.renderable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SceneSettings {
        SceneSettings {
            objects: 9,
            frames: 4,
            material_every: 3,
            churn_every: 2,
            ..Default::default()
        }
    }

    #[test]
    fn populates_and_gathers() {
        let mut scene = Scene::new(small()).unwrap();
        assert_eq!(scene.coordinator().object_count(), 9);
        assert_eq!(scene.coordinator().members(scene.renderable()).unwrap().len(), 3);

        let stats = scene.step(0).unwrap();
        assert_eq!(stats.spun, 9);
        assert_eq!(stats.triangles.len(), 3);
    }

    #[test]
    fn churn_keeps_population() {
        let mut scene = Scene::new(small()).unwrap();
        for frame in 0..6 {
            scene.step(frame).unwrap();
        }
        assert_eq!(scene.coordinator().object_count(), 9);
        // Ids 0 and 1 were churned out and wait behind every never-used id.
        assert!(!scene.coordinator().is_alive(GameObject::from_raw(0)));
        assert!(scene.coordinator().is_alive(GameObject::from_raw(9)));
    }

    #[test]
    fn triangles_follow_transforms() {
        let settings = SceneSettings {
            objects: 1,
            material_every: 1,
            churn_every: 0,
            ..Default::default()
        };
        let mut scene = Scene::new(settings).unwrap();
        let stats = scene.step(0).unwrap();
        let triangle = stats.triangles[0];
        // Object 0 sits at the origin; any heading about Y keeps the apex in place.
        assert!((triangle.p2 - Vec3::Y).length() < 1e-5);
        assert!(triangle.p0.y.abs() < 1e-5);
        assert!((triangle.area() - 0.5).abs() < 1e-5);
    }
}
