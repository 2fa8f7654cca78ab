//! Stress test - randomly toggles, despawns, and respawns virtual cameras
//! each tick to surface arbitration crashes and invariant breaks.
//!
//! Run: cargo test --test rig_stress

use std::time::Duration;

use bevy::math::curve::EaseFunction;
use bevy::prelude::*;
use bevy_camera_rig::{CameraBrain, CameraRig, CameraRigPlugin, TransitionSpec, VirtualCamera};
use rand::prelude::*;
use rand::rngs::StdRng;

const CAMERA_COUNT: usize = 8;
const TICKS: usize = 400;

struct Tracked {
  entity: Entity,
  priority: i32,
  enabled: bool,
}

struct TestHarness {
  app: App,
  brain: Entity,
  cameras: Vec<Tracked>,
}

impl TestHarness {
  fn new(rng: &mut StdRng) -> Self {
    let mut app = App::new();
    app.add_plugins(bevy::transform::TransformPlugin);
    app.add_plugins(CameraRigPlugin);

    let brain = app
      .world_mut()
      .spawn((
        CameraBrain {
          default_transition: TransitionSpec::ease(EaseFunction::QuadraticOut, 0.3),
          use_real_time: false,
        },
        Transform::default(),
      ))
      .id();

    let mut harness = Self {
      app,
      brain,
      cameras: Vec::new(),
    };
    for _ in 0..CAMERA_COUNT {
      harness.spawn_random_camera(rng);
    }
    harness
  }

  fn spawn_random_camera(&mut self, rng: &mut StdRng) {
    let priority = rng.gen_range(-10..100);
    let position = Vec3::new(
      rng.gen_range(-100.0..100.0),
      rng.gen_range(-100.0..100.0),
      rng.gen_range(-100.0..100.0),
    );
    let entity = self
      .app
      .world_mut()
      .spawn((VirtualCamera::new(priority), Transform::from_translation(position)))
      .id();
    self.cameras.push(Tracked {
      entity,
      priority,
      enabled: true,
    });
  }

  fn tick(&mut self, seconds: f32) {
    self
      .app
      .world_mut()
      .resource_mut::<Time>()
      .advance_by(Duration::from_secs_f32(seconds));
    self.app.update();
  }

  fn assert_invariants(&mut self) {
    let translation = self
      .app
      .world()
      .get::<Transform>(self.brain)
      .unwrap()
      .translation;
    assert!(translation.is_finite(), "brain pose went non-finite");

    let rig = self.app.world().resource::<CameraRig>();
    assert!(!rig.is_dirty(), "drive left the rig dirty");

    // Stack holds exactly the live enabled cameras, ascending by
    // priority, with the resolved target at the tail.
    let stacked: Vec<Entity> = rig.stack().collect();
    let expected: Vec<Entity> = self
      .cameras
      .iter()
      .filter(|tracked| tracked.enabled)
      .map(|tracked| tracked.entity)
      .collect();
    assert_eq!(stacked.len(), expected.len());
    for tracked in &self.cameras {
      assert_eq!(rig.contains(tracked.entity), tracked.enabled);
    }

    let priorities: Vec<i32> = stacked
      .iter()
      .map(|entity| {
        self
          .cameras
          .iter()
          .find(|tracked| tracked.entity == *entity)
          .expect("stacked entity is tracked")
          .priority
      })
      .collect();
    assert!(
      priorities.windows(2).all(|pair| pair[0] <= pair[1]),
      "stack out of priority order: {priorities:?}"
    );

    if let Some(top) = stacked.last() {
      assert_eq!(rig.current(), Some(*top));
    }
  }
}

#[test]
fn test_random_activation_storm_keeps_invariants() {
  let mut rng = StdRng::seed_from_u64(0xCA13E7A);
  let mut harness = TestHarness::new(&mut rng);

  for _ in 0..TICKS {
    match rng.gen_range(0..10) {
      // Toggle a random camera.
      0..=5 => {
        let index = rng.gen_range(0..harness.cameras.len());
        let tracked = &mut harness.cameras[index];
        tracked.enabled = !tracked.enabled;
        let enabled = tracked.enabled;
        let entity = tracked.entity;
        harness
          .app
          .world_mut()
          .get_mut::<VirtualCamera>(entity)
          .unwrap()
          .enabled = enabled;
      }
      // Despawn one and replace it with a fresh camera.
      6..=7 => {
        let index = rng.gen_range(0..harness.cameras.len());
        let tracked = harness.cameras.swap_remove(index);
        harness.app.world_mut().despawn(tracked.entity);
        harness.spawn_random_camera(&mut rng);
      }
      // Let a few frames pass untouched.
      _ => {}
    }

    harness.tick(rng.gen_range(0.0..0.1));
    harness.assert_invariants();
  }
}
