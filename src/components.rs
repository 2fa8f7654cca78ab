//! Components for virtual cameras and the physical camera sink.

use bevy::prelude::*;

use crate::transition::TransitionSpec;

/// A prioritized camera definition that does not itself render.
///
/// While enabled it sits in the [`CameraRig`](crate::CameraRig) stack; when
/// it is the highest-priority entry its composed pose is written onto the
/// [`CameraBrain`] every frame. Disabling a camera removes it from the
/// stack but keeps the entity intact, so a blend *away* from it can still
/// compose its pose.
#[derive(Component, Debug, Clone)]
pub struct VirtualCamera {
  /// Whether this camera participates in the stack.
  pub enabled: bool,
  /// This camera's priority in the stack. Higher wins; ties go to the
  /// most recently activated.
  pub priority: i32,
  /// Horizontal field of view in degrees, in `[0, 180]`.
  pub field_of_view: f32,
  /// Target tracked by extensions such as [`HardLock`](crate::HardLock).
  /// Doubles as the look target by default.
  pub tracking_target: Option<Entity>,
  /// Explicit look target for aim-style extensions, when the tracking
  /// target should not be looked at directly.
  pub look_target: Option<Entity>,
  /// Transition used when switching *to* this camera. Falls back to the
  /// brain's default when `None`.
  pub custom_transition: Option<TransitionSpec>,
}

impl VirtualCamera {
  /// Default priority for player-follow cameras.
  pub const PRIORITY_PLAYER: i32 = 0;
  /// Priority for cutscenes and scripted sequences.
  pub const PRIORITY_CUTSCENE: i32 = 50;
  /// Priority for debug controllers.
  pub const PRIORITY_DEBUG: i32 = 100;

  /// Creates an enabled camera with the given priority and a 90 degree
  /// field of view.
  pub fn new(priority: i32) -> Self {
    Self {
      enabled: true,
      priority,
      field_of_view: 90.0,
      tracking_target: None,
      look_target: None,
      custom_transition: None,
    }
  }

  /// Sets the field of view in degrees, clamped to `[0, 180]`.
  pub fn with_field_of_view(mut self, degrees: f32) -> Self {
    self.field_of_view = degrees.clamp(0.0, 180.0);
    self
  }

  /// Sets the tracking target.
  pub fn with_tracking_target(mut self, target: Entity) -> Self {
    self.tracking_target = Some(target);
    self
  }

  /// Sets the look target.
  pub fn with_look_target(mut self, target: Entity) -> Self {
    self.look_target = Some(target);
    self
  }

  /// Overrides the transition used when switching to this camera.
  pub fn with_transition(mut self, spec: TransitionSpec) -> Self {
    self.custom_transition = Some(spec);
    self
  }
}

impl Default for VirtualCamera {
  fn default() -> Self {
    Self::new(Self::PRIORITY_PLAYER)
  }
}

/// Marks the physical camera the rig writes into.
///
/// Pure data sink: the rig assigns this entity's `Transform` (and
/// perspective fov, when a `Projection` is present) every frame and reads
/// nothing back. Exactly one brain is expected in the scene.
#[derive(Component, Debug, Clone)]
pub struct CameraBrain {
  /// Transition used when the incoming camera has no custom one.
  pub default_transition: TransitionSpec,
  /// Drive blends with real (unscaled) time instead of virtual time.
  pub use_real_time: bool,
}

impl Default for CameraBrain {
  fn default() -> Self {
    Self {
      default_transition: TransitionSpec::default(),
      use_real_time: true,
    }
  }
}

impl CameraBrain {
  /// Creates a brain with the given default transition.
  pub fn with_default_transition(spec: TransitionSpec) -> Self {
    Self {
      default_transition: spec,
      ..Default::default()
    }
  }
}
