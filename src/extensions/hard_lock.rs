//! Hard lock: pins the camera to its tracking target at a bound offset.

use bevy::prelude::*;

use super::CameraPose;
use crate::components::VirtualCamera;

/// How the target's orientation is applied when reproducing the bound
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientMode {
  /// The target's orientation is ignored; the world-space offset from
  /// bind time is reproduced as-is.
  None,
  /// The target's orientation rotates the offset but the camera's own
  /// rotation is left alone.
  NoRotation,
  /// The target's orientation drives both position and rotation.
  #[default]
  Full,
}

/// Offset captured relative to the target at bind time.
#[derive(Debug, Clone, Copy)]
struct Binding {
  target: Entity,
  /// World-space offset, for [`OrientMode::None`].
  relative_position: Vec3,
  /// Offset in the target's local frame.
  local_position: Vec3,
  /// Camera rotation in the target's local frame.
  local_rotation: Quat,
}

/// Locks the camera to the [`VirtualCamera::tracking_target`].
///
/// On first sight of a valid target (or whenever the target reference
/// changes) it records the current offset between camera and target, then
/// reproduces that offset against the target's live pose every frame.
/// Without a valid target it stays unbound and contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardLock {
  /// Orientation handling.
  pub orient: OrientMode,
  binding: Option<Binding>,
}

impl HardLock {
  pub fn new(orient: OrientMode) -> Self {
    Self {
      orient,
      binding: None,
    }
  }

  /// Returns true once a target offset has been captured.
  pub fn is_bound(&self) -> bool {
    self.binding.is_some()
  }

  fn bind(
    &mut self,
    target: Entity,
    camera_position: Vec3,
    camera_rotation: Quat,
    target_position: Vec3,
    target_rotation: Quat,
  ) {
    let inverse = target_rotation.inverse();
    self.binding = Some(Binding {
      target,
      relative_position: camera_position - target_position,
      local_position: inverse * (camera_position - target_position),
      local_rotation: inverse * camera_rotation,
    });
  }

  pub(super) fn initialize(
    &mut self,
    camera: &VirtualCamera,
    pose: &CameraPose,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) {
    let Some(target) = camera.tracking_target else {
      return;
    };
    let Some((target_position, target_rotation)) = target_pose(target) else {
      return;
    };
    self.bind(
      target,
      pose.base_position,
      pose.base_rotation,
      target_position,
      target_rotation,
    );
  }

  pub(super) fn update(
    &mut self,
    camera: &VirtualCamera,
    pose: &mut CameraPose,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) {
    let Some(target) = camera.tracking_target else {
      return;
    };
    let Some((target_position, target_rotation)) = target_pose(target) else {
      return;
    };

    let stale = !matches!(self.binding, Some(binding) if binding.target == target);
    if stale {
      self.bind(
        target,
        pose.base_position,
        pose.base_rotation,
        target_position,
        target_rotation,
      );
    }
    let Some(binding) = self.binding else {
      return;
    };

    match self.orient {
      OrientMode::None => {
        pose.base_position = target_position + binding.relative_position;
      }
      OrientMode::NoRotation => {
        pose.base_position = target_position + target_rotation * binding.local_position;
      }
      OrientMode::Full => {
        pose.base_position = target_position + target_rotation * binding.local_position;
        pose.base_rotation = target_rotation * binding.local_rotation;
      }
    }
  }
}
