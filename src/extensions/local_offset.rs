//! Local offset: a constant per-frame offset in camera space.

use bevy::prelude::*;

use super::CameraPose;

/// Offsets the camera in its local frame. Does not persist: the delta is
/// written fresh every frame, replacing whatever earlier extensions left
/// in the accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOffset {
  /// Positional offset in the camera's local frame.
  pub offset: Vec3,
  /// Rotational offset applied after the camera's own rotation.
  pub rotation: Quat,
}

impl LocalOffset {
  /// A pure positional offset.
  pub fn new(offset: Vec3) -> Self {
    Self {
      offset,
      rotation: Quat::IDENTITY,
    }
  }

  /// Adds a rotational offset.
  pub fn with_rotation(mut self, rotation: Quat) -> Self {
    self.rotation = rotation;
    self
  }

  pub(super) fn update(&self, pose: &mut CameraPose) {
    pose.local_position = self.offset;
    pose.local_rotation = self.rotation;
  }
}
