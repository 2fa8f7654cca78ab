//! Pluggable per-frame pose modifiers for virtual cameras.
//!
//! Extensions are evaluated every frame the owning camera takes part in
//! the written pose, in the order they sit in the [`ExtensionChain`]. Each
//! one mutates a shared [`CameraPose`] accumulator, so later extensions see
//! earlier contributions; swapping two non-commuting extensions changes the
//! final pose by design.

mod hard_lock;
mod local_offset;

use bevy::prelude::*;
pub use hard_lock::{HardLock, OrientMode};
pub use local_offset::LocalOffset;

use crate::components::VirtualCamera;

/// Pose accumulator threaded through an extension chain.
///
/// `base_*` is the camera's own world pose and may be overwritten by
/// extensions that relocate the camera wholesale (hard lock). `local_*`
/// is a delta in the camera's local frame. The composed world pose is
/// `base_position + base_rotation * local_position` and
/// `base_rotation * local_rotation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
  pub base_position: Vec3,
  pub base_rotation: Quat,
  pub local_position: Vec3,
  pub local_rotation: Quat,
}

impl CameraPose {
  /// Starts an accumulator from the camera's world pose with a zero
  /// local delta.
  pub fn from_world(position: Vec3, rotation: Quat) -> Self {
    Self {
      base_position: position,
      base_rotation: rotation,
      local_position: Vec3::ZERO,
      local_rotation: Quat::IDENTITY,
    }
  }

  /// Composes the accumulated pose into world position and rotation.
  pub fn finish(self) -> (Vec3, Quat) {
    (
      self.base_position + self.base_rotation * self.local_position,
      self.base_rotation * self.local_rotation,
    )
  }
}

/// One camera extension. Closed set, dispatched in chain order.
#[derive(Debug, Clone)]
pub enum CameraExtension {
  /// Locks the camera to its tracking target at a bind-time offset.
  HardLock(HardLock),
  /// Applies a constant, non-persisting local offset.
  LocalOffset(LocalOffset),
}

impl CameraExtension {
  /// One-time setup when the owning camera's chain is initialized.
  ///
  /// `target_pose` resolves an entity to its world pose, returning `None`
  /// for stale or despawned references.
  pub fn initialize(
    &mut self,
    camera: &VirtualCamera,
    pose: &CameraPose,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) {
    match self {
      CameraExtension::HardLock(lock) => lock.initialize(camera, pose, target_pose),
      CameraExtension::LocalOffset(_) => {}
    }
  }

  /// Per-frame contribution to the shared pose accumulator.
  pub fn update(
    &mut self,
    camera: &VirtualCamera,
    pose: &mut CameraPose,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) {
    match self {
      CameraExtension::HardLock(lock) => lock.update(camera, pose, target_pose),
      CameraExtension::LocalOffset(offset) => offset.update(pose),
    }
  }
}

impl From<HardLock> for CameraExtension {
  fn from(lock: HardLock) -> Self {
    CameraExtension::HardLock(lock)
  }
}

impl From<LocalOffset> for CameraExtension {
  fn from(offset: LocalOffset) -> Self {
    CameraExtension::LocalOffset(offset)
  }
}

/// Ordered extension chain owned by a virtual camera entity.
///
/// Insertion order is evaluation order. Initialized once when the
/// component first appears (scene load included); there is no re-scan.
#[derive(Component, Debug, Clone, Default)]
pub struct ExtensionChain {
  extensions: Vec<CameraExtension>,
  initialized: bool,
}

impl ExtensionChain {
  /// Builds a chain from extensions in evaluation order.
  pub fn new(extensions: impl IntoIterator<Item = CameraExtension>) -> Self {
    Self {
      extensions: extensions.into_iter().collect(),
      initialized: false,
    }
  }

  /// Appends an extension to the end of the chain.
  pub fn push(&mut self, extension: impl Into<CameraExtension>) {
    self.extensions.push(extension.into());
  }

  /// Returns true once [`initialize`](Self::initialize) has run.
  pub fn is_initialized(&self) -> bool {
    self.initialized
  }

  /// Runs each extension's one-time setup against the camera's current
  /// world pose.
  pub fn initialize(
    &mut self,
    camera: &VirtualCamera,
    world_position: Vec3,
    world_rotation: Quat,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) {
    let pose = CameraPose::from_world(world_position, world_rotation);
    for extension in &mut self.extensions {
      extension.initialize(camera, &pose, &target_pose);
    }
    self.initialized = true;
  }

  /// Folds the chain over the camera's world pose and composes the
  /// result.
  pub fn compose(
    &mut self,
    camera: &VirtualCamera,
    world_position: Vec3,
    world_rotation: Quat,
    target_pose: impl Fn(Entity) -> Option<(Vec3, Quat)>,
  ) -> (Vec3, Quat) {
    let mut pose = CameraPose::from_world(world_position, world_rotation);
    for extension in &mut self.extensions {
      extension.update(camera, &mut pose, &target_pose);
    }
    pose.finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn no_targets(_: Entity) -> Option<(Vec3, Quat)> {
    None
  }

  #[test]
  fn test_empty_chain_passes_world_pose_through() {
    let camera = VirtualCamera::default();
    let mut chain = ExtensionChain::default();
    let rotation = Quat::from_rotation_y(0.5);

    let (pos, rot) = chain.compose(&camera, Vec3::new(1.0, 2.0, 3.0), rotation, no_targets);
    assert_eq!(pos, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(rot, rotation);
  }

  #[test]
  fn test_local_delta_is_rotated_into_world() {
    let camera = VirtualCamera::default();
    let mut chain = ExtensionChain::new([LocalOffset::new(Vec3::X).into()]);
    // Camera looks along -X after a half-turn around Y.
    let rotation = Quat::from_rotation_y(std::f32::consts::PI);

    let (pos, _) = chain.compose(&camera, Vec3::ZERO, rotation, no_targets);
    assert!((pos - Vec3::NEG_X).length() < 1e-5);
  }

  #[test]
  fn test_extension_order_is_significant() {
    let camera = VirtualCamera::default();
    let first = LocalOffset::new(Vec3::X);
    let second = LocalOffset::new(Vec3::Y);

    // LocalOffset overwrites the accumulated delta, so the last one in
    // chain order wins.
    let mut forward = ExtensionChain::new([first.into(), second.into()]);
    let mut reversed = ExtensionChain::new([second.into(), first.into()]);

    let (forward_pos, _) = forward.compose(&camera, Vec3::ZERO, Quat::IDENTITY, no_targets);
    let (reversed_pos, _) = reversed.compose(&camera, Vec3::ZERO, Quat::IDENTITY, no_targets);

    assert_eq!(forward_pos, Vec3::Y);
    assert_eq!(reversed_pos, Vec3::X);
    assert_ne!(forward_pos, reversed_pos);
  }
}
