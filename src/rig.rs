//! The camera stack and its arbitration.

use bevy::prelude::*;

use crate::transition::{TransitionSpec, TransitionState};

#[derive(Debug, Clone, Copy)]
struct StackEntry {
  camera: Entity,
  priority: i32,
}

/// Owns the ordered set of enabled virtual cameras and the blend engine.
///
/// The stack is sorted ascending by priority; equal priorities keep
/// activation order, so the tail is always the highest-priority,
/// most-recently-activated camera. Mutations only mark the rig dirty -
/// the retarget happens once per frame when
/// [`drive_camera_rig`](crate::systems::drive_camera_rig) calls
/// [`resolve`](Self::resolve), or
/// synchronously when a caller invokes it directly.
#[derive(Resource, Debug, Default)]
pub struct CameraRig {
  stack: Vec<StackEntry>,
  dirty: bool,
  from: Option<Entity>,
  to: Option<Entity>,
  transition: TransitionState,
}

impl CameraRig {
  /// Inserts a camera into the stack behind its equal-priority peers and
  /// ahead of strictly lower ones. Re-activating a stacked camera moves
  /// it to its fresh position.
  pub fn activate(&mut self, camera: Entity, priority: i32) {
    self.stack.retain(|entry| entry.camera != camera);
    let index = self
      .stack
      .iter()
      .rposition(|entry| entry.priority <= priority)
      .map(|index| index + 1)
      .unwrap_or(0);
    self.stack.insert(index, StackEntry { camera, priority });
    self.dirty = true;
  }

  /// Removes a camera from the stack. Deactivating a camera that is not
  /// stacked is a no-op and does not mark the rig dirty.
  pub fn deactivate(&mut self, camera: Entity) {
    let before = self.stack.len();
    self.stack.retain(|entry| entry.camera != camera);
    if self.stack.len() != before {
      self.dirty = true;
    }
  }

  /// Resolves the stack tail as the transition target.
  ///
  /// `spec_for` looks up a camera's custom transition; cameras without
  /// one fall back to `default_spec`. An empty stack keeps the prior
  /// target (the brain simply retains its last written pose). When the
  /// top changed, the chosen spec is snapshotted and the blend engine
  /// (re)starts - a cut retargets at factor 1 with no blend frames.
  pub fn resolve(
    &mut self,
    default_spec: &TransitionSpec,
    spec_for: impl FnOnce(Entity) -> Option<TransitionSpec>,
  ) {
    self.dirty = false;
    let Some(new_top) = self.stack.last().map(|entry| entry.camera) else {
      return;
    };
    if Some(new_top) == self.to {
      return;
    }

    if self.to.is_some() {
      let spec = spec_for(new_top).unwrap_or_else(|| default_spec.clone());
      let returning = Some(new_top) == self.from;
      self.transition.begin(spec, returning);
      debug!("camera rig retargeted: {:?} -> {new_top}", self.to);
    }

    self.from = self.to;
    self.to = Some(new_top);
  }

  /// The current transition target (stack top at last resolve).
  pub fn current(&self) -> Option<Entity> {
    self.to
  }

  /// The camera being blended away from.
  pub fn previous(&self) -> Option<Entity> {
    self.from
  }

  /// Returns true if `camera` is the current target.
  pub fn is_active(&self, camera: Entity) -> bool {
    self.to == Some(camera)
  }

  /// Returns true if `camera` sits anywhere in the stack.
  pub fn contains(&self, camera: Entity) -> bool {
    self.stack.iter().any(|entry| entry.camera == camera)
  }

  /// Stacked cameras in ascending priority order.
  pub fn stack(&self) -> impl Iterator<Item = Entity> + '_ {
    self.stack.iter().map(|entry| entry.camera)
  }

  /// Returns true when a stack edit is waiting for the next resolve.
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  /// Read access to the blend engine.
  pub fn transition(&self) -> &TransitionState {
    &self.transition
  }

  pub(crate) fn transition_mut(&mut self) -> &mut TransitionState {
    &mut self.transition
  }
}
