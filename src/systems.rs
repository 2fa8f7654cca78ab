//! Systems driving the camera rig each frame.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::components::{CameraBrain, VirtualCamera};
use crate::extensions::ExtensionChain;
use crate::rig::CameraRig;

/// System: Mirrors virtual camera lifecycle into the rig's stack.
///
/// Runs before [`drive_camera_rig`]. Newly enabled cameras are activated
/// (stable-inserted by priority), newly disabled ones deactivated, and
/// despawned ones removed. Activating with no [`CameraBrain`] in the world
/// logs a warning and leaves the stack untouched; the camera simply never
/// becomes visible.
pub fn sync_camera_stack(
  mut rig: ResMut<CameraRig>,
  changed: Query<(Entity, &VirtualCamera, Option<&Name>), Changed<VirtualCamera>>,
  mut removed: RemovedComponents<VirtualCamera>,
  brains: Query<(), With<CameraBrain>>,
) {
  for (entity, camera, name) in &changed {
    let stacked = rig.contains(entity);
    if camera.enabled && !stacked {
      if brains.is_empty() {
        let label = name
          .map(|name| name.as_str().to_owned())
          .unwrap_or_else(|| entity.to_string());
        warn!("Tried to activate virtual camera '{label}' but there is no brain in the scene.");
        continue;
      }
      rig.activate(entity, camera.priority);
    } else if !camera.enabled && stacked {
      rig.deactivate(entity);
    }
  }

  for entity in removed.read() {
    rig.deactivate(entity);
  }
}

/// System: One-time extension setup when a chain first appears.
///
/// Covers scene load and late insertion alike. Extensions that bind
/// against a tracking target capture their offsets here; chains whose
/// targets are not yet valid bind lazily on their first active frame.
pub fn initialize_extension_chains(
  mut chains: Query<(&VirtualCamera, &GlobalTransform, &mut ExtensionChain), Added<ExtensionChain>>,
  targets: Query<&GlobalTransform>,
) {
  for (camera, transform, mut chain) in &mut chains {
    chain.initialize(camera, transform.translation(), transform.rotation(), |entity| {
      targets
        .get(entity)
        .ok()
        .map(|target| (target.translation(), target.rotation()))
    });
  }
}

/// System: The per-frame tick - resolves pending stack edits, composes
/// camera poses, and writes the result onto the brain.
///
/// Without a brain this silently no-ops. While a blend is live the poses
/// of both endpoints are composed and interpolated (lerp position, slerp
/// rotation, lerp fov) by the transition engine's factor; otherwise the
/// target's pose is written directly. The factor is computed before the
/// timer advances, so the first blending frame renders at the seeded
/// offset.
pub fn drive_camera_rig(
  time: Res<Time>,
  real_time: Res<Time<Real>>,
  mut rig: ResMut<CameraRig>,
  mut cameras: Query<(&VirtualCamera, &GlobalTransform, Option<&mut ExtensionChain>)>,
  targets: Query<&GlobalTransform>,
  mut brains: Query<(&mut Transform, Option<&mut Projection>, &CameraBrain)>,
) {
  let Ok((mut brain_transform, mut projection, brain)) = brains.single_mut() else {
    return;
  };

  if rig.is_dirty() {
    rig.resolve(&brain.default_transition, |entity| {
      cameras
        .get(entity)
        .ok()
        .and_then(|(camera, _, _)| camera.custom_transition.clone())
    });
  }

  let Some(to) = rig.current() else {
    return;
  };
  let Some((to_position, to_rotation, to_fov)) = compose_world_pose(to, &mut cameras, &targets)
  else {
    return;
  };

  if rig.transition().is_blending() {
    let from_pose = rig
      .previous()
      .and_then(|from| compose_world_pose(from, &mut cameras, &targets));

    match from_pose {
      Some((from_position, from_rotation, from_fov)) => {
        let factor = rig.transition().factor();
        brain_transform.translation = from_position.lerp(to_position, factor);
        brain_transform.rotation = from_rotation.slerp(to_rotation, factor);
        write_fov(&mut projection, from_fov.lerp(to_fov, factor));

        let delta = if brain.use_real_time {
          real_time.delta_secs()
        } else {
          time.delta_secs()
        };
        rig.transition_mut().advance(delta);
        return;
      }
      None => {
        // Blend source despawned mid-blend: degrade to a snap.
        rig.transition_mut().finish();
      }
    }
  }

  brain_transform.translation = to_position;
  brain_transform.rotation = to_rotation;
  write_fov(&mut projection, to_fov);
}

/// Composes a camera's world pose: its own transform folded through its
/// extension chain. Returns `None` for invalid camera references.
fn compose_world_pose(
  entity: Entity,
  cameras: &mut Query<(&VirtualCamera, &GlobalTransform, Option<&mut ExtensionChain>)>,
  targets: &Query<&GlobalTransform>,
) -> Option<(Vec3, Quat, f32)> {
  let (camera, transform, chain) = cameras.get_mut(entity).ok()?;
  let position = transform.translation();
  let rotation = transform.rotation();

  let (position, rotation) = match chain {
    Some(mut chain) => chain.compose(camera, position, rotation, |target| {
      targets
        .get(target)
        .ok()
        .map(|target| (target.translation(), target.rotation()))
    }),
    None => (position, rotation),
  };

  Some((position, rotation, camera.field_of_view))
}

fn write_fov(projection: &mut Option<Mut<'_, Projection>>, degrees: f32) {
  if let Some(projection) = projection {
    if let Projection::Perspective(perspective) = projection.as_mut() {
      perspective.fov = degrees.to_radians();
    }
  }
}
