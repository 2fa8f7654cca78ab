//! Camera rig - priority-stacked virtual cameras with blended transitions.
//!
//! Multiple systems can spawn `VirtualCamera` entities with different
//! priorities. The highest-priority enabled one drives the entity carrying
//! the `CameraBrain` (the real camera), and switching between virtual
//! cameras blends the written pose over time instead of teleporting it.
//! This decouples camera ownership from rendering.
//!
//! # Usage
//!
//! ```ignore
//! use bevy_camera_rig::{CameraBrain, CameraRigPlugin, VirtualCamera};
//!
//! app.add_plugins(CameraRigPlugin);
//!
//! // The real camera carries the brain. The rig writes its transform
//! // and projection fov every frame.
//! commands.spawn((
//!     Camera3d::default(),
//!     CameraBrain::default(),
//! ));
//!
//! // A player-follow camera (default priority)
//! commands.spawn((
//!     VirtualCamera::new(VirtualCamera::PRIORITY_PLAYER),
//!     Transform::default(),
//! ));
//!
//! // A cutscene camera with a custom two-second blend
//! commands.spawn((
//!     VirtualCamera::new(VirtualCamera::PRIORITY_CUTSCENE)
//!         .with_transition(TransitionSpec::ease(EaseFunction::CubicInOut, 2.0)),
//!     Transform::from_xyz(10.0, 4.0, 0.0),
//! ));
//! ```
//!
//! # Priority Conventions
//!
//! | Priority | Use Case |
//! |----------|----------|
//! | 0 | Player follow (default) |
//! | 50 | Cutscenes, scripted sequences |
//! | 100 | Debug controller |
//! | 200+ | Console override |
//!
//! # Architecture
//!
//! Enabled virtual cameras live in an ordered stack inside the [`CameraRig`]
//! resource, sorted ascending by priority with activation order breaking
//! ties. Stack edits only mark the rig dirty; the actual retarget happens at
//! one resolution point per frame, inside [`drive_camera_rig`], so a camera
//! disabling itself mid-frame can never corrupt an in-flight blend. When the
//! resolved top changes, the transition engine snapshots the new target's
//! [`TransitionSpec`] (or the brain's default) and interpolates position,
//! rotation, and field of view from the previous target to the new one.
//! Each camera's written pose is its own world transform folded through its
//! ordered [`ExtensionChain`].

use bevy::prelude::*;
use bevy::transform::TransformSystems;

pub mod components;
pub mod extensions;
pub mod rig;
pub mod systems;
pub mod transition;

pub use components::{CameraBrain, VirtualCamera};
pub use extensions::{CameraExtension, CameraPose, ExtensionChain, HardLock, LocalOffset, OrientMode};
pub use rig::CameraRig;
pub use systems::{drive_camera_rig, initialize_extension_chains, sync_camera_stack};
pub use transition::{TransitionMode, TransitionSpec, TransitionState};

/// System set for camera rig systems.
///
/// Runs in `PostUpdate` after `TransformSystems::Propagate`, so virtual
/// cameras and their tracking targets have up-to-date world poses. Schedule
/// camera movement systems to run in `Update`, or in `PostUpdate` **before**
/// this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraRigSet;

/// Plugin for priority-stacked virtual camera control.
///
/// Add this plugin after `DefaultPlugins`. Mark the real camera with
/// [`CameraBrain`] and spawn [`VirtualCamera`] entities to take control.
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
  fn build(&self, app: &mut App) {
    app.init_resource::<CameraRig>();
    // TimePlugin normally owns these; init covers headless apps.
    app.init_resource::<Time>();
    app.init_resource::<Time<Real>>();

    app.configure_sets(
      PostUpdate,
      CameraRigSet.after(TransformSystems::Propagate),
    );

    app.add_systems(
      PostUpdate,
      (
        systems::sync_camera_stack,
        systems::initialize_extension_chains,
        systems::drive_camera_rig,
      )
        .chain()
        .in_set(CameraRigSet),
    );
  }
}
