//! Transition specs and the blend state machine.
//!
//! A [`TransitionSpec`] describes *how* the rig should move from one virtual
//! camera to another: instantly ([`TransitionMode::Cut`]), through one of
//! Bevy's predefined ease functions, or through a user-authored
//! `Curve<f32>`. [`TransitionState`] is the runtime side: it owns the timer
//! and produces the interpolation factor each frame while a blend is live.

use std::fmt;
use std::sync::Arc;

use bevy::math::curve::{Curve, EaseFunction, EasingCurve};

/// Shape of a camera-to-camera transition.
#[derive(Clone)]
pub enum TransitionMode {
  /// Switch instantly, no interpolation frames.
  Cut,
  /// Blend through one of Bevy's predefined ease functions.
  Ease(EaseFunction),
  /// Blend through a user-authored curve over the unit interval.
  ///
  /// Overshoot curves (outputs outside `[0, 1]`) are allowed and produce
  /// extrapolated poses, same as the bounce/back ease functions.
  Curve(Arc<dyn Curve<f32> + Send + Sync>),
}

impl TransitionMode {
  /// Evaluates the easing shape at normalized time `t`.
  pub fn sample(&self, t: f32) -> f32 {
    match self {
      TransitionMode::Cut => 1.0,
      TransitionMode::Ease(function) => EasingCurve::new(0.0, 1.0, *function).sample_clamped(t),
      TransitionMode::Curve(curve) => curve.sample_clamped(t),
    }
  }
}

impl fmt::Debug for TransitionMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransitionMode::Cut => f.write_str("Cut"),
      TransitionMode::Ease(function) => f.debug_tuple("Ease").field(function).finish(),
      TransitionMode::Curve(_) => f.write_str("Curve(..)"),
    }
  }
}

/// How switching to a camera should be animated.
#[derive(Debug, Clone)]
pub struct TransitionSpec {
  /// Blend shape.
  pub mode: TransitionMode,
  /// Blend length in seconds. Meaningless for cuts; a non-positive
  /// duration is treated as a cut.
  pub duration: f32,
  /// When a blend retargets back to the camera it was blending away from,
  /// an absolute ease resumes the ease shape at its absolute timeline
  /// position. A relative ease (the default) replays the shape over only
  /// the remaining unswept portion.
  pub absolute_ease: bool,
}

impl Default for TransitionSpec {
  fn default() -> Self {
    Self {
      mode: TransitionMode::Ease(EaseFunction::QuadraticOut),
      duration: 1.0,
      absolute_ease: false,
    }
  }
}

impl TransitionSpec {
  /// An instant cut.
  pub fn cut() -> Self {
    Self {
      mode: TransitionMode::Cut,
      duration: 0.0,
      absolute_ease: false,
    }
  }

  /// A predefined ease over `duration` seconds.
  pub fn ease(function: EaseFunction, duration: f32) -> Self {
    Self {
      mode: TransitionMode::Ease(function),
      duration,
      absolute_ease: false,
    }
  }

  /// A user-authored curve over `duration` seconds.
  pub fn curve(curve: impl Curve<f32> + Send + Sync + 'static, duration: f32) -> Self {
    Self {
      mode: TransitionMode::Curve(Arc::new(curve)),
      duration,
      absolute_ease: false,
    }
  }

  /// Sets the absolute-ease retarget behavior.
  pub fn with_absolute_ease(mut self, absolute: bool) -> Self {
    self.absolute_ease = absolute;
    self
  }

  /// Returns true if this spec produces no interpolation frames.
  pub fn is_cut(&self) -> bool {
    matches!(self.mode, TransitionMode::Cut) || self.duration <= 0.0
  }
}

/// Runtime state of the blend engine: {Idle, Blending} plus the timer.
///
/// The spec is snapshotted when a blend begins, so editing a camera's
/// transition mid-blend does not affect the in-flight blend. The timer
/// counts up from 0 and is clamped to the duration; reaching the duration
/// is terminal until the next [`begin`](Self::begin).
#[derive(Debug, Clone, Default)]
pub struct TransitionState {
  active: bool,
  timer: f32,
  elapsed_at_retarget: f32,
  spec: TransitionSpec,
}

impl TransitionState {
  /// Starts a transition with the given spec.
  ///
  /// `returning_to_from` is set by the rig when the new target is the
  /// camera the current blend is moving *away* from (a rapid toggle). In
  /// that case the timer is seeded so the reversed blend picks up where
  /// the old one left off instead of restarting from zero:
  /// `timer = duration × (1 − old_progress)`.
  pub fn begin(&mut self, spec: TransitionSpec, returning_to_from: bool) {
    // Zero duration would make the linear factor divide by zero, so it
    // degrades to a cut.
    if spec.is_cut() {
      self.active = false;
      self.timer = 0.0;
      self.elapsed_at_retarget = 0.0;
      self.spec = spec;
      return;
    }

    if returning_to_from && self.active && self.spec.duration > 0.0 {
      let elapsed_norm = (1.0 - self.timer / self.spec.duration).clamp(0.0, 1.0);
      self.timer = spec.duration * elapsed_norm;
      self.elapsed_at_retarget = if spec.absolute_ease {
        0.0
      } else {
        spec.duration * elapsed_norm
      };
    } else {
      self.timer = 0.0;
      self.elapsed_at_retarget = 0.0;
    }

    self.spec = spec;
    self.active = true;
  }

  /// Interpolation factor for the current frame.
  ///
  /// While blending, the ease shape is evaluated over the unswept portion
  /// of the curve and the result is remapped into `[offset, 1]`, where
  /// `offset` is the normalized blend-start position seeded at retarget.
  /// A finished or never-started transition reports 1 (fully at target).
  /// Overshoot eases may legitimately report factors outside `[0, 1]`.
  pub fn factor(&self) -> f32 {
    if !self.active {
      return 1.0;
    }

    let linear = self.timer / self.spec.duration;
    let offset = self.elapsed_at_retarget / self.spec.duration;
    let eval_time = if offset >= 1.0 {
      1.0
    } else {
      ((linear - offset) / (1.0 - offset)).clamp(0.0, 1.0)
    };

    let eased = self.spec.mode.sample(eval_time);
    offset + eased * (1.0 - offset)
  }

  /// Advances the timer, going idle once the duration is reached.
  pub fn advance(&mut self, delta: f32) {
    if !self.active {
      return;
    }
    self.timer += delta;
    if self.timer >= self.spec.duration {
      self.timer = self.spec.duration;
      self.active = false;
    }
  }

  /// Ends the blend immediately (e.g. the blend source despawned).
  pub fn finish(&mut self) {
    self.active = false;
  }

  /// Returns true while a blend is live.
  pub fn is_blending(&self) -> bool {
    self.active
  }

  /// Seconds elapsed since the blend began (post-seeding).
  pub fn timer(&self) -> f32 {
    self.timer
  }

  /// The spec snapshotted when the blend began.
  pub fn spec(&self) -> &TransitionSpec {
    &self.spec
  }
}
