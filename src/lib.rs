//! # treebloom
//!
//! A particle tree that blooms into a spinning nebula and collapses back.
//!
//! treebloom owns the animation side of the scene (shape generation, the
//! phase machine, tweens, the per-frame transform loops) and hands a host
//! renderer flat, GPU-ready instance buffers each tick.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treebloom::prelude::*;
//!
//! let config = SceneConfig::new().with_particle_count(8000).with_seed(7);
//! let mut scene = Scene::new(&config);
//!
//! scene.advance(); // tree -> blooming
//! let frame = scene.step(1.0 / 60.0);
//! upload(frame.particles.as_bytes());
//! ```
//!
//! ## Core Concepts
//!
//! ### Shapes
//!
//! Every particle has two base positions: one inside a cone (the tree) and
//! one on a torus (the nebula). [`shape`] samples both, plus a color per
//! particle, from a [`ShapeSampler`]. Seeded samplers are reproducible.
//!
//! ### Phases
//!
//! [`Phase`] cycles `tree -> blooming -> nebula -> collapsing -> tree`. The
//! [`PhaseMachine`] is the only writer of [`AnimationState`]; advancing from
//! `tree` or `nebula` starts tweens on the `progress` and `explosion`
//! scalars, and tween completion moves through the in-between phases.
//!
//! | Scalar | 0 | 1 |
//! |--------|---|---|
//! | `progress` | tree shape | nebula shape |
//! | `explosion` | at rest | fully burst outward |
//!
//! ### Frames
//!
//! Each tick the particle and ornament animators read the state and write a
//! [`TransformBatch`] of `#[repr(C)]` instances. [`Frame`] borrows both
//! batches for upload.
//!
//! ### Interaction
//!
//! The pointer pushes nearby particles away while the shape is settled.
//! Interactive ornaments raise an [`AudioRequest`] when selected on an intact
//! tree. In the nebula a photo can be focused; the next advance clears the
//! focus before it collapses the nebula.

pub mod config;
pub mod ease;
pub mod error;
pub mod input;
pub mod ornament;
pub mod particles;
pub mod phase;
pub mod pointer;
pub mod scene;
pub mod shape;
pub mod time;
pub mod transform;

pub use config::SceneConfig;
pub use ease::{Easing, Tween};
pub use error::ConfigError;
pub use glam::{Vec2, Vec3};
pub use input::{Gesture, Input, InputEvent};
pub use ornament::{AudioRequest, Ornament, OrnamentField, OrnamentKind};
pub use particles::{Particle, ParticleField};
pub use phase::{AdvanceOutcome, AnimationState, Phase, PhaseMachine};
pub use pointer::PointerField;
pub use scene::{Frame, Scene};
pub use shape::ShapeSampler;
pub use time::Clock;
pub use transform::{OrnamentInstance, ParticleInstance, TransformBatch};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use treebloom::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SceneConfig;
    pub use crate::input::{Gesture, Input, InputEvent};
    pub use crate::ornament::AudioRequest;
    pub use crate::phase::{AdvanceOutcome, AnimationState, Phase};
    pub use crate::scene::{Frame, Scene};
    pub use crate::transform::{OrnamentInstance, ParticleInstance, TransformBatch};
    pub use crate::{Vec2, Vec3};
}
