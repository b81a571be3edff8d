//! Per-frame particle transforms.
//!
//! [`ParticleField`] owns the two base coordinate sets and a pre-sized
//! [`TransformBatch`]. Each frame, [`ParticleField::animate`] folds the
//! current [`AnimationState`] and pointer into one transform per particle:
//!
//! 1. blend tree → nebula by `progress`
//! 2. push outward along the particle's direction by `explosion`
//! 3. phase motion: breathing wave in the tree, slow spin in the nebula
//! 4. pointer repulsion (tree, or a settled nebula)
//! 5. pulsing scale
//!
//! # Performance
//!
//! The loop runs over every particle at frame rate and must not allocate.
//! All intermediates are stack `Vec3`s and results are written in place into
//! the batch allocated at construction. The batch is flagged for upload once,
//! after the loop.

use crate::phase::{AnimationState, Phase};
use crate::pointer::PointerField;
use crate::shape::{point_at, ShapeSampler};
use crate::transform::{ParticleInstance, TransformBatch};
use crate::Vec3;

/// Explosion below this is treated as none.
pub const EXPLOSION_EPSILON: f32 = 0.01;
/// Outward displacement of a particle at full explosion.
pub const PARTICLE_EXPLOSION_DISTANCE: f32 = 20.0;
/// Explosion must drop below this before the nebula reacts to the pointer.
pub const SETTLED_EXPLOSION: f32 = 0.1;
/// Amplitude of the vertical breathing wave in the tree.
pub const BREATHING_AMPLITUDE: f32 = 0.1;
/// Angular speed of the nebula spin, radians per second.
pub const NEBULA_SPIN_RATE: f32 = 0.05;
/// Baseline particle scale in the nebula.
pub const NEBULA_SCALE: f32 = 0.05;
/// Baseline particle scale in every other phase.
pub const TREE_SCALE: f32 = 0.08;

/// One particle's immutable data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub index: usize,
    pub tree: Vec3,
    pub nebula: Vec3,
    pub color: Vec3,
}

/// Base shapes plus the per-frame output batch.
pub struct ParticleField {
    tree: Vec<f32>,
    nebula: Vec<f32>,
    colors: Vec<f32>,
    batch: TransformBatch<ParticleInstance>,
}

impl ParticleField {
    /// Build a field from existing coordinate arrays.
    ///
    /// The active particle count is `min(count, tree.len() / 3,
    /// nebula.len() / 3)`, so short arrays shrink the field instead of
    /// failing.
    pub fn from_coordinates(count: usize, tree: Vec<f32>, nebula: Vec<f32>, colors: Vec<f32>) -> Self {
        let active = count.min(tree.len() / 3).min(nebula.len() / 3);
        if active < count {
            log::warn!("coordinate arrays hold {active} of {count} particles");
        }
        Self {
            tree,
            nebula,
            colors,
            batch: TransformBatch::new(active),
        }
    }

    /// Generate both shapes and colors for `count` particles.
    pub fn generate(count: usize, sampler: &mut ShapeSampler) -> Self {
        let tree = sampler.tree_coordinates(count);
        let nebula = sampler.nebula_coordinates(count);
        let colors = sampler.particle_colors(count);
        Self::from_coordinates(count, tree, nebula, colors)
    }

    /// Number of particles processed each frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    #[inline]
    pub fn tree_coordinates(&self) -> &[f32] {
        &self.tree
    }

    #[inline]
    pub fn nebula_coordinates(&self) -> &[f32] {
        &self.nebula
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Immutable data of particle `index`.
    pub fn particle(&self, index: usize) -> Option<Particle> {
        if index >= self.len() {
            return None;
        }
        Some(Particle {
            index,
            tree: point_at(&self.tree, index)?,
            nebula: point_at(&self.nebula, index)?,
            color: point_at(&self.colors, index).unwrap_or(Vec3::ONE),
        })
    }

    #[inline]
    pub fn batch(&self) -> &TransformBatch<ParticleInstance> {
        &self.batch
    }

    #[inline]
    pub fn batch_mut(&mut self) -> &mut TransformBatch<ParticleInstance> {
        &mut self.batch
    }

    /// Write this frame's transforms into the batch.
    ///
    /// `time` is the animation clock in seconds; `pointer` is the repulsion
    /// source for this frame.
    pub fn animate(&mut self, state: &AnimationState, time: f32, pointer: &PointerField) -> &TransformBatch<ParticleInstance> {
        let motion = FrameMotion::new(state, time);
        let pointer = motion.repels.then_some(pointer);

        let instances = self.batch.instances_mut();
        let tree = self.tree.chunks_exact(3);
        let nebula = self.nebula.chunks_exact(3);

        for (i, ((out, t), n)) in instances.iter_mut().zip(tree).zip(nebula).enumerate() {
            let base_tree = Vec3::new(t[0], t[1], t[2]);
            let base_nebula = Vec3::new(n[0], n[1], n[2]);
            *out = motion.instance(i, base_tree, base_nebula, pointer);
        }

        self.batch.mark_updated();
        &self.batch
    }
}

/// Per-frame constants shared by every particle.
#[derive(Clone, Copy, Debug)]
pub struct FrameMotion {
    phase: Phase,
    progress: f32,
    explosion: f32,
    time: f32,
    spin_sin: f32,
    spin_cos: f32,
    repels: bool,
    base_scale: f32,
}

impl FrameMotion {
    pub fn new(state: &AnimationState, time: f32) -> Self {
        let (spin_sin, spin_cos) = (time * NEBULA_SPIN_RATE).sin_cos();
        let repels = match state.phase {
            Phase::Tree => true,
            Phase::Nebula => state.explosion < SETTLED_EXPLOSION,
            Phase::Blooming | Phase::Collapsing => false,
        };
        let base_scale = if state.phase == Phase::Nebula {
            NEBULA_SCALE
        } else {
            TREE_SCALE
        };

        Self {
            phase: state.phase,
            progress: state.progress,
            explosion: state.explosion,
            time,
            spin_sin,
            spin_cos,
            repels,
            base_scale,
        }
    }

    /// Whether the pointer pushes particles this frame.
    #[inline]
    pub fn repels(&self) -> bool {
        self.repels
    }

    /// Position of a particle after blend, explosion and phase motion,
    /// before pointer repulsion.
    #[inline]
    pub fn position(&self, tree: Vec3, nebula: Vec3) -> Vec3 {
        let mut pos = tree * (1.0 - self.progress) + nebula * self.progress;

        if self.explosion > EXPLOSION_EPSILON {
            pos += pos.normalize_or_zero() * (self.explosion * PARTICLE_EXPLOSION_DISTANCE);
        }

        match self.phase {
            Phase::Tree => {
                pos.y += (self.time + pos.x).sin() * BREATHING_AMPLITUDE;
            }
            Phase::Nebula => {
                let x = pos.x * self.spin_cos - pos.z * self.spin_sin;
                let z = pos.x * self.spin_sin + pos.z * self.spin_cos;
                pos.x = x;
                pos.z = z;
            }
            Phase::Blooming | Phase::Collapsing => {}
        }

        pos
    }

    /// Pulsing scale of particle `index`.
    #[inline]
    pub fn scale(&self, index: usize) -> f32 {
        ((self.time * 2.0 + index as f32).sin() * 0.5 + 1.0) * self.base_scale
    }

    /// Full transform of particle `index`.
    ///
    /// `pointer` is ignored unless this frame repels.
    #[inline]
    pub fn instance(&self, index: usize, tree: Vec3, nebula: Vec3, pointer: Option<&PointerField>) -> ParticleInstance {
        let mut position = self.position(tree, nebula);
        if let Some(field) = pointer.filter(|_| self.repels) {
            let push = field.displacement(position);
            position.x += push.x;
            position.y += push.y;
        }
        ParticleInstance {
            position,
            scale: self.scale(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn state(phase: Phase, progress: f32, explosion: f32) -> AnimationState {
        AnimationState {
            phase,
            progress,
            explosion,
            focus: None,
        }
    }

    fn far_pointer() -> PointerField {
        PointerField::at(Vec3::new(1000.0, 1000.0, 1000.0))
    }

    #[test]
    fn test_blend_identity_at_tree() {
        let mut field = ParticleField::generate(200, &mut ShapeSampler::seeded(11));
        field.animate(&state(Phase::Collapsing, 0.0, 0.0), 0.0, &far_pointer());

        for i in 0..field.len() {
            let p = field.particle(i).unwrap();
            assert_eq!(field.batch().instances()[i].position, p.tree);
        }
    }

    #[test]
    fn test_blend_identity_at_nebula() {
        let mut field = ParticleField::generate(200, &mut ShapeSampler::seeded(12));
        // t = 0 leaves the nebula spin at identity.
        field.animate(&state(Phase::Nebula, 1.0, 0.0), 0.0, &far_pointer());

        for i in 0..field.len() {
            let p = field.particle(i).unwrap();
            assert_eq!(field.batch().instances()[i].position, p.nebula);
        }
    }

    #[test]
    fn test_breathing_zero_for_axis_particle() {
        let motion = FrameMotion::new(&state(Phase::Tree, 0.0, 0.0), 0.0);
        let base = Vec3::new(0.0, 1.5, 0.7);
        assert_eq!(motion.position(base, Vec3::ZERO), base);

        let later = FrameMotion::new(&state(Phase::Tree, 0.0, 0.0), 1.0);
        let moved = later.position(base, Vec3::ZERO);
        assert!((moved.y - (1.5 + 1.0_f32.sin() * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_explosion_pushes_outward() {
        let motion = FrameMotion::new(&state(Phase::Blooming, 0.0, 0.5), 0.0);
        let pos = motion.position(Vec3::new(3.0, 0.0, 4.0), Vec3::ZERO);
        // |base| = 5, pushed 10 further along the same direction
        assert!((pos - Vec3::new(9.0, 0.0, 12.0)).length() < 1e-4);

        let origin = motion.position(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(origin, Vec3::ZERO);
    }

    #[test]
    fn test_tiny_explosion_ignored() {
        let motion = FrameMotion::new(&state(Phase::Blooming, 0.0, 0.005), 0.0);
        let base = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(motion.position(base, Vec3::ZERO), base);
    }

    #[test]
    fn test_nebula_spin() {
        let t = 10.0;
        let motion = FrameMotion::new(&state(Phase::Nebula, 1.0, 0.0), t);
        let pos = motion.position(Vec3::ZERO, Vec3::new(12.0, 0.5, 0.0));
        let angle = t * NEBULA_SPIN_RATE;
        assert!((pos.x - 12.0 * angle.cos()).abs() < 1e-4);
        assert!((pos.z - 12.0 * angle.sin()).abs() < 1e-4);
        assert_eq!(pos.y, 0.5);
    }

    #[test]
    fn test_repulsion_gating() {
        assert!(FrameMotion::new(&state(Phase::Tree, 0.0, 0.0), 0.0).repels());
        assert!(FrameMotion::new(&state(Phase::Nebula, 1.0, 0.05), 0.0).repels());
        assert!(!FrameMotion::new(&state(Phase::Nebula, 1.0, 0.5), 0.0).repels());
        assert!(!FrameMotion::new(&state(Phase::Blooming, 0.0, 0.0), 0.0).repels());
        assert!(!FrameMotion::new(&state(Phase::Collapsing, 0.5, 0.0), 0.0).repels());
    }

    #[test]
    fn test_repulsion_applied_in_tree() {
        let motion = FrameMotion::new(&state(Phase::Tree, 0.0, 0.0), 0.0);
        // x = 0 keeps the breathing term at zero for t = 0
        let base = Vec3::new(0.0, 1.0, 2.0);
        let field = PointerField::from_pointer(Vec2::ZERO);
        let out = motion.instance(0, base, Vec3::ZERO, Some(&field));
        // distance 1 from (0, 0, 2): pushed up by (3 - 1) * 1.5
        assert!((out.position.y - 4.0).abs() < 1e-5);
        assert_eq!(out.position.z, 2.0);
    }

    #[test]
    fn test_scale_pulse() {
        let tree = FrameMotion::new(&state(Phase::Tree, 0.0, 0.0), 0.0);
        assert!((tree.scale(0) - 0.08).abs() < 1e-6);
        let nebula = FrameMotion::new(&state(Phase::Nebula, 1.0, 0.0), 0.0);
        assert!((nebula.scale(0) - 0.05).abs() < 1e-6);
        for i in 0..100 {
            let s = tree.scale(i);
            assert!(s >= 0.04 - 1e-6 && s <= 0.12 + 1e-6);
        }
    }

    #[test]
    fn test_short_arrays_bound_iteration() {
        let tree = vec![0.0; 3 * 5];
        let nebula = vec![1.0; 3 * 3 + 2];
        let mut field = ParticleField::from_coordinates(10, tree, nebula, Vec::new());
        assert_eq!(field.len(), 3);
        field.animate(&AnimationState::default(), 0.0, &far_pointer());
        assert_eq!(field.batch().len(), 3);
        assert!(field.particle(3).is_none());
        assert_eq!(field.particle(0).map(|p| p.color), Some(Vec3::ONE));
    }

    #[test]
    fn test_empty_field_is_noop() {
        let mut field = ParticleField::generate(0, &mut ShapeSampler::seeded(1));
        assert!(field.is_empty());
        let batch = field.animate(&AnimationState::default(), 1.0, &far_pointer());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_marked_once_per_frame() {
        let mut field = ParticleField::generate(50, &mut ShapeSampler::seeded(4));
        field.animate(&AnimationState::default(), 0.0, &far_pointer());
        assert_eq!(field.batch().version(), 1);
        field.animate(&AnimationState::default(), 0.016, &far_pointer());
        assert_eq!(field.batch().version(), 2);
    }
}
