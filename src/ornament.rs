//! Ornaments hung on the tree.
//!
//! Two kinds of ornaments are placed once on the outside of the tree cone:
//!
//! | Kind | Count | Placement |
//! |------|-------|-----------|
//! | Interactive | one per audio clip | evenly spaced heights, zig-zag around the front |
//! | Filler | 30 | spiral starting from the back, kept off the front arc |
//!
//! Each frame [`OrnamentField::animate`] bursts them outward with the
//! explosion, shrinks them as the tree unfolds, and spins them in place. An
//! interactive ornament can be selected to request its audio clip, but only
//! while the tree is intact.

use crate::phase::AnimationState;
use crate::shape::{TREE_HEIGHT, TREE_RADIUS};
use crate::transform::{OrnamentInstance, TransformBatch};
use crate::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Default number of filler ornaments.
pub const DEFAULT_FILLER_COUNT: usize = 30;
/// Gap between the tree surface and the ornaments.
pub const ORNAMENT_OFFSET: f32 = 0.6;
/// Angular swing of interactive ornaments either side of the front.
pub const ZIGZAG_OFFSET: f32 = 0.5;
/// Angle step between consecutive filler ornaments.
pub const FILLER_SPIRAL_STEP: f32 = 0.8;
/// Outward displacement of an ornament at full explosion.
pub const ORNAMENT_EXPLOSION_DISTANCE: f32 = 30.0;
/// Scale of an ornament while the tree is intact.
pub const ORNAMENT_SCALE: f32 = 0.4;
/// Selections only reach the audio player below this progress.
pub const INTACT_PROGRESS: f32 = 0.1;
/// Position of the star on top of the tree.
pub const STAR_POSITION: Vec3 = Vec3::new(0.0, 6.5, 0.0);

/// Ornament palette: retro gold, burgundy, grey blue, rose pink, champagne.
pub const ORNAMENT_COLORS: [Vec3; 5] = [
    Vec3::new(0.831_373, 0.686_275, 0.215_686), // #D4AF37
    Vec3::new(0.501_961, 0.0, 0.125_490),       // #800020
    Vec3::new(0.466_667, 0.533_333, 0.6),       // #778899
    Vec3::new(0.717_647, 0.431_373, 0.474_510), // #B76E79
    Vec3::new(0.968_627, 0.905_882, 0.807_843), // #F7E7CE
];

/// What an ornament does when selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrnamentKind {
    /// Plays audio clip `audio_index`.
    Interactive { audio_index: usize },
    /// Decoration only.
    Filler,
}

/// One placed ornament.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ornament {
    pub position: Vec3,
    pub color: Vec3,
    /// Placement angle around the vertical axis, in `[0, 2π)`.
    pub angle: f32,
    pub kind: OrnamentKind,
}

impl Ornament {
    #[inline]
    pub fn is_interactive(&self) -> bool {
        matches!(self.kind, OrnamentKind::Interactive { .. })
    }

    #[inline]
    pub fn audio_index(&self) -> Option<usize> {
        match self.kind {
            OrnamentKind::Interactive { audio_index } => Some(audio_index),
            OrnamentKind::Filler => None,
        }
    }
}

/// Request for the audio player, raised by a successful selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioRequest {
    pub audio_index: usize,
}

/// Point on the ornament shell at height fraction `t` and `angle`.
fn shell_position(t: f32, angle: f32) -> Vec3 {
    let y = t * TREE_HEIGHT - TREE_HEIGHT / 2.0;
    let radius = TREE_RADIUS * (1.0 - t) + ORNAMENT_OFFSET;
    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

/// Whether `angle` (normalized) falls in the arc kept for interactive ornaments.
#[inline]
pub fn in_front_arc(angle: f32) -> bool {
    let a = angle.rem_euclid(TAU);
    a > FRAC_PI_4 && a < 3.0 * FRAC_PI_4
}

/// Place `interactive` audio ornaments followed by `fillers` filler ornaments.
pub fn place_ornaments(interactive: usize, fillers: usize) -> Vec<Ornament> {
    let mut ornaments = Vec::with_capacity(interactive + fillers);

    for i in 0..interactive {
        let t = (i + 1) as f32 / (interactive + 1) as f32;
        let swing = if i % 2 == 0 { ZIGZAG_OFFSET } else { -ZIGZAG_OFFSET };
        let angle = FRAC_PI_2 + swing;
        ornaments.push(Ornament {
            position: shell_position(t, angle),
            color: ORNAMENT_COLORS[i % ORNAMENT_COLORS.len()],
            angle,
            kind: OrnamentKind::Interactive { audio_index: i },
        });
    }

    for i in 0..fillers {
        let t = i as f32 / fillers as f32;
        let mut angle = (i as f32 * FILLER_SPIRAL_STEP + PI).rem_euclid(TAU);
        if in_front_arc(angle) {
            angle = (angle + PI).rem_euclid(TAU);
        }
        ornaments.push(Ornament {
            position: shell_position(t, angle),
            color: ORNAMENT_COLORS[(i + interactive) % ORNAMENT_COLORS.len()],
            angle,
            kind: OrnamentKind::Filler,
        });
    }

    log::debug!("placed {interactive} interactive and {fillers} filler ornaments");
    ornaments
}

/// Ornament descriptors, their per-frame batch, and the top star.
pub struct OrnamentField {
    ornaments: Vec<Ornament>,
    batch: TransformBatch<OrnamentInstance>,
    star: OrnamentInstance,
}

impl OrnamentField {
    pub fn new(ornaments: Vec<Ornament>) -> Self {
        let batch = TransformBatch::new(ornaments.len());
        Self {
            ornaments,
            batch,
            star: OrnamentInstance {
                position: STAR_POSITION,
                scale: 1.0,
                rotation_y: 0.0,
            },
        }
    }

    /// Place and wrap ornaments for `audio_clips` clips and `fillers` fillers.
    pub fn place(audio_clips: usize, fillers: usize) -> Self {
        Self::new(place_ornaments(audio_clips, fillers))
    }

    #[inline]
    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ornaments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ornaments.is_empty()
    }

    #[inline]
    pub fn batch(&self) -> &TransformBatch<OrnamentInstance> {
        &self.batch
    }

    #[inline]
    pub fn batch_mut(&mut self) -> &mut TransformBatch<OrnamentInstance> {
        &mut self.batch
    }

    /// Transform of the star from the last [`OrnamentField::animate`].
    #[inline]
    pub fn star(&self) -> OrnamentInstance {
        self.star
    }

    /// Write this frame's ornament transforms.
    pub fn animate(&mut self, state: &AnimationState, time: f32) -> &TransformBatch<OrnamentInstance> {
        let scale = (1.0 - state.progress) * ORNAMENT_SCALE;
        let burst = state.explosion * ORNAMENT_EXPLOSION_DISTANCE;

        for (i, (out, ornament)) in self
            .batch
            .instances_mut()
            .iter_mut()
            .zip(&self.ornaments)
            .enumerate()
        {
            let mut position = ornament.position;
            if state.explosion > 0.0 {
                position += ornament.position.normalize_or_zero() * burst;
            }
            *out = OrnamentInstance {
                position,
                scale,
                rotation_y: time + i as f32,
            };
        }
        self.batch.mark_updated();

        self.star.scale = star_scale(state);
        &self.batch
    }

    /// Handle a selection of ornament `index`.
    ///
    /// Returns an audio request only for an interactive ornament while the
    /// tree is intact; anything else is inert.
    pub fn select(&self, index: usize, state: &AnimationState) -> Option<AudioRequest> {
        let Some(ornament) = self.ornaments.get(index) else {
            log::debug!("select ignored: no ornament {index}");
            return None;
        };
        let Some(audio_index) = ornament.audio_index() else {
            log::debug!("select ignored: ornament {index} is a filler");
            return None;
        };
        if state.progress >= INTACT_PROGRESS {
            log::debug!("select ignored: tree not intact (progress {:.2})", state.progress);
            return None;
        }
        Some(AudioRequest { audio_index })
    }
}

/// The star shows while the tree dominates and shrinks with the explosion.
#[inline]
pub fn star_scale(state: &AnimationState) -> f32 {
    if state.progress < 0.5 {
        1.0 - state.explosion
    } else {
        0.0
    }
}
