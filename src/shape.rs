//! Procedural base shapes for the particle field.
//!
//! Two static coordinate sets are generated once per particle count: a solid
//! cone (the tree) and a torus (the nebula). Particles blend between them at
//! runtime; the sets themselves never change.
//!
//! Coordinates are returned as flat `[x0, y0, z0, x1, y1, z1, ...]` arrays so
//! they can be handed to a renderer or stored without conversion.
//!
//! # Example
//!
//! ```ignore
//! use treebloom::shape::ShapeSampler;
//!
//! let mut sampler = ShapeSampler::seeded(7);
//! let tree = sampler.tree_coordinates(8000);
//! let nebula = sampler.nebula_coordinates(8000);
//! assert_eq!(tree.len(), 8000 * 3);
//! ```

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Height of the tree cone.
pub const TREE_HEIGHT: f32 = 12.0;
/// Radius of the tree cone at its base.
pub const TREE_RADIUS: f32 = 4.5;
/// Major (ring) radius of the nebula torus.
pub const NEBULA_RADIUS: f32 = 12.0;
/// Tube radius of the nebula torus.
pub const NEBULA_TUBE: f32 = 3.0;
/// Default number of particles in the field.
pub const DEFAULT_PARTICLE_COUNT: usize = 8000;

/// Random source for shape generation.
///
/// Unseeded samplers draw from OS entropy, so two runs produce different (but
/// statistically identical) shapes. Use [`ShapeSampler::seeded`] when the
/// output has to be reproducible.
pub struct ShapeSampler {
    rng: SmallRng,
}

impl ShapeSampler {
    /// Create a sampler seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a sampler with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is present, entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    // ========== Point helpers ==========

    /// Random point inside a solid cone standing on the XZ plane.
    ///
    /// The cone's apex is at `height / 2` and its base at `-height / 2`.
    /// The radial distance uses a square root so that density is uniform per
    /// unit area of each horizontal slice instead of piling up on the axis.
    pub fn random_in_cone(&mut self, height: f32, radius: f32) -> Vec3 {
        let y = self.rng.gen::<f32>() * height;
        let relative_y = y / height;
        let radius_at_y = radius * (1.0 - relative_y);
        let theta = self.rng.gen_range(0.0..TAU);
        let r = self.rng.gen::<f32>().sqrt() * radius_at_y;

        Vec3::new(r * theta.cos(), y - height / 2.0, r * theta.sin())
    }

    /// Random point on the surface of a torus lying in the XZ plane.
    ///
    /// * `major` - distance from the center to the middle of the tube
    /// * `tube` - radius of the tube
    pub fn random_on_torus(&mut self, major: f32, tube: f32) -> Vec3 {
        let u = self.rng.gen_range(0.0..TAU);
        let v = self.rng.gen_range(0.0..TAU);
        let ring = major + tube * v.cos();

        Vec3::new(ring * u.cos(), tube * v.sin(), ring * u.sin())
    }

    // ========== Coordinate sets ==========

    /// Base tree positions for `count` particles.
    pub fn tree_coordinates(&mut self, count: usize) -> Vec<f32> {
        let mut positions = Vec::with_capacity(count * 3);
        for _ in 0..count {
            let p = self.random_in_cone(TREE_HEIGHT, TREE_RADIUS);
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }
        log::debug!("generated {count} tree coordinates");
        positions
    }

    /// Base nebula positions for `count` particles.
    pub fn nebula_coordinates(&mut self, count: usize) -> Vec<f32> {
        let mut positions = Vec::with_capacity(count * 3);
        for _ in 0..count {
            let p = self.random_on_torus(NEBULA_RADIUS, NEBULA_TUBE);
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }
        log::debug!("generated {count} nebula coordinates");
        positions
    }

    /// Per-particle RGB colors in a dim green band.
    ///
    /// Hue in `[0.3, 0.4)`, saturation 0.8, lightness in `[0.1, 0.5)`.
    pub fn particle_colors(&mut self, count: usize) -> Vec<f32> {
        let mut colors = Vec::with_capacity(count * 3);
        for _ in 0..count {
            let hue = self.rng.gen::<f32>() * 0.1 + 0.3;
            let lightness = self.rng.gen::<f32>() * 0.4 + 0.1;
            let c = hsl_to_rgb(hue, 0.8, lightness);
            colors.extend_from_slice(&[c.x, c.y, c.z]);
        }
        colors
    }
}

impl Default for ShapeSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree coordinates from an unseeded sampler.
pub fn generate_tree_coordinates(count: usize) -> Vec<f32> {
    ShapeSampler::new().tree_coordinates(count)
}

/// Nebula coordinates from an unseeded sampler.
pub fn generate_nebula_coordinates(count: usize) -> Vec<f32> {
    ShapeSampler::new().nebula_coordinates(count)
}

/// Read point `index` out of a flat coordinate array.
///
/// Returns `None` when the array is too short to hold the point.
#[inline]
pub fn point_at(coords: &[f32], index: usize) -> Option<Vec3> {
    let base = index.checked_mul(3)?;
    let slice = coords.get(base..base + 3)?;
    Some(Vec3::new(slice[0], slice[1], slice[2]))
}

/// Convert HSL to RGB.
///
/// * `h` - 0.0 to 1.0 (wraps)
/// * `s` - 0.0 (gray) to 1.0 (vivid)
/// * `l` - 0.0 (black) to 1.0 (white)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h6 = h.rem_euclid(1.0) * 6.0;
    let x = c * (1.0 - (h6 % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
