//! Per-frame transform batches handed to the renderer.
//!
//! Instance records are `#[repr(C)]` and [`bytemuck::Pod`] so a renderer can
//! upload a whole batch with a single `cast_slice`, without per-instance
//! conversion.

use crate::Vec3;
use bytemuck::{Pod, Zeroable};

/// Transform of one particle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

/// Transform of one ornament.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OrnamentInstance {
    pub position: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Rotation about the vertical axis in radians.
    pub rotation_y: f32,
}

/// Fixed-size buffer of instance transforms with a dirty flag.
///
/// The buffer is allocated once; writers overwrite entries in place and call
/// [`TransformBatch::mark_updated`] once after the whole batch is written.
#[derive(Clone, Debug)]
pub struct TransformBatch<T: Pod> {
    instances: Vec<T>,
    dirty: bool,
    version: u64,
}

impl<T: Pod> TransformBatch<T> {
    /// Zero-initialized batch holding `len` instances.
    pub fn new(len: usize) -> Self {
        Self {
            instances: vec![T::zeroed(); len],
            dirty: false,
            version: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn instances(&self) -> &[T] {
        &self.instances
    }

    /// Mutable access for writers. Does not mark the batch dirty.
    #[inline]
    pub(crate) fn instances_mut(&mut self) -> &mut [T] {
        &mut self.instances
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.instances.get(index)
    }

    /// Raw bytes for GPU upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Flag the batch as rewritten. Call once per frame, after all writes.
    pub fn mark_updated(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    /// Whether the batch changed since the renderer last consumed it.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of completed updates since creation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Consume the dirty flag. Returns `true` if an upload is due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
