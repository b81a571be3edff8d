//! Scene configuration.
//!
//! A [`SceneConfig`] can be built in code with the `with_*` methods or loaded
//! from JSON. Every field has a default, so a partial file such as
//!
//! ```json
//! { "particle_count": 4000, "seed": 7 }
//! ```
//!
//! is a valid configuration.

use crate::error::Result;
use crate::ornament::DEFAULT_FILLER_COUNT;
use crate::shape::DEFAULT_PARTICLE_COUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_particle_count() -> usize {
    DEFAULT_PARTICLE_COUNT
}

fn default_filler_count() -> usize {
    DEFAULT_FILLER_COUNT
}

fn default_double_click_ms() -> u64 {
    300
}

fn default_audio_clips() -> Vec<String> {
    (1..=4).map(|i| format!("audio/recording-{i}.m4a")).collect()
}

fn default_photos() -> Vec<String> {
    // Nine photos repeated around a ring of 24 frames
    (0..24).map(|i| format!("photos/{:02}.jpg", i % 9 + 1)).collect()
}

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// Number of particles in the field.
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    /// Seed for shape generation. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Audio clip references; one interactive ornament per clip.
    #[serde(default = "default_audio_clips")]
    pub audio_clips: Vec<String>,
    /// Photo references; only the count is used for focus validation.
    #[serde(default = "default_photos")]
    pub photos: Vec<String>,
    /// Number of filler ornaments.
    #[serde(default = "default_filler_count")]
    pub filler_ornaments: usize,
    /// Maximum gap between two presses that counts as a double activation.
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
    /// Fixed clock step in seconds. `None` follows the wall clock.
    #[serde(default)]
    pub fixed_delta: Option<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            seed: None,
            audio_clips: default_audio_clips(),
            photos: default_photos(),
            filler_ornaments: default_filler_count(),
            double_click_ms: default_double_click_ms(),
            fixed_delta: None,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Make shape generation reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the audio clip list.
    pub fn with_audio_clips<I, S>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audio_clips = clips.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the photo list.
    pub fn with_photos<I, S>(mut self, photos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos = photos.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of filler ornaments.
    pub fn with_filler_ornaments(mut self, count: usize) -> Self {
        self.filler_ornaments = count;
        self
    }

    /// Step the clock by a fixed amount per tick instead of the wall clock.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.fixed_delta = Some(delta);
        self
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
