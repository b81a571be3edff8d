//! Scene coordinator.
//!
//! [`Scene`] owns everything with state: the phase machine (the only writer
//! of [`AnimationState`]), the particle and ornament fields, the clock, and
//! the latest pointer reading. A host drives it with one call per rendered
//! frame:
//!
//! ```ignore
//! let mut scene = Scene::new(&SceneConfig::default());
//!
//! loop {
//!     for event in input.drain_events() {
//!         scene.handle_input(event);
//!     }
//!     scene.set_pointer(input.pointer_ndc());
//!
//!     let frame = scene.tick();
//!     renderer.upload(frame.particles.as_bytes(), frame.ornaments.as_bytes());
//! }
//! ```

use crate::config::SceneConfig;
use crate::input::{Gesture, InputEvent};
use crate::ornament::{AudioRequest, OrnamentField};
use crate::particles::ParticleField;
use crate::phase::{AdvanceOutcome, AnimationState, Phase, PhaseMachine};
use crate::pointer::PointerField;
use crate::shape::ShapeSampler;
use crate::time::Clock;
use crate::transform::{OrnamentInstance, ParticleInstance, TransformBatch};
use crate::Vec2;

/// Output of one tick, borrowed from the scene until the next tick.
pub struct Frame<'a> {
    pub phase: Phase,
    pub focus: Option<usize>,
    /// Animation clock at this frame, in seconds.
    pub time: f32,
    pub particles: &'a TransformBatch<ParticleInstance>,
    pub ornaments: &'a TransformBatch<OrnamentInstance>,
    pub star: OrnamentInstance,
}

/// The animated tree/nebula scene.
pub struct Scene {
    machine: PhaseMachine,
    particles: ParticleField,
    ornaments: OrnamentField,
    clock: Clock,
    pointer: Vec2,
    audio_clips: Vec<String>,
    photo_count: usize,
}

impl Scene {
    /// Generate shapes and ornaments for `config`.
    pub fn new(config: &SceneConfig) -> Self {
        let mut sampler = ShapeSampler::from_seed(config.seed);
        let particles = ParticleField::generate(config.particle_count, &mut sampler);
        let ornaments = OrnamentField::place(config.audio_clips.len(), config.filler_ornaments);

        let mut clock = Clock::new();
        clock.set_fixed_delta(config.fixed_delta);

        log::info!(
            "scene ready: {} particles, {} ornaments, {} photos",
            particles.len(),
            ornaments.len(),
            config.photos.len()
        );

        Self {
            machine: PhaseMachine::new(),
            particles,
            ornaments,
            clock,
            pointer: Vec2::ZERO,
            audio_clips: config.audio_clips.clone(),
            photo_count: config.photos.len(),
        }
    }

    // ========== State ==========

    #[inline]
    pub fn state(&self) -> &AnimationState {
        self.machine.state()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    #[inline]
    pub fn focus(&self) -> Option<usize> {
        self.machine.focus()
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    #[inline]
    pub fn ornaments(&self) -> &OrnamentField {
        &self.ornaments
    }

    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Contextual hint for the current phase and focus.
    pub fn guidance(&self) -> &'static str {
        match (self.phase(), self.focus()) {
            (Phase::Tree, _) => "Double click to Open",
            (Phase::Nebula, Some(_)) => "Double click: Back",
            (Phase::Nebula, None) => "Double click: Home",
            (Phase::Blooming | Phase::Collapsing, _) => "...",
        }
    }

    // ========== Input ==========

    /// Advance trigger at the current clock time.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let now = self.clock.elapsed();
        self.machine.advance(now)
    }

    /// Apply a discrete input event.
    ///
    /// Any recognized gesture is the same trigger as a double click.
    pub fn handle_input(&mut self, event: InputEvent) -> AdvanceOutcome {
        match event {
            InputEvent::Advance => self.advance(),
            InputEvent::Gesture(Gesture::None) => AdvanceOutcome::Ignored,
            InputEvent::Gesture(_) => self.advance(),
        }
    }

    /// Latest pointer reading in normalized device coordinates.
    ///
    /// Clamped to `[-1, 1]` on both axes.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Select ornament `index`. Returns a request for the audio player when
    /// the selection is live.
    pub fn select_ornament(&mut self, index: usize) -> Option<AudioRequest> {
        self.ornaments.select(index, self.machine.state())
    }

    /// Clip reference for an audio request.
    pub fn audio_clip(&self, request: AudioRequest) -> Option<&str> {
        if self.audio_clips.is_empty() {
            return None;
        }
        let index = request.audio_index % self.audio_clips.len();
        Some(self.audio_clips[index].as_str())
    }

    /// Focus photo `index`, or release it if it is already focused.
    ///
    /// Only valid in the nebula for an existing photo; returns whether the
    /// focus changed.
    pub fn toggle_photo_focus(&mut self, index: usize) -> bool {
        if index >= self.photo_count {
            return false;
        }
        self.machine.toggle_focus(index)
    }

    // ========== Frames ==========

    /// Advance the clock by wall time (or the fixed step) and build a frame.
    pub fn tick(&mut self) -> Frame<'_> {
        let (now, _) = self.clock.update();
        self.render(now)
    }

    /// Advance the clock by exactly `dt` seconds and build a frame.
    pub fn step(&mut self, dt: f32) -> Frame<'_> {
        let (now, _) = self.clock.advance(dt);
        self.render(now)
    }

    fn render(&mut self, now: f32) -> Frame<'_> {
        self.machine.update(now);

        let state = *self.machine.state();
        let pointer = PointerField::from_pointer(self.pointer);
        self.particles.animate(&state, now, &pointer);
        self.ornaments.animate(&state, now);

        Frame {
            phase: state.phase,
            focus: state.focus,
            time: now,
            particles: self.particles.batch(),
            ornaments: self.ornaments.batch(),
            star: self.ornaments.star(),
        }
    }
}
