//! Phase state machine driving the morph scalars.
//!
//! The scene cycles through four phases:
//!
//! ```text
//! tree --advance--> blooming --(explosion tween done)--> nebula
//!   ^                                                       |
//!   +--(progress tween done)-- collapsing <----advance------+
//! ```
//!
//! Entering a phase starts tweens on `explosion` and/or `progress`. Each
//! scalar has at most one tween in flight; starting a new one overwrites the
//! old one, including its completion action. Automatic phase changes happen
//! only when the tween that carries them completes.

use crate::ease::{Easing, Tween};
use serde::{Deserialize, Serialize};

/// Duration of the outward burst when blooming.
pub const BLOOM_DURATION: f32 = 2.0;
/// Duration of the burst settling once the nebula is reached.
pub const SETTLE_DURATION: f32 = 1.0;
/// Duration of the tree/nebula morph in either direction.
pub const MORPH_DURATION: f32 = 3.0;

/// The four scene phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Tree,
    Blooming,
    Nebula,
    Collapsing,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Tree => "tree",
            Phase::Blooming => "blooming",
            Phase::Nebula => "nebula",
            Phase::Collapsing => "collapsing",
        }
    }

    /// Whether the phase is one of the two animated in-between states.
    pub fn is_transition(&self) -> bool {
        matches!(self, Phase::Blooming | Phase::Collapsing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared animation state read by the animators each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub phase: Phase,
    /// Blend factor, 0 = tree, 1 = nebula.
    pub progress: f32,
    /// Radial burst factor, 0 = at rest, 1 = fully exploded.
    pub explosion: f32,
    /// Focused photo, only ever set during [`Phase::Nebula`].
    pub focus: Option<usize>,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            phase: Phase::Tree,
            progress: 0.0,
            explosion: 0.0,
            focus: None,
        }
    }
}

/// Result of an advance trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The machine entered a new phase.
    Entered(Phase),
    /// A focus was active in the nebula; it was cleared instead.
    FocusCleared,
    /// Mid-transition; nothing changed.
    Ignored,
}

/// A tween on one scalar plus the phase to enter when it completes.
#[derive(Clone, Copy, Debug)]
struct ScalarTween {
    tween: Tween,
    on_complete: Option<Phase>,
}

/// The single writer of [`AnimationState`].
#[derive(Debug, Default)]
pub struct PhaseMachine {
    state: AnimationState,
    progress_tween: Option<ScalarTween>,
    explosion_tween: Option<ScalarTween>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.state.progress
    }

    #[inline]
    pub fn explosion(&self) -> f32 {
        self.state.explosion
    }

    #[inline]
    pub fn focus(&self) -> Option<usize> {
        self.state.focus
    }

    /// Whether any scalar is still being tweened.
    pub fn is_animating(&self) -> bool {
        self.progress_tween.is_some() || self.explosion_tween.is_some()
    }

    /// Handle an external advance trigger at clock time `now`.
    pub fn advance(&mut self, now: f32) -> AdvanceOutcome {
        match self.state.phase {
            Phase::Tree => {
                self.enter(Phase::Blooming, now);
                AdvanceOutcome::Entered(Phase::Blooming)
            }
            Phase::Nebula if self.state.focus.is_some() => {
                log::debug!("advance cleared focus {:?}", self.state.focus);
                self.state.focus = None;
                AdvanceOutcome::FocusCleared
            }
            Phase::Nebula => {
                self.enter(Phase::Collapsing, now);
                AdvanceOutcome::Entered(Phase::Collapsing)
            }
            Phase::Blooming | Phase::Collapsing => {
                log::debug!("advance ignored while {}", self.state.phase);
                AdvanceOutcome::Ignored
            }
        }
    }

    /// Set the focus index. Only accepted during the nebula phase.
    ///
    /// Returns whether the focus was applied.
    pub fn set_focus(&mut self, focus: Option<usize>) -> bool {
        if self.state.phase != Phase::Nebula {
            return false;
        }
        self.state.focus = focus;
        true
    }

    /// Focus `index`, or clear the focus if `index` is already focused.
    pub fn toggle_focus(&mut self, index: usize) -> bool {
        let next = if self.state.focus == Some(index) {
            None
        } else {
            Some(index)
        };
        self.set_focus(next)
    }

    /// Advance tweens to clock time `now`.
    ///
    /// Returns the phase entered automatically during this update, if any.
    pub fn update(&mut self, now: f32) -> Option<Phase> {
        let mut entered = None;

        // A completion enters a phase whose tweens may themselves need
        // evaluating at `now`; the cycle has no zero-length edges so this
        // settles within a couple of passes.
        for _ in 0..4 {
            let explosion_done =
                step_tween(&mut self.explosion_tween, &mut self.state.explosion, now);
            let progress_done =
                step_tween(&mut self.progress_tween, &mut self.state.progress, now);

            let next = match (explosion_done, progress_done) {
                (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
                (a, b) => a.or(b),
            };

            match next {
                Some((at, phase)) => {
                    self.enter(phase, at);
                    entered = Some(phase);
                }
                None => break,
            }
        }

        entered
    }

    fn enter(&mut self, phase: Phase, at: f32) {
        log::info!("phase {} -> {} at {:.2}s", self.state.phase, phase, at);
        self.state.phase = phase;

        match phase {
            Phase::Tree => {}
            Phase::Blooming => {
                self.explosion_tween = Some(ScalarTween {
                    tween: Tween::new(self.state.explosion, 1.0, at, BLOOM_DURATION, Easing::QuadOut),
                    on_complete: Some(Phase::Nebula),
                });
            }
            Phase::Nebula => {
                self.explosion_tween = Some(ScalarTween {
                    tween: Tween::new(self.state.explosion, 0.0, at, SETTLE_DURATION, Easing::Linear),
                    on_complete: None,
                });
                self.progress_tween = Some(ScalarTween {
                    tween: Tween::new(self.state.progress, 1.0, at, MORPH_DURATION, Easing::QuadInOut),
                    on_complete: None,
                });
            }
            Phase::Collapsing => {
                self.state.focus = None;
                self.progress_tween = Some(ScalarTween {
                    tween: Tween::new(self.state.progress, 0.0, at, MORPH_DURATION, Easing::CubicInOut),
                    on_complete: Some(Phase::Tree),
                });
            }
        }
    }
}

/// Write the tween's value at `now` into `value`.
///
/// A finished tween is removed; if it carried a completion phase, that phase
/// is returned together with the tween's end time.
fn step_tween(slot: &mut Option<ScalarTween>, value: &mut f32, now: f32) -> Option<(f32, Phase)> {
    let active = (*slot)?;
    *value = active.tween.value_at(now);

    if !active.tween.is_finished(now) {
        return None;
    }
    *value = active.tween.to;
    *slot = None;
    active.on_complete.map(|phase| (active.tween.end(), phase))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_initial_state() {
        let machine = PhaseMachine::new();
        assert_eq!(machine.phase(), Phase::Tree);
        assert_eq!(machine.progress(), 0.0);
        assert_eq!(machine.explosion(), 0.0);
        assert_eq!(machine.focus(), None);
        assert!(!machine.is_animating());
    }

    #[test]
    fn test_bloom_then_nebula() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.advance(0.0), AdvanceOutcome::Entered(Phase::Blooming));

        assert_eq!(machine.update(1.0), None);
        assert_eq!(machine.phase(), Phase::Blooming);
        assert!((machine.explosion() - 0.75).abs() < EPS);

        assert_eq!(machine.update(2.0), Some(Phase::Nebula));
        assert_eq!(machine.explosion(), 1.0);

        machine.update(2.5);
        assert!((machine.explosion() - 0.5).abs() < EPS);

        machine.update(3.0);
        assert_eq!(machine.explosion(), 0.0);

        machine.update(5.0);
        assert_eq!(machine.progress(), 1.0);
        assert_eq!(machine.phase(), Phase::Nebula);
        assert!(!machine.is_animating());
    }

    #[test]
    fn test_chained_entry_is_anchored_at_completion() {
        // One coarse tick jumping past the bloom still schedules the nebula
        // tweens from t=2.0, not from the tick time.
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        assert_eq!(machine.update(2.5), Some(Phase::Nebula));
        assert!((machine.explosion() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_redundant_triggers_ignored_while_blooming() {
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        for i in 1..10 {
            let now = i as f32 * 0.15;
            assert_eq!(machine.advance(now), AdvanceOutcome::Ignored);
            machine.update(now);
        }
        machine.update(10.0);
        assert_eq!(machine.phase(), Phase::Nebula);
    }

    #[test]
    fn test_focus_blocks_collapse() {
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        machine.update(6.0);
        assert!(machine.set_focus(Some(3)));

        assert_eq!(machine.advance(7.0), AdvanceOutcome::FocusCleared);
        assert_eq!(machine.phase(), Phase::Nebula);
        assert_eq!(machine.focus(), None);

        assert_eq!(machine.advance(8.0), AdvanceOutcome::Entered(Phase::Collapsing));
        machine.update(11.0);
        assert_eq!(machine.phase(), Phase::Tree);
        assert_eq!(machine.progress(), 0.0);
    }

    #[test]
    fn test_focus_rejected_outside_nebula() {
        let mut machine = PhaseMachine::new();
        assert!(!machine.set_focus(Some(1)));
        assert!(!machine.toggle_focus(1));
        assert_eq!(machine.focus(), None);
    }

    #[test]
    fn test_toggle_focus() {
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        machine.update(2.0);
        assert!(machine.toggle_focus(4));
        assert_eq!(machine.focus(), Some(4));
        assert!(machine.toggle_focus(5));
        assert_eq!(machine.focus(), Some(5));
        assert!(machine.toggle_focus(5));
        assert_eq!(machine.focus(), None);
    }

    #[test]
    fn test_collapse_retargets_morph_in_flight() {
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        machine.update(2.0);
        // Progress tween (2.0 -> 5.0) is mid-flight.
        machine.update(3.5);
        let mid = machine.progress();
        assert!(mid > 0.0 && mid < 1.0);

        assert_eq!(machine.advance(3.5), AdvanceOutcome::Entered(Phase::Collapsing));
        // The nebula morph's target is gone: progress heads down from `mid`.
        machine.update(3.6);
        assert!(machine.progress() < mid);

        // Well past the old morph end the phase is tree, not nebula.
        assert_eq!(machine.update(6.5), Some(Phase::Tree));
        assert_eq!(machine.progress(), 0.0);
        assert_eq!(machine.phase(), Phase::Tree);
    }

    #[test]
    fn test_full_cycle_returns_to_tree() {
        let mut machine = PhaseMachine::new();
        machine.advance(0.0);
        machine.update(5.0);
        machine.advance(5.0);
        assert_eq!(machine.phase(), Phase::Collapsing);
        assert_eq!(machine.advance(6.0), AdvanceOutcome::Ignored);
        assert_eq!(machine.update(8.0), Some(Phase::Tree));

        // And again
        assert_eq!(machine.advance(9.0), AdvanceOutcome::Entered(Phase::Blooming));
    }

    #[test]
    fn test_phase_serde_names() {
        let json = serde_json::to_string(&Phase::Collapsing).unwrap();
        assert_eq!(json, "\"collapsing\"");
        let phase: Phase = serde_json::from_str("\"nebula\"").unwrap();
        assert_eq!(phase, Phase::Nebula);
    }
}
