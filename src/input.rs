//! Input handling for the scene.
//!
//! [`Input`] turns raw window events into the few signals the scene cares
//! about:
//!
//! - the pointer position in normalized device coordinates, updated
//!   continuously
//! - a discrete [`InputEvent::Advance`] trigger from a double click or the
//!   Space/Enter keys
//! - [`InputEvent::Gesture`] when a tracked hand changes pose
//!
//! Discrete events are queued and drained once per tick.
//!
//! ```ignore
//! input.handle_event(&event);
//! // ...once per frame:
//! scene.set_pointer(input.pointer_ndc());
//! for event in input.drain_events() {
//!     scene.handle_input(event);
//! }
//! ```

use crate::Vec2;
use std::time::{Duration, Instant};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Default maximum gap between the two presses of a double click.
pub const DEFAULT_DOUBLE_CLICK: Duration = Duration::from_millis(300);
/// Average fingertip-to-wrist distance above which a hand reads as open.
pub const OPEN_PALM_THRESHOLD: f32 = 0.35;
/// Average fingertip-to-wrist distance below which a hand reads as a fist.
pub const CLOSED_FIST_THRESHOLD: f32 = 0.25;

/// Hand pose reported by a gesture tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    #[default]
    None,
    OpenPalm,
    ClosedFist,
}

impl Gesture {
    /// Classify a hand from its average fingertip-to-wrist distance, in
    /// normalized image units. Between the two thresholds the pose is
    /// ambiguous and reads as [`Gesture::None`].
    pub fn classify(avg_tip_distance: f32) -> Self {
        if avg_tip_distance > OPEN_PALM_THRESHOLD {
            Gesture::OpenPalm
        } else if avg_tip_distance < CLOSED_FIST_THRESHOLD {
            Gesture::ClosedFist
        } else {
            Gesture::None
        }
    }
}

/// Discrete input signals consumed by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Advance the phase (double activation or keyboard).
    Advance,
    /// The tracked hand changed to this pose.
    Gesture(Gesture),
}

/// Pointer, click and gesture tracking.
#[derive(Debug)]
pub struct Input {
    pointer_ndc: Vec2,
    window_size: (u32, u32),
    double_click: Duration,
    last_press: Option<Instant>,
    gesture: Gesture,
    events: Vec<InputEvent>,
}

impl Input {
    /// Create an input tracker with the default double-click window.
    pub fn new() -> Self {
        Self::with_double_click(DEFAULT_DOUBLE_CLICK)
    }

    /// Create an input tracker with a custom double-click window.
    pub fn with_double_click(window: Duration) -> Self {
        Self {
            pointer_ndc: Vec2::ZERO,
            window_size: (800, 600),
            double_click: window,
            last_press: None,
            gesture: Gesture::None,
            events: Vec::with_capacity(4),
        }
    }

    // ========== Queries ==========

    /// Pointer position in normalized device coordinates (-1 to 1).
    ///
    /// Origin is at the center of the window. X increases to the right, Y
    /// increases upward.
    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }

    /// Most recent hand pose.
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether discrete events are waiting.
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Take all queued discrete events.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    // ========== Feeding ==========

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Set the pointer from a window-space position in pixels.
    pub fn set_cursor(&mut self, x: f64, y: f64) {
        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.pointer_ndc = Vec2::new(
                (x as f32 / w as f32) * 2.0 - 1.0,
                1.0 - (y as f32 / h as f32) * 2.0, // Y flipped
            );
        }
    }

    /// Register a primary button press at `at`.
    ///
    /// A second press within the double-click window queues
    /// [`InputEvent::Advance`] and disarms; otherwise the press arms the
    /// window.
    pub fn press(&mut self, at: Instant) {
        match self.last_press {
            Some(first) if at.saturating_duration_since(first) <= self.double_click => {
                self.last_press = None;
                self.events.push(InputEvent::Advance);
            }
            _ => self.last_press = Some(at),
        }
    }

    /// Report the current hand pose from a gesture tracker.
    ///
    /// Queues [`InputEvent::Gesture`] when the pose changes to something
    /// other than [`Gesture::None`].
    pub fn set_gesture(&mut self, gesture: Gesture) {
        if gesture != self.gesture && gesture != Gesture::None {
            self.events.push(InputEvent::Gesture(gesture));
        }
        self.gesture = gesture;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.press(Instant::now());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let advance_key = matches!(
                    event.physical_key,
                    PhysicalKey::Code(KeyCode::Space | KeyCode::Enter)
                );
                if advance_key && event.state == ElementState::Pressed && !event.repeat {
                    self.events.push(InputEvent::Advance);
                }
            }

            _ => {}
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_ndc() {
        let mut input = Input::new();
        input.set_window_size(800, 600);

        input.set_cursor(400.0, 300.0);
        assert!(input.pointer_ndc().x.abs() < 0.01);
        assert!(input.pointer_ndc().y.abs() < 0.01);

        input.set_cursor(800.0, 0.0);
        assert!((input.pointer_ndc().x - 1.0).abs() < 1e-6);
        assert!((input.pointer_ndc().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_event_updates_mapping() {
        use winit::dpi::PhysicalSize;

        let mut input = Input::new();
        input.handle_event(&WindowEvent::Resized(PhysicalSize::new(400, 200)));

        input.set_cursor(400.0, 0.0);
        assert!((input.pointer_ndc().x - 1.0).abs() < 1e-6);
        assert!((input.pointer_ndc().y - 1.0).abs() < 1e-6);

        input.set_cursor(100.0, 150.0);
        assert!((input.pointer_ndc().x + 0.5).abs() < 1e-6);
        assert!((input.pointer_ndc().y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let mut input = Input::new();
        input.set_cursor(200.0, 150.0);
        let before = input.pointer_ndc();

        input.handle_event(&WindowEvent::Focused(true));
        input.handle_event(&WindowEvent::CloseRequested);

        assert_eq!(input.pointer_ndc(), before);
        assert!(!input.has_events());
    }

    #[test]
    fn test_zero_window_keeps_pointer() {
        let mut input = Input::new();
        input.set_cursor(0.0, 0.0);
        let before = input.pointer_ndc();
        input.set_window_size(0, 0);
        input.set_cursor(10.0, 10.0);
        assert_eq!(input.pointer_ndc(), before);
    }

    #[test]
    fn test_double_click_advances() {
        let mut input = Input::new();
        let t0 = Instant::now();
        input.press(t0);
        assert!(!input.has_events());

        input.press(t0 + Duration::from_millis(200));
        let events: Vec<_> = input.drain_events().collect();
        assert_eq!(events, vec![InputEvent::Advance]);
        assert!(!input.has_events());
    }

    #[test]
    fn test_slow_clicks_do_not_advance() {
        let mut input = Input::new();
        let t0 = Instant::now();
        input.press(t0);
        input.press(t0 + Duration::from_millis(500));
        assert!(!input.has_events());

        // The second press re-armed the window.
        input.press(t0 + Duration::from_millis(650));
        assert_eq!(input.drain_events().count(), 1);
    }

    #[test]
    fn test_triple_click_is_one_advance() {
        let mut input = Input::new();
        let t0 = Instant::now();
        input.press(t0);
        input.press(t0 + Duration::from_millis(100));
        input.press(t0 + Duration::from_millis(200));
        assert_eq!(input.drain_events().count(), 1);
    }

    #[test]
    fn test_gesture_classify() {
        assert_eq!(Gesture::classify(0.4), Gesture::OpenPalm);
        assert_eq!(Gesture::classify(0.2), Gesture::ClosedFist);
        assert_eq!(Gesture::classify(0.3), Gesture::None);
    }

    #[test]
    fn test_gesture_edges() {
        let mut input = Input::new();
        input.set_gesture(Gesture::OpenPalm);
        input.set_gesture(Gesture::OpenPalm);
        input.set_gesture(Gesture::None);
        input.set_gesture(Gesture::ClosedFist);

        let events: Vec<_> = input.drain_events().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Gesture(Gesture::OpenPalm),
                InputEvent::Gesture(Gesture::ClosedFist),
            ]
        );
        assert_eq!(input.gesture(), Gesture::ClosedFist);
    }
}
