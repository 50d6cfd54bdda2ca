//! Pointer tracking shared between particle fields.
//!
//! A [`PointerTracker`] holds the latest pointer position seen anywhere in
//! the window. Fields do not read it directly: each mounted field holds a
//! [`PointerSubscription`], and the tracker only listens for pointer moves
//! while at least one subscription is alive.
//!
//! ```ignore
//! let tracker = PointerTracker::new();
//! let sub = tracker.subscribe();
//! tracker.move_to(120.0, 48.0);
//! assert_eq!(sub.position(), Vec2::new(120.0, 48.0));
//! drop(sub);
//! assert!(!tracker.is_listening());
//! ```
//!
//! Everything runs on the event-loop thread, so the shared state is plain
//! `Rc` + `Cell`.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;

#[derive(Debug, Default)]
struct PointerState {
    position: Cell<Vec2>,
    subscribers: Cell<usize>,
}

/// Process-wide source of pointer coordinates, in logical window pixels.
///
/// Cloning is cheap and yields a handle to the same tracker.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    state: Rc<PointerState>,
}

impl PointerTracker {
    /// Create a tracker with the pointer at the origin and no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening on behalf of one consumer.
    pub fn subscribe(&self) -> PointerSubscription {
        let count = self.state.subscribers.get() + 1;
        self.state.subscribers.set(count);
        tracing::debug!(subscribers = count, "pointer subscription added");
        PointerSubscription {
            state: Rc::clone(&self.state),
        }
    }

    /// Whether the pointer-move listener is registered.
    pub fn is_listening(&self) -> bool {
        self.state.subscribers.get() > 0
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.subscribers.get()
    }

    /// Latest pointer position.
    pub fn position(&self) -> Vec2 {
        self.state.position.get()
    }

    /// Deliver a pointer-move. Ignored while nobody is subscribed.
    pub fn move_to(&self, x: f32, y: f32) {
        if self.is_listening() {
            self.state.position.set(Vec2::new(x, y));
        }
    }

    /// Deliver a pointer-move reported in physical pixels.
    pub fn move_physical(&self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let logical = position.to_logical::<f64>(scale_factor);
        self.move_to(logical.x as f32, logical.y as f32);
    }

    /// Feed a winit window event. Only `CursorMoved` is consumed.
    pub fn handle_event(&self, event: &WindowEvent, scale_factor: f64) {
        if let WindowEvent::CursorMoved { position, .. } = event {
            self.move_physical(*position, scale_factor);
        }
    }
}

/// A live claim on a [`PointerTracker`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct PointerSubscription {
    state: Rc<PointerState>,
}

impl PointerSubscription {
    /// Latest pointer position.
    pub fn position(&self) -> Vec2 {
        self.state.position.get()
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        let count = self.state.subscribers.get().saturating_sub(1);
        self.state.subscribers.set(count);
        tracing::debug!(subscribers = count, "pointer subscription removed");
    }
}
