//! Per-refresh loop state.
//!
//! The browser side owns the actual `requestAnimationFrame` handle; this type
//! decides whether a callback may draw and what it writes before drawing.

use crate::pointer::PointerTracker;
use crate::uniforms::UniformSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    /// Destroyed; can never run again.
    Terminated,
}

#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    origin_ms: Option<f64>,
    last_ms: Option<f64>,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            origin_ms: None,
            last_ms: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Returns false unless the loop was stopped.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Stopped {
            return false;
        }
        self.state = LoopState::Running;
        self.origin_ms = None;
        self.last_ms = None;
        true
    }

    /// Pause without tearing down; `start` resumes with a fresh time origin.
    pub fn cancel(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    pub fn terminate(&mut self) {
        self.state = LoopState::Terminated;
    }

    /// Handle one refresh callback. Returns true when exactly one draw should follow.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        surface: &mut UniformSurface,
        pointer: &PointerTracker,
    ) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let dt = self
            .last_ms
            .map(|last| ((timestamp_ms - last) / 1000.0).max(0.0))
            .unwrap_or(0.0);
        self.last_ms = Some(timestamp_ms);

        surface.time = ((timestamp_ms - origin) / 1000.0) as f32;
        pointer.advance(surface, dt as f32);
        true
    }
}
