//! Pointer tracking in drawing-buffer space.

use crate::uniforms::UniformSurface;

/// One pointer-move event plus the on-screen rect of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub client_x: f32,
    pub client_y: f32,
    pub rect_left: f32,
    pub rect_top: f32,
    pub rect_width: f32,
    pub rect_height: f32,
}

/// Writes the latest pointer target and, once per frame, the pushed position.
///
/// By default the pushed position jumps straight to the target. With
/// smoothing enabled it approaches the target exponentially, using the
/// dampening value as the time constant in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerTracker {
    smoothing: Option<f32>,
}

impl PointerTracker {
    pub fn new(smooth: bool, dampening: f32) -> Self {
        Self {
            smoothing: smooth.then_some(dampening),
        }
    }

    /// Undamped tracker.
    pub fn direct() -> Self {
        Self { smoothing: None }
    }

    /// Convert a host event into buffer pixels and store it as the target.
    pub fn on_move(&self, sample: PointerSample, surface: &mut UniformSurface) {
        if sample.rect_width <= 0.0 || sample.rect_height <= 0.0 {
            return;
        }
        let sx = surface.resolution[0] / sample.rect_width;
        let sy = surface.resolution[1] / sample.rect_height;
        surface.pointer_target = [
            (sample.client_x - sample.rect_left) * sx,
            (sample.client_y - sample.rect_top) * sy,
        ];
    }

    /// Move the pushed pointer toward the target; `dt` is in seconds.
    pub fn advance(&self, surface: &mut UniformSurface, dt: f32) {
        let target = surface.pointer_target;
        let factor = match self.smoothing {
            Some(damp) if damp > 0.0 && dt.is_finite() => 1.0 - (-dt.max(0.0) / damp).exp(),
            _ => 1.0,
        };
        if factor >= 1.0 {
            surface.pointer = target;
            return;
        }
        let p = &mut surface.pointer;
        p[0] += (target[0] - p[0]) * factor;
        p[1] += (target[1] - p[1]) * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradientConfig;
    use crate::uniforms::{EffectParams, SurfaceSize};

    fn surface(w: f32, h: f32) -> UniformSurface {
        let params = EffectParams::from_config(&GradientConfig::default()).unwrap();
        UniformSurface::new(params, SurfaceSize::new(w, h))
    }

    #[test]
    fn scales_css_to_buffer() {
        let mut s = surface(200.0, 100.0);
        let sample = PointerSample {
            client_x: 60.0,
            client_y: 30.0,
            rect_left: 10.0,
            rect_top: 5.0,
            rect_width: 100.0,
            rect_height: 50.0,
        };
        PointerTracker::direct().on_move(sample, &mut s);
        assert_eq!(s.pointer_target, [100.0, 50.0]);
    }

    #[test]
    fn zero_rect_ignored() {
        let mut s = surface(200.0, 100.0);
        let before = s.pointer_target;
        PointerTracker::direct().on_move(PointerSample::default(), &mut s);
        assert_eq!(s.pointer_target, before);
    }

    #[test]
    fn direct_advance_snaps() {
        let mut s = surface(200.0, 100.0);
        s.pointer_target = [7.0, 9.0];
        PointerTracker::direct().advance(&mut s, 0.016);
        assert_eq!(s.pointer, [7.0, 9.0]);
    }

    #[test]
    fn default_config_does_not_smooth() {
        let config = GradientConfig::default();
        let tracker = PointerTracker::new(config.smooth_pointer, config.mouse_dampening);
        assert_eq!(tracker, PointerTracker::direct());
    }

    #[test]
    fn smoothing_approaches_target() {
        let mut s = surface(200.0, 100.0);
        s.pointer = [0.0, 0.0];
        s.pointer_target = [100.0, 0.0];
        let tracker = PointerTracker::new(true, 0.15);
        tracker.advance(&mut s, 0.016);
        let first = s.pointer[0];
        assert!(first > 0.0 && first < 100.0);
        for _ in 0..200 {
            tracker.advance(&mut s, 0.016);
        }
        assert!((s.pointer[0] - 100.0).abs() < 1e-3);
    }

    #[test]
    fn non_positive_dampening_snaps() {
        let mut s = surface(200.0, 100.0);
        s.pointer_target = [1.0, 2.0];
        PointerTracker::new(true, 0.0).advance(&mut s, 0.016);
        assert_eq!(s.pointer, [1.0, 2.0]);
    }
}
