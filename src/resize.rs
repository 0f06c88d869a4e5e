//! Responsive layout pass.

use crate::uniforms::{SurfaceSize, UniformSurface};

/// Container layout box in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Canvas dimensions for this box. Buffer pixels map 1:1 to CSS pixels.
    pub fn buffer_dims(self) -> (u32, u32) {
        (self.width.max(0.0) as u32, self.height.max(0.0) as u32)
    }
}

/// Recomputes resolution and stripe density whenever the container changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeController {
    nominal: Option<u32>,
    min_width: Option<f32>,
}

impl ResizeController {
    /// `nominal` and `min_width` follow the config convention: `None` = unset.
    pub fn new(nominal: Option<u32>, min_width: Option<f32>) -> Self {
        Self {
            nominal: nominal.filter(|&n| n > 0),
            min_width: min_width.filter(|&w| w > 0.0),
        }
    }

    /// Stripe count for a container `width`, or `None` when density scaling is off.
    pub fn effective_blind_count(&self, width: f32) -> Option<u32> {
        let min_width = self.min_width?;
        let by_width = ((width / min_width).floor().max(0.0) as u32).max(1);
        Some(match self.nominal {
            Some(n) => n.min(by_width),
            None => by_width,
        })
    }

    /// Apply a new layout: resolution, stripe density, re-centred pointer.
    pub fn apply(&self, container: ContainerSize, buffer: SurfaceSize, surface: &mut UniformSurface) {
        surface.resolution = [buffer.width, buffer.height];
        if let Some(count) = self.effective_blind_count(container.width) {
            surface.blind_count = count.max(1) as f32;
        }
        let center = buffer.center();
        surface.pointer_target = center;
        surface.pointer = center;
        log::debug!(
            "resize {}x{} -> {} blinds",
            buffer.width,
            buffer.height,
            surface.blind_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradientConfig;
    use crate::uniforms::EffectParams;

    fn surface() -> UniformSurface {
        let params = EffectParams::from_config(&GradientConfig::default()).unwrap();
        UniformSurface::new(params, SurfaceSize::new(1.0, 1.0))
    }

    #[test]
    fn density_caps_nominal_count() {
        let rc = ResizeController::new(Some(13), Some(50.0));
        assert_eq!(rc.effective_blind_count(1920.0), Some(13));
        assert_eq!(rc.effective_blind_count(320.0), Some(6));
        assert_eq!(rc.effective_blind_count(10.0), Some(1));
    }

    #[test]
    fn no_nominal_uses_width_limit() {
        let rc = ResizeController::new(None, Some(100.0));
        assert_eq!(rc.effective_blind_count(1050.0), Some(10));
    }

    #[test]
    fn disabled_min_width_keeps_nominal() {
        let rc = ResizeController::new(Some(8), Some(0.0));
        assert_eq!(rc.effective_blind_count(100.0), None);

        let mut s = surface();
        s.blind_count = 8.0;
        rc.apply(ContainerSize::new(100.0, 50.0), SurfaceSize::new(100.0, 50.0), &mut s);
        assert_eq!(s.blind_count, 8.0);
    }

    #[test]
    fn apply_recenters_pointer() {
        let rc = ResizeController::new(Some(13), Some(50.0));
        let mut s = surface();
        s.pointer_target = [3.0, 4.0];
        s.pointer = [5.0, 6.0];
        rc.apply(ContainerSize::new(640.0, 480.0), SurfaceSize::new(640.0, 480.0), &mut s);
        assert_eq!(s.resolution, [640.0, 480.0]);
        assert_eq!(s.pointer_target, [320.0, 240.0]);
        assert_eq!(s.pointer, [320.0, 240.0]);
        assert_eq!(s.blind_count, 12.0);
    }

    #[test]
    fn buffer_dims_truncate() {
        assert_eq!(ContainerSize::new(100.7, 50.2).buffer_dims(), (100, 50));
        assert_eq!(ContainerSize::new(-4.0, 0.0).buffer_dims(), (0, 0));
    }
}
