//! Parameter set read by the compositor every frame.

use crate::config::GradientConfig;
use crate::error::ConfigError;
use crate::ramp::ColorRamp;

/// GLSL uniform names, shared by the shader source and the GL upload.
pub mod names {
    pub const RESOLUTION: &str = "u_resolution";
    pub const POINTER: &str = "u_pointer";
    pub const TIME: &str = "u_time";
    pub const ANGLE: &str = "u_angle";
    pub const NOISE: &str = "u_noise";
    pub const BLIND_COUNT: &str = "u_blind_count";
    pub const SPOT_RADIUS: &str = "u_spot_radius";
    pub const SPOT_SOFTNESS: &str = "u_spot_softness";
    pub const SPOT_OPACITY: &str = "u_spot_opacity";
    pub const MIRROR: &str = "u_mirror";
    pub const DISTORT: &str = "u_distort";
    pub const SHINE_FLIP: &str = "u_shine_flip";
    pub const COLORS: &str = "u_colors";
    pub const COLOR_COUNT: &str = "u_color_count";

    pub const ALL: [&str; 14] = [
        RESOLUTION,
        POINTER,
        TIME,
        ANGLE,
        NOISE,
        BLIND_COUNT,
        SPOT_RADIUS,
        SPOT_SOFTNESS,
        SPOT_OPACITY,
        MIRROR,
        DISTORT,
        SHINE_FLIP,
        COLORS,
        COLOR_COUNT,
    ];
}

/// Drawing-buffer size in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> [f32; 2] {
        [self.width / 2.0, self.height / 2.0]
    }
}

/// Static uniform values, derived and validated once.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectParams {
    /// Rotation in radians.
    pub angle: f32,
    pub noise: f32,
    pub spot_radius: f32,
    pub spot_softness: f32,
    pub spot_opacity: f32,
    pub mirror: bool,
    pub distort: f32,
    pub shine_flip: bool,
    pub ramp: ColorRamp,
    pub nominal_blinds: Option<u32>,
}

impl EffectParams {
    /// Validate the config and convert it to shader units.
    pub fn from_config(config: &GradientConfig) -> Result<Self, ConfigError> {
        config.check_finite()?;
        let ramp = ColorRamp::from_hex(&config.gradient_colors)?;
        Ok(Self {
            angle: config.angle.to_radians(),
            noise: config.noise,
            spot_radius: config.spotlight_radius,
            spot_softness: config.spotlight_softness,
            spot_opacity: config.spotlight_opacity,
            mirror: config.mirror_gradient,
            distort: config.distort_amount,
            shine_flip: config.shine_direction.is_flipped(),
            ramp,
            nominal_blinds: config.nominal_blind_count(),
        })
    }
}

/// Mutable per-frame uniform state. One owner; callers borrow it in turn.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformSurface {
    pub params: EffectParams,
    pub resolution: [f32; 2],
    /// Position pushed to the shader, in drawing-buffer pixels.
    pub pointer: [f32; 2],
    /// Latest position reported by the host.
    pub pointer_target: [f32; 2],
    /// Seconds since the loop started.
    pub time: f32,
    /// Effective stripe count after density clamping.
    pub blind_count: f32,
}

impl UniformSurface {
    pub fn new(params: EffectParams, size: SurfaceSize) -> Self {
        let center = size.center();
        let blind_count = params.nominal_blinds.unwrap_or(1).max(1) as f32;
        Self {
            params,
            resolution: [size.width, size.height],
            pointer: center,
            pointer_target: center,
            time: 0.0,
            blind_count,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.resolution[0], self.resolution[1])
    }

    /// Stops flattened for a `vec3[4]` upload.
    pub fn color_data(&self) -> [f32; 12] {
        let mut out = [0.0; 12];
        for (chunk, stop) in out.chunks_exact_mut(3).zip(self.params.ramp.stops()) {
            chunk.copy_from_slice(stop);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EffectParams {
        EffectParams::from_config(&GradientConfig::default()).unwrap()
    }

    #[test]
    fn angle_converted_to_radians() {
        let p = params();
        assert!((p.angle - 15f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn new_surface_starts_centered() {
        let surface = UniformSurface::new(params(), SurfaceSize::new(800.0, 600.0));
        assert_eq!(surface.pointer, [400.0, 300.0]);
        assert_eq!(surface.pointer_target, [400.0, 300.0]);
        assert_eq!(surface.blind_count, 13.0);
        assert_eq!(surface.time, 0.0);
    }

    #[test]
    fn unset_blind_count_starts_at_one() {
        let config = GradientConfig {
            blind_count: None,
            ..GradientConfig::default()
        };
        let p = EffectParams::from_config(&config).unwrap();
        let surface = UniformSurface::new(p, SurfaceSize::new(10.0, 10.0));
        assert_eq!(surface.blind_count, 1.0);
    }

    #[test]
    fn color_data_is_flattened() {
        let config = GradientConfig {
            gradient_colors: vec!["#ff0000".into(), "#0000ff".into()],
            ..GradientConfig::default()
        };
        let p = EffectParams::from_config(&config).unwrap();
        let data = UniformSurface::new(p, SurfaceSize::default()).color_data();
        assert_eq!(&data[0..3], &[1.0, 0.0, 0.0]);
        assert_eq!(&data[3..6], &[0.0, 0.0, 1.0]);
        assert_eq!(&data[9..12], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = GradientConfig {
            gradient_colors: vec!["#ffffff".into()],
            ..GradientConfig::default()
        };
        assert_eq!(
            EffectParams::from_config(&config),
            Err(ConfigError::StopCount(1))
        );
    }
}
