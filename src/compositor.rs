//! CPU reference of the fragment program.
//!
//! Every term here matches `shader::FRAGMENT_SHADER` line for line, so tests
//! can check the maths without a GPU. Nothing is clamped: spotlight and noise
//! may push channels outside `[0, 1]`, and only [`render_rgba`] clips, the way
//! the presentation stage does.

use std::f32::consts::PI;

use crate::ramp::{mirror, Rgb};
use crate::uniforms::UniformSurface;

/// Radius floor that keeps the spotlight division finite.
pub const MIN_SPOT_RADIUS: f32 = 1e-4;

/// Every intermediate term of one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Terms {
    /// Rotated and distorted coordinate.
    pub uv: [f32; 2],
    pub ramp_t: f32,
    pub base: Rgb,
    pub glow: Rgb,
    pub spot: f32,
    pub stripe: f32,
    pub noise: f32,
    pub color: Rgb,
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map `uv` into a centred aspect-corrected frame, rotate, map back.
pub fn rotate_uv(uv: [f32; 2], resolution: [f32; 2], angle: f32) -> [f32; 2] {
    let aspect = if resolution[1] > 0.0 {
        resolution[0] / resolution[1]
    } else {
        1.0
    };
    let px = (uv[0] * 2.0 - 1.0) * aspect;
    let py = uv[1] * 2.0 - 1.0;
    let (s, c) = angle.sin_cos();
    // Column-major mat2(c, -s, s, c) * p.
    let rx = c * px + s * py;
    let ry = -s * px + c * py;
    [(rx / aspect) * 0.5 + 0.5, ry * 0.5 + 0.5]
}

/// Sinusoidal warp; identity unless `amount > 0`.
pub fn distort(uv: [f32; 2], amount: f32) -> [f32; 2] {
    if amount <= 0.0 {
        return uv;
    }
    let w = 0.01 * amount;
    [uv[0] + (uv[1] * 6.0).sin() * w, uv[1] + (uv[0] * 6.0).cos() * w]
}

pub fn ramp_position(uv: [f32; 2], mirrored: bool) -> f32 {
    if mirrored {
        mirror(uv[0])
    } else {
        uv[0]
    }
}

/// Travelling horizontal band, computed from the unrotated `y`.
pub fn glow(base: Rgb, y: f32, time: f32) -> Rgb {
    let wave = (time * 0.8 + y * PI).sin() * 0.5 + 0.5;
    let center = (time * 0.3).sin() * 0.5 + 0.5;
    let band = 1.0 - smoothstep(0.0, 0.25, (y - center).abs());
    let gain = 1.0 + band * 0.01 * wave;
    [base[0] * gain, base[1] * gain, base[2] * gain]
}

/// Signed radial falloff around the pointer.
pub fn spotlight(
    uv: [f32; 2],
    pointer: [f32; 2],
    resolution: [f32; 2],
    radius: f32,
    softness: f32,
    opacity: f32,
) -> f32 {
    let ox = pointer[0] / resolution[0];
    let oy = pointer[1] / resolution[1];
    let d = ((uv[0] - ox).powi(2) + (uv[1] - oy).powi(2)).sqrt();
    let dn = d / radius.max(MIN_SPOT_RADIUS);
    (1.0 - 2.0 * dn.powf(softness)) * opacity
}

/// Sawtooth stripe value in `[0, 1)`.
pub fn blinds(x: f32, count: f32, flipped: bool) -> f32 {
    let stripe = fract(x * count.max(1.0));
    if flipped {
        1.0 - stripe
    } else {
        stripe
    }
}

/// Shader-style hash in `[0, 1)`.
pub fn hash(p: [f32; 2]) -> f32 {
    fract((p[0] * 12.9898 + p[1] * 78.233).sin() * 43758.5453)
}

/// Dither offset for a pixel at `frag_coord` (absolute buffer pixels).
pub fn noise(frag_coord: [f32; 2], time: f32, amount: f32) -> f32 {
    (hash([frag_coord[0] + time, frag_coord[1] + time]) - 0.5) * amount
}

/// Evaluate every term for one pixel.
pub fn shade_terms(uv0: [f32; 2], frag_coord: [f32; 2], u: &UniformSurface) -> Terms {
    let p = &u.params;
    let rotated = rotate_uv(uv0, u.resolution, p.angle);
    let uv = distort(rotated, p.distort);
    let ramp_t = ramp_position(uv, p.mirror);
    let base = p.ramp.sample(ramp_t);
    let glow = glow(base, uv0[1], u.time);
    let spot = spotlight(
        uv0,
        u.pointer,
        u.resolution,
        p.spot_radius,
        p.spot_softness,
        p.spot_opacity,
    );
    let stripe = blinds(uv[0], u.blind_count, p.shine_flip);
    let noise = noise(frag_coord, u.time, p.noise);
    let color = [
        spot + glow[0] - stripe + noise,
        spot + glow[1] - stripe + noise,
        spot + glow[2] - stripe + noise,
    ];
    Terms {
        uv,
        ramp_t,
        base,
        glow,
        spot,
        stripe,
        noise,
        color,
    }
}

/// Final unclamped colour for one pixel.
pub fn shade(uv0: [f32; 2], frag_coord: [f32; 2], u: &UniformSurface) -> Rgb {
    shade_terms(uv0, frag_coord, u).color
}

/// Rasterize the whole surface into top-down RGBA8, clipping to the display range.
pub fn render_rgba(u: &UniformSurface) -> Vec<u8> {
    let width = u.resolution[0].max(0.0) as usize;
    let height = u.resolution[1].max(0.0) as usize;
    let mut pixels = vec![0u8; width * height * 4];
    for row in 0..height {
        // Buffer origin is bottom-left, like gl_FragCoord.
        let fy = (height - 1 - row) as f32 + 0.5;
        for col in 0..width {
            let frag = [col as f32 + 0.5, fy];
            let uv = [frag[0] / u.resolution[0], frag[1] / u.resolution[1]];
            let color = shade(uv, frag, u);
            let offset = (row * width + col) * 4;
            for (dst, c) in pixels[offset..offset + 3].iter_mut().zip(color) {
                *dst = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            pixels[offset + 3] = 255;
        }
    }
    pixels
}
