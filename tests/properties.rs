//! Property-based invariant tests for the compositor maths.
//!
//! Verifies:
//! 1. Ramp output is a convex combination of two adjacent stops
//! 2. Ramp is continuous across segment boundaries
//! 3. Mirrored sampling is symmetric within one period
//! 4. Effective stripe count follows min(N, max(1, floor(W / M)))
//! 5. Resize always re-centres the pointer
//! 6. Distortion amount 0 leaves the ramp coordinate untouched
//! 7. Noise is deterministic per (pixel, time) and bounded by the amplitude
#![cfg(not(target_arch = "wasm32"))]

use gradient_blinds::compositor::{distort, noise, ramp_position, rotate_uv};
use gradient_blinds::config::GradientConfig;
use gradient_blinds::ramp::{ColorRamp, Rgb};
use gradient_blinds::resize::{ContainerSize, ResizeController};
use gradient_blinds::uniforms::{EffectParams, SurfaceSize, UniformSurface};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(r, g, b)| [r, g, b])
}

fn arb_ramp() -> impl Strategy<Value = ColorRamp> {
    prop::collection::vec(arb_rgb(), 2..=4).prop_map(|stops| ColorRamp::new(&stops).unwrap())
}

fn within_segment(c: Rgb, a: Rgb, b: Rgb) -> bool {
    (0..3).all(|i| {
        let lo = a[i].min(b[i]) - 1e-5;
        let hi = a[i].max(b[i]) + 1e-5;
        (lo..=hi).contains(&c[i])
    })
}

fn surface(w: f32, h: f32) -> UniformSurface {
    let params = EffectParams::from_config(&GradientConfig::default()).unwrap();
    UniformSurface::new(params, SurfaceSize::new(w, h))
}

proptest! {
    #[test]
    fn ramp_is_convex_between_adjacent_stops(ramp in arb_ramp(), t in 0.0f32..=1.0) {
        let n = ramp.count();
        let stops = ramp.stops();
        let c = ramp.sample(t);
        let seg = ((t * (n - 1) as f32).floor() as usize).min(n - 1);
        if seg + 1 >= n {
            prop_assert_eq!(c, stops[n - 1]);
        } else {
            prop_assert!(within_segment(c, stops[seg], stops[seg + 1]));
        }
    }

    #[test]
    fn ramp_is_continuous(ramp in arb_ramp(), t in 0.0f32..=1.0) {
        let eps = 1e-4;
        let a = ramp.sample(t);
        let b = ramp.sample((t + eps).min(1.0));
        for i in 0..3 {
            // Stops differ by at most 1 per unit segment, segments are 1/(n-1) wide.
            prop_assert!((a[i] - b[i]).abs() <= 3.0 * eps + 1e-5);
        }
    }

    #[test]
    fn ramp_ends_at_last_stop(ramp in arb_ramp(), over in 1.0f32..10.0) {
        let last = ramp.stops()[ramp.count() - 1];
        prop_assert_eq!(ramp.sample(over), last);
        prop_assert_eq!(ramp.sample(1.0), last);
    }

    #[test]
    fn mirrored_ramp_is_symmetric(ramp in arb_ramp(), t in 0.0f32..=1.0, period in 0i32..4) {
        let shift = period as f32;
        let a = ramp.sample_mirrored(t + shift);
        let b = ramp.sample_mirrored(1.0 - t + shift);
        for i in 0..3 {
            prop_assert!((a[i] - b[i]).abs() < 1e-3);
        }
    }

    #[test]
    fn effective_blind_count_formula(w in 0.0f32..5000.0, m in 1.0f32..400.0, n in 1u32..64) {
        let rc = ResizeController::new(Some(n), Some(m));
        let expected = n.min(((w / m).floor() as u32).max(1));
        prop_assert_eq!(rc.effective_blind_count(w), Some(expected));
    }

    #[test]
    fn resize_recenters_pointer(w in 1.0f32..4000.0, h in 1.0f32..4000.0, px in 0.0f32..100.0, py in 0.0f32..100.0) {
        let rc = ResizeController::new(Some(13), Some(50.0));
        let mut s = surface(10.0, 10.0);
        s.pointer_target = [px, py];
        s.pointer = [py, px];
        rc.apply(ContainerSize::new(w, h), SurfaceSize::new(w, h), &mut s);
        prop_assert_eq!(s.pointer_target, [w / 2.0, h / 2.0]);
        prop_assert_eq!(s.pointer, [w / 2.0, h / 2.0]);
    }

    #[test]
    fn zero_distortion_preserves_ramp_coordinate(
        u in 0.0f32..=1.0,
        v in 0.0f32..=1.0,
        angle in -6.3f32..6.3,
        mirrored in any::<bool>(),
    ) {
        let uv = rotate_uv([u, v], [1280.0, 720.0], angle);
        let plain = ramp_position(uv, mirrored);
        let warped = ramp_position(distort(uv, 0.0), mirrored);
        prop_assert_eq!(plain.to_bits(), warped.to_bits());
    }

    #[test]
    fn noise_is_deterministic_and_bounded(
        x in 0.0f32..4096.0,
        y in 0.0f32..4096.0,
        time in 0.0f32..1000.0,
        amount in 0.0f32..2.0,
    ) {
        let a = noise([x, y], time, amount);
        prop_assert_eq!(a.to_bits(), noise([x, y], time, amount).to_bits());
        prop_assert!(a.abs() <= 0.5 * amount + 1e-6);
    }
}

#[test]
fn noise_changes_over_time_at_fixed_pixel() {
    let samples: Vec<f32> = (0..16).map(|i| noise([320.5, 240.5], i as f32 * 0.016, 1.0)).collect();
    let distinct = samples
        .iter()
        .filter(|&&v| (v - samples[0]).abs() > 1e-6)
        .count();
    assert!(distinct > 0, "noise did not vary: {samples:?}");
}

#[test]
fn disabled_min_width_keeps_nominal() {
    for w in [0.0, 320.0, 1920.0] {
        assert_eq!(ResizeController::new(Some(8), None).effective_blind_count(w), None);
    }
}
