//! Piecewise-linear colour ramp over 2–4 stops.

use crate::error::ConfigError;

/// Linear RGB triple with channels in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Maximum number of stops the shader accepts.
pub const MAX_STOPS: usize = 4;

/// Parse `#rrggbb`, `rrggbb` or CSS shorthand `#rgb`.
pub fn parse_hex(input: &str) -> Result<Rgb, ConfigError> {
    let invalid = || ConfigError::InvalidColor(input.to_string());
    let hex = input.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(invalid()),
    };

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}

/// Reflect a monotonically increasing coordinate into a back-and-forth sweep.
pub fn mirror(t: f32) -> f32 {
    1.0 - (1.0 - 2.0 * t.rem_euclid(1.0)).abs()
}

fn lerp(a: Rgb, b: Rgb, f: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * f,
        a[1] + (b[1] - a[1]) * f,
        a[2] + (b[2] - a[2]) * f,
    ]
}

/// Colour stops normalised once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: [Rgb; MAX_STOPS],
    count: usize,
}

impl ColorRamp {
    /// Build a ramp from already-normalised stops.
    pub fn new(stops: &[Rgb]) -> Result<Self, ConfigError> {
        if !(2..=MAX_STOPS).contains(&stops.len()) {
            return Err(ConfigError::StopCount(stops.len()));
        }
        // Unused slots repeat the last stop so the uploaded uniforms stay defined.
        let last = stops[stops.len() - 1];
        let mut padded = [last; MAX_STOPS];
        padded[..stops.len()].copy_from_slice(stops);
        Ok(Self {
            stops: padded,
            count: stops.len(),
        })
    }

    /// Parse hex colour strings into a ramp.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, ConfigError> {
        if !(2..=MAX_STOPS).contains(&colors.len()) {
            return Err(ConfigError::StopCount(colors.len()));
        }
        let stops = colors
            .iter()
            .map(|c| parse_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&stops)
    }

    /// Number of configured stops.
    pub fn count(&self) -> usize {
        self.count
    }

    /// All four uniform slots, padded past `count`.
    pub fn stops(&self) -> &[Rgb; MAX_STOPS] {
        &self.stops
    }

    /// Interpolated colour at `t`, clamped to the first/last stop.
    pub fn sample(&self, t: f32) -> Rgb {
        let segments = (self.count - 1) as f32;
        let scaled = t.clamp(0.0, 1.0) * segments;
        let seg = scaled.floor();
        let f = scaled - seg;
        let index = seg as usize;
        if index + 1 >= self.count {
            return self.stops[self.count - 1];
        }
        lerp(self.stops[index], self.stops[index + 1], f)
    }

    /// Sample after applying [`mirror`] to `t`.
    pub fn sample_mirrored(&self, t: f32) -> Rgb {
        self.sample(mirror(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex("#ff0000").unwrap(), [1.0, 0.0, 0.0]);
        assert_eq!(parse_hex("00ff00").unwrap(), [0.0, 1.0, 0.0]);
        assert_eq!(parse_hex("#00f").unwrap(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_bad_hex() {
        for bad in ["", "#12", "#12345", "#gg0000", "#ffééff"] {
            assert_eq!(
                parse_hex(bad),
                Err(ConfigError::InvalidColor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn stop_count_bounds() {
        assert_eq!(ColorRamp::from_hex(&["#000"]), Err(ConfigError::StopCount(1)));
        assert_eq!(
            ColorRamp::from_hex(&["#000", "#111", "#222", "#333", "#444"]),
            Err(ConfigError::StopCount(5))
        );
        assert!(ColorRamp::from_hex(&["#000", "#fff"]).is_ok());
    }

    #[test]
    fn two_stop_midpoint() {
        let ramp = ColorRamp::from_hex(&["#000000", "#ffffff"]).unwrap();
        assert!(approx(ramp.sample(0.5), [0.5, 0.5, 0.5]));
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn clamps_outside_unit_range() {
        let ramp = ColorRamp::from_hex(&["#000000", "#ff0000", "#00ff00"]).unwrap();
        assert_eq!(ramp.sample(-3.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(7.0), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn padding_repeats_last_stop() {
        let ramp = ColorRamp::from_hex(&["#000000", "#ff0000", "#00ff00"]).unwrap();
        assert_eq!(ramp.count(), 3);
        assert_eq!(ramp.stops()[3], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn three_stop_segments() {
        let ramp = ColorRamp::from_hex(&["#000000", "#ff0000", "#00ff00"]).unwrap();
        assert!(approx(ramp.sample(0.25), [0.5, 0.0, 0.0]));
        assert!(approx(ramp.sample(0.5), [1.0, 0.0, 0.0]));
        assert!(approx(ramp.sample(0.75), [0.5, 0.5, 0.0]));
    }

    #[test]
    fn mirror_folds_period() {
        assert_eq!(mirror(0.0), 0.0);
        assert_eq!(mirror(0.5), 1.0);
        assert!((mirror(0.25) - 0.5).abs() < 1e-6);
        assert!((mirror(0.75) - 0.5).abs() < 1e-6);
        assert!((mirror(1.25) - mirror(0.25)).abs() < 1e-6);
    }
}
