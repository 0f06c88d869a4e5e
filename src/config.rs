//! Construction options.
//!
//! The option bag mirrors the keys a page passes from JavaScript. Every key is
//! optional; missing keys take the defaults below.

use serde::Deserialize;

use crate::error::ConfigError;

/// Direction the blind sawtooth ramps towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShineDirection {
    #[default]
    Left,
    Right,
}

impl ShineDirection {
    /// Whether the stripe value is inverted in the shader.
    pub fn is_flipped(self) -> bool {
        self == ShineDirection::Right
    }
}

/// Immutable configuration captured at construction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradientConfig {
    pub gradient_colors: Vec<String>,
    /// Rotation in degrees.
    pub angle: f32,
    pub noise: f32,
    /// Nominal stripe count. `None` or 0 means "not configured".
    pub blind_count: Option<u32>,
    /// Minimum stripe width in CSS pixels. `None` or 0 disables density scaling.
    pub blind_min_width: Option<f32>,
    pub spotlight_radius: f32,
    pub spotlight_softness: f32,
    pub spotlight_opacity: f32,
    /// Time constant in seconds; only read when `smooth_pointer` is set.
    pub mouse_dampening: f32,
    pub distort_amount: f32,
    pub shine_direction: ShineDirection,
    /// Passed through to the layer's `mix-blend-mode`.
    pub mix_blend_mode: String,
    pub mirror_gradient: bool,
    pub smooth_pointer: bool,
    /// CSS opacity of the canvas layer.
    pub layer_opacity: f32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            gradient_colors: ["#1a1a1a", "#2a2a2a", "#28c76f", "#1ea854"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            angle: 15.0,
            noise: 0.25,
            blind_count: Some(13),
            blind_min_width: Some(50.0),
            spotlight_radius: 0.38,
            spotlight_softness: 1.6,
            spotlight_opacity: 0.42,
            mouse_dampening: 0.15,
            distort_amount: 0.0,
            shine_direction: ShineDirection::Left,
            mix_blend_mode: "overlay".to_string(),
            mirror_gradient: false,
            smooth_pointer: false,
            layer_opacity: 0.4,
        }
    }
}

impl GradientConfig {
    /// Decode a JSON option object; unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Nominal stripe count, treating 0 as unset.
    pub fn nominal_blind_count(&self) -> Option<u32> {
        self.blind_count.filter(|&n| n > 0)
    }

    /// Minimum stripe width, treating non-positive values as unset.
    pub fn min_blind_width(&self) -> Option<f32> {
        self.blind_min_width.filter(|&w| w > 0.0)
    }

    /// Reject NaN/inf in any numeric option.
    pub fn check_finite(&self) -> Result<(), ConfigError> {
        let fields = [
            ("angle", self.angle),
            ("noise", self.noise),
            ("blindMinWidth", self.blind_min_width.unwrap_or(0.0)),
            ("spotlightRadius", self.spotlight_radius),
            ("spotlightSoftness", self.spotlight_softness),
            ("spotlightOpacity", self.spotlight_opacity),
            ("mouseDampening", self.mouse_dampening),
            ("distortAmount", self.distort_amount),
            ("layerOpacity", self.layer_opacity),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(ConfigError::NonFinite(*name)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = GradientConfig::from_json("{}").unwrap();
        assert_eq!(config, GradientConfig::default());
    }

    #[test]
    fn camel_case_keys_and_unknown_keys() {
        let config = GradientConfig::from_json(
            r##"{
                "gradientColors": ["#000000", "#ffffff"],
                "blindCount": 8,
                "shineDirection": "right",
                "mixBlendMode": "normal",
                "somethingElse": true
            }"##,
        )
        .unwrap();
        assert_eq!(config.gradient_colors.len(), 2);
        assert_eq!(config.blind_count, Some(8));
        assert!(config.shine_direction.is_flipped());
        assert_eq!(config.mix_blend_mode, "normal");
        assert_eq!(config.angle, 15.0);
    }

    #[test]
    fn zero_counts_mean_unset() {
        let config = GradientConfig {
            blind_count: Some(0),
            blind_min_width: Some(0.0),
            ..GradientConfig::default()
        };
        assert_eq!(config.nominal_blind_count(), None);
        assert_eq!(config.min_blind_width(), None);
    }

    #[test]
    fn bad_direction_is_malformed() {
        let err = GradientConfig::from_json(r#"{"shineDirection": "up"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn non_finite_rejected() {
        let config = GradientConfig {
            noise: f32::NAN,
            ..GradientConfig::default()
        };
        assert_eq!(config.check_finite(), Err(ConfigError::NonFinite("noise")));
        assert!(GradientConfig::default().check_finite().is_ok());
    }
}
