//! Error types.
//!
//! Two failure families exist. [`ConfigError`] is raised while validating the
//! option bag and is the only error a caller ever sees. [`CapabilityUnavailable`]
//! covers every GPU setup failure and is absorbed by the lifecycle, which turns
//! it into a transition to the CSS fallback.

use std::fmt;

/// Invalid construction options.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The gradient needs between 2 and 4 colour stops.
    #[error("expected 2 to 4 gradient colors, got {0}")]
    StopCount(usize),

    /// A colour stop is not a `#rgb` / `#rrggbb` hex string.
    #[error("invalid gradient color {0:?}")]
    InvalidColor(String),

    /// A numeric option is NaN or infinite.
    #[error("option `{0}` must be a finite number")]
    NonFinite(&'static str),

    /// The option object could not be decoded.
    #[error("malformed options: {0}")]
    Malformed(String),
}

/// Setup step during which GPU initialization failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStage {
    AcquireSurface,
    CompileShader,
    LinkProgram,
    UploadGeometry,
    AttachListeners,
}

impl SetupStage {
    /// Build the error for this stage.
    pub fn fail(self, reason: impl Into<String>) -> CapabilityUnavailable {
        CapabilityUnavailable {
            stage: self,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetupStage::AcquireSurface => "surface acquisition",
            SetupStage::CompileShader => "shader compilation",
            SetupStage::LinkProgram => "program link",
            SetupStage::UploadGeometry => "geometry upload",
            SetupStage::AttachListeners => "listener setup",
        };
        f.write_str(name)
    }
}

/// The GPU path could not be brought up.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("capability unavailable during {stage}: {reason}")]
pub struct CapabilityUnavailable {
    pub stage: SetupStage,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_message_names_stage() {
        let err = SetupStage::LinkProgram.fail("bad varying");
        assert_eq!(
            err.to_string(),
            "capability unavailable during program link: bad varying"
        );
    }

    #[test]
    fn stop_count_message() {
        assert_eq!(
            ConfigError::StopCount(5).to_string(),
            "expected 2 to 4 gradient colors, got 5"
        );
    }
}
