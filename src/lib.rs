#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated procedural gradient background for the browser.
//!
//! The maths and the lifecycle state machine are platform independent and
//! tested on the host. The WebGL2 backend and DOM wiring only build for wasm32.

pub mod animation;
pub mod compositor;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pointer;
pub mod ramp;
pub mod resize;
pub mod shader;
pub mod uniforms;

pub use config::{GradientConfig, ShineDirection};
pub use error::{CapabilityUnavailable, ConfigError, SetupStage};
pub use lifecycle::{Background, RenderState};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod console;
    mod fallback;
    mod host;
    mod render;

    pub use host::GradientBackground;

    #[wasm_bindgen(start)]
    pub fn start() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console::init(log::LevelFilter::Info);
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::GradientBackground;
