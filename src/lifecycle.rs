//! Capability detection and the Active/Fallback state machine.
//!
//! GPU setup is attempted exactly once. Any [`CapabilityUnavailable`] raised
//! along the way releases whatever was acquired and hands the visible effect
//! to a [`FallbackLayer`]. Both outcomes raise the shared presence flag.

use log::{debug, info, warn};

use crate::animation::AnimationLoop;
use crate::config::GradientConfig;
use crate::error::{CapabilityUnavailable, ConfigError};
use crate::pointer::{PointerSample, PointerTracker};
use crate::resize::{ContainerSize, ResizeController};
use crate::shader::{FRAGMENT_SHADER, QUAD_VERTICES, VERTEX_SHADER};
use crate::uniforms::{EffectParams, SurfaceSize, UniformSurface};

/// GPU drawing surface and program.
pub trait RenderBackend {
    fn acquire_surface(&mut self) -> Result<(), CapabilityUnavailable>;
    fn compile_program(&mut self, vertex: &str, fragment: &str)
        -> Result<(), CapabilityUnavailable>;
    fn upload_quad(&mut self, vertices: &[f32]) -> Result<(), CapabilityUnavailable>;
    /// Size the surface for `container` and report the drawing-buffer size.
    fn resize_surface(&mut self, container: ContainerSize) -> SurfaceSize;
    fn write_uniforms(&mut self, uniforms: &UniformSurface);
    fn draw(&mut self);
    /// Free the program, geometry and surface. Must tolerate partial setup.
    fn release(&mut self);
}

/// Static decorative layer shown when the GPU path is unavailable.
pub trait FallbackLayer {
    fn present(&mut self);
    fn remove(&mut self);
}

/// Receives the host-visible "some background effect is present" flag.
pub trait PresenceObserver {
    fn effect_present(&mut self, present: bool);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Uninitialized,
    Active,
    Fallback,
    Destroyed,
}

impl RenderState {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderState::Uninitialized => "uninitialized",
            RenderState::Active => "active",
            RenderState::Fallback => "fallback",
            RenderState::Destroyed => "destroyed",
        }
    }
}

/// Everything derived from the config before touching the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    pub params: EffectParams,
    pub resize: ResizeController,
    pub pointer: PointerTracker,
}

impl Setup {
    pub fn from_config(config: &GradientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            params: EffectParams::from_config(config)?,
            resize: ResizeController::new(config.blind_count, config.blind_min_width),
            pointer: PointerTracker::new(config.smooth_pointer, config.mouse_dampening),
        })
    }
}

/// A fully set-up GPU pipeline plus the state that feeds it.
#[derive(Debug)]
pub struct ActiveRenderer<B> {
    backend: B,
    uniforms: UniformSurface,
    resize: ResizeController,
    pointer: PointerTracker,
    animation: AnimationLoop,
}

impl<B: RenderBackend> ActiveRenderer<B> {
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn uniforms(&self) -> &UniformSurface {
        &self.uniforms
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn resize(&mut self, container: ContainerSize) {
        let buffer = self.backend.resize_surface(container);
        self.resize.apply(container, buffer, &mut self.uniforms);
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        self.pointer.on_move(sample, &mut self.uniforms);
    }

    /// One refresh callback. Returns whether a draw was issued.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if !self
            .animation
            .frame(timestamp_ms, &mut self.uniforms, &self.pointer)
        {
            return false;
        }
        self.backend.write_uniforms(&self.uniforms);
        self.backend.draw();
        true
    }

    fn start(&mut self) {
        self.animation.start();
    }

    /// Pause the loop; the surface and its resources stay in place.
    pub fn stop(&mut self) {
        self.animation.cancel();
    }

    fn release(&mut self) {
        self.animation.cancel();
        self.animation.terminate();
        self.backend.release();
    }
}

/// Outcome of the single setup attempt.
#[derive(Debug)]
pub enum Initialized<B> {
    Active(ActiveRenderer<B>),
    Fallback(CapabilityUnavailable),
}

fn bring_up<B: RenderBackend>(backend: &mut B) -> Result<(), CapabilityUnavailable> {
    backend.acquire_surface()?;
    backend.compile_program(VERTEX_SHADER, FRAGMENT_SHADER)?;
    backend.upload_quad(&QUAD_VERTICES)?;
    Ok(())
}

/// Acquire the surface, build the program, upload the quad, run the first layout.
pub fn initialize<B: RenderBackend>(
    mut backend: B,
    setup: Setup,
    container: ContainerSize,
) -> Initialized<B> {
    if let Err(err) = bring_up(&mut backend) {
        backend.release();
        return Initialized::Fallback(err);
    }

    let uniforms = UniformSurface::new(setup.params, SurfaceSize::default());
    let mut renderer = ActiveRenderer {
        backend,
        uniforms,
        resize: setup.resize,
        pointer: setup.pointer,
        animation: AnimationLoop::new(),
    };
    renderer.resize(container);
    renderer.backend.write_uniforms(&renderer.uniforms);
    Initialized::Active(renderer)
}

enum Effect<B, F> {
    Empty,
    Active(ActiveRenderer<B>),
    Fallback(F),
}

/// Owns whichever variant of the effect is visible.
pub struct Background<B, F, P: PresenceObserver> {
    state: RenderState,
    effect: Effect<B, F>,
    presence: P,
}

impl<B, F, P> Background<B, F, P>
where
    B: RenderBackend,
    F: FallbackLayer,
    P: PresenceObserver,
{
    /// Validate `config`, then bring up the GPU path or fall back.
    ///
    /// `attach` runs after the GPU path is ready and before the loop starts; it
    /// wires host listeners and may still fail into the fallback. Only
    /// configuration errors are returned.
    pub fn mount<MakeFallback, Attach>(
        config: &GradientConfig,
        backend: B,
        container: ContainerSize,
        presence: P,
        make_fallback: MakeFallback,
        attach: Attach,
    ) -> Result<Self, ConfigError>
    where
        MakeFallback: FnOnce() -> F,
        Attach: FnOnce(&mut ActiveRenderer<B>) -> Result<(), CapabilityUnavailable>,
    {
        let setup = Setup::from_config(config)?;
        let mut background = Self {
            state: RenderState::Uninitialized,
            effect: Effect::Empty,
            presence,
        };

        let outcome = match initialize(backend, setup, container) {
            Initialized::Active(mut renderer) => match attach(&mut renderer) {
                Ok(()) => Ok(renderer),
                Err(err) => {
                    renderer.release();
                    Err(err)
                }
            },
            Initialized::Fallback(err) => Err(err),
        };

        match outcome {
            Ok(mut renderer) => {
                renderer.start();
                info!(
                    "gradient active at {}x{}",
                    renderer.uniforms.resolution[0], renderer.uniforms.resolution[1]
                );
                background.effect = Effect::Active(renderer);
                background.state = RenderState::Active;
            }
            Err(err) => {
                warn!("GPU gradient unavailable, using CSS fallback: {err}");
                let mut layer = make_fallback();
                layer.present();
                background.effect = Effect::Fallback(layer);
                background.state = RenderState::Fallback;
            }
        }
        background.presence.effect_present(true);
        Ok(background)
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RenderState::Active
    }

    pub fn active(&self) -> Option<&ActiveRenderer<B>> {
        match &self.effect {
            Effect::Active(renderer) => Some(renderer),
            _ => None,
        }
    }

    pub fn fallback(&self) -> Option<&F> {
        match &self.effect {
            Effect::Fallback(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn presence(&self) -> &P {
        &self.presence
    }

    pub fn resize(&mut self, container: ContainerSize) {
        if let Effect::Active(renderer) = &mut self.effect {
            renderer.resize(container);
        }
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        if let Effect::Active(renderer) = &mut self.effect {
            renderer.pointer_move(sample);
        }
    }

    /// Returns whether the caller should schedule another frame.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        match &mut self.effect {
            Effect::Active(renderer) => renderer.frame(timestamp_ms),
            _ => false,
        }
    }

    /// Stop drawing but keep the layer mounted. No-op outside Active.
    pub fn stop(&mut self) {
        if let Effect::Active(renderer) = &mut self.effect {
            renderer.stop();
            debug!("gradient animation stopped");
        }
    }

    /// Tear everything down. Returns false if already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.state == RenderState::Destroyed {
            return false;
        }
        let was_present = matches!(self.state, RenderState::Active | RenderState::Fallback);
        match std::mem::replace(&mut self.effect, Effect::Empty) {
            Effect::Active(mut renderer) => renderer.release(),
            Effect::Fallback(mut layer) => layer.remove(),
            Effect::Empty => {}
        }
        if was_present {
            self.presence.effect_present(false);
        }
        debug!("gradient destroyed from {}", self.state.as_str());
        self.state = RenderState::Destroyed;
        true
    }
}
