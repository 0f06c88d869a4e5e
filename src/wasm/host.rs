//! DOM wiring and the exported JS handle.
//!
//! Everything runs on the page's single event loop. The background lives in a
//! shared slot; listeners and the frame callback hold weak references to it and
//! borrow it only for the duration of one callback.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent, ResizeObserver, Window};

use crate::config::GradientConfig;
use crate::error::SetupStage;
use crate::lifecycle::{Background, RenderState};
use crate::pointer::PointerSample;
use crate::resize::ContainerSize;

use super::fallback::{BodyClassPresence, CssFallback};
use super::render::{js_reason, GlBackend};

type Mounted = Background<GlBackend, CssFallback, BodyClassPresence>;
type Slot = Rc<RefCell<Option<Mounted>>>;

fn measure(container: &HtmlElement) -> ContainerSize {
    let rect = container.get_bounding_client_rect();
    ContainerSize::new(rect.width() as f32, rect.height() as f32)
}

/// Run `f` against the mounted background unless it is gone or already borrowed.
fn with_mounted(slot: &Weak<RefCell<Option<Mounted>>>, f: impl FnOnce(&mut Mounted)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(mounted) = guard.as_mut() {
        f(mounted);
    }
}

fn parse_options(options: Option<JsValue>) -> Result<GradientConfig, JsValue> {
    let Some(options) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(GradientConfig::default());
    };
    let json: String = js_sys::JSON::stringify(&options)?.into();
    GradientConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Window resize, window pointer-move and container `ResizeObserver`.
struct Listeners {
    window: Window,
    on_resize: Closure<dyn FnMut()>,
    on_pointer: Closure<dyn FnMut(MouseEvent)>,
    observer: Option<ResizeObserver>,
}

impl Listeners {
    fn attach(window: &Window, container: &HtmlElement, slot: &Slot) -> Result<Self, JsValue> {
        let on_resize = {
            let container = container.clone();
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move || {
                let size = measure(&container);
                with_mounted(&slot, |bg| bg.resize(size));
            }) as Box<dyn FnMut()>)
        };

        let on_pointer = {
            let slot = Rc::downgrade(slot);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                with_mounted(&slot, |bg| {
                    let Some(canvas) = bg.active().and_then(|r| r.backend().canvas()) else {
                        return;
                    };
                    let rect = canvas.get_bounding_client_rect();
                    let sample = PointerSample {
                        client_x: event.client_x() as f32,
                        client_y: event.client_y() as f32,
                        rect_left: rect.left() as f32,
                        rect_top: rect.top() as f32,
                        rect_width: rect.width() as f32,
                        rect_height: rect.height() as f32,
                    };
                    bg.pointer_move(sample);
                });
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        // Build the struct first so a failure below still detaches via Drop.
        let mut listeners = Self {
            window: window.clone(),
            on_resize,
            on_pointer,
            observer: None,
        };
        window.add_event_listener_with_callback("resize", listeners.on_resize.as_ref().unchecked_ref())?;
        window.add_event_listener_with_callback(
            "mousemove",
            listeners.on_pointer.as_ref().unchecked_ref(),
        )?;

        let observer = ResizeObserver::new(listeners.on_resize.as_ref().unchecked_ref())?;
        observer.observe(container);
        listeners.observer = Some(observer);
        Ok(listeners)
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("mousemove", self.on_pointer.as_ref().unchecked_ref());
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn schedule(window: &Window, callback: &FrameCallback, handle: &Cell<Option<i32>>) -> Result<(), JsValue> {
    let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    handle.set(Some(id));
    Ok(())
}

/// `requestAnimationFrame` chain driving [`Mounted::frame`].
struct FrameLoop {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    // `callback` holds the animation-frame closure so it can keep requesting
    // itself. The closure only keeps a weak reference back to this cell, so
    // dropping the loop frees it.
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    fn start(window: &Window, slot: &Slot) -> Result<Self, JsValue> {
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next = Rc::downgrade(&callback);
        let pending = handle.clone();
        let win = window.clone();
        let slot = Rc::downgrade(slot);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            pending.set(None);
            let mut drew = false;
            with_mounted(&slot, |bg| drew = bg.frame(timestamp));
            if !drew {
                return;
            }
            let Some(cell) = next.upgrade() else {
                return;
            };
            if let Some(cb) = cell.borrow().as_ref() {
                if let Err(err) = schedule(&win, cb, &pending) {
                    warn!("could not schedule next frame: {}", js_reason(&err));
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = callback.borrow().as_ref() {
            schedule(window, cb, &handle)?;
        }
        Ok(Self {
            window: window.clone(),
            handle,
            callback,
        })
    }
}

impl Drop for FrameLoop {
    // Withdraw the pending callback before the closure it points at is freed.
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

/// Animated gradient layer mounted into a container element.
#[wasm_bindgen]
pub struct GradientBackground {
    slot: Slot,
    listeners: Option<Listeners>,
    frames: Option<FrameLoop>,
}

#[wasm_bindgen]
impl GradientBackground {
    /// Mount the effect. Throws only when `options` are invalid; a missing GPU
    /// context silently selects the CSS fallback.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: Option<JsValue>) -> Result<GradientBackground, JsValue> {
        let config = parse_options(options)?;
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let slot: Slot = Rc::new(RefCell::new(None));
        let backend = GlBackend::new(
            document.clone(),
            container.clone(),
            config.layer_opacity,
            &config.mix_blend_mode,
        );
        let presence = BodyClassPresence::new(document.clone());
        let size = measure(&container);

        let mut listeners = None;
        let mut frames = None;
        let mounted = {
            let fallback_doc = document.clone();
            let fallback_container = container.clone();
            Background::mount(
                &config,
                backend,
                size,
                presence,
                move || CssFallback::new(fallback_doc, fallback_container),
                |_renderer| {
                    let stage = SetupStage::AttachListeners;
                    let attached = Listeners::attach(&window, &container, &slot)
                        .map_err(|e| stage.fail(js_reason(&e)))?;
                    listeners = Some(attached);
                    let started =
                        FrameLoop::start(&window, &slot).map_err(|e| stage.fail(js_reason(&e)))?;
                    frames = Some(started);
                    Ok(())
                },
            )
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if !mounted.is_active() {
            frames = None;
            listeners = None;
        }
        debug!("gradient mounted in state {}", mounted.state().as_str());
        *slot.borrow_mut() = Some(mounted);

        Ok(GradientBackground {
            slot,
            listeners,
            frames,
        })
    }

    /// Halt the frame loop. The last frame stays on screen until `destroy`.
    pub fn stop(&mut self) {
        self.frames = None;
        if let Ok(mut guard) = self.slot.try_borrow_mut() {
            if let Some(mounted) = guard.as_mut() {
                mounted.stop();
            }
        }
    }

    /// Remove the layer, release GPU resources and stop the loop. Idempotent.
    pub fn destroy(&mut self) {
        self.listeners = None;
        self.frames = None;
        if let Ok(mut guard) = self.slot.try_borrow_mut() {
            if let Some(mounted) = guard.as_mut() {
                mounted.destroy();
            }
        }
    }

    /// `"active"`, `"fallback"` or `"destroyed"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.slot
            .borrow()
            .as_ref()
            .map_or(RenderState::Uninitialized, |m| m.state())
            .as_str()
            .to_string()
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.slot.borrow().as_ref().is_some_and(|m| m.is_active())
    }
}

// JS `free()` lands here too, so an undestroyed handle still unmounts.
impl Drop for GradientBackground {
    fn drop(&mut self) {
        self.destroy();
    }
}
