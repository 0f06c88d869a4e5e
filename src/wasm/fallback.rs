//! Static CSS fallback and the body-class presence marker.

use log::warn;
use web_sys::{Document, Element, HtmlElement};

use crate::lifecycle::{FallbackLayer, PresenceObserver};

use super::render::js_reason;

/// Class set on `<body>` while either variant of the effect is visible.
pub const PRESENCE_CLASS: &str = "gradient-active";

const LAYER_CLASS: &str = "gradient-fallback";

const LAYER_CSS: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
    z-index: -1; pointer-events: none; \
    background: linear-gradient(135deg, #1a1a1a 0%, #2a1a3a 25%, #8524d8 50%, #1f1f1f 100%); \
    background-size: 400% 400%; animation: gradientShift 12s ease infinite;";

const KEYFRAMES: &str = "@keyframes gradientShift { \
    0% { background-position: 0% 50%; } \
    50% { background-position: 100% 50%; } \
    100% { background-position: 0% 50%; } }";

/// Looping gradient `<div>` plus its keyframes `<style>`. Built lazily.
pub struct CssFallback {
    document: Document,
    container: HtmlElement,
    layer: Option<Element>,
    style: Option<Element>,
}

impl CssFallback {
    pub fn new(document: Document, container: HtmlElement) -> Self {
        Self {
            document,
            container,
            layer: None,
            style: None,
        }
    }

    fn insert(&mut self) -> Result<(), wasm_bindgen::JsValue> {
        let style = self.document.create_element("style")?;
        style.set_text_content(Some(KEYFRAMES));
        if let Some(head) = self.document.head() {
            head.append_child(&style)?;
        }
        self.style = Some(style);

        let layer = self.document.create_element("div")?;
        layer.set_class_name(LAYER_CLASS);
        layer.set_attribute("style", LAYER_CSS)?;
        self.container.append_child(&layer)?;
        self.layer = Some(layer);
        Ok(())
    }
}

impl FallbackLayer for CssFallback {
    fn present(&mut self) {
        if self.layer.is_some() {
            return;
        }
        // Nothing left to degrade to; keep whatever was inserted.
        if let Err(err) = self.insert() {
            warn!("CSS fallback could not be inserted: {}", js_reason(&err));
        }
    }

    fn remove(&mut self) {
        if let Some(layer) = self.layer.take() {
            layer.remove();
        }
        if let Some(style) = self.style.take() {
            style.remove();
        }
    }
}

/// Toggles [`PRESENCE_CLASS`] on the document body.
pub struct BodyClassPresence {
    document: Document,
}

impl BodyClassPresence {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl PresenceObserver for BodyClassPresence {
    fn effect_present(&mut self, present: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let classes = body.class_list();
        let result = if present {
            classes.add_1(PRESENCE_CLASS)
        } else {
            classes.remove_1(PRESENCE_CLASS)
        };
        if let Err(err) = result {
            warn!("could not update body class: {}", js_reason(&err));
        }
    }
}
