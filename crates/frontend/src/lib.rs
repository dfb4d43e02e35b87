pub mod browser;
pub mod codec;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod form;
pub mod hash_watch;
pub mod hooks;
pub mod navigator;
pub mod silent;
pub mod subscribers;

#[cfg(test)]
mod test_support;

use std::rc::Rc;

use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlFormElement;

use crate::controller::LiveFilter;
use crate::navigator::NavigationMode;

/// A live filter bound to one form, as seen from JavaScript.
#[wasm_bindgen(js_name = LiveFilter)]
pub struct LiveFilterHandle {
    filter: Rc<LiveFilter>,
}

#[wasm_bindgen(js_class = LiveFilter)]
impl LiveFilterHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(form: HtmlFormElement, options: JsValue) -> Result<LiveFilterHandle, JsValue> {
        let filter = browser::attach(form, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { filter })
    }

    /// Same as a trigger firing: serialize, update the address, fetch.
    pub fn update(&self) {
        if let Some(fetch) = self.filter.trigger_update() {
            wasm_bindgen_futures::spawn_local(async move {
                fetch.await;
            });
        }
    }

    /// Filter state currently encoded in the address.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> JsValue {
        browser::state_to_js(&self.filter.url_state())
    }

    #[wasm_bindgen(getter, js_name = pushState)]
    pub fn push_state(&self) -> bool {
        self.filter.mode() == NavigationMode::PushState
    }
}

/// Binds a live filter to every form matching `selector`.
#[wasm_bindgen(js_name = attachAll)]
pub fn attach_all(selector: &str, options: JsValue) -> Result<js_sys::Array, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let nodes = document.query_selector_all(selector)?;

    let handles = js_sys::Array::new();
    for idx in 0..nodes.length() {
        let Some(node) = nodes.item(idx) else { continue };
        match node.dyn_into::<HtmlFormElement>() {
            Ok(form) => {
                handles.push(&LiveFilterHandle::new(form, options.clone())?.into());
            }
            Err(_) => log::warn!("livefilter: '{}' matched a non-form element", selector),
        }
    }
    Ok(handles)
}

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Info);
    console_error_panic_hook::set_once();
}
