use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::browser::subscriber::{payload_to_js, state_to_js, ElementSubscriber};
use crate::config::Options;
use crate::error::ConfigError;
use crate::hooks::Hooks;
use crate::subscribers::{Subscriber, SubscriberSpec};

/// Options object as passed from JavaScript, split into its data and callables.
pub struct BrowserConfig {
    pub options: Options,
    pub hooks: Hooks,
    pub subscribers: Vec<SubscriberSpec<Rc<dyn Subscriber>>>,
}

pub fn parse_options(value: &JsValue) -> Result<BrowserConfig, ConfigError> {
    if value.is_undefined() || value.is_null() {
        return Ok(BrowserConfig {
            options: Options::default(),
            hooks: Hooks::new(),
            subscribers: Vec::new(),
        });
    }

    let options: Options = serde_wasm_bindgen::from_value(value.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    Ok(BrowserConfig {
        options,
        hooks: parse_hooks(value),
        subscribers: parse_subscribers(value),
    })
}

fn function(value: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(value, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn report(hook: &str, err: JsValue) {
    log::error!("livefilter: {} threw: {:?}", hook, err);
}

fn parse_hooks(value: &JsValue) -> Hooks {
    let mut hooks = Hooks::new();

    if let Some(f) = function(value, "beforeFetch") {
        hooks = hooks.with_before_fetch(move || match f.call0(&JsValue::NULL) {
            // only an explicit `false` cancels
            Ok(result) => result.as_bool() != Some(false),
            Err(e) => {
                report("beforeFetch", e);
                true
            }
        });
    }
    if let Some(f) = function(value, "afterFetch") {
        hooks = hooks.with_after_fetch(move |payload| {
            if let Err(e) = f.call1(&JsValue::NULL, &payload_to_js(payload)) {
                report("afterFetch", e);
            }
        });
    }
    if let Some(f) = function(value, "onUpdateUrl") {
        hooks = hooks.with_on_update_url(move |state| {
            if let Err(e) = f.call1(&JsValue::NULL, &state_to_js(state)) {
                report("onUpdateUrl", e);
            }
        });
    }
    if let Some(f) = function(value, "onInit") {
        hooks = hooks.with_on_init(move |state| {
            if let Err(e) = f.call1(&JsValue::NULL, &state_to_js(state)) {
                report("onInit", e);
            }
        });
    }
    hooks
}

fn parse_subscribers(value: &JsValue) -> Vec<SubscriberSpec<Rc<dyn Subscriber>>> {
    let list = match Reflect::get(value, &JsValue::from_str("subscribers")) {
        Ok(list) if Array::is_array(&list) => Array::from(&list),
        _ => return Vec::new(),
    };

    list.iter()
        .filter_map(|entry| {
            if let Some(selector) = entry.as_string() {
                return Some(SubscriberSpec::Selector(selector));
            }
            match entry.dyn_into::<Element>() {
                Ok(element) => Some(SubscriberSpec::Element(
                    Rc::new(ElementSubscriber::new(element)) as Rc<dyn Subscriber>,
                )),
                Err(other) => {
                    log::warn!("livefilter: ignoring subscriber {:?}", other);
                    None
                }
            }
        })
        .collect()
}
