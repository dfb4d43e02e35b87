use std::rc::Rc;

use contracts::shared::{FilterState, Payload};
use contracts::wire::EVENT_DATA_FIELD;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Element};

use crate::subscribers::{FetchedEvent, Subscriber};

/// JSON bodies become plain JS objects, text bodies JS strings.
pub fn payload_to_js(payload: &Payload) -> JsValue {
    match payload {
        Payload::Json(value) => value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL),
        Payload::Text(text) => JsValue::from_str(text),
    }
}

pub fn state_to_js(state: &FilterState) -> JsValue {
    state
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// First element matching `selector` in the document.
pub fn find_subscriber(selector: &str) -> Option<Rc<dyn Subscriber>> {
    let document = web_sys::window()?.document()?;
    match document.query_selector(selector) {
        Ok(found) => found.map(|el| Rc::new(ElementSubscriber::new(el)) as Rc<dyn Subscriber>),
        Err(e) => {
            log::warn!("livefilter: invalid subscriber selector '{}': {:?}", selector, e);
            None
        }
    }
}

pub struct ElementSubscriber {
    element: Element,
}

impl ElementSubscriber {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl Subscriber for ElementSubscriber {
    fn deliver(&self, event: &FetchedEvent) {
        let data = payload_to_js(&event.data);
        let init = CustomEventInit::new();
        init.set_detail(&data);

        let custom = match CustomEvent::new_with_event_init_dict(event.name, &init) {
            Ok(custom) => custom,
            Err(e) => {
                log::warn!("livefilter: could not create {}: {:?}", event.name, e);
                return;
            }
        };
        let _ = js_sys::Reflect::set(&custom, &JsValue::from_str(EVENT_DATA_FIELD), &data);
        let _ = self.element.dispatch_event(&custom);
    }
}
