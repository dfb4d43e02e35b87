use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventInit, EventTarget, HtmlFormElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

use crate::form::{ControlKind, FormControl, FormHost};

const CONTROL_SELECTOR: &str = "input[name], select[name], textarea[name]";

/// Input types that never carry filter state.
const SKIPPED_INPUT_TYPES: &[&str] = &["submit", "button", "reset", "image", "file"];

pub struct DomForm {
    form: HtmlFormElement,
}

impl DomForm {
    pub fn new(form: HtmlFormElement) -> Self {
        Self { form }
    }
}

impl FormHost for DomForm {
    fn action(&self) -> Option<String> {
        self.form.get_attribute("action")
    }

    fn controls(&self) -> Vec<Box<dyn FormControl>> {
        let nodes = match self.form.query_selector_all(CONTROL_SELECTOR) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::warn!("livefilter: could not list form controls: {:?}", e);
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|idx| nodes.item(idx))
            .filter_map(DomControl::from_node)
            .filter(|control| !control.name().is_empty())
            .map(|control| Box::new(control) as Box<dyn FormControl>)
            .collect()
    }
}

pub enum DomControl {
    Input(HtmlInputElement, ControlKind),
    Select(HtmlSelectElement),
    TextArea(HtmlTextAreaElement),
}

impl DomControl {
    fn from_node(node: web_sys::Node) -> Option<Self> {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            let input_type = input.type_().to_ascii_lowercase();
            if SKIPPED_INPUT_TYPES.contains(&input_type.as_str()) {
                return None;
            }
            let kind = match input_type.as_str() {
                "checkbox" => ControlKind::Checkbox,
                "radio" => ControlKind::Radio,
                "text" | "search" | "tel" => ControlKind::Text,
                _ => ControlKind::Other,
            };
            return Some(DomControl::Input(input.clone(), kind));
        }
        if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            return Some(DomControl::Select(select.clone()));
        }
        node.dyn_into::<HtmlTextAreaElement>()
            .ok()
            .map(DomControl::TextArea)
    }

    fn options(&self) -> Vec<HtmlOptionElement> {
        let DomControl::Select(select) = self else {
            return Vec::new();
        };
        let options = select.options();
        (0..options.length())
            .filter_map(|idx| options.item(idx))
            .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
            .collect()
    }

    fn target(&self) -> &EventTarget {
        match self {
            DomControl::Input(el, _) => el.as_ref(),
            DomControl::Select(el) => el.as_ref(),
            DomControl::TextArea(el) => el.as_ref(),
        }
    }
}

impl FormControl for DomControl {
    fn kind(&self) -> ControlKind {
        match self {
            DomControl::Input(_, kind) => *kind,
            DomControl::Select(el) if el.multiple() => ControlKind::MultiSelect,
            DomControl::Select(_) => ControlKind::Select,
            DomControl::TextArea(_) => ControlKind::Other,
        }
    }

    fn name(&self) -> String {
        match self {
            DomControl::Input(el, _) => el.name(),
            DomControl::Select(el) => el.name(),
            DomControl::TextArea(el) => el.name(),
        }
    }

    fn value(&self) -> String {
        match self {
            DomControl::Input(el, _) => el.value(),
            DomControl::Select(el) => el.value(),
            DomControl::TextArea(el) => el.value(),
        }
    }

    fn checked(&self) -> bool {
        match self {
            DomControl::Input(el, _) => el.checked(),
            _ => false,
        }
    }

    fn disabled(&self) -> bool {
        match self {
            DomControl::Input(el, _) => el.disabled(),
            DomControl::Select(el) => el.disabled(),
            DomControl::TextArea(el) => el.disabled(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            DomControl::Input(el, _) => el.set_value(value),
            DomControl::Select(el) => el.set_value(value),
            DomControl::TextArea(el) => el.set_value(value),
        }
    }

    fn set_checked(&self, checked: bool) {
        if let DomControl::Input(el, _) = self {
            el.set_checked(checked);
        }
    }

    fn option_values(&self) -> Vec<String> {
        self.options().iter().map(HtmlOptionElement::value).collect()
    }

    fn selected_values(&self) -> Vec<String> {
        match self {
            DomControl::Select(el) if el.multiple() => self
                .options()
                .iter()
                .filter(|option| option.selected())
                .map(HtmlOptionElement::value)
                .collect(),
            _ => vec![self.value()],
        }
    }

    fn set_selected_values(&self, values: &[String]) {
        for option in self.options() {
            option.set_selected(values.contains(&option.value()));
        }
    }

    fn notify_change(&self) {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(false);

        match Event::new_with_event_init_dict("change", &init) {
            Ok(event) => {
                let _ = self.target().dispatch_event(&event);
            }
            Err(e) => log::warn!("livefilter: could not create change event: {:?}", e),
        }
    }
}
