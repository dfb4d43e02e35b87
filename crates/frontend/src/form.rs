//! Two-way reflection between form controls and filter state.

use std::rc::Rc;

use contracts::shared::FilterState;

use crate::codec;
use crate::silent::SilentFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Checkbox,
    Radio,
    /// text, search and tel inputs
    Text,
    Select,
    /// `<select multiple>`
    MultiSelect,
    /// Serialized but never re-rendered (hidden inputs, textareas, ...).
    Other,
}

/// One named control inside the bound form.
pub trait FormControl {
    fn kind(&self) -> ControlKind;
    fn name(&self) -> String;
    fn value(&self) -> String;
    fn checked(&self) -> bool;
    fn disabled(&self) -> bool;
    fn set_value(&self, value: &str);
    fn set_checked(&self, checked: bool);

    /// Values of every option, for multi-selects.
    fn option_values(&self) -> Vec<String> {
        Vec::new()
    }

    /// Every selected value; one pair each when serialized.
    fn selected_values(&self) -> Vec<String> {
        vec![self.value()]
    }

    /// Selects exactly the options whose value is in `values`.
    fn set_selected_values(&self, _values: &[String]) {}
    /// Lets dependent UI know the control changed (a bubbling `change` event in the DOM).
    fn notify_change(&self);
}

pub trait FormHost {
    /// The form's `action` attribute, if it has one.
    fn action(&self) -> Option<String>;
    /// Every named control, in document order.
    fn controls(&self) -> Vec<Box<dyn FormControl>>;
}

pub struct FormSynchronizer {
    form: Rc<dyn FormHost>,
}

impl FormSynchronizer {
    pub fn new(form: Rc<dyn FormHost>) -> Self {
        Self { form }
    }

    pub fn action(&self) -> Option<String> {
        self.form.action()
    }

    /// Encodes every named, enabled control the way a form submission would.
    pub fn serialize(&self) -> String {
        let pairs: Vec<(String, String)> = self
            .form
            .controls()
            .iter()
            .filter(|control| !control.disabled())
            .filter(|control| match control.kind() {
                ControlKind::Checkbox | ControlKind::Radio => control.checked(),
                _ => true,
            })
            .flat_map(|control| {
                let name = control.name();
                let values = match control.kind() {
                    ControlKind::MultiSelect => control.selected_values(),
                    _ => vec![control.value()],
                };
                values.into_iter().map(move |value| (name.clone(), value))
            })
            .collect();

        codec::encode(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }

    /// Brings the controls in line with `state`, notifying only the ones that changed.
    ///
    /// Runs with `silent` raised so the notifications cannot feed back into
    /// address updates. Returns the number of controls changed.
    pub fn render(&self, state: &FilterState, silent: &SilentFlag) -> usize {
        let _guard = silent.hold();
        let mut changed = 0;

        for control in self.form.controls() {
            if render_control(control.as_ref(), state) {
                control.notify_change();
                changed += 1;
            }
        }

        log::debug!("livefilter: re-rendered form, {} control(s) changed", changed);
        changed
    }
}

fn render_control(control: &dyn FormControl, state: &FilterState) -> bool {
    let entry = state.get(&control.name());

    match control.kind() {
        ControlKind::Checkbox | ControlKind::Radio => {
            let wanted = entry.is_some_and(|value| value.contains(&control.value()));
            if control.checked() == wanted {
                return false;
            }
            control.set_checked(wanted);
            true
        }
        ControlKind::Text => {
            let wanted = entry.and_then(|value| value.first()).unwrap_or_default();
            set_value_if_changed(control, wanted)
        }
        // an absent key leaves the select on whatever it shows
        ControlKind::Select => match entry.and_then(|value| value.first()) {
            Some(wanted) => set_value_if_changed(control, wanted),
            None => false,
        },
        ControlKind::MultiSelect => {
            let wanted: Vec<String> = control
                .option_values()
                .into_iter()
                .filter(|option| entry.is_some_and(|value| value.contains(option)))
                .collect();
            if control.selected_values() == wanted {
                return false;
            }
            control.set_selected_values(&wanted);
            true
        }
        ControlKind::Other => false,
    }
}

fn set_value_if_changed(control: &dyn FormControl, wanted: &str) -> bool {
    if control.value() == wanted {
        return false;
    }
    control.set_value(wanted);
    true
}
