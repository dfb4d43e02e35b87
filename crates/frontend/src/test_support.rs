//! In-memory stand-ins for the browser, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::fetch::{FetchRequest, FetchResponse, Transport};
use crate::form::{ControlKind, FormControl, FormHost};
use crate::navigator::AddressBar;
use crate::subscribers::{FetchedEvent, Subscriber};

pub struct FakeAddress {
    href: RefCell<String>,
    base: String,
    push_state: bool,
    pushed: RefCell<Vec<String>>,
    assigned: RefCell<Vec<String>>,
}

impl FakeAddress {
    pub fn new(href: &str, push_state: bool) -> Self {
        let base = match href.find(&['?', '#'][..]) {
            Some(idx) => &href[..idx],
            None => href,
        };
        Self {
            href: RefCell::new(href.to_string()),
            base: base.to_string(),
            push_state,
            pushed: RefCell::new(Vec::new()),
            assigned: RefCell::new(Vec::new()),
        }
    }

    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }

    pub fn assigned(&self) -> Vec<String> {
        self.assigned.borrow().clone()
    }

    /// Back/forward: the address changes without the widget pushing anything.
    pub fn simulate_back(&self, href: &str) {
        *self.href.borrow_mut() = href.to_string();
    }
}

impl AddressBar for FakeAddress {
    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn hash(&self) -> String {
        let href = self.href.borrow();
        href.find('#')
            .map(|idx| href[idx..].to_string())
            .unwrap_or_default()
    }

    fn base_url(&self) -> String {
        self.base.clone()
    }

    fn supports_push_state(&self) -> bool {
        self.push_state
    }

    fn push_url(&self, url: &str) {
        *self.href.borrow_mut() = url.to_string();
        self.pushed.borrow_mut().push(url.to_string());
    }

    fn set_hash(&self, hash: &str) {
        let mut href = self.href.borrow_mut();
        let without = href.split('#').next().unwrap_or_default().to_string();
        *href = format!("{}#{}", without, hash.trim_start_matches('#'));
    }

    fn assign(&self, url: &str) {
        *self.href.borrow_mut() = url.to_string();
        self.assigned.borrow_mut().push(url.to_string());
    }
}

struct ControlInner {
    kind: ControlKind,
    name: String,
    value: RefCell<String>,
    checked: Cell<bool>,
    disabled: Cell<bool>,
    options: Vec<String>,
    selected: RefCell<Vec<String>>,
    notifications: Cell<usize>,
    observers: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Shared handle to one fake control; clones see the same state.
#[derive(Clone)]
pub struct FakeControl {
    inner: Rc<ControlInner>,
}

impl FakeControl {
    fn build(kind: ControlKind, name: &str, value: &str, checked: bool) -> Self {
        Self {
            inner: Rc::new(ControlInner {
                kind,
                name: name.to_string(),
                value: RefCell::new(value.to_string()),
                checked: Cell::new(checked),
                disabled: Cell::new(false),
                options: Vec::new(),
                selected: RefCell::new(Vec::new()),
                notifications: Cell::new(0),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self::build(ControlKind::Text, name, value, false)
    }

    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self::build(ControlKind::Checkbox, name, value, checked)
    }

    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self::build(ControlKind::Radio, name, value, checked)
    }

    pub fn select(name: &str, value: &str) -> Self {
        Self::build(ControlKind::Select, name, value, false)
    }

    pub fn multi_select(name: &str, options: &[&str], selected: &[&str]) -> Self {
        let to_owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        Self {
            inner: Rc::new(ControlInner {
                kind: ControlKind::MultiSelect,
                name: name.to_string(),
                value: RefCell::new(String::new()),
                checked: Cell::new(false),
                disabled: Cell::new(false),
                options: to_owned(options),
                selected: RefCell::new(to_owned(selected)),
                notifications: Cell::new(0),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn hidden(name: &str, value: &str) -> Self {
        Self::build(ControlKind::Other, name, value, false)
    }

    pub fn disabled(self) -> Self {
        self.inner.disabled.set(true);
        self
    }

    pub fn on_change(&self, observer: impl Fn() + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    pub fn notifications(&self) -> usize {
        self.inner.notifications.get()
    }
}

impl FormControl for FakeControl {
    fn kind(&self) -> ControlKind {
        self.inner.kind
    }

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn value(&self) -> String {
        self.inner.value.borrow().clone()
    }

    fn checked(&self) -> bool {
        self.inner.checked.get()
    }

    fn disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    fn set_value(&self, value: &str) {
        *self.inner.value.borrow_mut() = value.to_string();
    }

    fn set_checked(&self, checked: bool) {
        self.inner.checked.set(checked);
    }

    fn option_values(&self) -> Vec<String> {
        self.inner.options.clone()
    }

    fn selected_values(&self) -> Vec<String> {
        match self.inner.kind {
            ControlKind::MultiSelect => self.inner.selected.borrow().clone(),
            _ => vec![self.value()],
        }
    }

    fn set_selected_values(&self, values: &[String]) {
        *self.inner.selected.borrow_mut() = values.to_vec();
    }

    fn notify_change(&self) {
        self.inner.notifications.set(self.inner.notifications.get() + 1);
        let observers = self.inner.observers.borrow().clone();
        for observer in observers {
            observer();
        }
    }
}

pub struct FakeForm {
    action: Option<String>,
    controls: Vec<FakeControl>,
}

impl FakeForm {
    pub fn new(action: Option<&str>, controls: Vec<FakeControl>) -> Self {
        Self {
            action: action.map(str::to_string),
            controls,
        }
    }

    pub fn control(&self, idx: usize) -> FakeControl {
        self.controls[idx].clone()
    }

    pub fn total_notifications(&self) -> usize {
        self.controls.iter().map(FakeControl::notifications).sum()
    }
}

impl FormHost for FakeForm {
    fn action(&self) -> Option<String> {
        self.action.clone()
    }

    fn controls(&self) -> Vec<Box<dyn FormControl>> {
        self.controls
            .iter()
            .map(|control| Box::new(control.clone()) as Box<dyn FormControl>)
            .collect()
    }
}

/// Answers `{}` unless told otherwise; records every request.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<HashMap<String, Option<FetchResponse>>>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses.borrow_mut().insert(
            url.to_string(),
            Some(FetchResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, url: &str) {
        self.responses.borrow_mut().insert(url.to_string(), None);
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.requests.borrow_mut().push(request.clone());
        match self.responses.borrow().get(&request.url) {
            Some(Some(response)) => Ok(response.clone()),
            Some(None) => Err(FetchError::Network("connection refused".to_string())),
            None => Ok(FetchResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingSubscriber {
    events: RefCell<Vec<FetchedEvent>>,
}

impl RecordingSubscriber {
    pub fn events(&self) -> Vec<FetchedEvent> {
        self.events.borrow().clone()
    }
}

impl Subscriber for RecordingSubscriber {
    fn deliver(&self, event: &FetchedEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
