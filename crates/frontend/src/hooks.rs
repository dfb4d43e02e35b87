use contracts::shared::{FilterState, Payload};

/// Caller callbacks around the filter lifecycle. Every hook is optional.
#[derive(Default)]
pub struct Hooks {
    before_fetch: Option<Box<dyn Fn() -> bool>>,
    after_fetch: Option<Box<dyn Fn(&Payload)>>,
    on_update_url: Option<Box<dyn Fn(&FilterState)>>,
    on_init: Option<Box<dyn Fn(&FilterState)>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returning `false` cancels the fetch about to be made.
    pub fn with_before_fetch(mut self, hook: impl Fn() -> bool + 'static) -> Self {
        self.before_fetch = Some(Box::new(hook));
        self
    }

    pub fn with_after_fetch(mut self, hook: impl Fn(&Payload) + 'static) -> Self {
        self.after_fetch = Some(Box::new(hook));
        self
    }

    /// Called after the form was re-rendered from a changed URL, never on form edits.
    pub fn with_on_update_url(mut self, hook: impl Fn(&FilterState) + 'static) -> Self {
        self.on_update_url = Some(Box::new(hook));
        self
    }

    pub fn with_on_init(mut self, hook: impl Fn(&FilterState) + 'static) -> Self {
        self.on_init = Some(Box::new(hook));
        self
    }

    pub(crate) fn before_fetch(&self) -> bool {
        self.before_fetch.as_ref().map_or(true, |hook| hook())
    }

    pub(crate) fn after_fetch(&self, payload: &Payload) {
        if let Some(hook) = &self.after_fetch {
            hook(payload);
        }
    }

    pub(crate) fn on_update_url(&self, state: &FilterState) {
        if let Some(hook) = &self.on_update_url {
            hook(state);
        }
    }

    pub(crate) fn on_init(&self, state: &FilterState) {
        if let Some(hook) = &self.on_init {
            hook(state);
        }
    }
}
