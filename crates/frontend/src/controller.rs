//! The live filter: keeps form, address and fetched results in step.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use contracts::shared::FilterState;

use crate::codec;
use crate::config::Options;
use crate::fetch::{FetchPipeline, PendingFetch, Transport};
use crate::form::{FormHost, FormSynchronizer};
use crate::hash_watch::HashWatcher;
use crate::hooks::Hooks;
use crate::navigator::{AddressBar, NavigationMode, Navigator, Redirect};
use crate::silent::SilentFlag;
use crate::subscribers::{self, Subscriber, SubscriberLookup, SubscriberSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
}

/// Everything the controller talks to outside itself.
pub struct Collaborators {
    pub form: Rc<dyn FormHost>,
    pub address: Rc<dyn AddressBar>,
    pub transport: Rc<dyn Transport>,
    pub subscribers: Vec<SubscriberSpec<Rc<dyn Subscriber>>>,
    pub lookup: SubscriberLookup,
}

/// Result of [`LiveFilter::initialize`].
pub struct Startup {
    pub redirect: Option<Redirect>,
    /// Fetch seeded from the URL, issued in hash-fallback mode only.
    pub initial_fetch: Option<PendingFetch>,
}

pub struct LiveFilter {
    navigator: Navigator,
    form: FormSynchronizer,
    pipeline: FetchPipeline,
    hooks: Rc<Hooks>,
    silent: SilentFlag,
    hash: HashWatcher,
    options: Options,
    lifecycle: Cell<Lifecycle>,
    pending_subscribers: RefCell<Option<(Vec<SubscriberSpec<Rc<dyn Subscriber>>>, SubscriberLookup)>>,
}

impl LiveFilter {
    pub fn new(collaborators: Collaborators, options: Options, hooks: Hooks) -> Self {
        let Collaborators {
            form,
            address,
            transport,
            subscribers,
            lookup,
        } = collaborators;

        let navigator = Navigator::new(address, options.use_push_state);
        let form = FormSynchronizer::new(form);
        let action = options
            .action
            .clone()
            .or_else(|| form.action())
            .unwrap_or_default();
        let hooks = Rc::new(hooks);
        let pipeline = FetchPipeline::new(
            action,
            &options.additional_headers,
            transport,
            hooks.clone(),
        );
        let hash = HashWatcher::new(navigator.hash());

        Self {
            navigator,
            form,
            pipeline,
            hooks,
            silent: SilentFlag::default(),
            hash,
            options,
            lifecycle: Cell::new(Lifecycle::Uninitialized),
            pending_subscribers: RefCell::new(Some((subscribers, lookup))),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn mode(&self) -> NavigationMode {
        self.navigator.mode()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn is_silent(&self) -> bool {
        self.silent.is_set()
    }

    /// State currently encoded in the address.
    pub fn url_state(&self) -> FilterState {
        codec::decode(&self.navigator.current_query())
    }

    /// Runs the startup sequence up to, not including, listener attachment.
    ///
    /// Only the first call does anything.
    pub fn initialize(&self) -> Startup {
        if self.lifecycle.get() == Lifecycle::Ready {
            log::warn!("livefilter: already initialized");
            return Startup {
                redirect: None,
                initial_fetch: None,
            };
        }

        if let Some((specs, lookup)) = self.pending_subscribers.borrow_mut().take() {
            self.pipeline
                .set_subscribers(subscribers::resolve(specs, |selector| lookup(selector)));
        }

        let redirect = self.navigator.reconcile_scheme();

        let initial_fetch = match self.navigator.mode() {
            NavigationMode::HashFallback => Some(self.sync_from_url(false)),
            NavigationMode::PushState => None,
        };

        self.hooks.on_init(&self.url_state());
        self.lifecycle.set(Lifecycle::Ready);
        log::debug!(
            "livefilter: ready in {:?} mode, {} subscriber(s)",
            self.navigator.mode(),
            self.pipeline.subscriber_count()
        );

        Startup {
            redirect,
            initial_fetch,
        }
    }

    /// Form to URL: serialize, show it in the address, fetch.
    ///
    /// Inert while the form is being re-rendered from the URL.
    pub fn trigger_update(&self) -> Option<PendingFetch> {
        if self.silent.is_set() {
            return None;
        }

        let serialized = self.form.serialize();
        let query = format!("?{}", serialized);
        if !self.navigator.navigate(&query, &self.silent) {
            return None;
        }

        if self.navigator.mode() == NavigationMode::HashFallback {
            self.hash.remember(self.navigator.hash());
        }

        Some(self.pipeline.run(&serialized))
    }

    /// URL to form: after back/forward or a hash change.
    pub fn handle_navigation(&self) -> PendingFetch {
        self.sync_from_url(true)
    }

    /// One tick of the hash poller; fetches only when the fragment changed.
    pub fn poll_hash(&self) -> Option<PendingFetch> {
        let current = self.navigator.hash();
        if !self.hash.observe(&current) {
            return None;
        }
        log::debug!("livefilter: hash changed to {}", current);
        Some(self.handle_navigation())
    }

    fn sync_from_url(&self, notify: bool) -> PendingFetch {
        let query = self.navigator.current_query();
        let state = codec::decode(&query);

        self.form.render(&state, &self.silent);
        if notify {
            self.hooks.on_update_url(&state);
        }
        self.pipeline.run(&query)
    }
}
