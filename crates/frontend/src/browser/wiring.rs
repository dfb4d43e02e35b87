//! Listener attachment: triggers, history navigation, hash polling, submit.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlFormElement};

use crate::browser::address::WindowAddressBar;
use crate::browser::form::DomForm;
use crate::browser::options::parse_options;
use crate::browser::subscriber::find_subscriber;
use crate::browser::transport::GlooTransport;
use crate::config::Trigger;
use crate::controller::{Collaborators, LiveFilter};
use crate::debounce::Debouncer;
use crate::error::ConfigError;
use crate::fetch::PendingFetch;
use crate::navigator::NavigationMode;

fn spawn(fetch: PendingFetch) {
    wasm_bindgen_futures::spawn_local(async move {
        fetch.await;
    });
}

/// Registers `handler` for the page's lifetime.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("livefilter: could not listen to '{}': {:?}", event, e);
    }
    closure.forget();
}

/// Binds a live filter to `form` and runs its startup sequence.
pub fn attach(form: HtmlFormElement, options: &JsValue) -> Result<Rc<LiveFilter>, ConfigError> {
    let config = parse_options(options)?;

    let collaborators = Collaborators {
        form: Rc::new(DomForm::new(form.clone())),
        address: Rc::new(WindowAddressBar),
        transport: Rc::new(GlooTransport),
        subscribers: config.subscribers,
        lookup: Box::new(|selector: &str| find_subscriber(selector)),
    };
    let filter = Rc::new(LiveFilter::new(collaborators, config.options, config.hooks));

    let startup = filter.initialize();
    if let Some(fetch) = startup.initial_fetch {
        spawn(fetch);
    }
    if filter.mode() == NavigationMode::HashFallback {
        start_hash_polling(&filter);
    }

    attach_triggers(&filter, &form);
    attach_navigation(&filter);
    listen(&form, "submit", |event: Event| event.prevent_default());

    Ok(filter)
}

fn start_hash_polling(filter: &Rc<LiveFilter>) {
    let filter = filter.clone();
    let period = filter.options().hash_poll_ms;
    Interval::new(period, move || {
        if let Some(fetch) = filter.poll_hash() {
            spawn(fetch);
        }
    })
    .forget();
}

fn attach_triggers(filter: &Rc<LiveFilter>, form: &HtmlFormElement) {
    for (event, trigger) in &filter.options().triggers {
        let elements = match form.query_selector_all(trigger.selector()) {
            Ok(elements) => elements,
            Err(e) => {
                log::warn!("livefilter: bad trigger selector '{}': {:?}", trigger.selector(), e);
                continue;
            }
        };

        let handler = trigger_handler(filter, trigger);
        for idx in 0..elements.length() {
            if let Some(node) = elements.item(idx) {
                let handler = handler.clone();
                listen(&node, event, move |_| handler());
            }
        }
    }
}

/// One handler per trigger, shared by all its elements so they debounce together.
fn trigger_handler(filter: &Rc<LiveFilter>, trigger: &Trigger) -> Rc<dyn Fn()> {
    let run = {
        let filter = filter.clone();
        move || {
            if let Some(fetch) = filter.trigger_update() {
                spawn(fetch);
            }
        }
    };

    if !trigger.debounced() {
        return Rc::new(run);
    }

    let filter = filter.clone();
    let debouncer = Debouncer::<Timeout>::new();
    let run = Rc::new(run);
    let delay = filter.options().debounce_ms;

    Rc::new(move || {
        // a re-render's own change events must not be replayed after it ends
        if filter.is_silent() {
            return;
        }
        let run = run.clone();
        debouncer.arm(Timeout::new(delay, move || run()));
    })
}

/// `document.readyState` once the `load` event has fired.
fn is_loaded(ready_state: &str) -> bool {
    ready_state == "complete"
}

fn attach_navigation(filter: &Rc<LiveFilter>) {
    if filter.mode() != NavigationMode::PushState {
        return;
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let on_popstate = {
        let filter = filter.clone();
        move || {
            let filter = filter.clone();
            if let Some(window) = web_sys::window() {
                listen(&window, "popstate", move |_| spawn(filter.handle_navigation()));
            }
        }
    };

    let loaded = window
        .document()
        .map(|d| is_loaded(&d.ready_state()))
        .unwrap_or(true);

    if loaded {
        on_popstate();
    } else {
        // Some browsers fire popstate while the page is still loading.
        let on_popstate = RefCell::new(Some(on_popstate));
        listen(&window, "load", move |_| {
            if let Some(attach) = on_popstate.borrow_mut().take() {
                Timeout::new(0, attach).forget();
            }
        });
    }
}
