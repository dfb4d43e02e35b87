//! Reading and writing the visible address, over push-state or the hash fallback.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::silent::SilentFlag;

/// How filter state is carried in the address. Fixed per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    PushState,
    HashFallback,
}

/// The browser's location and history, as far as the widget needs them.
pub trait AddressBar {
    fn href(&self) -> String;
    /// Current fragment including the leading `#`, or empty.
    fn hash(&self) -> String;
    /// `{protocol}//{host}{pathname}` of the current page.
    fn base_url(&self) -> String;
    fn supports_push_state(&self) -> bool;
    /// Replaces the visible address without reloading.
    fn push_url(&self, url: &str);
    fn set_hash(&self, hash: &str);
    /// Full navigation to `url`.
    fn assign(&self, url: &str);
}

/// Rewrite performed at startup when the URL uses the other addressing scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// `page?query` opened without push-state support.
    ToHash(String),
    /// `page#?query` opened with push-state support.
    ToSearch(String),
}

impl Redirect {
    pub fn target(&self) -> &str {
        match self {
            Redirect::ToHash(url) | Redirect::ToSearch(url) => url,
        }
    }
}

/// Returns the query after the first `?` of `url`.
///
/// Duplicate `?` markers right after the first are skipped; anything from a later
/// `?` or a `#` onwards is dropped. `None` when the URL has no query at all.
pub fn extract_query(url: &str) -> Option<&str> {
    let start = url.find('?')? + 1;
    let rest = url[start..].trim_start_matches('?');
    Some(crate::codec::truncate_query(rest))
}

pub struct Navigator {
    address: Rc<dyn AddressBar>,
    mode: NavigationMode,
    base_url: OnceCell<String>,
}

impl Navigator {
    /// `use_push_state` can only opt out: push-state is used when it is requested
    /// and the browser has it.
    pub fn new(address: Rc<dyn AddressBar>, use_push_state: bool) -> Self {
        let mode = if use_push_state && address.supports_push_state() {
            NavigationMode::PushState
        } else {
            NavigationMode::HashFallback
        };
        Self {
            address,
            mode,
            base_url: OnceCell::new(),
        }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn base_url(&self) -> &str {
        self.base_url.get_or_init(|| self.address.base_url())
    }

    pub fn hash(&self) -> String {
        self.address.hash()
    }

    /// Query currently visible in the address, empty when there is none.
    pub fn current_query(&self) -> String {
        let href = self.address.href();
        extract_query(&href).unwrap_or_default().to_string()
    }

    /// Shows `query` (with its leading `?`) in the address.
    ///
    /// Returns `false` without touching anything while `silent` is raised.
    pub fn navigate(&self, query: &str, silent: &SilentFlag) -> bool {
        if silent.is_set() {
            log::debug!("livefilter: navigation suppressed during re-render");
            return false;
        }

        match self.mode {
            NavigationMode::PushState => {
                let url = format!("{}{}", self.base_url(), query);
                self.address.push_url(&url);
            }
            NavigationMode::HashFallback => self.address.set_hash(query),
        }
        true
    }

    /// One-time startup check rewriting bookmarked URLs to this browser's scheme.
    ///
    /// A rewrite triggers a full page load.
    pub fn reconcile_scheme(&self) -> Option<Redirect> {
        let href = self.address.href();
        let query = extract_query(&href).filter(|q| !q.is_empty())?;
        let marker = href.find('?')?;
        let hash_prefixed = href[..marker].ends_with('#');

        let redirect = match (self.mode, hash_prefixed) {
            (NavigationMode::HashFallback, false) => {
                Redirect::ToHash(format!("{}#?{}", self.base_url(), query))
            }
            (NavigationMode::PushState, true) => {
                Redirect::ToSearch(format!("{}?{}", self.base_url(), query))
            }
            _ => return None,
        };

        log::debug!("livefilter: redirecting to {}", redirect.target());
        self.address.assign(redirect.target());
        Some(redirect)
    }
}
