use wasm_bindgen::JsValue;
use web_sys::{window, History, Location};

use crate::navigator::AddressBar;

fn location() -> Option<Location> {
    window().map(|w| w.location())
}

fn history() -> Option<History> {
    window().and_then(|w| w.history().ok())
}

/// The real address bar of the current window.
pub struct WindowAddressBar;

impl AddressBar for WindowAddressBar {
    fn href(&self) -> String {
        location()
            .and_then(|l| l.href().ok())
            .unwrap_or_default()
    }

    fn hash(&self) -> String {
        location()
            .and_then(|l| l.hash().ok())
            .unwrap_or_default()
    }

    fn base_url(&self) -> String {
        let location = match location() {
            Some(l) => l,
            None => return String::new(),
        };
        let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
        let host = location.host().unwrap_or_default();
        let pathname = location.pathname().unwrap_or_default();
        format!("{}//{}{}", protocol, host, pathname)
    }

    fn supports_push_state(&self) -> bool {
        history()
            .map(|h| js_sys::Reflect::has(&h, &JsValue::from_str("pushState")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn push_url(&self, url: &str) {
        let pushed = history()
            .map(|h| h.push_state_with_url(&JsValue::NULL, "", Some(url)));
        if let Some(Err(e)) = pushed {
            log::warn!("livefilter: pushState to {} failed: {:?}", url, e);
        }
    }

    fn set_hash(&self, hash: &str) {
        if let Some(Err(e)) = location().map(|l| l.set_hash(hash)) {
            log::warn!("livefilter: setting hash failed: {:?}", e);
        }
    }

    fn assign(&self, url: &str) {
        if let Some(Err(e)) = location().map(|l| l.set_href(url)) {
            log::warn!("livefilter: navigation to {} failed: {:?}", url, e);
        }
    }
}
