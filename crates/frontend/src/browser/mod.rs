//! `web-sys` implementations of the controller's collaborators, and the event wiring.

mod address;
mod form;
mod options;
mod subscriber;
mod transport;
mod wiring;

pub use address::WindowAddressBar;
pub use form::{DomControl, DomForm};
pub use options::{parse_options, BrowserConfig};
pub use subscriber::{payload_to_js, state_to_js, ElementSubscriber};
pub use transport::GlooTransport;
pub use wiring::attach;
