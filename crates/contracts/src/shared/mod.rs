pub mod filter_state;
pub mod payload;

pub use filter_state::{FilterState, FilterValue};
pub use payload::Payload;
