pub mod shared;
pub mod wire;
