pub mod components;
pub mod error;
pub mod preset;

pub use preset::Preset;
