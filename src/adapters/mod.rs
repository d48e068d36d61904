// Adapters layer: concrete implementations of the domain ports.

pub mod assets;
pub mod markup;
pub mod memory_store;
pub mod templates;
pub mod tokens;
