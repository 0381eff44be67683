//! bolero-store — word document stores and configuration.
//!
//! Implements the `WordRepository` trait over a JSON document file and an
//! in-memory map, and loads the `bolero.toml` configuration.

pub mod config;
pub mod json;
pub mod memory;

pub use config::{load_config, load_config_from, BoleroConfig};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
