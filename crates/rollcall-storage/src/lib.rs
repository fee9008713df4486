//! rollcall-storage: Persistence backends and configuration.
//!
//! Implements the `Persistence` trait for a directory of JSON files and for
//! an in-memory map, and loads `rollcall.toml` to pick between them.

pub mod config;
pub mod file;
pub mod memory;

pub use config::{create_store, load_config, load_config_from, RollcallConfig, StoreConfig};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
