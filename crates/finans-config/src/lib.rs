//! finans-config
//!
//! User preferences and where the household data lives on disk.

pub mod error;
pub mod fsio;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use fsio::write_atomic;
pub use manager::ConfigManager;
pub use model::{default_base_dir, Config, HOME_ENV};
