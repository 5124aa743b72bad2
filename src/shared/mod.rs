pub mod config;
pub mod error;

pub use config::{CacheSettings, DatabaseConfig, Environment};
pub use error::{CacheError, Result};
