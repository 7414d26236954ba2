//! Resolver configuration
//!
//! Values are layered, highest priority first:
//!
//! 1. Environment variables (`MODSOLVE_*`)
//! 2. Project `modsolve.json` (`config` section)
//! 3. Built-in defaults
//!
//! ```rust,no_run
//! use modsolve::config::ResolverConfig;
//! use std::path::Path;
//!
//! let config = ResolverConfig::build(Some(Path::new("/path/to/instance")), true).unwrap();
//! println!("Discovery timeout: {:?}", config.discovery_timeout());
//! ```

mod config;
mod source;

pub use config::{default_worker_count, ResolverConfig, CONFIG_FILE, DEFAULT_DISCOVERY_TIMEOUT_SECS};
pub use source::{ConfigLoader, ConfigSource, RawConfig};
