//! # Service Container
//!
//! Central container holding all subsystem services with dependency
//! injection, plus the runtime configuration that shapes them.
//!
//! - Services share one transactional store and one audit sink
//! - Services publish station events to the hub; they never call each other

pub mod config;
pub mod services;

pub use config::{load_config, ConfigError, RuntimeConfig};
pub use services::ServiceContainer;
