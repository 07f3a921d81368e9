//! Configuration management for p4x.
//!
//! Settings are layered with figment: built-in defaults, then
//! `<workspace>/.p4x/config.yaml`, then `P4X_*` environment variables.
//! Command-line flags are applied on top by the binary.

pub mod config;

pub use config::{ConfigError, P4xConfig, load_config, save_config};
