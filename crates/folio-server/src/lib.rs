//! # Folio Server Library
//!
//! Exposes the environment configuration loader for testing.
//! The main entry point is the `main.rs` binary.

pub mod config;

pub use config::{gateway_config_from_env, gateway_config_from_lookup, EnvConfigError};
