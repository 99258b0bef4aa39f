//! # Configuration
//!
//! File and environment configuration for native front ends.

#[cfg(not(target_arch = "wasm32"))]
pub mod app;

#[cfg(not(target_arch = "wasm32"))]
pub use app::{AppConfig, ConfigError, ConfigFormat, ResponderMode};
