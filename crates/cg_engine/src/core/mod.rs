//! # Core Module
//!
//! Settings shared by the library and the binaries built on it.

pub mod config;

pub use config::{Config, ConfigError, GeneratorConfig, ViewerConfig, WindowSize};
