//! Core types for the advisory client.
//!
//! This module provides foundational types used throughout the crate:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for backend, weather API, store and decoder

mod config;
mod errors;

pub use config::{
    BackendConfig, Config, DecoderConfig, ObservabilityConfig, StoreConfig, WeatherConfig,
};
pub use errors::{Error, Result};
