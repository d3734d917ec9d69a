//! # Agro Advisor - crop disease diagnosis and weather advisory client
//!
//! Library backing the `agro-advisor` CLI:
//! - Envelope decoding of stringified-JSON backend responses (pure, bounded)
//! - Typed prediction and weather-advisory responses
//! - Multipart client for the prediction backend, forecast API client
//! - File-backed session state (location, crop, image, last result)
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────────────────┐
//!   CLI / caller →│              Advisor                 │
//!                 │  ┌──────────┐ ┌─────────┐ ┌───────┐  │
//!                 │  │ Backend  │ │Envelope │ │Session│  │
//!                 │  │ (HTTP)   │ │ Decoder │ │ Store │  │
//!                 │  └──────────┘ └─────────┘ └───────┘  │
//!                 └──────────────────────────────────────┘
//! ```
//!
//! The decoder never performs I/O; everything that talks to the network or
//! disk sits around it.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod advisor;
pub mod advisory;
pub mod client;
pub mod envelope;
pub mod prediction;
pub mod report;
pub mod store;
pub mod types;
pub mod validation;
pub mod weather;

// Internal utilities
pub mod observability;

pub use advisory::{decode_advisory, WeatherAdvisory};
pub use envelope::{decode, DecodeError, NormalizedDiagnosis, RawEnvelope};
pub use types::{Config, Error, Result};
