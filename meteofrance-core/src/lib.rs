//! Core library for the `meteofrance` CLI.
//!
//! This crate defines:
//! - Typed models for the rain and snow documents, with query helpers
//! - Timezone-aware conversion of API timestamps
//! - An HTTP client producing those documents
//! - Configuration & credentials handling
//!
//! The models never touch the network; callers fetch a document first
//! (through [`MeteoFranceClient`] or otherwise), then wrap it.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod time;

pub use client::{MeteoFranceClient, RainProvider};
pub use config::Config;
pub use error::ModelError;
pub use model::{Rain, Snow};
pub use time::{LocalTime, localize};
