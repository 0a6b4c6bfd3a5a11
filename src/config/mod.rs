//! Configuration module for poolwatch.

mod app_config;
mod helpers;

pub use app_config::AppConfig;
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
