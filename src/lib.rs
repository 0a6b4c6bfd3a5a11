#![warn(missing_docs)]
//! Poolwatch is a log watcher that follows a structured nginx access log and
//! raises rate-limited alerts on upstream pool failover and elevated server
//! error rates.

pub mod config;
pub mod engine;
pub mod models;
pub mod notification;
pub mod supervisor;
pub mod tail;
