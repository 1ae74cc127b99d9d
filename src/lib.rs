//! Instant quote engine and booking wizard core for a home-services
//! cleaning business, plus the thin HTTP/CLI surface around it.

pub mod booking;
pub mod config;
pub mod error;
pub mod telemetry;
