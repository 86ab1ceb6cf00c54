//! upwatch-core — shared leaf types for the upwatch monitor.
//!
//! Holds the probe outcome value object ([`Check`]), the down-reason
//! taxonomy ([`DownReason`]), and the validated monitor configuration
//! ([`MonitorConfig`]). No async, no I/O — everything here is consumed
//! by the probe, stats, and monitor crates.

pub mod check;
pub mod config;

pub use check::{Check, DownReason};
pub use config::{ConfigError, MonitorConfig};
