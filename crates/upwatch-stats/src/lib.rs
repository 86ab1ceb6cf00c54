//! upwatch-stats — availability accounting over a sequence of checks.
//!
//! The [`Accumulator`] folds probe outcomes into running totals and
//! derives uptime, downtime, outage count, and average latency on
//! demand.
//!
//! # Duration model
//!
//! ```text
//! run_started_at ──────────────────────────────────────▶ now
//!        │  up  up │ down down │ up       up │ down
//!        │         ╰─ outage ──╯             ╰─ outage (open)
//!                   closed out on               computed on
//!                   recovery to UP              demand from now
//! ```
//!
//! Downtime is anchored on outage boundaries: it is closed out into a
//! permanent total exactly when a DOWN run transitions back to UP, and
//! the currently open outage (if any) is computed on demand. This keeps
//! the duration math exact and independent of polling cadence, unlike
//! accruing `now - last_check_time` on every tick.

pub mod accumulator;

pub use accumulator::{Accumulator, State, Summary};
