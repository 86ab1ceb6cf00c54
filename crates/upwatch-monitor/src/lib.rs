//! upwatch-monitor — the polling control loop.
//!
//! The [`Poller`] owns the accumulator and is its only mutator. It runs
//! one immediate probe on entry, then one probe per interval tick, and
//! selects between the next tick and a shutdown notification.
//!
//! ```text
//! Poller::run
//!   ├── probe once immediately, fold, always report
//!   └── loop: select!
//!       ├── sleep(interval) → probe, fold, report on state change
//!       └── shutdown.changed() → break
//!   └── Accumulator::summary() after the loop has provably stopped
//! ```
//!
//! Probes are sequential by construction: a probe that outlives the
//! interval simply delays the next tick. The summary is computed only
//! after the loop exits, so no `add` can race the terminal read.

pub mod poller;

pub use poller::{BoxFuture, Poller, ProbeFn, Reporter};
