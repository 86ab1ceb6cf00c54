//! upwatch-probe — the "perform probe" collaborator.
//!
//! Wraps one configured HTTP client and turns each GET against the
//! target into a [`Check`]. Transport failures never escape this
//! boundary; every outcome, including timeouts, refused connections,
//! and rejected redirects, is encoded into the returned check.

pub mod prober;

pub use prober::{HttpProber, ProberError};
