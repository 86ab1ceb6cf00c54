//! Probe outcome types.
//!
//! A [`Check`] is the immutable record of one probe attempt: when it
//! started, when it finished, and either an HTTP status code or a
//! transport-level [`DownReason`]. The prober constructs it; the
//! accumulator and reporter only read it.

use std::time::{Duration, Instant};

use thiserror::Error;

/// The expected status code. Exactly 200 counts as UP; any other code,
/// or any transport error, is DOWN.
pub const EXPECTED_STATUS: u16 = 200;

/// Why a probe is classified DOWN, when the cause is not the status
/// code itself. All variants fold to DOWN identically; the variant only
/// selects the human-readable reason string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownReason {
    /// The probe exceeded its deadline waiting for a connection or response.
    #[error("request timed out")]
    TimedOut,

    /// The connection was closed or the request cancelled mid-flight.
    #[error("request timed out (cancelled)")]
    Cancelled,

    /// The remote endpoint refused or reset the connection, or could not
    /// be resolved.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a redirect, which the probe policy
    /// rejects so redirect-based outages are detected.
    #[error("redirect discovered")]
    RedirectRejected,

    /// Success status but a zero-length body; a broken backend may still
    /// return 200 with no content.
    #[error("empty response body")]
    EmptyBody,

    /// Any transport error not covered by the variants above.
    #[error("{0}")]
    Other(String),
}

/// The outcome of a single probe attempt. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Check {
    started_at: Instant,
    finished_at: Instant,
    /// Meaningful only when `error` is `None`.
    status_code: Option<u16>,
    error: Option<DownReason>,
}

impl Check {
    /// A probe that completed at the transport level with `status_code`.
    /// The check may still be DOWN if the code is not 200.
    pub fn completed(started_at: Instant, finished_at: Instant, status_code: u16) -> Self {
        Self {
            started_at,
            finished_at,
            status_code: Some(status_code),
            error: None,
        }
    }

    /// A probe that failed at the transport level. No status code.
    pub fn failed(started_at: Instant, finished_at: Instant, reason: DownReason) -> Self {
        Self {
            started_at,
            finished_at,
            status_code: None,
            error: Some(reason),
        }
    }

    /// A probe that completed with a success status but an empty body.
    pub fn empty_body(started_at: Instant, finished_at: Instant, status_code: u16) -> Self {
        Self {
            started_at,
            finished_at,
            status_code: Some(status_code),
            error: Some(DownReason::EmptyBody),
        }
    }

    /// When the probe was started.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// How long the probe took, saturating at zero.
    pub fn elapsed(&self) -> Duration {
        self.finished_at.saturating_duration_since(self.started_at)
    }

    /// True iff no transport error occurred. Distinct from [`Self::is_up`]:
    /// a check can be `ok()` yet report a non-200 status.
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    /// The HTTP status code, if the probe got that far.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The transport-level failure, if any.
    pub fn error(&self) -> Option<&DownReason> {
        self.error.as_ref()
    }

    /// UP iff no transport error and the status code is exactly 200.
    pub fn is_up(&self) -> bool {
        self.ok() && self.status_code == Some(EXPECTED_STATUS)
    }

    /// Human-readable reason when the check is DOWN, `None` when UP.
    pub fn down_reason(&self) -> Option<String> {
        if let Some(reason) = &self.error {
            return Some(reason.to_string());
        }
        if self.status_code != Some(EXPECTED_STATUS) {
            return Some("non 200 response code".to_string());
        }
        None
    }
}
