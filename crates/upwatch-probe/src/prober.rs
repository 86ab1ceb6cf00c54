//! HTTP probe execution and failure classification.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use upwatch_core::{Check, DownReason};

const USER_AGENT: &str = concat!("upwatch/", env!("CARGO_PKG_VERSION"));

/// The HTTP client could not be constructed at startup.
#[derive(Debug, Error)]
#[error("failed to build http client: {0}")]
pub struct ProberError(#[from] reqwest::Error);

/// Performs one GET per probe against the monitored URL.
///
/// The client applies the probe timeout to the whole request, rejects
/// every redirect (a redirect-based outage should surface as DOWN, not
/// be followed), and skips TLS certificate verification — the monitor
/// measures availability, not certificate hygiene.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, ProberError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::custom(|attempt| {
                attempt.error("redirect discovered")
            }))
            .danger_accept_invalid_certs(true)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Run one probe. Always returns a check; never panics or errors
    /// past this boundary.
    pub async fn probe(&self, url: &str) -> Check {
        let started = Instant::now();
        let outcome = self.fetch(url).await;
        let finished = Instant::now();

        match outcome {
            Ok((status, body_len)) => {
                if body_len == 0 && (200..300).contains(&status) {
                    debug!(%url, status, "probe returned success status with empty body");
                    Check::empty_body(started, finished, status)
                } else {
                    debug!(%url, status, "probe completed");
                    Check::completed(started, finished, status)
                }
            }
            Err(reason) => {
                debug!(%url, %reason, "probe failed");
                Check::failed(started, finished, reason)
            }
        }
    }

    /// The body is read in full so a broken-but-listening backend that
    /// returns 200 with no content is still detected.
    async fn fetch(&self, url: &str) -> Result<(u16, usize), DownReason> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;
        Ok((status, body.len()))
    }
}

/// Map a transport error onto the down-reason taxonomy.
fn classify(err: reqwest::Error) -> DownReason {
    if err.is_timeout() {
        return DownReason::TimedOut;
    }
    if err.is_redirect() {
        return DownReason::RedirectRejected;
    }
    if err.is_connect() {
        return DownReason::ConnectionFailed(root_cause(&err));
    }
    if err.is_body() {
        // The connection went away while reading the response.
        return DownReason::Cancelled;
    }
    DownReason::Other(root_cause(&err))
}

/// Innermost source message, without reqwest's url-decorated wrapping.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
