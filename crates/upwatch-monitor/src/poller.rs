//! Timer-driven probe scheduling and edge-triggered reporting.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use upwatch_core::{Check, ConfigError, MonitorConfig};
use upwatch_stats::{Accumulator, State, Summary};

pub type BoxFuture = Pin<Box<dyn Future<Output = Check> + Send>>;

/// The external probe collaborator. Invoked once per tick, never
/// concurrently with itself; must always resolve to a [`Check`].
pub type ProbeFn = Arc<dyn Fn(String) -> BoxFuture + Send + Sync>;

/// Sink for reported checks. Formatting is the caller's concern.
pub type Reporter = Box<dyn FnMut(&Check) + Send>;

/// Drives periodic probes against a single target and folds each
/// outcome into the [`Accumulator`].
pub struct Poller {
    config: MonitorConfig,
    probe: ProbeFn,
    reporter: Reporter,
    stats: Accumulator,
    /// Classification of the last check that was actually reported.
    last_reported: Option<State>,
}

impl Poller {
    /// Fails fast on an unusable configuration, before any probe runs.
    pub fn new(
        config: MonitorConfig,
        probe: ProbeFn,
        reporter: Reporter,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            probe,
            reporter,
            stats: Accumulator::new(),
            last_reported: None,
        })
    }

    /// Poll until the shutdown channel fires, then return the terminal
    /// summary.
    ///
    /// A probe in flight when the signal arrives completes and is fully
    /// folded before the loop observes the channel; its duration is
    /// bounded by the probe timeout, so shutdown cannot hang.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Summary {
        info!(
            target = %self.config.target,
            interval = ?self.config.interval,
            "poller started"
        );

        // Immediate first probe so the state is known before the first
        // scheduled tick. The first observation is always reported.
        self.step(true).await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {
                    self.step(false).await;
                }
                _ = shutdown.changed() => {
                    info!("poller shutting down");
                    break;
                }
            }
        }

        self.stats.summary()
    }

    /// One probe: invoke the collaborator, fold the check, report it if
    /// the first observation, verbose mode, or a state transition asks
    /// for it.
    async fn step(&mut self, always_report: bool) {
        let check = (self.probe)(self.config.target.clone()).await;
        self.stats.add(&check);

        let state = self.stats.last_state();
        debug!(
            up = check.is_up(),
            elapsed = ?check.elapsed(),
            total = self.stats.total(),
            "check folded"
        );

        if always_report || self.config.verbose || state != self.last_reported {
            (self.reporter)(&check);
            self.last_reported = state;
        }
    }
}
