//! The running aggregate over all checks seen so far.

use std::time::{Duration, Instant};

use upwatch_core::Check;

/// Binary classification of the most recent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Up,
    Down,
}

/// Terminal snapshot of the accumulator, captured for the shutdown
/// report after polling has stopped.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub outages: u64,
    pub total_checks: u64,
    pub average_load_time: Duration,
    pub downtime: Duration,
    pub uptime: Duration,
}

/// Folds a sequence of [`Check`]s into running availability totals.
///
/// Single mutable owner: only the poller calls [`Accumulator::add`], so
/// no internal locking is needed. Queries are non-mutating and always
/// live — an open outage is measured against `Instant::now()` rather
/// than a stored value.
#[derive(Debug, Default)]
pub struct Accumulator {
    up: u64,
    down: u64,
    /// Number of outage openings (maximal contiguous DOWN runs).
    outages: u64,
    /// Sum of elapsed time for UP checks only.
    total_load_time: Duration,
    /// DOWN time closed out by outage-to-UP transitions. Does not
    /// include the currently open outage.
    accumulated_down_time: Duration,
    /// Start of the first check ever added.
    run_started_at: Option<Instant>,
    /// Start of the currently open outage; `Some` iff the last state is
    /// DOWN and the outage has not been closed out.
    outage_started_at: Option<Instant>,
    last_state: Option<State>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one check into the totals. Never fails.
    ///
    /// An outage begins at the start time of its first failing probe,
    /// not at detection time, and ends at the start time of the first
    /// succeeding probe after it.
    pub fn add(&mut self, check: &Check) {
        if self.run_started_at.is_none() {
            self.run_started_at = Some(check.started_at());
        }

        if check.is_up() {
            self.up += 1;
            if let Some(opened) = self.outage_started_at.take() {
                self.accumulated_down_time +=
                    check.started_at().saturating_duration_since(opened);
            }
            self.total_load_time += check.elapsed();
            self.last_state = Some(State::Up);
        } else {
            self.down += 1;
            if self.outage_started_at.is_none() {
                self.outage_started_at = Some(check.started_at());
                self.outages += 1;
            }
            self.last_state = Some(State::Down);
        }
    }

    pub fn up_count(&self) -> u64 {
        self.up
    }

    pub fn down_count(&self) -> u64 {
        self.down
    }

    /// Total number of checks ever added.
    pub fn total(&self) -> u64 {
        self.up + self.down
    }

    /// Number of maximal contiguous DOWN runs, including an open one.
    pub fn outages(&self) -> u64 {
        self.outages
    }

    /// Classification of the most recently added check.
    pub fn last_state(&self) -> Option<State> {
        self.last_state
    }

    /// Total DOWN time: everything closed out so far, plus the open
    /// outage measured up to now.
    pub fn downtime(&self) -> Duration {
        match self.outage_started_at {
            Some(opened) => {
                self.accumulated_down_time + Instant::now().saturating_duration_since(opened)
            }
            None => self.accumulated_down_time,
        }
    }

    /// Total UP time: the whole run minus [`Self::downtime`], clamped at
    /// zero. Zero before the first check.
    pub fn uptime(&self) -> Duration {
        let Some(started) = self.run_started_at else {
            return Duration::ZERO;
        };
        // Measure the run span before the downtime query so clock
        // progress between the two reads can only clamp, never go
        // negative.
        let run_span = Instant::now().saturating_duration_since(started);
        run_span.saturating_sub(self.downtime())
    }

    /// Mean elapsed time of UP checks. Zero when there are none.
    pub fn average_load_time(&self) -> Duration {
        if self.up == 0 {
            return Duration::ZERO;
        }
        self.total_load_time / self.up as u32
    }

    /// Capture the shutdown summary from the on-demand queries.
    pub fn summary(&self) -> Summary {
        Summary {
            outages: self.outages(),
            total_checks: self.total(),
            average_load_time: self.average_load_time(),
            downtime: self.downtime(),
            uptime: self.uptime(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upwatch_core::DownReason;

    /// An instant safely in the past so that fabricated check times are
    /// never ahead of the clock the queries read.
    fn base() -> Instant {
        Instant::now()
            .checked_sub(Duration::from_secs(5))
            .expect("monotonic clock younger than 5s")
    }

    fn up_at(at: Instant, load: Duration) -> Check {
        Check::completed(at, at + load, 200)
    }

    fn down_at(at: Instant) -> Check {
        Check::failed(at, at + Duration::from_millis(10), DownReason::TimedOut)
    }

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn counts_conserve_sequence_length() {
        let base = base();
        let mut acc = Accumulator::new();
        let checks = [
            up_at(base, 10 * MS),
            down_at(base + 100 * MS),
            down_at(base + 200 * MS),
            up_at(base + 300 * MS, 10 * MS),
            Check::completed(base + 400 * MS, base + 410 * MS, 404),
        ];
        for check in &checks {
            acc.add(check);
        }
        assert_eq!(acc.total(), checks.len() as u64);
        assert_eq!(acc.up_count() + acc.down_count(), acc.total());
        assert_eq!(acc.up_count(), 2);
        assert_eq!(acc.down_count(), 3);
    }

    #[test]
    fn empty_accumulator_is_all_zero() {
        let acc = Accumulator::new();
        assert_eq!(acc.total(), 0);
        assert_eq!(acc.outages(), 0);
        assert_eq!(acc.uptime(), Duration::ZERO);
        assert_eq!(acc.downtime(), Duration::ZERO);
        assert_eq!(acc.average_load_time(), Duration::ZERO);
        assert_eq!(acc.last_state(), None);
    }

    #[test]
    fn average_load_time_ignores_down_checks() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&up_at(base, 10 * MS));
        acc.add(&down_at(base + 100 * MS));
        acc.add(&up_at(base + 200 * MS, 30 * MS));
        assert_eq!(acc.average_load_time(), 20 * MS);
    }

    #[test]
    fn average_load_time_zero_for_down_only() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&down_at(base));
        acc.add(&down_at(base + 100 * MS));
        assert_eq!(acc.average_load_time(), Duration::ZERO);
    }

    #[test]
    fn single_up_check_accrues_uptime_only() {
        let mut acc = Accumulator::new();
        acc.add(&up_at(Instant::now(), 10 * MS));
        std::thread::sleep(5 * MS);
        assert!(acc.uptime() > Duration::ZERO);
        assert_eq!(acc.downtime(), Duration::ZERO);
    }

    #[test]
    fn single_down_check_accrues_downtime_only() {
        let mut acc = Accumulator::new();
        acc.add(&down_at(Instant::now()));
        std::thread::sleep(5 * MS);
        assert!(acc.downtime() > Duration::ZERO);
        assert_eq!(acc.uptime(), Duration::ZERO);
    }

    #[test]
    fn up_down_up_closes_exact_outage_interval() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&up_at(base, 10 * MS));
        acc.add(&down_at(base + 100 * MS));
        acc.add(&up_at(base + 300 * MS, 10 * MS));

        // Downtime is exactly the span between the DOWN check and the
        // recovering UP check, nothing before or after.
        assert_eq!(acc.downtime(), 200 * MS);
        assert!(acc.uptime() > Duration::ZERO);
        assert_eq!(acc.outages(), 1);
    }

    #[test]
    fn down_up_down_open_outage_keeps_growing() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&down_at(base));
        acc.add(&up_at(base + 100 * MS, 10 * MS));
        acc.add(&down_at(base + 200 * MS));

        // Closed 100ms from the first outage plus the live open one.
        let first = acc.downtime();
        assert!(first > 100 * MS);

        std::thread::sleep(5 * MS);
        let second = acc.downtime();
        assert!(second > first, "open outage must grow: {first:?} vs {second:?}");
    }

    #[test]
    fn outages_count_contiguous_runs_not_checks() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&down_at(base));
        acc.add(&down_at(base + 100 * MS));
        acc.add(&up_at(base + 200 * MS, 10 * MS));
        acc.add(&down_at(base + 300 * MS));
        // Two DOWN runs, three DOWN checks.
        assert_eq!(acc.outages(), 2);
        assert_eq!(acc.down_count(), 3);
    }

    #[test]
    fn counters_are_monotonic() {
        let base = base();
        let mut acc = Accumulator::new();
        let checks = [
            down_at(base),
            up_at(base + 100 * MS, 10 * MS),
            down_at(base + 200 * MS),
            down_at(base + 300 * MS),
            up_at(base + 400 * MS, 10 * MS),
        ];
        let mut prev = (0, 0, Duration::ZERO);
        for check in &checks {
            acc.add(check);
            let cur = (acc.up_count(), acc.down_count(), acc.downtime());
            assert!(cur.0 >= prev.0);
            assert!(cur.1 >= prev.1);
            assert!(cur.2 >= prev.2);
            prev = cur;
        }
    }

    #[test]
    fn non_200_status_counts_as_down() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&Check::completed(base, base + 10 * MS, 503));
        assert_eq!(acc.down_count(), 1);
        assert_eq!(acc.last_state(), Some(State::Down));
        assert_eq!(acc.outages(), 1);
    }

    #[test]
    fn summary_reflects_terminal_state() {
        let base = base();
        let mut acc = Accumulator::new();
        acc.add(&up_at(base, 20 * MS));
        acc.add(&down_at(base + 100 * MS));
        acc.add(&up_at(base + 250 * MS, 40 * MS));

        let summary = acc.summary();
        assert_eq!(summary.total_checks, 3);
        assert_eq!(summary.outages, 1);
        assert_eq!(summary.average_load_time, 30 * MS);
        assert_eq!(summary.downtime, 150 * MS);
        assert!(summary.uptime > Duration::ZERO);
    }
}
