// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic progress simulation

use super::{ScanOutcome, ScanProfile, ScanState};
use futures::Stream;
use tracing::debug;

/// Walks a scan from 0% to completion.
///
/// Each call to [`Iterator::next`] is one tick. Progress never exceeds 100
/// and the iterator ends right after yielding the `Complete` state, so a
/// simulator always stops by itself.
#[derive(Debug, Clone)]
pub struct ScanSimulator {
    profile: ScanProfile,
    progress: u8,
    outcome: ScanOutcome,
    finished: bool,
}

impl ScanSimulator {
    /// Start a run at 0% that ends in `outcome`
    pub fn start(profile: ScanProfile, outcome: ScanOutcome) -> Self {
        debug!(kind = %profile.kind, ticks = profile.total_ticks(), "Scan started");
        Self {
            profile,
            progress: 0,
            outcome,
            finished: false,
        }
    }

    pub fn profile(&self) -> &ScanProfile {
        &self.profile
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// State as of the last tick
    pub fn state(&self) -> ScanState {
        if self.progress >= 100 {
            ScanState::Complete {
                outcome: self.outcome.clone(),
                message: self.profile.complete_message,
            }
        } else {
            ScanState::Running {
                progress: self.progress,
                message: self.profile.message_for(self.progress),
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Tick on the profile's clock.
    ///
    /// Yields the initial 0% state right away, waits out the warm-up, then
    /// yields one state per period until the scan completes. Dropping the
    /// stream cancels the run.
    pub fn paced(self) -> impl Stream<Item = ScanState> + Send + 'static {
        let mut simulator = self;
        async_stream::stream! {
            yield simulator.state();

            let warmup = simulator.profile.warmup;
            if !warmup.is_zero() {
                tokio::time::sleep(warmup).await;
            }

            let period = simulator.profile.period;
            if period.is_zero() {
                for state in simulator.by_ref() {
                    yield state;
                }
            } else {
                let mut interval = tokio::time::interval(period);
                // First tick completes immediately
                interval.tick().await;
                loop {
                    interval.tick().await;
                    match simulator.next() {
                        Some(state) => yield state,
                        None => break,
                    }
                }
            }
        }
    }
}

impl Iterator for ScanSimulator {
    type Item = ScanState;

    fn next(&mut self) -> Option<ScanState> {
        if self.finished {
            return None;
        }

        self.progress = self.progress.saturating_add(self.profile.increment).min(100);
        if self.progress >= 100 {
            self.finished = true;
            debug!(kind = %self.profile.kind, "Scan complete");
        }
        Some(self.state())
    }
}
