// SPDX-License-Identifier: GPL-3.0-only

//! Scan profiles: pacing and status-message tables

use super::ScanKind;
use crate::constants::{increments, timing};
use std::time::Duration;

/// Status messages of the face scan, keyed by the progress they start at
const FACE_STAGES: &[(u8, &str)] = &[
    (0, "Initializing camera..."),
    (20, "Detecting faces..."),
    (40, "Analyzing facial features..."),
    (60, "Matching with database..."),
    (80, "Verifying identity..."),
];

const ID_STAGES: &[(u8, &str)] = &[
    (0, "Scanning ID..."),
    (20, "Detecting ID document..."),
    (40, "Reading information..."),
    (60, "Verifying ID details..."),
    (80, "Matching with facial data..."),
];

const VITALS_STAGES: &[(u8, &str)] = &[
    (0, "Initializing scan and calibrating sensors..."),
    (30, "Analyzing facial blood flow patterns..."),
    (60, "Processing vital signs data..."),
    (90, "Finalizing results and generating report..."),
];

/// How one kind of scan advances and what it says along the way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProfile {
    pub kind: ScanKind,
    /// Progress added per tick
    pub increment: u8,
    /// Time between ticks when paced
    pub period: Duration,
    /// Delay before the first tick when paced
    pub warmup: Duration,
    /// (threshold, message) pairs in ascending threshold order, first at 0
    pub stages: &'static [(u8, &'static str)],
    pub complete_message: &'static str,
}

impl ScanProfile {
    pub const FACE: ScanProfile = ScanProfile {
        kind: ScanKind::Face,
        increment: increments::FACE,
        period: timing::SCAN_TICK,
        warmup: timing::CAMERA_WARMUP,
        stages: FACE_STAGES,
        complete_message: "Recognition complete!",
    };

    pub const ID_DOCUMENT: ScanProfile = ScanProfile {
        kind: ScanKind::IdDocument,
        increment: increments::ID_DOCUMENT,
        period: timing::SCAN_TICK,
        warmup: Duration::ZERO,
        stages: ID_STAGES,
        complete_message: "Verification complete!",
    };

    pub const VITALS: ScanProfile = ScanProfile {
        kind: ScanKind::Vitals,
        increment: increments::VITALS,
        period: timing::VITALS_TICK,
        warmup: Duration::ZERO,
        stages: VITALS_STAGES,
        complete_message: "Scan completed successfully!",
    };

    pub fn for_kind(kind: ScanKind) -> ScanProfile {
        match kind {
            ScanKind::Face => Self::FACE,
            ScanKind::IdDocument => Self::ID_DOCUMENT,
            ScanKind::Vitals => Self::VITALS,
        }
    }

    /// Message for a progress value: the stage with the largest threshold
    /// not above `progress`, or the completion message at 100.
    pub fn message_for(&self, progress: u8) -> &'static str {
        if progress >= 100 {
            return self.complete_message;
        }

        self.stages
            .iter()
            .rev()
            .find(|(threshold, _)| *threshold <= progress)
            .map(|(_, message)| *message)
            .unwrap_or("")
    }

    /// Number of ticks from 0 to completion
    pub fn total_ticks(&self) -> u32 {
        100u32.div_ceil(self.increment.max(1) as u32)
    }

    /// Wall-clock length of a paced run, warm-up included
    pub fn duration(&self) -> Duration {
        self.warmup
            .saturating_add(self.period.saturating_mul(self.total_ticks()))
    }

    /// Same profile with every delay multiplied by `factor`. Delays that
    /// would not fit in a [`Duration`] are left as they were.
    pub fn scaled(mut self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        if factor == 1.0 {
            return self;
        }
        let scale = |delay: Duration| {
            Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
        };
        self.period = scale(self.period);
        self.warmup = scale(self.warmup);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_table_lookup() {
        let face = ScanProfile::FACE;
        assert_eq!(face.message_for(0), "Initializing camera...");
        assert_eq!(face.message_for(18), "Initializing camera...");
        assert_eq!(face.message_for(20), "Detecting faces...");
        assert_eq!(face.message_for(58), "Analyzing facial features...");
        assert_eq!(face.message_for(98), "Verifying identity...");
        assert_eq!(face.message_for(100), "Recognition complete!");
    }

    #[test]
    fn test_scaled_overflow_keeps_delays() {
        let scaled = ScanProfile::FACE.scaled(1e30);
        assert_eq!(scaled.period, ScanProfile::FACE.period);
        assert_eq!(scaled.warmup, ScanProfile::FACE.warmup);
        assert_eq!(ScanProfile::FACE.scaled(0.0).duration(), Duration::ZERO);
    }

    #[test]
    fn test_vitals_thresholds() {
        let vitals = ScanProfile::VITALS;
        assert_eq!(vitals.message_for(29), "Initializing scan and calibrating sensors...");
        assert_eq!(vitals.message_for(30), "Analyzing facial blood flow patterns...");
        assert_eq!(vitals.message_for(90), "Finalizing results and generating report...");
    }

    #[test]
    fn test_stage_tables_start_at_zero_and_ascend() {
        for kind in ScanKind::ALL {
            let profile = ScanProfile::for_kind(kind);
            assert_eq!(profile.stages[0].0, 0);
            assert!(profile.stages.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn test_durations() {
        assert_eq!(ScanProfile::FACE.total_ticks(), 50);
        assert_eq!(ScanProfile::FACE.duration(), Duration::from_secs(6));
        assert_eq!(ScanProfile::ID_DOCUMENT.duration(), Duration::from_secs(2));
        assert_eq!(ScanProfile::VITALS.duration(), Duration::from_secs(5));
        assert_eq!(
            ScanProfile::FACE.scaled(0.5).duration(),
            Duration::from_secs(3)
        );
    }
}
