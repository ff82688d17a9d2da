// SPDX-License-Identifier: GPL-3.0-only

//! Scan simulation
//!
//! Face recognition, ID verification and vitals measurement all present the
//! same way on screen: a progress bar that fills on a fixed period while a
//! status line walks through a fixed table, ending in a result. A
//! [`ScanSimulator`] produces that sequence either as a plain iterator (one
//! item per tick, no clock involved) or as a paced async stream.

mod profile;
mod simulator;

pub use profile::ScanProfile;
pub use simulator::ScanSimulator;

use crate::recognition::{IdVerification, RecognizedIdentity};
use crate::vitals::VitalsReport;
use std::str::FromStr;

/// Which scan a screen runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    Face,
    IdDocument,
    Vitals,
}

impl ScanKind {
    pub const ALL: [ScanKind; 3] = [ScanKind::Face, ScanKind::IdDocument, ScanKind::Vitals];
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanKind::Face => write!(f, "face"),
            ScanKind::IdDocument => write!(f, "id"),
            ScanKind::Vitals => write!(f, "vitals"),
        }
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "face" => Ok(ScanKind::Face),
            "id" | "document" => Ok(ScanKind::IdDocument),
            "vitals" => Ok(ScanKind::Vitals),
            other => Err(format!("unknown scan '{}' (expected face, id or vitals)", other)),
        }
    }
}

/// Result carried by a completed scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Identity(RecognizedIdentity),
    Document(IdVerification),
    Vitals(VitalsReport),
}

impl ScanOutcome {
    pub fn kind(&self) -> ScanKind {
        match self {
            ScanOutcome::Identity(_) => ScanKind::Face,
            ScanOutcome::Document(_) => ScanKind::IdDocument,
            ScanOutcome::Vitals(_) => ScanKind::Vitals,
        }
    }
}

/// What a screen shows about its scan
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Running {
        progress: u8,
        message: &'static str,
    },
    Complete {
        outcome: ScanOutcome,
        message: &'static str,
    },
}

impl ScanState {
    /// Progress in percent; 0 when idle, 100 once complete
    pub fn progress(&self) -> u8 {
        match self {
            ScanState::Idle => 0,
            ScanState::Running { progress, .. } => *progress,
            ScanState::Complete { .. } => 100,
        }
    }

    /// Status line; empty when idle
    pub fn message(&self) -> &'static str {
        match self {
            ScanState::Idle => "",
            ScanState::Running { message, .. } | ScanState::Complete { message, .. } => message,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ScanState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ScanState::Running { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ScanState::Complete { .. })
    }

    pub fn outcome(&self) -> Option<&ScanOutcome> {
        match self {
            ScanState::Complete { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_reports_zero_and_empty() {
        let state = ScanState::default();
        assert_eq!(state.progress(), 0);
        assert_eq!(state.message(), "");
        assert!(state.outcome().is_none());
    }

    #[test]
    fn test_scan_kind_parsing() {
        assert_eq!("face".parse::<ScanKind>(), Ok(ScanKind::Face));
        assert_eq!("ID".parse::<ScanKind>(), Ok(ScanKind::IdDocument));
        assert!("retina".parse::<ScanKind>().is_err());
    }
}
