// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use opticheck::constants::{APP_NAME, app_info, backdrop, increments, timing};
use std::time::Duration;

#[test]
fn test_scan_periods() {
    assert_eq!(timing::SCAN_TICK, Duration::from_millis(100));
    assert_eq!(timing::VITALS_TICK, Duration::from_millis(50));
    assert!(timing::UI_POLL < timing::VITALS_TICK, "UI must redraw faster than scans tick");
}

#[test]
fn test_increments_divide_one_hundred() {
    for inc in [increments::FACE, increments::ID_DOCUMENT, increments::VITALS] {
        assert_eq!(100 % inc, 0, "Increment {} should land exactly on 100", inc);
    }
}

#[test]
fn test_backdrop_counts() {
    assert_eq!(backdrop::PARTICLE_COUNT, 50);
    assert_eq!(backdrop::ORB_COUNT, 8);
}

#[test]
fn test_version_is_set() {
    assert!(!app_info::version().is_empty());
    assert_eq!(APP_NAME, "OptiCheck");
}
