// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Product name shown on the home screen
pub const APP_NAME: &str = "OptiCheck";

/// Tagline under the product name
pub const TAGLINE: &str = "Facial Recognition Health Monitoring";

/// Scan pacing
pub mod timing {
    use super::Duration;

    /// Period between progress updates for face and ID scans
    pub const SCAN_TICK: Duration = Duration::from_millis(100);

    /// Period between progress updates for the vitals scan
    pub const VITALS_TICK: Duration = Duration::from_millis(50);

    /// Delay between camera acquisition and the first face scan update
    pub const CAMERA_WARMUP: Duration = Duration::from_millis(1000);

    /// Largest accepted `scan_speed` multiplier
    pub const MAX_SCAN_SPEED: f64 = 100.0;

    /// Input poll timeout of the terminal kiosk (~60 redraws per second)
    pub const UI_POLL: Duration = Duration::from_millis(16);
}

/// Progress increments per tick
pub mod increments {
    pub const FACE: u8 = 2;
    pub const ID_DOCUMENT: u8 = 5;
    pub const VITALS: u8 = 1;
}

/// Decorative backdrop parameters
pub mod backdrop {
    pub const PARTICLE_COUNT: usize = 50;
    pub const ORB_COUNT: usize = 8;

    pub const PARTICLE_SIZE: (f32, f32) = (5.0, 25.0);
    pub const PARTICLE_OPACITY: (f32, f32) = (0.1, 0.4);
    pub const PARTICLE_PERIOD_SECS: (f32, f32) = (20.0, 50.0);
    pub const PARTICLE_DELAY_SECS: (f32, f32) = (0.0, 5.0);

    pub const ORB_SIZE: (f32, f32) = (30.0, 90.0);
    pub const ORB_HUE: (f32, f32) = (0.0, 360.0);
    pub const ORB_GLOW: (f32, f32) = (10.0, 30.0);

    /// Particle palette (RGB), picked by index modulo its length
    pub const PALETTE: [(u8, u8, u8); 3] = [(111, 226, 204), (224, 243, 216), (60, 123, 158)];
}

/// Vitals follow-up
pub const NEXT_CHECK_IN_DAYS: i64 = 7;

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Name of the config/cache directory under the platform directories
    pub const DIR_NAME: &str = "opticheck";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments_reach_exactly_one_hundred() {
        for inc in [increments::FACE, increments::ID_DOCUMENT, increments::VITALS] {
            assert_eq!(100 % inc, 0, "increment {} does not land on 100", inc);
        }
    }

    #[test]
    fn test_backdrop_ranges_are_ordered() {
        for (lo, hi) in [
            backdrop::PARTICLE_SIZE,
            backdrop::PARTICLE_OPACITY,
            backdrop::PARTICLE_PERIOD_SECS,
            backdrop::PARTICLE_DELAY_SECS,
            backdrop::ORB_SIZE,
            backdrop::ORB_HUE,
            backdrop::ORB_GLOW,
        ] {
            assert!(lo < hi);
        }
    }
}
