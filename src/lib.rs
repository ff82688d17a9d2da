// SPDX-License-Identifier: MPL-2.0

//! OptiCheck - a contactless check-in kiosk for clinics
//!
//! This library provides the check-in flow behind the `opticheck` kiosk:
//! camera acquisition, simulated recognition scans, and the step wizard
//! that ties them together.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Camera backend abstraction (V4L2 and virtual) with scoped acquisition
//! - [`scan`]: Scan profiles and the progress simulator
//! - [`wizard`]: Check-in steps and navigation
//! - [`checkin`]: The per-visit controller binding the above to user events
//! - [`recognition`]: Recognition service contract and its mock
//! - [`vitals`]: Vitals report and health insights
//! - [`config`]: User configuration handling
//! - [`terminal`]: Full-screen terminal kiosk
//!
//! # Example
//!
//! ```no_run
//! use opticheck::backends::camera::{CameraBackendManager, CameraBackendType};
//! use opticheck::checkin::{CheckInSession, SessionEvent};
//! use opticheck::recognition::MockRecognitionService;
//! use opticheck::Config;
//! use std::sync::Arc;
//!
//! let manager = CameraBackendManager::new(CameraBackendType::Virtual);
//! let mut session = CheckInSession::new(
//!     manager,
//!     Arc::new(MockRecognitionService::new()),
//!     Config::default(),
//! );
//! session.handle(SessionEvent::Confirm);
//! session.handle(SessionEvent::Start);
//! ```

pub mod backdrop;
pub mod backends;
pub mod checkin;
pub mod config;
pub mod constants;
pub mod errors;
pub mod recognition;
pub mod scan;
pub mod terminal;
pub mod vitals;
pub mod wizard;

// Re-export commonly used types
pub use checkin::{CheckInSession, SessionEvent};
pub use config::Config;
pub use errors::{AppError, AppResult, CameraError};
pub use scan::{ScanKind, ScanState};
pub use wizard::WizardStep;
