// SPDX-License-Identifier: GPL-3.0-only

//! Check-in step wizard
//!
//! ```text
//! Home ──Confirm──▶ FaceCheckIn ──Confirm──▶ PatientVerification ──Confirm──▶ VitalsResults
//!      ◀──Back────              ◀──Back────                      ◀──Back────
//! ```
//!
//! [`advance`] is the pure transition function; [`WizardFlow`] wraps it with
//! the current step and the set of steps visited so far. Neither touches the
//! camera: releasing resources on a step change is the job of
//! [`crate::checkin::CheckInSession`].

mod flow;
mod steps;

pub use flow::{NavigationResult, WizardFlow};
pub use steps::{Decision, WizardStep, advance};
