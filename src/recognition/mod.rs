// SPDX-License-Identifier: GPL-3.0-only

//! Recognition collaborator contract
//!
//! Face recognition, ID-document verification and vitals measurement are all
//! reached through [`RecognitionService`]. The kiosk ships only
//! [`MockRecognitionService`]; a real backend replaces it behind the same
//! request/response shape.

mod mock;

pub use mock::MockRecognitionService;

use crate::backends::camera::CameraFrame;
use crate::errors::RecognitionError;
use crate::vitals::VitalsReport;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Patient matched by face recognition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedIdentity {
    pub name: String,
    pub id: String,
    pub last_check_in: NaiveDate,
}

/// Outcome of the ID-document check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdVerification {
    pub verified: bool,
    /// Patient the document was matched against
    pub patient_id: String,
    pub verified_at: DateTime<Local>,
}

/// Request/response contract of the recognition backend
pub trait RecognitionService: Send + Sync {
    /// Identify the patient in front of the camera
    fn submit(&self, frame: &CameraFrame) -> Result<RecognizedIdentity, RecognitionError>;

    /// Check the ID document held up to the camera against the recognized patient
    fn verify_document(
        &self,
        frame: &CameraFrame,
        identity: Option<&RecognizedIdentity>,
    ) -> Result<IdVerification, RecognitionError>;

    /// Contactless vitals measurement
    fn measure_vitals(&self, frame: &CameraFrame) -> Result<VitalsReport, RecognitionError>;
}
