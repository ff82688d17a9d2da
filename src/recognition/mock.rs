// SPDX-License-Identifier: GPL-3.0-only

//! Fixed-answer recognition service

use super::{IdVerification, RecognitionService, RecognizedIdentity};
use crate::backends::camera::CameraFrame;
use crate::errors::RecognitionError;
use crate::vitals::{BloodPressure, StressLevel, VitalsReport};
use chrono::NaiveDate;
use tracing::debug;

/// Always recognizes the same patient and reports normal vitals
#[derive(Debug, Clone)]
pub struct MockRecognitionService {
    identity: RecognizedIdentity,
}

impl MockRecognitionService {
    pub fn new() -> Self {
        Self {
            identity: RecognizedIdentity {
                name: "Roni Kennedy".to_string(),
                id: "12345".to_string(),
                last_check_in: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap_or_default(),
            },
        }
    }

    fn check_frame(frame: &CameraFrame) -> Result<(), RecognitionError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(RecognitionError::InvalidFrame(format!(
                "frame from {} has no dimensions",
                frame.source
            )));
        }
        Ok(())
    }
}

impl Default for MockRecognitionService {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionService for MockRecognitionService {
    fn submit(&self, frame: &CameraFrame) -> Result<RecognizedIdentity, RecognitionError> {
        Self::check_frame(frame)?;
        debug!(source = %frame.source, patient = %self.identity.id, "Mock face match");
        Ok(self.identity.clone())
    }

    fn verify_document(
        &self,
        frame: &CameraFrame,
        identity: Option<&RecognizedIdentity>,
    ) -> Result<IdVerification, RecognitionError> {
        Self::check_frame(frame)?;
        let patient_id = identity.unwrap_or(&self.identity).id.clone();
        debug!(source = %frame.source, patient = %patient_id, "Mock ID verification");

        Ok(IdVerification {
            verified: true,
            patient_id,
            verified_at: frame.captured_at,
        })
    }

    fn measure_vitals(&self, frame: &CameraFrame) -> Result<VitalsReport, RecognitionError> {
        Self::check_frame(frame)?;

        Ok(VitalsReport {
            heart_rate: 72,
            blood_pressure: BloodPressure {
                systolic: 120,
                diastolic: 80,
            },
            respiratory_rate: 16,
            stress_level: StressLevel::Low,
            bmi: 24.5,
            oxygen_saturation: 98,
            measured_at: frame.captured_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::CameraFormat;
    use std::sync::Arc;

    fn frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame {
            format: CameraFormat {
                width,
                height,
                pixel_format: "RGB3".to_string(),
            },
            data: Arc::from(Vec::new()),
            source: "test".to_string(),
            captured_at: chrono::Local::now(),
        }
    }

    #[test]
    fn test_mock_identity() {
        let identity = MockRecognitionService::new().submit(&frame(64, 48)).unwrap();
        assert_eq!(identity.name, "Roni Kennedy");
        assert_eq!(identity.id, "12345");
        assert_eq!(identity.last_check_in.to_string(), "2025-02-28");
    }

    #[test]
    fn test_zero_sized_frame_rejected() {
        let service = MockRecognitionService::new();
        assert!(matches!(
            service.submit(&frame(0, 0)),
            Err(RecognitionError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_document_matches_recognized_patient() {
        let service = MockRecognitionService::new();
        let other = RecognizedIdentity {
            name: "Sam Ortiz".to_string(),
            id: "777".to_string(),
            last_check_in: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        };
        let verification = service.verify_document(&frame(64, 48), Some(&other)).unwrap();
        assert!(verification.verified);
        assert_eq!(verification.patient_id, "777");
    }

    #[test]
    fn test_mock_vitals_are_normal() {
        let report = MockRecognitionService::new()
            .measure_vitals(&frame(64, 48))
            .unwrap();
        assert!(report.insights().is_empty());
    }
}
