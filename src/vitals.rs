// SPDX-License-Identifier: GPL-3.0-only

//! Vitals report and health insights

use crate::constants::NEXT_CHECK_IN_DAYS;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Blood pressure in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    /// The textbook 120/80 reading
    pub const NORMAL: BloodPressure = BloodPressure {
        systolic: 120,
        diastolic: 80,
    };
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StressLevel::Low => write!(f, "Low"),
            StressLevel::Moderate => write!(f, "Moderate"),
            StressLevel::High => write!(f, "High"),
        }
    }
}

/// Result of a vitals scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReport {
    /// Beats per minute
    pub heart_rate: u16,
    pub blood_pressure: BloodPressure,
    /// Breaths per minute
    pub respiratory_rate: u16,
    pub stress_level: StressLevel,
    pub bmi: f32,
    /// SpO2 percentage
    pub oxygen_saturation: u8,
    pub measured_at: DateTime<Local>,
}

impl VitalsReport {
    /// Advisory messages for readings outside the healthy ranges.
    /// Empty when everything is normal.
    pub fn insights(&self) -> Vec<&'static str> {
        let mut insights = Vec::new();

        if !(60..=100).contains(&self.heart_rate) {
            insights.push(
                "Your heart rate is outside the normal range. Consider consulting a healthcare professional.",
            );
        }

        if self.blood_pressure != BloodPressure::NORMAL {
            insights.push("Your blood pressure might need attention. Consult with your doctor.");
        }

        if self.bmi > 25.0 {
            insights.push(
                "Your BMI suggests you might be overweight. Consider discussing a healthy lifestyle plan.",
            );
        } else if self.bmi < 18.5 {
            insights.push("Your BMI suggests you might be underweight. Consult a nutritionist.");
        }

        if self.stress_level == StressLevel::High {
            insights.push(
                "Your stress levels seem elevated. Consider stress management techniques.",
            );
        }

        if self.oxygen_saturation < 95 {
            insights.push(
                "Your oxygen saturation is lower than optimal. This may require medical attention.",
            );
        }

        insights
    }

    /// Summary line shown above the insights
    pub fn summary(&self) -> &'static str {
        if self.insights().is_empty() {
            "Your vitals look great! Keep up the good work."
        } else {
            "Some readings need attention."
        }
    }

    /// Follow-up recommendations
    pub fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();
        if self.insights().is_empty() {
            recommendations.push("Your vital signs are within normal ranges".to_string());
            recommendations.push("Continue with your current exercise routine".to_string());
        }
        recommendations.push("Maintain your hydration levels".to_string());
        recommendations.push(format!(
            "Next recommended check-in: {} days",
            NEXT_CHECK_IN_DAYS
        ));
        recommendations
    }

    /// Date of the next recommended check-in
    pub fn next_check_in(&self) -> chrono::NaiveDate {
        (self.measured_at + chrono::Duration::days(NEXT_CHECK_IN_DAYS)).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normal() -> VitalsReport {
        VitalsReport {
            heart_rate: 72,
            blood_pressure: BloodPressure::NORMAL,
            respiratory_rate: 16,
            stress_level: StressLevel::Low,
            bmi: 24.5,
            oxygen_saturation: 98,
            measured_at: Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_normal_report_has_no_insights() {
        let report = normal();
        assert!(report.insights().is_empty());
        assert_eq!(report.summary(), "Your vitals look great! Keep up the good work.");
        assert_eq!(
            report.recommendations().last().unwrap(),
            "Next recommended check-in: 7 days"
        );
    }

    #[test]
    fn test_each_abnormal_reading_adds_one_insight() {
        let mut report = normal();
        report.heart_rate = 110;
        assert_eq!(report.insights().len(), 1);

        report.blood_pressure = BloodPressure {
            systolic: 140,
            diastolic: 90,
        };
        report.bmi = 17.0;
        report.stress_level = StressLevel::High;
        report.oxygen_saturation = 92;
        assert_eq!(report.insights().len(), 5);
        assert!(report.insights()[2].contains("underweight"));
    }

    #[test]
    fn test_heart_rate_bounds_are_inclusive() {
        let mut report = normal();
        report.heart_rate = 60;
        assert!(report.insights().is_empty());
        report.heart_rate = 100;
        assert!(report.insights().is_empty());
        report.heart_rate = 59;
        assert_eq!(report.insights().len(), 1);
    }

    #[test]
    fn test_next_check_in_is_a_week_later() {
        assert_eq!(normal().next_check_in().to_string(), "2025-03-08");
    }
}
