// SPDX-License-Identifier: GPL-3.0-only

//! Wizard steps and the transition function

/// One screen of the check-in flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WizardStep {
    /// Welcome screen
    #[default]
    Home,
    /// Face recognition scan
    FaceCheckIn,
    /// ID document check against the recognized patient
    PatientVerification,
    /// Contactless vitals and health insights
    VitalsResults,
}

impl WizardStep {
    /// All steps in flow order
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Home,
        WizardStep::FaceCheckIn,
        WizardStep::PatientVerification,
        WizardStep::VitalsResults,
    ];

    /// Path identifier of the screen
    pub fn route(&self) -> &'static str {
        match self {
            WizardStep::Home => "/",
            WizardStep::FaceCheckIn => "/cvcheckin",
            WizardStep::PatientVerification => "/patientverification",
            WizardStep::VitalsResults => "/vitalsresults",
        }
    }

    /// Resolve a path identifier; a trailing slash is ignored
    pub fn from_route(route: &str) -> Option<WizardStep> {
        let trimmed = route.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|step| step.route() == normalized)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Home => "Welcome to OptiCheck",
            WizardStep::FaceCheckIn => "Face Check-In",
            WizardStep::PatientVerification => "Patient Verification",
            WizardStep::VitalsResults => "Vitals Results",
        }
    }

    /// Short instruction shown under the title
    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::Home => "Contactless check-in in under a minute. Press Enter to begin.",
            WizardStep::FaceCheckIn => "Look at the camera and press Start to be recognized.",
            WizardStep::PatientVerification => "Hold your ID document up to the camera.",
            WizardStep::VitalsResults => "Stay still while we measure your vital signs.",
        }
    }

    /// 1-based position in the flow
    pub fn number(&self) -> usize {
        match self {
            WizardStep::Home => 1,
            WizardStep::FaceCheckIn => 2,
            WizardStep::PatientVerification => 3,
            WizardStep::VitalsResults => 4,
        }
    }

    pub fn total_steps() -> usize {
        Self::ALL.len()
    }

    pub fn is_first(&self) -> bool {
        matches!(self, WizardStep::Home)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, WizardStep::VitalsResults)
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Home => Some(WizardStep::FaceCheckIn),
            WizardStep::FaceCheckIn => Some(WizardStep::PatientVerification),
            WizardStep::PatientVerification => Some(WizardStep::VitalsResults),
            WizardStep::VitalsResults => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Home => None,
            WizardStep::FaceCheckIn => Some(WizardStep::Home),
            WizardStep::PatientVerification => Some(WizardStep::FaceCheckIn),
            WizardStep::VitalsResults => Some(WizardStep::PatientVerification),
        }
    }

    /// Whether the screen holds the camera from the moment it mounts,
    /// rather than on Start
    pub fn acquires_on_mount(&self) -> bool {
        matches!(self, WizardStep::PatientVerification)
    }

    /// Whether the screen uses the camera at all
    pub fn uses_camera(&self) -> bool {
        !matches!(self, WizardStep::Home)
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// User decision fed to the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Deny,
    Back,
}

/// Step after applying `decision` to `current`.
///
/// Confirm moves one step forward, Back one step backward, Deny stays. A
/// move past either end leaves the step unchanged.
pub fn advance(current: WizardStep, decision: Decision) -> WizardStep {
    match decision {
        Decision::Confirm => current.next().unwrap_or(current),
        Decision::Back => current.previous().unwrap_or(current),
        Decision::Deny => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain() {
        let mut step = WizardStep::Home;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            step = next;
            visited.push(step);
        }
        assert_eq!(visited, WizardStep::ALL.to_vec());
    }

    #[test]
    fn test_advance_boundaries_are_noops() {
        assert_eq!(advance(WizardStep::Home, Decision::Back), WizardStep::Home);
        assert_eq!(
            advance(WizardStep::VitalsResults, Decision::Confirm),
            WizardStep::VitalsResults
        );
    }

    #[test]
    fn test_deny_keeps_step() {
        for step in WizardStep::ALL {
            assert_eq!(advance(step, Decision::Deny), step);
        }
    }

    #[test]
    fn test_never_moves_more_than_one_step() {
        for step in WizardStep::ALL {
            for decision in [Decision::Confirm, Decision::Deny, Decision::Back] {
                let next = advance(step, decision);
                let delta = next.number() as isize - step.number() as isize;
                assert!(delta.abs() <= 1, "{step:?} {decision:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn test_routes_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_route(step.route()), Some(step));
        }
        assert_eq!(
            WizardStep::from_route("/cvcheckin/"),
            Some(WizardStep::FaceCheckIn)
        );
        assert_eq!(WizardStep::from_route("/admin"), None);
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(WizardStep::Home.number(), 1);
        assert_eq!(WizardStep::VitalsResults.number(), 4);
        assert_eq!(WizardStep::total_steps(), 4);
    }
}
