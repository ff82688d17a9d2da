// SPDX-License-Identifier: GPL-3.0-only

//! Stateful navigation over [`WizardStep`]

use super::steps::{Decision, WizardStep, advance};
use std::collections::HashSet;
use tracing::debug;

/// What a navigation request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// Now on a different step
    Moved(WizardStep),
    /// Step unchanged by design (Deny)
    Stayed(WizardStep),
    /// Step unchanged because the move is not possible
    Blocked { reason: String },
}

impl NavigationResult {
    pub fn moved(&self) -> bool {
        matches!(self, NavigationResult::Moved(_))
    }
}

/// Current step plus the steps visited so far
#[derive(Debug, Clone)]
pub struct WizardFlow {
    current: WizardStep,
    visited: HashSet<WizardStep>,
}

impl WizardFlow {
    pub fn new() -> Self {
        Self::starting_at(WizardStep::Home)
    }

    /// Flow entered directly on `step`, e.g. from a route
    pub fn starting_at(step: WizardStep) -> Self {
        Self {
            current: step,
            visited: HashSet::from([step]),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn has_visited(&self, step: WizardStep) -> bool {
        self.visited.contains(&step)
    }

    pub fn can_go_back(&self) -> bool {
        self.current.previous().is_some()
    }

    /// Apply a decision
    pub fn apply(&mut self, decision: Decision) -> NavigationResult {
        let from = self.current;
        let to = advance(from, decision);

        if to != from {
            self.current = to;
            self.visited.insert(to);
            debug!(from = %from.route(), to = %to.route(), ?decision, "Wizard moved");
            return NavigationResult::Moved(to);
        }

        match decision {
            Decision::Deny => NavigationResult::Stayed(from),
            Decision::Confirm => NavigationResult::Blocked {
                reason: "Already at last step".to_string(),
            },
            Decision::Back => NavigationResult::Blocked {
                reason: "Already at first step".to_string(),
            },
        }
    }

    /// Back to Home with an empty history
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for WizardFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flow() {
        let flow = WizardFlow::new();
        assert_eq!(flow.current_step(), WizardStep::Home);
        assert!(!flow.can_go_back());
        assert!(flow.has_visited(WizardStep::Home));
    }

    #[test]
    fn test_next_and_back() {
        let mut flow = WizardFlow::new();
        assert_eq!(
            flow.apply(Decision::Confirm),
            NavigationResult::Moved(WizardStep::FaceCheckIn)
        );
        assert_eq!(
            flow.apply(Decision::Back),
            NavigationResult::Moved(WizardStep::Home)
        );
        assert!(flow.has_visited(WizardStep::FaceCheckIn));
        assert!(!flow.has_visited(WizardStep::PatientVerification));
    }

    #[test]
    fn test_back_at_first_step_blocked() {
        let mut flow = WizardFlow::new();
        assert!(matches!(flow.apply(Decision::Back), NavigationResult::Blocked { .. }));
        assert_eq!(flow.current_step(), WizardStep::Home);
    }

    #[test]
    fn test_confirm_on_last_step_blocked() {
        let mut flow = WizardFlow::starting_at(WizardStep::VitalsResults);
        assert!(matches!(
            flow.apply(Decision::Confirm),
            NavigationResult::Blocked { .. }
        ));
        assert_eq!(flow.current_step(), WizardStep::VitalsResults);
    }

    #[test]
    fn test_deny_stays() {
        let mut flow = WizardFlow::starting_at(WizardStep::FaceCheckIn);
        assert_eq!(
            flow.apply(Decision::Deny),
            NavigationResult::Stayed(WizardStep::FaceCheckIn)
        );
    }

    #[test]
    fn test_reset() {
        let mut flow = WizardFlow::new();
        flow.apply(Decision::Confirm);
        flow.apply(Decision::Confirm);
        flow.reset();
        assert_eq!(flow.current_step(), WizardStep::Home);
        assert!(!flow.has_visited(WizardStep::FaceCheckIn));
    }
}
