// SPDX-License-Identifier: GPL-3.0-only

//! One kiosk visit
//!
//! [`CheckInSession`] binds the wizard, the per-screen camera session and the
//! scan simulator to the events the presentation layer emits. Screen policy:
//!
//! | Screen              | Camera acquired | Start runs        | Confirm                 |
//! |---------------------|-----------------|-------------------|-------------------------|
//! | Home                | never           | nothing           | always advances         |
//! | FaceCheckIn         | on Start        | face recognition  | advances once complete  |
//! | PatientVerification | on mount        | ID verification   | advances once complete  |
//! | VitalsResults       | on Start        | vitals            | completes the check-in  |
//!
//! Leaving a screen in either direction releases its camera and discards
//! its scan before the next screen mounts. Once the check-in is complete,
//! Confirm (or Restart from any screen) starts over on Home.

use crate::backends::camera::{
    CameraBackendManager, CameraDevice, CameraFrame, CameraSession, SessionPhase,
};
use crate::config::Config;
use crate::errors::CameraError;
use crate::recognition::{IdVerification, RecognitionService, RecognizedIdentity};
use crate::scan::{ScanKind, ScanOutcome, ScanSimulator, ScanState};
use crate::vitals::VitalsReport;
use crate::wizard::{Decision, NavigationResult, WizardFlow, WizardStep};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Span, debug, info, info_span, warn};
use uuid::Uuid;

/// Inbound events from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Begin the current screen's scan
    Start,
    Confirm,
    Deny,
    Back,
    /// Drop everything collected and go back to Home
    Restart,
    /// One simulation period elapsed
    Tick,
}

/// Controller for a single check-in
pub struct CheckInSession {
    id: Uuid,
    span: Span,
    flow: WizardFlow,
    manager: CameraBackendManager,
    service: Arc<dyn RecognitionService>,
    config: Config,
    camera: CameraSession,
    simulator: Option<ScanSimulator>,
    scan: ScanState,
    notice: Option<String>,
    identity: Option<RecognizedIdentity>,
    verification: Option<IdVerification>,
    vitals: Option<VitalsReport>,
    completed_on: Option<NaiveDate>,
}

impl CheckInSession {
    pub fn new(
        manager: CameraBackendManager,
        service: Arc<dyn RecognitionService>,
        config: Config,
    ) -> Self {
        Self::starting_at(manager, service, config, WizardStep::Home)
    }

    /// Session entered directly on `step`, which is mounted right away
    pub fn starting_at(
        manager: CameraBackendManager,
        service: Arc<dyn RecognitionService>,
        config: Config,
        step: WizardStep,
    ) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("checkin", session = %id);
        span.in_scope(|| {
            info!(backend = %manager.backend_type(), step = %step.route(), "Check-in session started")
        });

        let mut session = Self {
            id,
            span,
            flow: WizardFlow::starting_at(step),
            manager,
            service,
            config,
            camera: CameraSession::new(),
            simulator: None,
            scan: ScanState::Idle,
            notice: None,
            identity: None,
            verification: None,
            vitals: None,
            completed_on: None,
        };

        session.span.clone().in_scope(|| session.mount_screen(step));
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> WizardStep {
        self.flow.current_step()
    }

    pub fn flow(&self) -> &WizardFlow {
        &self.flow
    }

    pub fn scan(&self) -> &ScanState {
        &self.scan
    }

    /// User-visible message about the last failure on this screen
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn camera_phase(&self) -> SessionPhase {
        self.camera.phase()
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_acquired()
    }

    pub fn camera_device(&self) -> Option<&CameraDevice> {
        self.camera.device()
    }

    pub fn identity(&self) -> Option<&RecognizedIdentity> {
        self.identity.as_ref()
    }

    pub fn verification(&self) -> Option<&IdVerification> {
        self.verification.as_ref()
    }

    pub fn vitals(&self) -> Option<&VitalsReport> {
        self.vitals.as_ref()
    }

    /// Date the check-in was completed, once it has been
    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completed_on
    }

    pub fn is_complete(&self) -> bool {
        self.completed_on.is_some()
    }

    /// Whether Confirm would do anything right now
    pub fn can_confirm(&self) -> bool {
        let step = self.step();
        if step.is_first() || self.is_complete() {
            return true;
        }
        self.scan.is_complete()
    }

    /// Delay until the next Tick is due, or `None` when no scan is running.
    /// The first tick of a run also waits out the profile's warm-up.
    pub fn next_tick_delay(&self) -> Option<Duration> {
        let simulator = self.simulator.as_ref()?;
        let profile = simulator.profile();
        if simulator.progress() == 0 {
            Some(profile.warmup.saturating_add(profile.period))
        } else {
            Some(profile.period)
        }
    }

    /// Apply one event
    pub fn handle(&mut self, event: SessionEvent) {
        let span = self.span.clone();
        let _enter = span.enter();

        match event {
            SessionEvent::Start => self.start_scan(),
            SessionEvent::Tick => self.tick(),
            SessionEvent::Deny => self.deny(),
            SessionEvent::Confirm => self.confirm(),
            SessionEvent::Back => self.back(),
            SessionEvent::Restart => self.restart(),
        }
    }

    fn start_scan(&mut self) {
        let kind = match self.step() {
            WizardStep::Home => return,
            WizardStep::FaceCheckIn => ScanKind::Face,
            WizardStep::PatientVerification => ScanKind::IdDocument,
            WizardStep::VitalsResults => ScanKind::Vitals,
        };

        if !self.scan.is_idle() {
            debug!(%kind, "Scan already started, ignoring Start");
            return;
        }

        let preferred = self.config.camera_path.clone();
        if let Err(err) = self.camera.acquire(&self.manager, preferred.as_deref()) {
            self.show_camera_error(&err);
            return;
        }

        let frame = match self.capture() {
            Ok(frame) => frame,
            Err(err) => {
                self.show_camera_error(&err);
                return;
            }
        };

        let outcome = match kind {
            ScanKind::Face => self.service.submit(&frame).map(ScanOutcome::Identity),
            ScanKind::IdDocument => self
                .service
                .verify_document(&frame, self.identity.as_ref())
                .map(ScanOutcome::Document),
            ScanKind::Vitals => self.service.measure_vitals(&frame).map(ScanOutcome::Vitals),
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%kind, error = %err, "Recognition request failed");
                self.notice = Some(err.user_message().to_string());
                return;
            }
        };

        let simulator = ScanSimulator::start(self.config.scan_profile(kind), outcome);
        self.scan = simulator.state();
        self.simulator = Some(simulator);
        self.notice = None;
    }

    fn capture(&mut self) -> Result<CameraFrame, CameraError> {
        let handle = self
            .camera
            .handle_mut()
            .ok_or_else(|| CameraError::DeviceUnavailable("camera not held".to_string()))?;
        Ok(handle.capture_frame()?)
    }

    fn tick(&mut self) {
        let Some(simulator) = self.simulator.as_mut() else {
            return;
        };

        match simulator.next() {
            Some(state) => {
                if let ScanState::Complete { outcome, .. } = &state {
                    self.record(outcome.clone());
                    self.simulator = None;
                }
                self.scan = state;
            }
            None => self.simulator = None,
        }
    }

    fn record(&mut self, outcome: ScanOutcome) {
        info!(kind = %outcome.kind(), "Scan complete");
        match outcome {
            ScanOutcome::Identity(identity) => self.identity = Some(identity),
            ScanOutcome::Document(verification) => self.verification = Some(verification),
            ScanOutcome::Vitals(report) => self.vitals = Some(report),
        }
    }

    /// Reject the result or cancel the running scan. The camera stays held
    /// so Start can run again right away.
    fn deny(&mut self) {
        if self.step().is_first() || self.is_complete() {
            return;
        }
        if let NavigationResult::Stayed(step) = self.flow.apply(Decision::Deny) {
            debug!(step = %step.route(), "Scan reset");
        }
        self.clear_scan();
        self.notice = None;
        self.clear_result(self.step());
    }

    fn confirm(&mut self) {
        if !self.can_confirm() {
            debug!(step = %self.step().route(), "Confirm ignored");
            return;
        }
        if self.is_complete() {
            self.restart();
        } else if self.step().is_last() {
            self.complete();
        } else {
            self.navigate(Decision::Confirm);
        }
    }

    /// Stamp today's visit on the recognized patient
    fn complete(&mut self) {
        let today = Local::now().date_naive();
        match self.identity.as_mut() {
            Some(identity) => {
                identity.last_check_in = today;
                info!(patient = %identity.id, date = %today, "Check-in complete");
            }
            None => warn!(date = %today, "Check-in completed without a recognized patient"),
        }
        self.completed_on = Some(today);
        self.camera.unmount();
    }

    fn restart(&mut self) {
        let from = self.step();
        if from.is_first() {
            return;
        }

        self.leave_screen(from);
        self.identity = None;
        self.verification = None;
        self.vitals = None;
        self.completed_on = None;
        self.flow.reset();
        info!(from = %from.route(), "Check-in restarted");
        self.mount_screen(self.step());
    }

    fn back(&mut self) {
        self.navigate(Decision::Back);
    }

    fn navigate(&mut self, decision: Decision) {
        let from = self.step();
        if !self.flow.apply(decision).moved() {
            return;
        }

        self.leave_screen(from);
        self.mount_screen(self.step());
    }

    fn leave_screen(&mut self, step: WizardStep) {
        self.clear_scan();
        self.notice = None;
        self.camera.unmount();
        debug!(step = %step.route(), "Screen left");
    }

    fn mount_screen(&mut self, step: WizardStep) {
        info!(step = %step.route(), "Screen mounted");
        self.clear_result(step);

        if step.acquires_on_mount() {
            let preferred = self.config.camera_path.clone();
            if let Err(err) = self.camera.acquire(&self.manager, preferred.as_deref()) {
                self.show_camera_error(&err);
            }
        }
    }

    fn clear_scan(&mut self) {
        self.simulator = None;
        self.scan = ScanState::Idle;
    }

    // A screen's own result only survives while its scan does
    fn clear_result(&mut self, step: WizardStep) {
        match step {
            WizardStep::Home => {}
            WizardStep::FaceCheckIn => self.identity = None,
            WizardStep::PatientVerification => self.verification = None,
            WizardStep::VitalsResults => {
                self.vitals = None;
                self.completed_on = None;
            }
        }
    }

    fn show_camera_error(&mut self, err: &CameraError) {
        warn!(step = %self.step().route(), error = %err, "Camera acquisition failed");
        self.notice = Some(err.user_message().to_string());
    }
}

impl Drop for CheckInSession {
    fn drop(&mut self) {
        let _enter = self.span.enter();
        self.simulator = None;
        self.camera.unmount();
        info!("Check-in session ended");
    }
}

impl std::fmt::Debug for CheckInSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInSession")
            .field("id", &self.id)
            .field("step", &self.step())
            .field("scan", &self.scan)
            .field("camera", &self.camera.phase())
            .finish()
    }
}
