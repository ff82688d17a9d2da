// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the check-in flow

use opticheck::backends::camera::{
    CameraBackendManager, SessionPhase, VirtualBackend, VirtualFault,
};
use opticheck::recognition::MockRecognitionService;
use opticheck::{CheckInSession, Config, ScanState, SessionEvent, WizardStep};
use std::sync::Arc;

fn session_with(backend: VirtualBackend) -> (CheckInSession, CameraBackendManager) {
    let manager = CameraBackendManager::with_backend(Box::new(backend));
    let session = CheckInSession::new(
        manager.clone(),
        Arc::new(MockRecognitionService::new()),
        Config::default(),
    );
    (session, manager)
}

fn finish_scan(session: &mut CheckInSession) {
    while session.next_tick_delay().is_some() {
        session.handle(SessionEvent::Tick);
    }
}

#[test]
fn test_ten_ticks_detect_faces() {
    let (mut session, _manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    assert_eq!(session.scan().progress(), 0);

    for _ in 0..10 {
        session.handle(SessionEvent::Tick);
    }

    assert_eq!(session.scan().progress(), 20);
    assert_eq!(session.scan().message(), "Detecting faces...");
}

#[test]
fn test_deny_while_running_resets_scan() {
    let (mut session, manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    for _ in 0..7 {
        session.handle(SessionEvent::Tick);
    }

    session.handle(SessionEvent::Deny);

    assert_eq!(session.step(), WizardStep::FaceCheckIn);
    assert_eq!(*session.scan(), ScanState::Idle);
    assert_eq!(session.scan().progress(), 0);
    assert_eq!(session.scan().message(), "");
    // Camera stays with the screen; no restart until Start
    assert!(manager.is_held());
    assert_eq!(session.next_tick_delay(), None);
}

#[test]
fn test_deny_on_recognized_identity_allows_retry() {
    let (mut session, _manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    finish_scan(&mut session);
    assert!(session.identity().is_some());

    session.handle(SessionEvent::Deny);
    assert!(session.identity().is_none());
    assert!(session.scan().is_idle());

    session.handle(SessionEvent::Start);
    assert!(session.scan().is_running());
}

#[test]
fn test_denied_camera_shows_device_unavailable() {
    let (mut session, manager) =
        session_with(VirtualBackend::with_fault(VirtualFault::PermissionDenied));
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);

    assert_eq!(session.step(), WizardStep::FaceCheckIn);
    assert_eq!(
        session.notice(),
        Some("Error: Cannot access camera. Please check permissions.")
    );
    assert!(!session.has_camera());
    assert!(!manager.is_held());
    assert_eq!(session.camera_phase(), SessionPhase::Released);
    assert!(session.scan().is_idle());
}

#[test]
fn test_no_cameras_shows_device_unavailable() {
    let (mut session, _manager) = session_with(VirtualBackend::empty());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    assert_eq!(
        session.notice(),
        Some("Error: Cannot access camera. Please check permissions.")
    );
}

#[test]
fn test_confirm_on_complete_face_advances_exactly_once() {
    let (mut session, _manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    finish_scan(&mut session);
    assert!(session.scan().is_complete());

    session.handle(SessionEvent::Confirm);
    assert_eq!(session.step(), WizardStep::PatientVerification);

    // Fresh screen, fresh scan: a second Confirm does nothing
    session.handle(SessionEvent::Confirm);
    assert_eq!(session.step(), WizardStep::PatientVerification);
}

#[test]
fn test_full_check_in() {
    let backend = VirtualBackend::new();
    let open = backend.open_streams();
    let (mut session, manager) = session_with(backend);

    let mut visited = vec![session.step()];
    session.handle(SessionEvent::Confirm);
    visited.push(session.step());

    for _ in 0..2 {
        session.handle(SessionEvent::Start);
        finish_scan(&mut session);
        session.handle(SessionEvent::Confirm);
        visited.push(session.step());
    }

    session.handle(SessionEvent::Start);
    finish_scan(&mut session);

    assert_eq!(visited, WizardStep::ALL.to_vec());
    assert_eq!(session.identity().map(|i| i.name.as_str()), Some("Roni Kennedy"));
    assert_eq!(
        session.verification().map(|v| v.patient_id.as_str()),
        Some("12345")
    );
    let report = session.vitals().expect("vitals after scan");
    assert!(report.insights().is_empty());

    // At most one device open at any time, none after the visit
    assert!(open.load(std::sync::atomic::Ordering::SeqCst) <= 1);
    drop(session);
    assert!(!manager.is_held());
    assert_eq!(open.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_back_from_verification_releases_and_resets() {
    let (mut session, manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    finish_scan(&mut session);
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    session.handle(SessionEvent::Tick);
    assert!(manager.is_held());

    session.handle(SessionEvent::Back);

    assert_eq!(session.step(), WizardStep::FaceCheckIn);
    assert!(session.scan().is_idle());
    assert!(!manager.is_held());
    assert_eq!(session.camera_phase(), SessionPhase::Unmounted);
    assert!(session.identity().is_none());
}

#[test]
fn test_back_from_home_is_noop() {
    let (mut session, _manager) = session_with(VirtualBackend::new());
    session.handle(SessionEvent::Back);
    session.handle(SessionEvent::Deny);
    session.handle(SessionEvent::Tick);
    assert_eq!(session.step(), WizardStep::Home);
}

#[test]
fn test_second_kiosk_cannot_take_held_camera() {
    let (mut first, manager) = session_with(VirtualBackend::new());
    let mut second = CheckInSession::new(
        manager.clone(),
        Arc::new(MockRecognitionService::new()),
        Config::default(),
    );

    first.handle(SessionEvent::Confirm);
    first.handle(SessionEvent::Start);
    second.handle(SessionEvent::Confirm);
    second.handle(SessionEvent::Start);

    assert!(first.has_camera());
    assert!(!second.has_camera());
    assert!(second.notice().is_some());
}

fn reach_vitals(session: &mut CheckInSession) {
    session.handle(SessionEvent::Confirm);
    for _ in 0..2 {
        session.handle(SessionEvent::Start);
        finish_scan(session);
        session.handle(SessionEvent::Confirm);
    }
    session.handle(SessionEvent::Start);
    finish_scan(session);
}

#[test]
fn test_complete_check_in_stamps_today() {
    let (mut session, manager) = session_with(VirtualBackend::new());
    reach_vitals(&mut session);
    assert_eq!(
        session.identity().map(|i| i.last_check_in.to_string()),
        Some("2025-02-28".to_string())
    );
    assert!(!session.is_complete());

    session.handle(SessionEvent::Confirm);

    let today = chrono::Local::now().date_naive();
    assert_eq!(session.step(), WizardStep::VitalsResults);
    assert_eq!(session.completed_on(), Some(today));
    assert_eq!(session.identity().map(|i| i.last_check_in), Some(today));
    assert!(!manager.is_held());

    // Results are final once submitted
    session.handle(SessionEvent::Deny);
    assert!(session.vitals().is_some());
}

#[test]
fn test_confirm_after_completion_starts_over() {
    let (mut session, manager) = session_with(VirtualBackend::new());
    reach_vitals(&mut session);
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Confirm);

    assert_eq!(session.step(), WizardStep::Home);
    assert!(!session.is_complete());
    assert!(session.identity().is_none());
    assert!(session.verification().is_none());
    assert!(session.vitals().is_none());
    assert!(!session.flow().has_visited(WizardStep::FaceCheckIn));
    assert!(!manager.is_held());
}

#[test]
fn test_restart_mid_scan_releases_camera() {
    let backend = VirtualBackend::new();
    let open = backend.open_streams();
    let (mut session, manager) = session_with(backend);
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    finish_scan(&mut session);
    session.handle(SessionEvent::Confirm);
    session.handle(SessionEvent::Start);
    session.handle(SessionEvent::Tick);
    assert!(manager.is_held());

    session.handle(SessionEvent::Restart);

    assert_eq!(session.step(), WizardStep::Home);
    assert!(session.scan().is_idle());
    assert_eq!(session.next_tick_delay(), None);
    assert!(session.identity().is_none());
    assert!(!manager.is_held());
    assert_eq!(open.load(std::sync::atomic::Ordering::SeqCst), 0);
}
