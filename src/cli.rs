// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing capture devices of the selected backend
//! - Running one scan headless, printing each state
//! - Printing (and optionally saving) the effective configuration

use futures::StreamExt;
use opticheck::backends::camera::{CameraBackendManager, CameraSession};
use opticheck::errors::{AppError, AppResult};
use opticheck::recognition::{MockRecognitionService, RecognitionService};
use opticheck::scan::{ScanKind, ScanOutcome, ScanSimulator, ScanState};
use opticheck::Config;
use std::sync::Arc;
use tokio::sync::Notify;

/// List all available cameras
pub fn list_cameras(manager: &CameraBackendManager) -> AppResult<()> {
    if !manager.is_available() {
        println!(
            "The {} backend is not available on this system.",
            manager.backend_type()
        );
        return Ok(());
    }

    let cameras = manager.enumerate_cameras().unwrap_or_default();
    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras ({}):", manager.backend_type());
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
        if let Some(info) = &camera.device_info {
            println!("      Driver: {} ({})", info.driver, info.card);
            if info.real_path != camera.path {
                println!("      Device: {}", info.real_path);
            }
        }
        println!();
    }

    Ok(())
}

/// Run one scan profile to completion, printing progress as it goes
pub fn run_scan(
    manager: &CameraBackendManager,
    config: &Config,
    kind: ScanKind,
) -> AppResult<()> {
    // Ctrl+C ends the scan loop; the camera is released below
    let cancel = Arc::new(Notify::new());
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_handler.notify_one();
    })?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut camera = CameraSession::new();
        if let Err(e) = camera
            .acquire_async(manager, config.camera_path.clone())
            .await
        {
            println!("{}", e.user_message());
            return Ok(());
        }

        let handle = camera.handle_mut().ok_or("Camera was not acquired")?;
        println!("Using camera: {}", handle.device());
        let frame = handle.capture_frame()?;

        let service = MockRecognitionService::new();
        let outcome = match kind {
            ScanKind::Face => ScanOutcome::Identity(service.submit(&frame)?),
            ScanKind::IdDocument => ScanOutcome::Document(service.verify_document(&frame, None)?),
            ScanKind::Vitals => ScanOutcome::Vitals(service.measure_vitals(&frame)?),
        };

        let profile = config.scan_profile(kind);
        println!(
            "Running {} scan (about {:.1}s, Ctrl+C to cancel)",
            kind,
            profile.duration().as_secs_f64()
        );
        println!();

        let stream = ScanSimulator::start(profile, outcome).paced();
        futures::pin_mut!(stream);

        let mut last_message = "";
        let mut finished = None;
        loop {
            tokio::select! {
                next = stream.next() => match next {
                    Some(ScanState::Complete { outcome, message }) => {
                        println!("[100%] {}", message);
                        finished = Some(outcome);
                        break;
                    }
                    Some(state) => {
                        if state.message() != last_message {
                            last_message = state.message();
                            println!("[{:>3}%] {}", state.progress(), last_message);
                        }
                    }
                    None => break,
                },
                _ = cancel.notified() => {
                    println!();
                    println!("Scan cancelled.");
                    break;
                }
            }
        }

        camera.release();

        if let Some(outcome) = finished {
            println!();
            print_outcome(&outcome);
        }

        Ok::<(), AppError>(())
    })
}

fn print_outcome(outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::Identity(identity) => {
            println!("Welcome back, {}", identity.name);
            println!("  Patient ID:    {}", identity.id);
            println!(
                "  Last check-in: {}",
                identity.last_check_in.format("%b %d, %Y")
            );
        }
        ScanOutcome::Document(verification) => {
            let status = if verification.verified {
                "verified"
            } else {
                "not verified"
            };
            println!("ID document {} for patient {}", status, verification.patient_id);
            println!(
                "  Checked at: {}",
                verification.verified_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        ScanOutcome::Vitals(report) => {
            println!("Heart rate:        {} bpm", report.heart_rate);
            println!("Blood pressure:    {} mmHg", report.blood_pressure);
            println!("Respiratory rate:  {} breaths/min", report.respiratory_rate);
            println!("Stress level:      {}", report.stress_level);
            println!("BMI:               {:.1}", report.bmi);
            println!("Oxygen saturation: {}%", report.oxygen_saturation);
            println!();
            println!("{}", report.summary());
            for insight in report.insights() {
                println!("  ! {}", insight);
            }
            for recommendation in report.recommendations() {
                println!("  - {}", recommendation);
            }
            println!("Next check-in: {}", report.next_check_in().format("%b %d, %Y"));
        }
    }
}

/// Print the config path and the effective configuration, writing it
/// back to the config file when `save` is set
pub fn show_config(config: &Config, save: bool) -> AppResult<()> {
    if save {
        config.save()?;
    }

    match Config::config_path() {
        Ok(path) => {
            let marker = if path.exists() { "" } else { " (not created yet)" };
            println!("Config file: {}{}", path.display(), marker);
        }
        Err(e) => println!("Config file: {}", e),
    }
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
