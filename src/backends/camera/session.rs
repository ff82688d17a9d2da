// SPDX-License-Identifier: GPL-3.0-only

//! Scoped camera acquisition for a single screen
//!
//! A [`CameraHandle`] owns an opened device and the manager's lease. It is
//! released exactly once, either explicitly or when it is dropped, so every
//! exit path from a screen gives the camera back.
//!
//! [`CameraSession`] tracks the per-screen lifecycle:
//!
//! ```text
//! Unmounted ──acquire──▶ Acquiring ──ok──▶ Acquired ──release──▶ Released ──unmount──▶ Unmounted
//!                            │                                       ▲
//!                            └────────────────failed─────────────────┘
//! ```

use super::manager::{CameraBackendManager, Lease, lock_lease};
use super::types::*;
use super::CameraStream;
use crate::errors::CameraError;
use std::time::Instant;
use tracing::{debug, info};

/// An acquired, revocable camera
pub struct CameraHandle {
    device: CameraDevice,
    stream: Option<Box<dyn CameraStream>>,
    lease: Lease,
    acquired_at: Instant,
}

impl CameraHandle {
    pub(crate) fn new(device: CameraDevice, stream: Box<dyn CameraStream>, lease: Lease) -> Self {
        Self {
            device,
            stream: Some(stream),
            lease,
            acquired_at: Instant::now(),
        }
    }

    pub fn device(&self) -> &CameraDevice {
        &self.device
    }

    /// Whether the device is still held
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Grab a frame from the held device
    pub fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        match self.stream.as_mut() {
            Some(stream) => stream.capture_frame(),
            None => Err(BackendError::CaptureFailed(format!(
                "{} has been released",
                self.device.path
            ))),
        }
    }

    /// Stop the device and give up the lease. Safe to call repeatedly.
    pub fn release(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        stream.stop();

        let mut lease = lock_lease(&self.lease);
        if lease.as_deref() == Some(self.device.path.as_str()) {
            *lease = None;
        }

        info!(
            device = %self.device.name,
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "Camera released"
        );
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraHandle")
            .field("device", &self.device.path)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Lifecycle phase of a screen's camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unmounted,
    Acquiring,
    Acquired,
    Released,
}

/// Camera ownership for the currently mounted screen
#[derive(Debug, Default)]
pub struct CameraSession {
    phase: SessionPhase,
    handle: Option<CameraHandle>,
    error: Option<CameraError>,
}

impl CameraSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether this screen currently holds the camera
    pub fn is_acquired(&self) -> bool {
        self.phase == SessionPhase::Acquired && self.handle.as_ref().is_some_and(|h| h.is_active())
    }

    /// Error from the last failed acquisition
    pub fn error(&self) -> Option<&CameraError> {
        self.error.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut CameraHandle> {
        self.handle.as_mut()
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.handle.as_ref().map(|h| h.device())
    }

    /// Acquire the camera for this screen. Reuses a handle already held.
    pub fn acquire(
        &mut self,
        manager: &CameraBackendManager,
        preferred: Option<&str>,
    ) -> Result<(), CameraError> {
        if self.is_acquired() {
            return Ok(());
        }

        self.phase = SessionPhase::Acquiring;
        let result = manager.acquire(preferred);
        self.finish_acquire(result)
    }

    /// Async variant of [`CameraSession::acquire`]
    pub async fn acquire_async(
        &mut self,
        manager: &CameraBackendManager,
        preferred: Option<String>,
    ) -> Result<(), CameraError> {
        if self.is_acquired() {
            return Ok(());
        }

        self.phase = SessionPhase::Acquiring;
        let result = manager.acquire_async(preferred).await;
        self.finish_acquire(result)
    }

    fn finish_acquire(&mut self, result: Result<CameraHandle, CameraError>) -> Result<(), CameraError> {
        match result {
            Ok(handle) => {
                self.handle = Some(handle);
                self.error = None;
                self.phase = SessionPhase::Acquired;
                Ok(())
            }
            Err(e) => {
                // Nothing is held after a failed request
                self.handle = None;
                self.error = Some(e.clone());
                self.phase = SessionPhase::Released;
                Err(e)
            }
        }
    }

    /// Release the camera. A no-op when nothing was ever acquired.
    pub fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
        if self.phase != SessionPhase::Unmounted {
            self.phase = SessionPhase::Released;
        }
    }

    /// Tear down for screen exit: release and forget any error
    pub fn unmount(&mut self) {
        self.release();
        self.error = None;
        self.phase = SessionPhase::Unmounted;
        debug!("Camera session unmounted");
    }
}
