// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend lifecycle manager
//!
//! The manager provides:
//! - Device enumeration and selection
//! - A single-handle lease: at most one [`CameraHandle`] exists at a time
//! - Blocking and async acquisition

use super::session::CameraHandle;
use super::types::*;
use super::{CameraBackend, get_backend_for_type};
use crate::errors::CameraError;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Path of the device currently leased to a handle, if any.
///
/// Shared with every handle so that releasing a handle frees the lease
/// without going back through the manager.
pub(crate) type Lease = Arc<Mutex<Option<String>>>;

pub(crate) fn lock_lease(lease: &Lease) -> MutexGuard<'_, Option<String>> {
    lease.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Camera backend manager
///
/// Thread-safe and cheap to clone; clones share the backend and the lease.
#[derive(Clone)]
pub struct CameraBackendManager {
    backend: Arc<dyn CameraBackend>,
    lease: Lease,
}

impl CameraBackendManager {
    /// Create a new backend manager
    ///
    /// # Arguments
    /// * `backend_type` - The type of backend to use
    pub fn new(backend_type: CameraBackendType) -> Self {
        info!(backend = %backend_type, "Creating camera backend manager");
        Self::with_backend(get_backend_for_type(backend_type))
    }

    /// Create a manager around an existing backend instance
    pub fn with_backend(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend: Arc::from(backend),
            lease: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the backend type
    pub fn backend_type(&self) -> CameraBackendType {
        self.backend.backend_type()
    }

    /// Check if the backend is available on this system
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Enumerate available cameras
    pub fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
        if !self.backend.is_available() {
            return Err(BackendError::NotAvailable(format!(
                "{} capture is not available on this system",
                self.backend.backend_type()
            )));
        }

        let cameras = self.backend.enumerate_cameras();
        if cameras.is_empty() {
            Err(BackendError::DeviceNotFound("No cameras found".to_string()))
        } else {
            Ok(cameras)
        }
    }

    /// Pick the preferred device, or the first one when no preference matches
    pub fn select_device(&self, preferred: Option<&str>) -> BackendResult<CameraDevice> {
        let mut cameras = self.enumerate_cameras()?;

        if let Some(path) = preferred {
            if let Some(index) = cameras.iter().position(|c| c.path == path) {
                return Ok(cameras.swap_remove(index));
            }
            warn!(preferred = path, "Preferred camera not found, using first available");
        }

        Ok(cameras.swap_remove(0))
    }

    /// Whether a handle currently holds the camera
    pub fn is_held(&self) -> bool {
        lock_lease(&self.lease).is_some()
    }

    /// Acquire the camera
    ///
    /// Fails with [`CameraError::DeviceUnavailable`] when no device exists,
    /// access is refused, or another handle still holds the camera, and with
    /// [`CameraError::UnsupportedPlatform`] when the backend has no capture API.
    pub fn acquire(&self, preferred: Option<&str>) -> Result<CameraHandle, CameraError> {
        // Claim the lease first so two acquisitions can never both open a device
        {
            let mut lease = lock_lease(&self.lease);
            if let Some(holder) = lease.as_deref() {
                warn!(holder, "Camera already held");
                return Err(BackendError::Busy.into());
            }
            *lease = Some(String::new());
        }

        let opened = self
            .select_device(preferred)
            .and_then(|device| self.backend.open(&device).map(|stream| (device, stream)));

        match opened {
            Ok((device, stream)) => {
                *lock_lease(&self.lease) = Some(device.path.clone());
                info!(device = %device, "Camera acquired");
                Ok(CameraHandle::new(device, stream, Arc::clone(&self.lease)))
            }
            Err(e) => {
                *lock_lease(&self.lease) = None;
                warn!(error = %e, "Camera acquisition failed");
                Err(e.into())
            }
        }
    }

    /// Acquire the camera on tokio's blocking pool
    pub async fn acquire_async(&self, preferred: Option<String>) -> Result<CameraHandle, CameraError> {
        let manager = self.clone();
        tokio::task::spawn_blocking(move || manager.acquire(preferred.as_deref()))
            .await
            .unwrap_or_else(|e| {
                Err(CameraError::DeviceUnavailable(format!(
                    "acquisition task failed: {}",
                    e
                )))
            })
    }
}

impl std::fmt::Debug for CameraBackendManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraBackendManager")
            .field("backend_type", &self.backend.backend_type())
            .field("held", &self.is_held())
            .finish()
    }
}
