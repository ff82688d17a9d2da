// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Check-in screens   │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   CameraSession     │  ← Per-screen lifecycle (Unmounted → Acquired → Released)
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackendManager│  ← Device selection, single-handle lease
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!   ┌──────┐  ┌─────────┐
//!   │ V4L2 │  │ Virtual │
//!   └──────┘  └─────────┘
//! ```

pub mod manager;
pub mod session;
pub mod types;
#[cfg(target_os = "linux")]
pub mod v4l2;
#[cfg(target_os = "linux")]
pub mod v4l2_utils;
pub mod virtual_camera;

pub use manager::CameraBackendManager;
pub use session::{CameraHandle, CameraSession, SessionPhase};
pub use types::*;
pub use virtual_camera::{VirtualBackend, VirtualFault};

/// Camera backend trait
///
/// Backends enumerate devices and open them. An opened device is returned as
/// a [`CameraStream`] that keeps the device busy until it is stopped or
/// dropped.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Open a camera device for capture
    ///
    /// # Returns
    /// * `Ok(stream)` - The device is held until the stream is stopped
    /// * `Err(BackendError::PermissionDenied)` - Access refused
    /// * `Err(BackendError::NotAvailable)` - Capture API missing on this system
    fn open(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraStream>>;

    /// Get the backend type identifier
    fn backend_type(&self) -> CameraBackendType;

    /// Check if this backend is available on the current system
    fn is_available(&self) -> bool;
}

/// An opened camera device
pub trait CameraStream: Send {
    /// The device this stream was opened on
    fn device(&self) -> &CameraDevice;

    /// Grab a single frame
    fn capture_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Stop capture and close the device. Calling it again does nothing.
    fn stop(&mut self);
}

/// Get a concrete backend instance for a backend type
pub fn get_backend_for_type(backend_type: CameraBackendType) -> Box<dyn CameraBackend> {
    match backend_type {
        #[cfg(target_os = "linux")]
        CameraBackendType::V4l2 => Box::new(v4l2::V4l2Backend::new()),
        #[cfg(not(target_os = "linux"))]
        CameraBackendType::V4l2 => Box::new(VirtualBackend::with_fault(VirtualFault::Unsupported)),
        CameraBackendType::Virtual => Box::new(VirtualBackend::new()),
    }
}
